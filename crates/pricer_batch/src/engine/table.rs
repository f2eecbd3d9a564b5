//! Bounded per-option parameter table.

use std::ops::Range;

use super::error::EngineError;
use crate::mc::{DerivedParams, OptionContract};

/// Largest batch a single device accepts.
pub const MAX_OPTIONS: usize = 2048;

/// Fixed-capacity arena of [`DerivedParams`], one row per option.
///
/// The table is owned by one batch and handed to every kernel launch as an
/// explicit argument. Loading a batch either replaces the whole contents or,
/// on error, leaves the table untouched.
#[derive(Debug)]
pub struct OptionTable {
    rows: Vec<DerivedParams>,
    capacity: usize,
}

impl OptionTable {
    /// Reserves a table with room for `capacity` options.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Allocation` if the memory cannot be reserved.
    pub fn with_capacity(capacity: usize) -> Result<Self, EngineError> {
        let mut rows = Vec::new();
        rows.try_reserve_exact(capacity)
            .map_err(|_| EngineError::Allocation { elements: capacity })?;
        Ok(Self { rows, capacity })
    }

    /// Fails with `CapacityExceeded` if `requested` rows do not fit.
    #[inline]
    pub fn check_capacity(&self, requested: usize) -> Result<(), EngineError> {
        check_capacity(requested, self.capacity)
    }

    /// Replaces the table contents with the derived parameters of `contracts`.
    ///
    /// Returns the index range of the loaded rows.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::CapacityExceeded` if the batch does not fit and
    /// `EngineError::InvalidContract` for the first invalid contract.
    pub fn load(&mut self, contracts: &[OptionContract]) -> Result<Range<usize>, EngineError> {
        self.check_capacity(contracts.len())?;
        validate_contracts(contracts)?;

        self.rows.clear();
        self.rows.extend(contracts.iter().map(OptionContract::derive));
        Ok(0..self.rows.len())
    }

    /// Loaded rows.
    #[inline]
    pub fn rows(&self) -> &[DerivedParams] {
        &self.rows
    }

    /// Number of loaded rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if no rows are loaded.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Maximum number of rows.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

pub(crate) fn check_capacity(requested: usize, capacity: usize) -> Result<(), EngineError> {
    if requested > capacity {
        return Err(EngineError::CapacityExceeded {
            requested,
            capacity,
        });
    }
    Ok(())
}

pub(crate) fn validate_contracts(contracts: &[OptionContract]) -> Result<(), EngineError> {
    contracts
        .iter()
        .enumerate()
        .try_for_each(|(index, contract)| {
            contract
                .validate()
                .map_err(|source| EngineError::InvalidContract { index, source })
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contract() -> OptionContract {
        OptionContract::call(100.0, 100.0, 1.0, 0.05, 0.2)
    }

    #[test]
    fn test_load_and_replace() {
        let mut table = OptionTable::with_capacity(4).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.load(&[contract(); 3]).unwrap(), 0..3);
        assert_eq!(table.len(), 3);
        assert_eq!(table.load(&[contract(); 1]).unwrap(), 0..1);
        assert_eq!(table.rows()[0], contract().derive());
    }

    #[test]
    fn test_full_table_accepted_one_more_rejected() {
        let mut table = OptionTable::with_capacity(4).unwrap();
        assert!(table.load(&[contract(); 4]).is_ok());
        let err = table.load(&[contract(); 5]).unwrap_err();
        assert!(matches!(
            err,
            EngineError::CapacityExceeded {
                requested: 5,
                capacity: 4
            }
        ));
        // Rejected load leaves previous contents in place
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn test_invalid_contract_reports_index() {
        let mut table = OptionTable::with_capacity(MAX_OPTIONS).unwrap();
        let mut batch = vec![contract(); 5];
        batch[3].volatility = -0.1;
        match table.load(&batch) {
            Err(EngineError::InvalidContract { index, .. }) => assert_eq!(index, 3),
            other => panic!("unexpected {:?}", other),
        }
        assert!(table.is_empty());
    }
}
