//! Option batch loading
//!
//! Batches come either from a CSV file with header
//! `spot,strike,expiry,rate,volatility[,type]` or from the seeded random
//! generator used for benchmarking runs.

use std::io::Read;
use std::path::Path;

use pricer_batch::mc::{OptionContract, OptionType};
use pricer_batch::rng::PricerRng;
use serde::Deserialize;
use tracing::debug;

use crate::{CliError, Result};

/// Risk-free rate of generated batches.
pub const RANDOM_RATE: f64 = 0.06;
/// Volatility of generated batches.
pub const RANDOM_VOLATILITY: f64 = 0.10;

#[derive(Debug, Deserialize)]
struct ContractRow {
    spot: f64,
    strike: f64,
    expiry: f64,
    rate: f64,
    volatility: f64,
    #[serde(rename = "type", default)]
    option_type: Option<String>,
}

impl ContractRow {
    fn into_contract(self, row: usize) -> Result<OptionContract> {
        let option_type = match self.option_type.as_deref().map(str::trim) {
            None | Some("") => OptionType::Call,
            Some(text) => text
                .parse::<OptionType>()
                .map_err(|message| CliError::InvalidInput { row, message })?,
        };
        Ok(OptionContract {
            spot: self.spot,
            strike: self.strike,
            expiry: self.expiry,
            rate: self.rate,
            volatility: self.volatility,
            option_type,
        })
    }
}

/// Reads contracts from CSV text.
///
/// Row numbers in errors are 1-based data rows (the header is not counted).
pub fn read_contracts<R: Read>(reader: R) -> Result<Vec<OptionContract>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut contracts = Vec::new();
    for (index, record) in csv_reader.deserialize::<ContractRow>().enumerate() {
        contracts.push(record?.into_contract(index + 1)?);
    }
    Ok(contracts)
}

/// Loads contracts from a CSV file.
pub fn load_csv(path: &Path) -> Result<Vec<OptionContract>> {
    if !path.exists() {
        return Err(CliError::FileNotFound(path.display().to_string()));
    }
    let file = std::fs::File::open(path)?;
    let contracts = read_contracts(file)?;
    debug!(path = %path.display(), options = contracts.len(), "loaded option batch");
    Ok(contracts)
}

/// Generates `n` calls with spot in [5, 30), strike in [1, 100) and expiry
/// in [0.25, 10).
pub fn generate_random(n: usize, seed: u64) -> Vec<OptionContract> {
    let mut rng = PricerRng::from_seed(seed);
    (0..n)
        .map(|_| {
            let spot = rng.gen_range(5.0, 30.0);
            let strike = rng.gen_range(1.0, 100.0);
            let expiry = rng.gen_range(0.25, 10.0);
            OptionContract::call(spot, strike, expiry, RANDOM_RATE, RANDOM_VOLATILITY)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_contracts_with_and_without_type() {
        let text = "spot,strike,expiry,rate,volatility,type\n\
                    100,100,1,0.05,0.2,call\n\
                    100,110,0.5,0.05,0.3,put\n\
                    90,80,2,0.01,0.25,\n";
        let contracts = read_contracts(text.as_bytes()).unwrap();
        assert_eq!(contracts.len(), 3);
        assert_eq!(contracts[0].option_type, OptionType::Call);
        assert_eq!(contracts[1].option_type, OptionType::Put);
        assert_eq!(contracts[2].option_type, OptionType::Call);
        assert_eq!(contracts[1].strike, 110.0);
    }

    #[test]
    fn test_read_contracts_without_type_column() {
        let text = "spot,strike,expiry,rate,volatility\n25, 20, 1.5, 0.06, 0.1\n";
        let contracts = read_contracts(text.as_bytes()).unwrap();
        assert_eq!(contracts, vec![OptionContract::call(25.0, 20.0, 1.5, 0.06, 0.1)]);
    }

    #[test]
    fn test_unknown_type_reports_row() {
        let text = "spot,strike,expiry,rate,volatility,type\n\
                    100,100,1,0.05,0.2,call\n\
                    100,100,1,0.05,0.2,straddle\n";
        match read_contracts(text.as_bytes()) {
            Err(CliError::InvalidInput { row, .. }) => assert_eq!(row, 2),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_malformed_number_is_csv_error() {
        let text = "spot,strike,expiry,rate,volatility\nabc,100,1,0.05,0.2\n";
        assert!(matches!(
            read_contracts(text.as_bytes()),
            Err(CliError::Csv(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = load_csv(Path::new("/nonexistent/options.csv"));
        assert!(matches!(result, Err(CliError::FileNotFound(_))));
    }

    #[test]
    fn test_generate_random_ranges_and_determinism() {
        let a = generate_random(500, 7);
        let b = generate_random(500, 7);
        assert_eq!(a, b);
        for c in &a {
            assert!((5.0..30.0).contains(&c.spot));
            assert!((1.0..100.0).contains(&c.strike));
            assert!((0.25..10.0).contains(&c.expiry));
            assert_eq!(c.rate, RANDOM_RATE);
            assert_eq!(c.volatility, RANDOM_VOLATILITY);
            assert!(c.validate().is_ok());
        }
        assert_ne!(generate_random(5, 7), generate_random(5, 8));
    }
}
