//! Result rendering
//!
//! One row per option in batch order, optionally extended with the
//! Black-Scholes comparison.

use std::io::Write;

use pricer_batch::mc::{OptionContract, OptionEstimate, OptionType};
use pricer_batch::validation::ComparisonReport;
use serde::Serialize;

use crate::config::OutputFormat;
use crate::Result;

/// One rendered option.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub index: usize,
    #[serde(rename = "type")]
    pub option_type: OptionType,
    pub spot: f64,
    pub strike: f64,
    pub expiry: f64,
    pub rate: f64,
    pub volatility: f64,
    pub expected: f64,
    pub confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub black_scholes: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abs_error: Option<f64>,
}

/// Batch-level comparison figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonSummary {
    pub relative_l1: f64,
    pub max_abs_error: f64,
    pub within_confidence: f64,
}

/// Pricing results ready for output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricingReport {
    pub paths: u64,
    pub steps: usize,
    pub sampler: String,
    pub options: Vec<ReportRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<ComparisonSummary>,
}

impl PricingReport {
    /// Joins contracts, estimates and an optional comparison row by row.
    pub fn new(
        paths: u64,
        steps: usize,
        sampler: String,
        contracts: &[OptionContract],
        estimates: &[OptionEstimate],
        comparison: Option<&ComparisonReport>,
    ) -> Self {
        let options = contracts
            .iter()
            .zip(estimates)
            .enumerate()
            .map(|(index, (contract, estimate))| {
                let compared = comparison.and_then(|c| c.options.get(index));
                ReportRow {
                    index,
                    option_type: contract.option_type,
                    spot: contract.spot,
                    strike: contract.strike,
                    expiry: contract.expiry,
                    rate: contract.rate,
                    volatility: contract.volatility,
                    expected: estimate.expected,
                    confidence: estimate.confidence,
                    black_scholes: compared.map(|c| c.black_scholes),
                    abs_error: compared.map(|c| c.abs_error),
                }
            })
            .collect();

        Self {
            paths,
            steps,
            sampler,
            options,
            comparison: comparison.map(|c| ComparisonSummary {
                relative_l1: c.relative_l1,
                max_abs_error: c.max_abs_error,
                within_confidence: c.within_confidence,
            }),
        }
    }

    /// Writes the report in `format`.
    pub fn write<W: Write>(&self, format: OutputFormat, out: W) -> Result<()> {
        match format {
            OutputFormat::Table => self.write_table(out),
            OutputFormat::Json => self.write_json(out),
            OutputFormat::Csv => self.write_csv(out),
        }
    }

    fn write_table<W: Write>(&self, mut out: W) -> Result<()> {
        let compare = self.comparison.is_some();
        write!(
            out,
            "{:>6} {:>5} {:>10} {:>10} {:>7} {:>7} {:>7} {:>12} {:>10}",
            "#", "type", "spot", "strike", "expiry", "rate", "vol", "price", "±conf"
        )?;
        if compare {
            write!(out, " {:>12} {:>10}", "bs", "abs err")?;
        }
        writeln!(out)?;

        for row in &self.options {
            write!(
                out,
                "{:>6} {:>5} {:>10.4} {:>10.4} {:>7.3} {:>7.4} {:>7.4} {:>12.6} {:>10.6}",
                row.index,
                row.option_type,
                row.spot,
                row.strike,
                row.expiry,
                row.rate,
                row.volatility,
                row.expected,
                row.confidence
            )?;
            if let (Some(bs), Some(err)) = (row.black_scholes, row.abs_error) {
                write!(out, " {:>12.6} {:>10.2e}", bs, err)?;
            }
            writeln!(out)?;
        }

        writeln!(
            out,
            "\n{} options, {} paths x {} steps ({})",
            self.options.len(),
            self.paths,
            self.steps,
            self.sampler
        )?;
        if let Some(summary) = &self.comparison {
            writeln!(
                out,
                "L1 relative error {:.3e}, max abs error {:.3e}, {:.1}% within confidence",
                summary.relative_l1,
                summary.max_abs_error,
                summary.within_confidence * 100.0
            )?;
        }
        Ok(())
    }

    fn write_json<W: Write>(&self, mut out: W) -> Result<()> {
        serde_json::to_writer_pretty(&mut out, self)?;
        writeln!(out)?;
        Ok(())
    }

    fn write_csv<W: Write>(&self, out: W) -> Result<()> {
        let mut writer = csv::Writer::from_writer(out);
        for row in &self.options {
            writer.serialize(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}
