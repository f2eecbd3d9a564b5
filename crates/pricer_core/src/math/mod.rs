//! Mathematical utilities.
//!
//! - [`distributions`]: standard normal CDF, PDF and inverse CND

pub mod distributions;
