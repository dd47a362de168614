// * Equity-Harvest
// * Company pages of a financial-data site → ratios, shareholding trends, document archives.

pub mod config;
pub mod engine;
pub mod network;
pub mod ops;
pub mod persistence;
pub mod refinery;
