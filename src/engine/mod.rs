// * Pipeline engine: URL handling, pacing, trend analysis, downloads and the harvester itself.

pub mod downloader;
pub mod harvester;
pub mod normalization;
pub mod pacing;
pub mod trend;

pub use downloader::{
    plan_downloads, DownloadOrchestrator, DownloadOutcome, DownloadPlan, DownloadStatus, DownloadSummary,
};
pub use harvester::{DownloadBatch, HarvestError, Harvester};
pub use normalization::resolve_href;
pub use pacing::Pacer;
pub use trend::{
    analyze, CategoryTrend, RowError, ShareholderCountDelta, TrendDelta, TrendError, TrendReport,
};
