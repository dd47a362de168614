// * Harvest Pipeline
// * page fetch → extractors → (trend) → downloads, one company symbol at a time.
// * A failed page fetch aborts the run; everything downstream degrades softly.

use scraper::Html;
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use super::downloader::{DownloadOrchestrator, DownloadOutcome, DownloadSummary};
use super::pacing::Pacer;
use crate::config::HarvestConfig;
use crate::network::{Fetcher, NetworkError, PageClient};
use crate::persistence::sanitize_component;
use crate::refinery::{
    extract_companies, CompanyPage, CompanyRecord, CompanySnapshot, DocumentKind, DocumentLink,
    Extracted, RatioRecord, ShareholdingTable,
};

// * Symbols come from user input; on disk they are one sanitized component
fn local_symbol(symbol: &str) -> String {
    sanitize_component(&symbol.trim().to_uppercase())
}

#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Failed to fetch {url}: {source}")]
    PageFetch {
        url: String,
        #[source]
        source: NetworkError,
    },

    #[error("Transport setup failed: {0}")]
    Transport(#[from] NetworkError),
}

/// Result of downloading one document section of a company
#[derive(Debug, Clone, Serialize)]
pub struct DownloadBatch {
    pub kind: DocumentKind,
    /// `false` when the page had no such section
    pub section_found: bool,
    pub links_found: usize,
    pub outcomes: Vec<DownloadOutcome>,
    pub summary: DownloadSummary,
}

pub struct Harvester<F: Fetcher> {
    fetcher: F,
    config: HarvestConfig,
}

impl Harvester<PageClient> {
    /// Harvester over the live HTTP client
    pub fn from_config(config: HarvestConfig) -> Result<Self, HarvestError> {
        let client = PageClient::from_config(&config)?;
        Ok(Self::new(client, config))
    }
}

impl<F: Fetcher> Harvester<F> {
    pub fn new(fetcher: F, config: HarvestConfig) -> Self {
        Self { fetcher, config }
    }

    pub fn config(&self) -> &HarvestConfig {
        &self.config
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    async fn company_page(&self, symbol: &str) -> Result<CompanyPage, HarvestError> {
        let url = self.config.company_url(symbol);
        info!(symbol, url = %url, "Fetching company page");
        let html = self.fetcher.fetch_page(&url).await.map_err(|source| {
            error!(symbol, url = %url, error = %source, "Company page fetch failed");
            HarvestError::PageFetch {
                url: url.clone(),
                source,
            }
        })?;
        Ok(CompanyPage::parse(&html, &self.config.base_url))
    }

    /// Every extractor over the company page
    pub async fn snapshot(&self, symbol: &str) -> Result<CompanySnapshot, HarvestError> {
        let page = self.company_page(symbol).await?;
        Ok(page.snapshot())
    }

    pub async fn top_ratios(&self, symbol: &str) -> Result<Extracted<RatioRecord>, HarvestError> {
        let ratios = self.company_page(symbol).await?.ratios();
        if ratios.is_absent() {
            warn!(symbol, "Ratio list not found on page");
        }
        Ok(ratios)
    }

    pub async fn shareholding(&self, symbol: &str) -> Result<Extracted<ShareholdingTable>, HarvestError> {
        let table = self.company_page(symbol).await?.shareholding();
        if table.is_absent() {
            warn!(symbol, "Shareholding table not found on page");
        }
        Ok(table)
    }

    pub async fn documents(
        &self,
        symbol: &str,
        kind: DocumentKind,
    ) -> Result<Extracted<Vec<DocumentLink>>, HarvestError> {
        let links = self.company_page(symbol).await?.documents(kind);
        match &links {
            Extracted::Found(found) => debug!(symbol, %kind, links = found.len(), "Document section parsed"),
            Extracted::Absent => warn!(symbol, %kind, "Document section not found on page"),
        }
        Ok(links)
    }

    /// `<download_dir>/<SYMBOL>/<kind dir>`, symbol sanitized into one component
    pub fn download_dir_for(&self, symbol: &str, kind: DocumentKind) -> PathBuf {
        self.config
            .download_dir
            .join(local_symbol(symbol))
            .join(kind.dir_name())
    }

    /// `<output_dir>/<SYMBOL>_shareholding.txt`
    pub fn report_path_for(&self, symbol: &str) -> PathBuf {
        self.config
            .output_dir
            .join(format!("{}_shareholding.txt", local_symbol(symbol)))
    }

    /// Extracts one document section and downloads every file it links to
    pub async fn download_documents(&self, symbol: &str, kind: DocumentKind) -> Result<DownloadBatch, HarvestError> {
        let extracted = self.documents(symbol, kind).await?;
        let section_found = extracted.is_found();
        let links = extracted.unwrap_or_default();

        let target_dir = self.download_dir_for(symbol, kind);
        let orchestrator = DownloadOrchestrator::new(&self.fetcher, Pacer::new(self.config.download_pacing));
        let outcomes = orchestrator.download_all(&links, &target_dir).await;
        let summary = DownloadSummary::from_outcomes(&outcomes);

        Ok(DownloadBatch {
            kind,
            section_found,
            links_found: links.len(),
            outcomes,
            summary,
        })
    }

    /// Walks the paginated company screen and collects every row.
    ///
    /// A failed page ends the walk; rows gathered so far are kept.
    pub async fn list_companies(&self) -> Vec<CompanyRecord> {
        let listing = &self.config.listing;
        let pacer = Pacer::new(self.config.listing_pacing);
        let mut companies: Vec<CompanyRecord> = Vec::new();

        for page in listing.start_page..=listing.max_pages {
            let url = self.config.listing_page_url(page);
            info!(page, url = %url, "Fetching listing page");

            let html = match self.fetcher.fetch_page(&url).await {
                Ok(html) => html,
                Err(e) => {
                    error!(page, error = %e, "Listing page fetch failed, stopping");
                    break;
                }
            };

            // * Html is !Send, keep it scoped away from the next await
            let rows = {
                let document = Html::parse_document(&html);
                extract_companies(&document, &self.config.base_url)
            };

            let rows = match rows {
                Extracted::Found(rows) => rows,
                Extracted::Absent => {
                    warn!(page, "No company table on listing page, stopping");
                    break;
                }
            };
            if rows.is_empty() {
                debug!(page, "Listing page has no company rows");
                continue;
            }

            let found = rows.len();
            for row in rows {
                let serial = (companies.len() + 1).to_string();
                companies.push(CompanyRecord { serial, ..row });
            }
            info!(page, found, total = companies.len(), "Listing page collected");

            if companies.len() >= listing.expected_total {
                info!(total = companies.len(), "Expected company count reached");
                break;
            }
            if page < listing.max_pages {
                pacer.pause().await;
            }
        }

        companies
    }
}
