// * Runtime configuration
// * A plain struct seeded from `constants`; callers override fields with the `with_*` setters.

pub mod constants;

use std::path::PathBuf;
use std::time::Duration;

use constants::*;

/// Settings for walking the paginated company listing
#[derive(Debug, Clone, PartialEq)]
pub struct ListingConfig {
    pub path: String,
    pub start_page: u32,
    pub max_pages: u32,
    pub expected_total: usize,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            path: LISTING_PATH.to_string(),
            start_page: LISTING_START_PAGE,
            max_pages: LISTING_MAX_PAGES,
            expected_total: LISTING_EXPECTED_TOTAL,
        }
    }
}

/// Top-level configuration shared by the client and the pipeline
#[derive(Debug, Clone)]
pub struct HarvestConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeout: Duration,
    pub download_pacing: Duration,
    pub listing_pacing: Duration,
    pub output_dir: PathBuf,
    pub download_dir: PathBuf,
    pub listing: ListingConfig,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            user_agent: USER_AGENT.to_string(),
            timeout: Duration::from_millis(PAGE_TIMEOUT_MS),
            download_pacing: Duration::from_millis(DOWNLOAD_PACING_MS),
            listing_pacing: Duration::from_millis(LISTING_PACING_MS),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            download_dir: PathBuf::from(DEFAULT_DOWNLOAD_DIR),
            listing: ListingConfig::default(),
        }
    }
}

impl HarvestConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_download_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.download_dir = dir.into();
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    // * Zero disables the pause entirely (used by tests)
    pub fn with_pacing(mut self, download: Duration, listing: Duration) -> Self {
        self.download_pacing = download;
        self.listing_pacing = listing;
        self
    }

    pub fn with_listing(mut self, listing: ListingConfig) -> Self {
        self.listing = listing;
        self
    }

    /// Absolute URL of a company's consolidated page
    pub fn company_url(&self, symbol: &str) -> String {
        let segment = encode_segment(&symbol.trim().to_uppercase());
        let path = COMPANY_PATH_TEMPLATE.replace("{symbol}", &segment);
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Absolute URL of one listing page
    pub fn listing_page_url(&self, page: u32) -> String {
        format!(
            "{}{}?page={}",
            self.base_url.trim_end_matches('/'),
            self.listing.path,
            page
        )
    }
}

// * Symbol as a single path segment; '/' and '.' are encoded so it cannot leave the template
fn encode_segment(raw: &str) -> String {
    url::form_urlencoded::byte_serialize(raw.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
        .replace('.', "%2E")
}
