// * Configuration Constants
// * Central location for the provider layout, pacing and output defaults

// * Provider root; every page template below is relative to it
pub const BASE_URL: &str = "https://www.screener.in";

// * Company page template, `{symbol}` is replaced by the upper-cased ticker
pub const COMPANY_PATH_TEMPLATE: &str = "/company/{symbol}/consolidated/";

// * Paginated screen listing every BSE company, `?page=N` is appended
pub const LISTING_PATH: &str = "/screens/41897/all-bse-companies/";

// * Static identity sent with every request
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

// * Page fetch timeout in milliseconds
pub const PAGE_TIMEOUT_MS: u64 = 30_000;

// * Pause after every network download
pub const DOWNLOAD_PACING_MS: u64 = 1_000;

// * Pause between listing pages
pub const LISTING_PACING_MS: u64 = 2_000;

// * Listing walk defaults
pub const LISTING_START_PAGE: u32 = 1;
pub const LISTING_MAX_PAGES: u32 = 198;
pub const LISTING_EXPECTED_TOTAL: usize = 4_938;

// * Output locations (relative to the working directory)
pub const DEFAULT_OUTPUT_DIR: &str = "output";
pub const DEFAULT_DOWNLOAD_DIR: &str = "downloads";
pub const LISTING_CSV_FILE: &str = "all_bse_companies.csv";

// * Row label carrying the absolute shareholder count instead of a percentage
pub const SHAREHOLDERS_LABEL: &str = "No. of Shareholders";

// * Bucket used when no "Month YYYY" fragment is found in a concall entry
pub const UNKNOWN_DATE_BUCKET: &str = "Unknown_Date";

// * Extension used when neither the URL suffix nor a provider rule decides
pub const FALLBACK_EXTENSION: &str = ".pdf";
