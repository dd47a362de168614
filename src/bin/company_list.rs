// * Unattended company-list export
// * Walks the whole listing screen and writes it to CSV, no prompts.

use equity_harvest::config::constants::LISTING_CSV_FILE;
use equity_harvest::config::HarvestConfig;
use equity_harvest::engine::Harvester;
use equity_harvest::ops::init_tracing;
use equity_harvest::persistence::{render_company_preview, write_companies};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    init_tracing();

    let config = HarvestConfig::default().with_output_dir(".");
    let harvester = match Harvester::from_config(config) {
        Ok(harvester) => harvester,
        Err(e) => {
            error!(error = %e, "Cannot build HTTP client");
            std::process::exit(1);
        }
    };

    let companies = harvester.list_companies().await;
    if companies.is_empty() {
        error!("No companies collected");
        std::process::exit(1);
    }

    let path = harvester.config().output_dir.join(LISTING_CSV_FILE);
    match write_companies(&path, &companies) {
        Ok(written) => {
            info!(rows = written, path = %path.display(), "Company list saved");
            println!("Total companies scraped: {written}");
            print!("{}", render_company_preview(&companies));
        }
        Err(e) => {
            error!(error = %e, path = %path.display(), "Failed to write company list");
            std::process::exit(1);
        }
    }
}
