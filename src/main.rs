// * Interactive console for the harvester
// * Numbered menu on stdout, logs on stderr.

use std::error::Error;
use std::io::Write;
use std::path::{Path, PathBuf};

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::info;

use equity_harvest::config::constants::LISTING_CSV_FILE;
use equity_harvest::config::HarvestConfig;
use equity_harvest::engine::{analyze, DownloadBatch, Harvester};
use equity_harvest::network::PageClient;
use equity_harvest::ops::init_tracing_with_level;
use equity_harvest::persistence::{
    render_company_preview, render_normalized, render_outcomes, render_ratios, render_shareholding,
    write_companies, write_report,
};
use equity_harvest::refinery::{extract_companies_from_file, normalize_record, DocumentKind, Extracted};

type CliResult = Result<(), Box<dyn Error>>;
type Input = Lines<BufReader<Stdin>>;

const MENU: &str = "
==================================================
 Equity Harvest
==================================================
 1. Show key ratios
 2. Shareholding pattern and trend
 3. Download annual reports
 4. Download credit ratings
 5. Download conference calls
 6. Export all listed companies to CSV
 7. Convert a saved listing page to CSV
 q. Quit
";

async fn prompt(input: &mut Input, label: &str) -> Option<String> {
    print!("{label}");
    let _ = std::io::stdout().flush();
    input.next_line().await.ok().flatten().map(|line| line.trim().to_string())
}

async fn ask_symbol(input: &mut Input) -> Option<String> {
    let symbol = prompt(input, "Company symbol (e.g. TATAMOTORS): ").await?;
    if symbol.is_empty() {
        println!("No symbol given.");
        return None;
    }
    Some(symbol.to_uppercase())
}

async fn show_ratios(harvester: &Harvester<PageClient>, symbol: &str) -> CliResult {
    match harvester.top_ratios(symbol).await? {
        Extracted::Found(record) => {
            print!("{}", render_ratios(symbol, &record));
            println!();
            print!("{}", render_normalized(&normalize_record(&record)));
        }
        Extracted::Absent => println!("No ratio list found for {symbol}."),
    }
    Ok(())
}

async fn show_shareholding(harvester: &Harvester<PageClient>, symbol: &str) -> CliResult {
    let table = match harvester.shareholding(symbol).await? {
        Extracted::Found(table) => table,
        Extracted::Absent => {
            println!("No shareholding table found for {symbol}.");
            return Ok(());
        }
    };

    let trend = match analyze(&table) {
        Ok(report) => Some(report),
        Err(e) => {
            println!("Trend skipped: {e}");
            None
        }
    };

    let text = render_shareholding(&table, trend.as_ref());
    print!("{text}");

    let path = harvester.report_path_for(symbol);
    write_report(&path, &text)?;
    println!("\nReport saved to {}", path.display());
    Ok(())
}

fn print_batch(symbol: &str, batch: &DownloadBatch) {
    if !batch.section_found {
        println!("No {} section found for {symbol}.", batch.kind);
        return;
    }
    println!("Found {} {} entries for {symbol}.", batch.links_found, batch.kind);
    print!("{}", render_outcomes(&batch.outcomes, &batch.summary));
}

async fn download(harvester: &Harvester<PageClient>, symbol: &str, kind: DocumentKind) -> CliResult {
    let batch = harvester.download_documents(symbol, kind).await?;
    print_batch(symbol, &batch);
    Ok(())
}

async fn export_listing(harvester: &Harvester<PageClient>) -> CliResult {
    println!("Collecting the company list, this takes a while...");
    let companies = harvester.list_companies().await;
    if companies.is_empty() {
        println!("No companies collected.");
        return Ok(());
    }

    let path = harvester.config().output_dir.join(LISTING_CSV_FILE);
    let written = write_companies(&path, &companies)?;
    println!("Saved {written} companies to {}", path.display());
    print!("{}", render_company_preview(&companies));
    Ok(())
}

async fn convert_listing_file(harvester: &Harvester<PageClient>, input: &mut Input) -> CliResult {
    let Some(raw) = prompt(input, "Path to saved listing HTML: ").await else {
        return Ok(());
    };
    let source = PathBuf::from(raw);

    let companies = match extract_companies_from_file(&source, &harvester.config().base_url)? {
        Extracted::Found(companies) => companies,
        Extracted::Absent => {
            println!("No company table in {}.", source.display());
            return Ok(());
        }
    };

    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "companies".to_string());
    let target = harvester.config().output_dir.join(Path::new(&stem).with_extension("csv"));
    let written = write_companies(&target, &companies)?;
    println!("Saved {written} companies to {}", target.display());
    Ok(())
}

#[tokio::main]
async fn main() {
    init_tracing_with_level("warn");

    let harvester = match Harvester::from_config(HarvestConfig::default()) {
        Ok(harvester) => harvester,
        Err(e) => {
            eprintln!("Cannot start: {e}");
            std::process::exit(1);
        }
    };
    info!(base_url = %harvester.config().base_url, "Harvester ready");

    let mut input = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("{MENU}");
        let Some(choice) = prompt(&mut input, "\nEnter your choice: ").await else {
            break;
        };

        let result = match choice.as_str() {
            "1" | "2" | "3" | "4" | "5" => {
                let Some(symbol) = ask_symbol(&mut input).await else {
                    continue;
                };
                match choice.as_str() {
                    "1" => show_ratios(&harvester, &symbol).await,
                    "2" => show_shareholding(&harvester, &symbol).await,
                    "3" => download(&harvester, &symbol, DocumentKind::AnnualReports).await,
                    "4" => download(&harvester, &symbol, DocumentKind::CreditRatings).await,
                    _ => download(&harvester, &symbol, DocumentKind::Concalls).await,
                }
            }
            "6" => export_listing(&harvester).await,
            "7" => convert_listing_file(&harvester, &mut input).await,
            "q" | "Q" => break,
            other => {
                println!("Invalid choice '{other}', try again.");
                Ok(())
            }
        };

        if let Err(e) = result {
            println!("Error: {e}");
        }
    }

    println!("Goodbye.");
}
