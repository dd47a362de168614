mod common;

use common::ScriptedFetcher;
use equity_harvest::config::{HarvestConfig, ListingConfig};
use equity_harvest::engine::{analyze, DownloadStatus, HarvestError, Harvester};
use equity_harvest::refinery::{normalize_record, DocumentKind, DocumentLink, Extracted, NormalizedValue};
use std::time::Duration;

const COMPANY_PAGE: &str = include_str!("fixtures/company_page.html");
const TCS_URL: &str = "https://www.screener.in/company/TCS/consolidated/";

fn quiet_config() -> HarvestConfig {
    HarvestConfig::default().with_pacing(Duration::ZERO, Duration::ZERO)
}

#[tokio::test]
async fn test_top_ratios_from_company_page() {
    let fetcher = ScriptedFetcher::new().with_body(TCS_URL, COMPANY_PAGE);
    let harvester = Harvester::new(fetcher, quiet_config());

    // * Symbols are upper-cased into the URL template
    let record = harvester.top_ratios("tcs").await.unwrap().found().unwrap();
    assert_eq!(harvester.fetcher().requested(), vec![TCS_URL.to_string()]);

    let labels: Vec<&str> = record.labels().collect();
    assert_eq!(labels, vec!["Market Cap", "Current Price", "High / Low", "ROE"]);
    assert_eq!(record.get("Market Cap"), Some("₹ 15,12,345 Cr."));

    let normalized = normalize_record(&record);
    assert_eq!(normalized[0].1, NormalizedValue::Integer(1512345));
    assert_eq!(normalized[2].1, NormalizedValue::Range("4,592 / 3,311".to_string()));
    assert_eq!(normalized[3].1, NormalizedValue::Float(51.5));
}

#[tokio::test]
async fn test_shareholding_trend_uses_outer_columns() {
    let fetcher = ScriptedFetcher::new().with_body(TCS_URL, COMPANY_PAGE);
    let harvester = Harvester::new(fetcher, quiet_config());

    let table = harvester.shareholding("TCS").await.unwrap().found().unwrap();
    assert_eq!(table.periods(), ["Dec 2023", "Mar 2024", "Jun 2024"]);
    assert_eq!(table.get("Promoters", "Mar 2024"), Some("71.77%"));

    let report = analyze(&table).unwrap();
    assert_eq!(report.from_period, "Dec 2023");
    assert_eq!(report.to_period, "Jun 2024");

    let fiis = report.delta_for("FIIs").unwrap();
    assert!((fiis.delta - (-0.12)).abs() < 1e-9);

    // * "n/a" in the latest column becomes a row marker, not a failure
    assert!(report.delta_for("DIIs").is_none());
    assert_eq!(report.error_count(), 1);

    let holders = report.shareholders.clone().unwrap().unwrap();
    assert_eq!(holders.from_count, 2_401_000);
    assert_eq!(holders.to_count, 2_280_970);
    assert_eq!(holders.absolute_delta, -120_030);
}

#[tokio::test]
async fn test_document_sections() {
    let fetcher = ScriptedFetcher::new().with_body(TCS_URL, COMPANY_PAGE);
    let harvester = Harvester::new(fetcher, quiet_config());

    let reports = harvester.documents("TCS", DocumentKind::AnnualReports).await.unwrap().found().unwrap();
    assert_eq!(reports.len(), 2);
    let DocumentLink::AnnualReport(latest) = &reports[0] else {
        panic!("expected annual report");
    };
    assert_eq!(latest.period_label, "Financial Year 2024");
    assert_eq!(latest.fiscal_year, Some(2024));
    assert_eq!(latest.source_label.as_deref(), Some("from bse"));

    // * The recording-only April call is not kept
    let concalls = harvester.documents("TCS", DocumentKind::Concalls).await.unwrap().found().unwrap();
    assert_eq!(concalls.len(), 1);
    let DocumentLink::Concall(july) = &concalls[0] else {
        panic!("expected concall");
    };
    assert_eq!(july.period_bucket, "Jul_2024");
    assert_eq!(july.notes.as_deref(), Some("https://www.screener.in/concalls/summary/118/"));
}

#[tokio::test]
async fn test_download_documents_into_symbol_folder() {
    let dir = tempfile::tempdir().unwrap();
    let fetcher = ScriptedFetcher::new()
        .with_body(TCS_URL, COMPANY_PAGE)
        .with_body("https://www.bseindia.com/xml-data/corpfiling/t1.pdf", "transcript")
        .with_body("https://www.screener.in/concalls/summary/118/", "notes")
        .with_body("https://www.bseindia.com/xml-data/corpfiling/deck.pdf", "deck")
        .with_status("https://www.youtube.com/watch?v=abc123", 403);
    let harvester = Harvester::new(fetcher, quiet_config().with_download_dir(dir.path()));

    let batch = harvester.download_documents("tcs", DocumentKind::Concalls).await.unwrap();
    assert!(batch.section_found);
    assert_eq!(batch.links_found, 1);
    assert_eq!(batch.outcomes.len(), 4);

    let bucket = dir.path().join("TCS").join("concalls").join("Jul_2024");
    assert_eq!(batch.outcomes[0].target_path, bucket.join("transcript.pdf"));
    assert_eq!(batch.outcomes[1].target_path, bucket.join("notes.pdf"));
    assert_eq!(batch.outcomes[2].target_path, bucket.join("presentation.pdf"));
    assert_eq!(batch.outcomes[3].target_path, bucket.join("recording.html"));
    assert!(matches!(batch.outcomes[3].status, DownloadStatus::Failed(_)));

    assert_eq!(batch.summary.downloaded, 3);
    assert_eq!(batch.summary.failed, 1);
    assert_eq!(std::fs::read_to_string(bucket.join("notes.pdf")).unwrap(), "notes");
}

#[tokio::test]
async fn test_missing_section_downloads_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let fetcher = ScriptedFetcher::new().with_body(TCS_URL, "<html><body><p>maintenance</p></body></html>");
    let harvester = Harvester::new(fetcher, quiet_config().with_download_dir(dir.path()));

    let batch = harvester.download_documents("TCS", DocumentKind::CreditRatings).await.unwrap();
    assert!(!batch.section_found);
    assert!(batch.outcomes.is_empty());
    assert_eq!(harvester.fetcher().download_calls(), 0);
}

#[tokio::test]
async fn test_page_fetch_failure_aborts_run() {
    let fetcher = ScriptedFetcher::new().with_status(TCS_URL, 500);
    let harvester = Harvester::new(fetcher, quiet_config());

    let err = harvester.shareholding("TCS").await.unwrap_err();
    match err {
        HarvestError::PageFetch { url, .. } => assert_eq!(url, TCS_URL),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_absent_ratio_list() {
    let fetcher = ScriptedFetcher::new().with_body(TCS_URL, "<html><body></body></html>");
    let harvester = Harvester::new(fetcher, quiet_config());
    assert_eq!(harvester.top_ratios("TCS").await.unwrap(), Extracted::Absent);
}

fn listing_page(rows: &[(&str, &str, &str)]) -> String {
    let body: String = rows
        .iter()
        .map(|(serial, name, href)| {
            format!(
                r#"<tr data-row-company-id="1"><td class="text">{serial}.</td><td class="text"><a href="{href}">{name}</a></td><td>12.5</td></tr>"#
            )
        })
        .collect();
    format!(
        r#"<html><body><table class="data-table"><tbody><tr><th>S.No.</th><th>Name</th></tr>{body}</tbody></table></body></html>"#
    )
}

fn listing_url(page: u32) -> String {
    format!("https://www.screener.in/screens/41897/all-bse-companies/?page={page}")
}

#[tokio::test]
async fn test_listing_pagination_renumbers_and_stops_on_missing_table() {
    let fetcher = ScriptedFetcher::new()
        .with_body(
            &listing_url(1),
            listing_page(&[("1", "Aegis Logistics", "/company/AEGISLOG/"), ("2", "Bharat Forge", "/company/BHARATFORG/")]),
        )
        // * A table without company rows is skipped, not fatal
        .with_body(&listing_url(2), listing_page(&[]))
        .with_body(&listing_url(3), listing_page(&[("1", "Cipla", "/company/CIPLA/")]))
        .with_body(&listing_url(4), "<html><body>No results</body></html>");
    let harvester = Harvester::new(fetcher, quiet_config());

    let companies = harvester.list_companies().await;
    assert_eq!(companies.len(), 3);
    assert_eq!(companies[2].serial, "3");
    assert_eq!(companies[2].name, "Cipla");
    assert_eq!(companies[0].url, "https://www.screener.in/company/AEGISLOG/");
    assert_eq!(harvester.fetcher().page_calls(), 4);
}

#[tokio::test]
async fn test_listing_keeps_partial_results_on_fetch_error() {
    let fetcher = ScriptedFetcher::new()
        .with_body(&listing_url(1), listing_page(&[("1", "Aegis Logistics", "/company/AEGISLOG/")]))
        .with_status(&listing_url(2), 502);
    let harvester = Harvester::new(fetcher, quiet_config());

    let companies = harvester.list_companies().await;
    assert_eq!(companies.len(), 1);
    assert_eq!(harvester.fetcher().page_calls(), 2);
}

#[tokio::test]
async fn test_listing_stops_at_expected_total() {
    let fetcher = ScriptedFetcher::new()
        .with_body(
            &listing_url(1),
            listing_page(&[("1", "A", "/company/A/"), ("2", "B", "/company/B/")]),
        )
        .with_body(&listing_url(2), listing_page(&[("3", "C", "/company/C/")]));
    let listing = ListingConfig {
        expected_total: 2,
        ..ListingConfig::default()
    };
    let harvester = Harvester::new(fetcher, quiet_config().with_listing(listing));

    let companies = harvester.list_companies().await;
    assert_eq!(companies.len(), 2);
    assert_eq!(harvester.fetcher().page_calls(), 1);
}

#[tokio::test]
async fn test_snapshot_single_fetch() {
    let fetcher = ScriptedFetcher::new().with_body(TCS_URL, COMPANY_PAGE);
    let harvester = Harvester::new(fetcher, quiet_config());

    let snapshot = harvester.snapshot("TCS").await.unwrap();
    assert_eq!(harvester.fetcher().page_calls(), 1);
    assert!(snapshot.stats.has_ratios);
    assert!(snapshot.stats.has_shareholding);
    assert_eq!(snapshot.stats.ratio_count, 4);
    // * two annual reports, one rating, one concall
    assert_eq!(snapshot.stats.document_count, 4);
    assert!(snapshot.to_json_pretty().contains("\"kind\": \"concall\""));
}

#[test]
fn test_local_paths_stay_under_configured_dirs() {
    let config = quiet_config().with_download_dir("/tmp/dl").with_output_dir("/tmp/out");
    let harvester = Harvester::new(ScriptedFetcher::new(), config);

    assert_eq!(
        harvester.download_dir_for(" tcs ", DocumentKind::Concalls),
        std::path::PathBuf::from("/tmp/dl/TCS/concalls")
    );
    assert_eq!(
        harvester.download_dir_for("/etc", DocumentKind::Concalls),
        std::path::PathBuf::from("/tmp/dl/ETC/concalls")
    );
    assert_eq!(
        harvester.download_dir_for("../../x", DocumentKind::AnnualReports),
        std::path::PathBuf::from("/tmp/dl/X/annual_reports")
    );
    assert_eq!(
        harvester.report_path_for("../m&m"),
        std::path::PathBuf::from("/tmp/out/MM_shareholding.txt")
    );
}
