mod common;

use common::ScriptedFetcher;
use equity_harvest::engine::{DownloadOrchestrator, DownloadStatus, DownloadSummary, Pacer};
use equity_harvest::refinery::{AnnualReport, ConcallEntry, CreditRating, DocumentLink};
use std::path::PathBuf;

fn annual(label: &str, url: &str) -> DocumentLink {
    DocumentLink::AnnualReport(AnnualReport {
        period_label: label.to_string(),
        fiscal_year: None,
        remote_url: url.to_string(),
        source_label: Some("from bse".to_string()),
    })
}

fn rating(title: &str, url: &str) -> DocumentLink {
    DocumentLink::CreditRating(CreditRating {
        title: title.to_string(),
        remote_url: url.to_string(),
        date_source_label: None,
    })
}

fn concall(bucket: &str, transcript: &str, presentation: &str) -> DocumentLink {
    let mut entry = ConcallEntry::new(bucket);
    entry.transcript = Some(transcript.to_string());
    entry.presentation = Some(presentation.to_string());
    DocumentLink::Concall(entry)
}

// * Five links of mixed kinds, six files in total
fn mixed_links() -> Vec<DocumentLink> {
    vec![
        annual("Financial Year 2024", "https://www.bseindia.com/ar/2024.pdf"),
        rating("Rating update", "https://www.icra.in/r?Id=7"),
        concall("Jul_2024", "https://www.bseindia.com/t/jul.pdf", "https://x.com/jul-deck.pdf"),
        annual("Financial Year 2023", "https://www.bseindia.com/ar/2023.zip"),
        rating("Rating update FY23", "https://www.crisil.com/r/9"),
    ]
}

fn full_fetcher() -> ScriptedFetcher {
    ScriptedFetcher::new()
        .with_body("https://www.bseindia.com/ar/2024.pdf", "ar-2024")
        .with_body("https://www.icra.in/r?Id=7", "<html>icra</html>")
        .with_body("https://www.bseindia.com/t/jul.pdf", "jul transcript")
        .with_body("https://x.com/jul-deck.pdf", "jul deck")
        .with_body("https://www.bseindia.com/ar/2023.zip", "ar-2023")
        .with_body("https://www.crisil.com/r/9", "<html>crisil</html>")
}

#[tokio::test]
async fn test_outcomes_follow_input_order() {
    let dir = tempfile::tempdir().unwrap();
    let fetcher = full_fetcher();
    let orchestrator = DownloadOrchestrator::new(&fetcher, Pacer::disabled());

    let outcomes = orchestrator.download_all(&mixed_links(), dir.path()).await;

    let relative: Vec<PathBuf> = outcomes
        .iter()
        .map(|o| o.target_path.strip_prefix(dir.path()).unwrap().to_path_buf())
        .collect();
    assert_eq!(
        relative,
        vec![
            PathBuf::from("Financial_Year_2024_from_bse.pdf"),
            PathBuf::from("Rating_update.html"),
            PathBuf::from("Jul_2024/transcript.pdf"),
            PathBuf::from("Jul_2024/presentation.pdf"),
            PathBuf::from("Financial_Year_2023_from_bse.zip"),
            PathBuf::from("Rating_update_FY23.html"),
        ]
    );
    assert!(outcomes.iter().all(|o| o.status == DownloadStatus::Downloaded));
    assert_eq!(
        fetcher.requested(),
        vec![
            "https://www.bseindia.com/ar/2024.pdf",
            "https://www.icra.in/r?Id=7",
            "https://www.bseindia.com/t/jul.pdf",
            "https://x.com/jul-deck.pdf",
            "https://www.bseindia.com/ar/2023.zip",
            "https://www.crisil.com/r/9",
        ]
    );
}

#[tokio::test]
async fn test_rerun_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let links = mixed_links();

    let first_fetcher = full_fetcher();
    let first = DownloadOrchestrator::new(&first_fetcher, Pacer::disabled())
        .download_all(&links, dir.path())
        .await;
    let contents: Vec<Vec<u8>> = first.iter().map(|o| std::fs::read(&o.target_path).unwrap()).collect();

    let second_fetcher = full_fetcher();
    let second = DownloadOrchestrator::new(&second_fetcher, Pacer::disabled())
        .download_all(&links, dir.path())
        .await;

    assert_eq!(second_fetcher.download_calls(), 0);
    assert!(second.iter().all(|o| o.status == DownloadStatus::AlreadyExists));
    for (outcome, before) in second.iter().zip(&contents) {
        assert_eq!(&std::fs::read(&outcome.target_path).unwrap(), before);
        assert_eq!(outcome.byte_count, before.len() as u64);
    }

    let summary = DownloadSummary::from_outcomes(&second);
    assert_eq!(summary.already_present, 6);
    assert_eq!(summary.downloaded, 0);
}

#[tokio::test]
async fn test_failed_item_does_not_stop_batch() {
    let dir = tempfile::tempdir().unwrap();
    let fetcher = full_fetcher().with_status("https://www.icra.in/r?Id=7", 404);
    let orchestrator = DownloadOrchestrator::new(&fetcher, Pacer::disabled());

    let outcomes = orchestrator.download_all(&mixed_links(), dir.path()).await;

    assert_eq!(outcomes.len(), 6);
    match &outcomes[1].status {
        DownloadStatus::Failed(reason) => assert!(reason.contains("404")),
        other => panic!("expected failure, got {other:?}"),
    }
    assert!(!outcomes[1].target_path.exists());
    assert_eq!(fetcher.download_calls(), 6);

    let summary = DownloadSummary::from_outcomes(&outcomes);
    assert_eq!(summary.downloaded, 5);
    assert_eq!(summary.failed, 1);
}

#[tokio::test]
async fn test_interrupted_transfer_leaves_no_cache_hit() {
    let dir = tempfile::tempdir().unwrap();
    let links = vec![annual("Financial Year 2024", "https://www.bseindia.com/ar/2024.pdf")];

    let broken = ScriptedFetcher::new().with_truncated("https://www.bseindia.com/ar/2024.pdf", "ar-2");
    let outcomes = DownloadOrchestrator::new(&broken, Pacer::disabled())
        .download_all(&links, dir.path())
        .await;
    assert!(outcomes[0].is_failure());
    assert!(!outcomes[0].target_path.exists());
    assert!(!dir.path().join("Financial_Year_2024_from_bse.pdf.part").exists());

    // * The next run fetches again instead of trusting a half-written file
    let healthy = full_fetcher();
    let retry = DownloadOrchestrator::new(&healthy, Pacer::disabled())
        .download_all(&links, dir.path())
        .await;
    assert_eq!(retry[0].status, DownloadStatus::Downloaded);
    assert_eq!(std::fs::read_to_string(&retry[0].target_path).unwrap(), "ar-2024");
}

#[tokio::test]
async fn test_empty_batch() {
    let dir = tempfile::tempdir().unwrap();
    let fetcher = ScriptedFetcher::new();
    let outcomes = DownloadOrchestrator::new(&fetcher, Pacer::disabled())
        .download_all(&[], dir.path())
        .await;
    assert!(outcomes.is_empty());
    assert_eq!(DownloadSummary::from_outcomes(&outcomes), DownloadSummary::default());
}
