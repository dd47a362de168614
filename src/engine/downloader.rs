// * Download Orchestrator
// * Link records → collision-safe target paths → files on disk, strictly in input order.
// * Present targets are cache hits (no request, no pacing); a failed item never stops the batch.

use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::pacing::Pacer;
use crate::network::Fetcher;
use crate::persistence::{infer_extension, sanitize_component};
use crate::refinery::DocumentLink;

const PARTIAL_SUFFIX: &str = ".part";

/// One file to fetch: a link, or one populated slot of a concall entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadPlan {
    pub label: String,
    pub remote_url: String,
    pub target: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DownloadStatus {
    Downloaded,
    AlreadyExists,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadOutcome {
    pub label: String,
    pub remote_url: String,
    pub target_path: PathBuf,
    /// Bytes written, or the size on disk for a cache hit
    pub byte_count: u64,
    pub status: DownloadStatus,
}

impl DownloadOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self.status, DownloadStatus::Failed(_))
    }
}

/// Aggregate counts of one batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DownloadSummary {
    pub attempted: usize,
    pub downloaded: usize,
    pub already_present: usize,
    pub failed: usize,
    pub total_bytes: u64,
}

impl DownloadSummary {
    pub fn from_outcomes(outcomes: &[DownloadOutcome]) -> Self {
        outcomes.iter().fold(Self::default(), |acc, outcome| {
            let mut next = Self {
                attempted: acc.attempted + 1,
                ..acc
            };
            match outcome.status {
                DownloadStatus::Downloaded => {
                    next.downloaded += 1;
                    next.total_bytes += outcome.byte_count;
                }
                DownloadStatus::AlreadyExists => next.already_present += 1,
                DownloadStatus::Failed(_) => next.failed += 1,
            }
            next
        })
    }

    pub fn succeeded(&self) -> usize {
        self.downloaded + self.already_present
    }
}

fn joined_stem(primary: &str, annotation: Option<&str>) -> String {
    match annotation {
        Some(extra) => sanitize_component(&format!("{primary} {extra}")),
        None => sanitize_component(primary),
    }
}

// * "name.pdf" taken → "name_2.pdf", then "name_3.pdf", ...
fn claim_target(dir: &Path, stem: &str, ext: &str, taken: &mut HashMap<PathBuf, usize>) -> PathBuf {
    let base = dir.join(format!("{stem}{ext}"));
    let seen = taken.entry(base.clone()).or_insert(0);
    *seen += 1;
    if *seen == 1 {
        return base;
    }

    let mut n = *seen;
    loop {
        let candidate = dir.join(format!("{stem}_{n}{ext}"));
        if !taken.contains_key(&candidate) {
            taken.insert(candidate.clone(), 1);
            return candidate;
        }
        n += 1;
    }
}

/// Maps link records to target files under `target_dir`, in input order.
///
/// Concall slots nest under their period bucket, every other kind lands flat.
pub fn plan_downloads(links: &[DocumentLink], target_dir: &Path) -> Vec<DownloadPlan> {
    let mut taken = HashMap::new();
    let mut plans = Vec::new();

    for link in links {
        match link {
            DocumentLink::AnnualReport(report) => {
                let stem = joined_stem(&report.period_label, report.source_label.as_deref());
                let ext = infer_extension(&report.remote_url);
                plans.push(DownloadPlan {
                    label: link.describe(),
                    remote_url: report.remote_url.clone(),
                    target: claim_target(target_dir, &stem, ext, &mut taken),
                });
            }
            DocumentLink::CreditRating(rating) => {
                let stem = joined_stem(&rating.title, rating.date_source_label.as_deref());
                let ext = infer_extension(&rating.remote_url);
                plans.push(DownloadPlan {
                    label: link.describe(),
                    remote_url: rating.remote_url.clone(),
                    target: claim_target(target_dir, &stem, ext, &mut taken),
                });
            }
            DocumentLink::Concall(entry) => {
                let bucket_dir = target_dir.join(sanitize_component(&entry.period_bucket));
                for (slot, url) in entry.populated_slots() {
                    let ext = infer_extension(url);
                    plans.push(DownloadPlan {
                        label: format!("{} {}", entry.period_bucket, slot.as_str()),
                        remote_url: url.to_string(),
                        target: claim_target(&bucket_dir, slot.as_str(), ext, &mut taken),
                    });
                }
            }
        }
    }

    plans
}

fn partial_path(target: &Path) -> PathBuf {
    let mut name = target.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(PARTIAL_SUFFIX);
    target.with_file_name(name)
}

/// Sequential downloader over any `Fetcher`
pub struct DownloadOrchestrator<'a, F: Fetcher + ?Sized> {
    fetcher: &'a F,
    pacer: Pacer,
}

impl<'a, F: Fetcher + ?Sized> DownloadOrchestrator<'a, F> {
    pub fn new(fetcher: &'a F, pacer: Pacer) -> Self {
        Self { fetcher, pacer }
    }

    pub fn pacer(&self) -> Pacer {
        self.pacer
    }

    /// Plans and executes every link, one outcome per file, in input order
    pub async fn download_all(&self, links: &[DocumentLink], target_dir: &Path) -> Vec<DownloadOutcome> {
        let plans = plan_downloads(links, target_dir);
        info!(
            files = plans.len(),
            dir = %target_dir.display(),
            "Starting download batch"
        );
        self.execute(&plans).await
    }

    pub async fn execute(&self, plans: &[DownloadPlan]) -> Vec<DownloadOutcome> {
        let mut outcomes = Vec::with_capacity(plans.len());
        for plan in plans {
            outcomes.push(self.fetch_one(plan).await);
        }

        let summary = DownloadSummary::from_outcomes(&outcomes);
        info!(
            downloaded = summary.downloaded,
            already_present = summary.already_present,
            failed = summary.failed,
            bytes = summary.total_bytes,
            "Download batch finished"
        );
        outcomes
    }

    async fn fetch_one(&self, plan: &DownloadPlan) -> DownloadOutcome {
        let outcome = |byte_count, status| DownloadOutcome {
            label: plan.label.clone(),
            remote_url: plan.remote_url.clone(),
            target_path: plan.target.clone(),
            byte_count,
            status,
        };

        if let Ok(meta) = tokio::fs::metadata(&plan.target).await {
            debug!(path = %plan.target.display(), "Target present, skipping");
            return outcome(meta.len(), DownloadStatus::AlreadyExists);
        }

        if let Some(parent) = plan.target.parent() {
            if let Err(e) = tokio::fs::create_dir_all(parent).await {
                warn!(path = %parent.display(), error = %e, "Cannot create target directory");
                return outcome(0, DownloadStatus::Failed(e.to_string()));
            }
        }

        let partial = partial_path(&plan.target);
        let result = match self.fetcher.download(&plan.remote_url, &partial).await {
            Ok(bytes) => tokio::fs::rename(&partial, &plan.target)
                .await
                .map(|_| bytes)
                .map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };
        // * Pacing follows every network attempt, successful or not
        self.pacer.pause().await;

        match result {
            Ok(bytes) => {
                info!(path = %plan.target.display(), bytes, "Downloaded");
                outcome(bytes, DownloadStatus::Downloaded)
            }
            Err(reason) => {
                let _ = tokio::fs::remove_file(&partial).await;
                warn!(url = %plan.remote_url, error = %reason, "Download failed");
                outcome(0, DownloadStatus::Failed(reason))
            }
        }
    }
}
