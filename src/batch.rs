use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::output;
use crate::parser::locate::ScanPolicy;
use crate::parser::subject::resolve_subject;
use crate::parser::{self, Queue, QueueSelection};

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub queue: QueueSelection,
    pub out_dir: PathBuf,
    pub name: Option<String>,
    pub scan: ScanPolicy,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Written {
        queue: Queue,
        path: PathBuf,
        rows: usize,
    },
    Skipped {
        queue: Option<Queue>,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct FileReport {
    pub file_name: String,
    pub outcomes: Vec<Outcome>,
}

impl FileReport {
    pub fn written(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, Outcome::Written { .. }))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes.len() - self.written()
    }
}

impl fmt::Display for FileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, outcome) in self.outcomes.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            match outcome {
                Outcome::Written { path, rows, .. } => {
                    let csv_name = path.file_name().unwrap_or_default().to_string_lossy();
                    write!(f, "[OK] {} -> {} ({} rows)", self.file_name, csv_name, rows)?;
                }
                Outcome::Skipped { queue: Some(q), reason } => {
                    write!(f, "[SKIP] {}: {} {}", self.file_name, q, reason)?;
                }
                Outcome::Skipped { queue: None, reason } => {
                    write!(f, "[SKIP] {}: {}", self.file_name, reason)?;
                }
            }
        }
        Ok(())
    }
}

/// Process every file in parallel; reports come back in input order.
pub fn run(files: &[PathBuf], opts: &RunOptions) -> Result<Vec<FileReport>> {
    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")?
            .progress_chars("#>-"),
    );

    let reports: Vec<FileReport> = files
        .par_iter()
        .map(|path| {
            let report = process_file(path, opts);
            pb.inc(1);
            report
        })
        .collect();

    pb.finish_and_clear();
    Ok(reports)
}

/// Extract every selected queue of one page and write a CSV per queue.
pub fn process_file(path: &Path, opts: &RunOptions) -> FileReport {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let html = match fs::read(path) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) => {
            warn!(file = %file_name, error = %e, "read failed");
            return FileReport {
                file_name,
                outcomes: vec![Outcome::Skipped {
                    queue: None,
                    reason: format!("read failed: {}", e),
                }],
            };
        }
    };

    let subject = opts
        .name
        .clone()
        .unwrap_or_else(|| resolve_subject(&html, path));
    debug!(file = %file_name, %subject, "processing");

    let queues = opts.queue.resolve(&html);
    if queues.is_empty() {
        return FileReport {
            file_name,
            outcomes: vec![Outcome::Skipped {
                queue: None,
                reason: "no rankingHistory block".to_string(),
            }],
        };
    }

    let outcomes = queues
        .into_iter()
        .map(|queue| match parser::try_extract_queue(&html, queue, &subject, opts.scan) {
            Ok(records) => {
                let out = output::output_path(&opts.out_dir, path, queue);
                match output::write_csv(&records, &out) {
                    Ok(()) => Outcome::Written {
                        queue,
                        path: out,
                        rows: records.len(),
                    },
                    Err(e) => {
                        warn!(file = %file_name, %queue, error = %e, "write failed");
                        Outcome::Skipped {
                            queue: Some(queue),
                            reason: format!("write failed: {:#}", e),
                        }
                    }
                }
            }
            Err(reason) => Outcome::Skipped {
                queue: Some(queue),
                reason: reason.to_string(),
            },
        })
        .collect();

    FileReport { file_name, outcomes }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(out_dir: &Path, queue: QueueSelection) -> RunOptions {
        RunOptions {
            queue,
            out_dir: out_dir.to_path_buf(),
            name: None,
            scan: ScanPolicy::FastPath,
        }
    }

    #[test]
    fn fixture_both_queues() {
        let out = tempfile::tempdir().unwrap();
        let report = process_file(
            Path::new("tests/fixtures/player.html"),
            &opts(out.path(), QueueSelection::Auto),
        );
        assert_eq!(report.written(), 2);
        assert_eq!(
            report.to_string(),
            "[OK] player.html -> player.solo.csv (4 rows)\n\
             [OK] player.html -> player.flex.csv (1 rows)"
        );

        let flex = fs::read_to_string(out.path().join("player.flex.csv")).unwrap();
        assert!(flex.ends_with("2024-03-01,Synow#KR1,Gold III,75,13.75\r\n"));
    }

    #[test]
    fn name_override() {
        let out = tempfile::tempdir().unwrap();
        let mut o = opts(out.path(), QueueSelection::Flex);
        o.name = Some("alt".into());
        process_file(Path::new("tests/fixtures/player.html"), &o);
        let flex = fs::read_to_string(out.path().join("player.flex.csv")).unwrap();
        assert!(flex.contains(",alt,Gold III,"));
    }

    #[test]
    fn page_without_blocks() {
        let dir = tempfile::tempdir().unwrap();
        let page = dir.path().join("empty.html");
        fs::write(&page, "<html><title>x - LeagueOfGraphs</title></html>").unwrap();

        let auto = process_file(&page, &opts(dir.path(), QueueSelection::Auto));
        assert_eq!(auto.to_string(), "[SKIP] empty.html: no rankingHistory block");

        let both = process_file(&page, &opts(dir.path(), QueueSelection::Both));
        assert_eq!(both.skipped(), 2);
        assert_eq!(
            both.to_string(),
            "[SKIP] empty.html: solo block rankingHistory-1 not found\n\
             [SKIP] empty.html: flex block rankingHistory-2 not found"
        );
        assert!(!dir.path().join("empty.solo.csv").exists());
    }

    #[test]
    fn unreadable_file_does_not_stop_batch() {
        let out = tempfile::tempdir().unwrap();
        let files = vec![
            out.path().join("gone.html"),
            PathBuf::from("tests/fixtures/player.html"),
        ];
        let reports = run(&files, &opts(out.path(), QueueSelection::Solo)).unwrap();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].skipped(), 1);
        assert!(reports[0].to_string().starts_with("[SKIP] gone.html: read failed"));
        assert_eq!(reports[1].written(), 1);
    }

    #[test]
    fn page_with_extreme_ids_does_not_stop_batch() {
        let out = tempfile::tempdir().unwrap();
        let bad = out.path().join("bad.html");
        fs::write(
            &bad,
            r#"<div id="rankingHistory-1"><script>
            const lpData = {"1709251200000": 40};
            const rankData = {"1709251200000": {"tierRankString": "Gold I", "tierId": "-9223372036854775808", "rankId": 1}};
            </script></div>"#,
        )
        .unwrap();

        let files = vec![bad, PathBuf::from("tests/fixtures/player.html")];
        let reports = run(&files, &opts(out.path(), QueueSelection::Solo)).unwrap();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].to_string(), "[SKIP] bad.html: solo no valid records");
        assert_eq!(reports[1].written(), 1);
        assert!(out.path().join("player.solo.csv").exists());
    }
}
