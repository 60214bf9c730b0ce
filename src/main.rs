use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;

use lp_history::parser::locate::ScanPolicy;
use lp_history::parser::QueueSelection;
use lp_history::{batch, inputs, settings};

#[derive(Parser)]
#[command(
    name = "lp_history",
    about = "League of Graphs saved pages -> daily LP history CSV (date,name,tier,lp,score)"
)]
struct Cli {
    /// Saved HTML pages
    html: Vec<PathBuf>,
    /// Also process every *.html directly inside this directory
    #[arg(long)]
    in_dir: Option<PathBuf>,
    /// Queue to extract [default: auto, or LP_HISTORY_QUEUE]
    #[arg(short, long, value_enum)]
    queue: Option<QueueSelection>,
    /// Output directory [default: out, or LP_HISTORY_OUT_DIR]
    #[arg(short, long)]
    out_dir: Option<PathBuf>,
    /// Force the name column instead of reading it from the page title
    #[arg(long)]
    name: Option<String>,
    /// Always find literal ends with a full bracket-balancing scan
    #[arg(long)]
    balanced_scan: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = settings::load();

    let files = inputs::discover(&cli.html, cli.in_dir.as_deref());
    if files.is_empty() {
        anyhow::bail!("No HTML files to process (pass files or --in-dir with *.html).");
    }

    let opts = batch::RunOptions {
        queue: cli.queue.unwrap_or(settings.queue),
        out_dir: cli.out_dir.unwrap_or(settings.out_dir),
        name: cli.name,
        scan: if cli.balanced_scan {
            ScanPolicy::BalancedOnly
        } else {
            settings.scan
        },
    };
    tracing::info!(files = files.len(), queue = ?opts.queue, out_dir = %opts.out_dir.display(), "starting");

    let reports = batch::run(&files, &opts)?;

    let mut written = 0;
    let mut skipped = 0;
    for report in &reports {
        println!("{}", report);
        written += report.written();
        skipped += report.skipped();
    }

    println!(
        "\nDone: {} files, {} CSVs written, {} skipped in {}",
        reports.len(),
        written,
        skipped,
        format_duration(t0.elapsed())
    );
    Ok(())
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else {
        format!("{}m {}s", secs / 60, secs % 60)
    }
}
