//! CLI entry point for the ITV channel curator
//!
//! Parses command line arguments, runs the probe pipeline, and writes the
//! curated channel lists and playlists.

use clap::Parser;
use itv_curator::{
    read_channel_list, render_category_m3u, render_category_text, render_m3u, render_ranked,
    render_survivor_list, render_text, Category, Config, Pipeline, PipelineReport, SharedProgress,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

/// ITV Curator - probe, rank, and curate streaming channel lists
#[derive(Parser, Debug)]
#[command(name = "itv-curator")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the source channel list (one `name,url` per line)
    #[arg(short, long, default_value = "itv.txt")]
    input: PathBuf,

    /// Directory where result files are written
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Path to the configuration file (config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Only run the speed stage; skip resolution filtering and curation
    #[arg(long, default_value = "false")]
    speed_only: bool,

    /// Enable debug logging
    #[arg(short, long, default_value = "false")]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    init_logging(args.verbose);

    let config = match load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let channels = match read_channel_list(&args.input) {
        Ok(channels) => channels,
        Err(e) => {
            eprintln!("Failed to read {}: {}", args.input.display(), e);
            return ExitCode::FAILURE;
        }
    };

    println!("ITV Curator starting...");
    println!("Source list: {} ({} channels)", args.input.display(), channels.len());
    println!("Output directory: {}", args.out_dir.display());

    // The inspector availability check only matters for full runs
    let pipeline_result = if args.speed_only {
        Pipeline::new(config)
    } else {
        Pipeline::with_checks(config)
    };

    let pipeline = match pipeline_result {
        Ok(pipeline) => pipeline,
        Err(e) => {
            eprintln!("Failed to initialize pipeline: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!(
        "Probing with {} workers",
        pipeline.concurrency_plan().workers
    );

    if let Err(e) = std::fs::create_dir_all(&args.out_dir) {
        eprintln!("Failed to create {}: {}", args.out_dir.display(), e);
        return ExitCode::FAILURE;
    }

    let speed_printer = start_progress_printer(pipeline.speed_progress(), "测速");
    let resolution_printer = if args.speed_only {
        None
    } else {
        Some(start_progress_printer(
            pipeline.resolution_progress(),
            "分辨率",
        ))
    };

    let result = if args.speed_only {
        let ranked = pipeline.run_speed_stage(channels).await;
        println!("Speed stage: {} channels accepted", ranked.len());
        write_speed_outputs(&args.out_dir, &ranked)
    } else {
        let report = pipeline.run(channels).await;
        print_summary(&report);
        write_all_outputs(&args.out_dir, &report)
    };

    speed_printer.abort();
    if let Some(printer) = resolution_printer {
        printer.abort();
    }

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Failed to write results: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default_filter = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<Config, itv_curator::config::ConfigError> {
    match path {
        Some(path) => Config::load(path),
        None => {
            let mut config = Config::default();
            config.apply_env_overrides();
            Ok(config)
        }
    }
}

/// Prints stage progress while items complete, in the source tool's
/// familiar terminal format.
fn start_progress_printer(
    progress: SharedProgress,
    stage: &'static str,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut last_completed = usize::MAX;
        loop {
            let snapshot = progress.read().await.clone();
            if snapshot.total > 0 && snapshot.completed() != last_completed {
                last_completed = snapshot.completed();
                println!(
                    "[{}] 可用频道：{} 个 , 不可用频道：{} 个 , 总频道：{} 个 , 总进度：{:.2} %。",
                    stage,
                    snapshot.accepted,
                    snapshot.rejected,
                    snapshot.total,
                    snapshot.percent()
                );
                if snapshot.is_complete() {
                    break;
                }
            }
            tokio::time::sleep(Duration::from_millis(500)).await;
        }
    })
}

fn print_summary(report: &PipelineReport) {
    println!(
        "Speed stage: {}/{} channels accepted",
        report.speed_accepted, report.total
    );
    println!(
        "Resolution stage: {}/{} channels accepted",
        report.resolution_accepted, report.speed_accepted
    );
    println!(
        "Curated {} channels ({} central, {} satellite, {} other)",
        report.curated.len(),
        report.curated.central.len(),
        report.curated.satellite.len(),
        report.curated.other.len()
    );
}

/// Writes the speed-stage artifacts: the ranked list with metrics and the
/// plain survivor list.
fn write_speed_outputs(
    out_dir: &Path,
    ranked: &[itv_curator::RankedChannel],
) -> std::io::Result<()> {
    write_output(out_dir, "ranked.txt", &render_ranked(ranked))?;
    write_output(out_dir, "survivors.txt", &render_survivor_list(ranked))?;
    Ok(())
}

/// Writes every artifact of a full run.
fn write_all_outputs(out_dir: &Path, report: &PipelineReport) -> std::io::Result<()> {
    write_speed_outputs(out_dir, &report.ranked)?;
    write_output(out_dir, "hd.txt", &render_survivor_list(&report.survivors))?;
    write_output(out_dir, "all.txt", &render_text(&report.merged))?;
    write_output(out_dir, "curated.txt", &render_text(&report.curated))?;
    write_output(out_dir, "curated.m3u", &render_m3u(&report.curated))?;
    write_output(
        out_dir,
        "central.txt",
        &render_category_text(&report.curated, Category::Central),
    )?;
    write_output(
        out_dir,
        "central.m3u",
        &render_category_m3u(&report.curated, Category::Central),
    )?;
    Ok(())
}

fn write_output(out_dir: &Path, name: &str, content: &str) -> std::io::Result<()> {
    let path = out_dir.join(name);
    std::fs::write(&path, content)?;
    println!("Wrote {}", path.display());
    Ok(())
}
