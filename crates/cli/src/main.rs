use anyhow::Result;
use clap::{Parser, Subcommand};
use cli::render;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use triage_core::config::{self, AppConfig};
use triage_core::intake::{self, VideoFilter};
use triage_core::models::{QueueSnapshot, Tag};
use triage_core::pipeline;
use triage_core::query::VideoQuery;
use triage_core::registry::VideoRegistry;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = config::load(cli.config.as_deref())?;
    let registry = pipeline::open_registry(&cfg).await?;

    match cli.command {
        Commands::Upload { paths, json } => run_upload(&cfg, registry, &paths, json).await,
        Commands::Pending { all, json } => run_pending(registry, all, json).await,
        Commands::Process { imagebind, json } => run_process(cfg, registry, imagebind, json).await,
        Commands::List {
            tag,
            search,
            page,
            json,
        } => run_list(&cfg, registry, tag, search, page, json).await,
        Commands::Tag { video, tag } => run_tag(&cfg, registry, &video, tag).await,
        Commands::Delete { filename } => run_delete(&cfg, registry, &filename).await,
        Commands::DeleteTagged { yes, json } => run_delete_tagged(&cfg, registry, yes, json).await,
    }
}

#[derive(Parser)]
#[command(name = "bodycam-triage")]
#[command(about = "Classify, review and clean up bodycam footage", long_about = None)]
struct Cli {
    /// Path to config TOML
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add video files (or directories of them) to the pending set
    Upload {
        /// Files or directories
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Output JSON summary
        #[arg(long)]
        json: bool,
    },
    /// Show pending videos that have not been classified yet
    Pending {
        /// Include pending paths that already have a record
        #[arg(long, default_value_t = false)]
        all: bool,
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
    /// Classify every unprocessed video, one at a time
    Process {
        /// Ask the classifier for the ImageBind ensemble
        #[arg(long, default_value_t = false)]
        imagebind: bool,
        /// Output JSON summary instead of live progress
        #[arg(long)]
        json: bool,
    },
    /// List classified videos
    List {
        /// Only show this tag (Important|Pending|Delete)
        #[arg(long)]
        tag: Option<Tag>,
        /// Case-insensitive text matched against id, path, prediction and tag
        #[arg(long)]
        search: Option<String>,
        /// Page number, starting at 1
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
    /// Toggle a tag on a video; repeating the same tag resets it to Pending
    Tag {
        /// Record id or file path
        video: String,
        /// Important|Pending|Delete
        tag: Tag,
    },
    /// Move one video to the trash and drop its record
    Delete {
        filename: String,
    },
    /// Move every video tagged Delete to the trash
    DeleteTagged {
        /// Actually delete; without this only the affected videos are listed
        #[arg(long, default_value_t = false)]
        yes: bool,
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
}

async fn run_upload(
    cfg: &AppConfig,
    registry: Arc<dyn VideoRegistry>,
    inputs: &[PathBuf],
    json: bool,
) -> Result<()> {
    let filter = VideoFilter::new(&cfg.intake.extensions)?;
    let candidates = intake::expand_inputs(inputs, &filter);
    let rejected = candidates.iter().filter(|p| !filter.is_video(p)).count();
    if rejected > 0 {
        warn!(
            "ignoring {} path(s) without a video extension ({})",
            rejected,
            cfg.intake.extensions.join(", ")
        );
    }
    let added = registry.append_pending(&candidates).await?;
    let unprocessed = registry.list_unprocessed().await?;
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "status": "ok",
                "candidates": candidates.len(),
                "added": added,
                "unprocessed": unprocessed.len(),
            }))?
        );
    } else {
        println!(
            "added {} of {} path(s); {} video(s) waiting to be processed",
            added,
            candidates.len(),
            unprocessed.len()
        );
    }
    Ok(())
}

async fn run_pending(registry: Arc<dyn VideoRegistry>, all: bool, json: bool) -> Result<()> {
    let paths = if all {
        registry.list_pending().await?
    } else {
        registry.list_unprocessed().await?
    };
    if json {
        println!("{}", serde_json::to_string_pretty(&paths)?);
    } else {
        for p in &paths {
            println!("{}", p);
        }
        println!("{} pending", paths.len());
    }
    Ok(())
}

async fn run_process(
    mut cfg: AppConfig,
    registry: Arc<dyn VideoRegistry>,
    imagebind: bool,
    json: bool,
) -> Result<()> {
    if imagebind {
        cfg.classifier.use_imagebind = true;
    }
    let (tx, mut rx) = mpsc::channel::<QueueSnapshot>(16);
    let handle = pipeline::build_coordinator(&cfg, registry)?
        .with_observer(tx)
        .spawn();

    let printer = tokio::spawn(async move {
        while let Some(snapshot) = rx.recv().await {
            if json {
                continue;
            }
            for line in render::snapshot_lines(&snapshot) {
                println!("{}", line);
            }
        }
    });

    let canceller = handle.cancel_token();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received, finishing the current video");
            canceller.cancel();
        }
    });

    let summary = handle.wait().await?;
    interrupt.abort();
    printer.await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{}", render::run_summary(&summary));
    }
    Ok(())
}

async fn run_list(
    cfg: &AppConfig,
    registry: Arc<dyn VideoRegistry>,
    tag: Option<Tag>,
    search: Option<String>,
    page: usize,
    json: bool,
) -> Result<()> {
    let review = pipeline::build_review(cfg, registry);
    let query = VideoQuery {
        tag,
        search,
        page: page.saturating_sub(1),
    };
    let result = review.query(&query).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        for line in render::page_lines(&result) {
            println!("{}", line);
        }
    }
    Ok(())
}

async fn run_tag(
    cfg: &AppConfig,
    registry: Arc<dyn VideoRegistry>,
    video: &str,
    tag: Tag,
) -> Result<()> {
    let review = pipeline::build_review(cfg, registry);
    let updated = review.toggle(video, tag).await?;
    println!("{}", render::record_line(&updated));
    Ok(())
}

async fn run_delete(cfg: &AppConfig, registry: Arc<dyn VideoRegistry>, filename: &str) -> Result<()> {
    let review = pipeline::build_review(cfg, registry);
    if review.delete_video(filename).await? {
        println!("moved {} to the trash", filename);
    } else {
        println!("{} was already gone; record removed", filename);
    }
    Ok(())
}

async fn run_delete_tagged(
    cfg: &AppConfig,
    registry: Arc<dyn VideoRegistry>,
    yes: bool,
    json: bool,
) -> Result<()> {
    let review = pipeline::build_review(cfg, registry);
    if !yes {
        let doomed = review.tagged_for_deletion().await?;
        if json {
            println!("{}", serde_json::to_string_pretty(&doomed)?);
        } else {
            for record in &doomed {
                println!("{}", render::record_line(record));
            }
            println!(
                "{} video(s) tagged for deletion; re-run with --yes to move them to the trash",
                doomed.len()
            );
        }
        return Ok(());
    }
    let report = review.delete_tagged().await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", render::deletion_summary(&report));
    }
    Ok(())
}
