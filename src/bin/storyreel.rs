use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use storyreel::render::MemorySubmitter;
use storyreel::tracker::MemoryStore;
use storyreel::{
    DirectoryStore, EngineConfig, PassthroughConverter, SpoolSubmitter, StoryPipeline,
    TracingSink, query_status,
};

#[derive(Parser, Debug)]
#[command(name = "storyreel", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the full pipeline and spool the render job.
    Compose(ComposeArgs),
    /// Print the derived timeline without side effects.
    Plan(PlanArgs),
    /// Report the status of a spooled render job.
    Status(StatusArgs),
}

#[derive(Parser, Debug)]
struct ComposeArgs {
    /// Upstream event JSON.
    #[arg(long)]
    event: PathBuf,

    /// Engine configuration JSON (defaults apply when omitted).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory receiving spooled jobs and tracking records.
    #[arg(long)]
    out_dir: PathBuf,
}

#[derive(Parser, Debug)]
struct PlanArgs {
    /// Upstream event JSON.
    #[arg(long)]
    event: PathBuf,

    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct StatusArgs {
    #[arg(long)]
    job_id: String,

    #[arg(long)]
    story_id: String,

    /// Directory the job was spooled to by `compose`.
    #[arg(long)]
    out_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Compose(args) => cmd_compose(args),
        Command::Plan(args) => cmd_plan(args),
        Command::Status(args) => cmd_status(args),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> anyhow::Result<EngineConfig> {
    match path {
        Some(p) => EngineConfig::from_json_file(p)
            .with_context(|| format!("load config '{}'", p.display())),
        None => Ok(EngineConfig::default()),
    }
}

fn load_event(path: &Path) -> anyhow::Result<serde_json::Value> {
    let s = std::fs::read_to_string(path)
        .with_context(|| format!("read event '{}'", path.display()))?;
    serde_json::from_str(&s).with_context(|| format!("parse event '{}'", path.display()))
}

fn spool_dir(out_dir: &Path) -> PathBuf {
    out_dir.join("render-jobs")
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(value).context("serialize output")?;
    println!("{s}");
    Ok(())
}

fn cmd_compose(args: ComposeArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.config.as_deref())?;
    let raw = load_event(&args.event)?;

    let converter = PassthroughConverter::new(cfg.output.clone());
    let submitter = SpoolSubmitter::new(spool_dir(&args.out_dir));
    let store = DirectoryStore::new(&args.out_dir);
    let outcome =
        StoryPipeline::new(&cfg, &TracingSink, &converter, &submitter, &store).process(&raw);

    print_json(&outcome)
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.config.as_deref())?;
    let raw = load_event(&args.event)?;

    let converter = PassthroughConverter::new(cfg.output.clone());
    let submitter = MemorySubmitter::new();
    let store = MemoryStore::new();
    let plan = StoryPipeline::new(&cfg, &TracingSink, &converter, &submitter, &store)
        .plan(&raw)
        .context("plan story")?;

    print_json(&plan.timeline)
}

fn cmd_status(args: StatusArgs) -> anyhow::Result<()> {
    let submitter = SpoolSubmitter::new(spool_dir(&args.out_dir));
    let report = query_status(&submitter, &args.job_id, &args.story_id)
        .with_context(|| format!("query job '{}'", args.job_id))?;
    print_json(&report)
}
