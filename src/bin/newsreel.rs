use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use newsreel::pipeline::{Collaborators, load_items, news_source_for, preview_frame, preview_plan};
use newsreel::{RunConfig, VoiceId};

#[derive(Parser, Debug)]
#[command(name = "newsreel", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate today's video (requires `edge-tts`, `ffmpeg` and `ffprobe` on PATH).
    Run(RunArgs),
    /// Render a single scene as a PNG.
    Frame(FrameArgs),
    /// Print the scene plan for given narration durations as JSON.
    Plan(PlanArgs),
}

#[derive(Args, Debug)]
struct ConfigArgs {
    /// JSON config file. Environment variables and flags override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Use the built-in mock news list.
    #[arg(long, default_value_t = false)]
    mock: bool,

    /// JSON file with news items.
    #[arg(long)]
    news_file: Option<PathBuf>,

    /// Maximum number of news items.
    #[arg(long)]
    max_items: Option<usize>,

    /// Font file (TTF/OTF/TTC). Defaults to the first system font found.
    #[arg(long)]
    font: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct RunArgs {
    #[command(flatten)]
    config: ConfigArgs,

    /// Narration voice.
    #[arg(long)]
    voice: Option<VoiceId>,

    /// Output directory for the video, script and metadata.
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Worker threads for narration and rendering.
    #[arg(long)]
    workers: Option<usize>,
}

#[derive(Args, Debug)]
struct FrameArgs {
    #[command(flatten)]
    config: ConfigArgs,

    /// Scene index (0 is the intro).
    #[arg(long)]
    scene: usize,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct PlanArgs {
    #[command(flatten)]
    config: ConfigArgs,

    /// Comma-separated narration durations in seconds, one per item.
    #[arg(long, value_delimiter = ',')]
    durations: Vec<f64>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.cmd {
        Command::Run(args) => cmd_run(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Plan(args) => cmd_plan(args),
    };
    if let Err(err) = &result {
        tracing::error!(error = %format!("{err:#}"), "newsreel failed");
    }
    result
}

fn load_config(args: &ConfigArgs) -> anyhow::Result<RunConfig> {
    let mut cfg = match &args.config {
        Some(path) => RunConfig::from_json_file(path)?,
        None => RunConfig::default(),
    };
    cfg.apply_env()?;
    if args.mock {
        cfg.use_mock_news = true;
    }
    if let Some(path) = &args.news_file {
        cfg.news_file = Some(path.clone());
    }
    if let Some(n) = args.max_items {
        cfg.max_items = n;
    }
    if let Some(font) = &args.font {
        cfg.font_path = Some(font.clone());
    }
    if cfg.font_path.is_none() {
        cfg.font_path = newsreel::config::probe_system_font();
    }
    cfg.validate()?;
    Ok(cfg)
}

fn now() -> chrono::NaiveDateTime {
    chrono::Local::now().naive_local()
}

fn cmd_run(args: RunArgs) -> anyhow::Result<()> {
    let mut cfg = load_config(&args.config)?;
    if let Some(voice) = args.voice {
        cfg.voice = voice;
    }
    if let Some(dir) = args.out_dir {
        cfg.output_dir = dir;
    }
    if let Some(workers) = args.workers {
        cfg.workers = workers;
    }
    cfg.validate()?;

    let theme = cfg.theme()?;
    let collab = Collaborators::system(&cfg);
    let out = newsreel::run(&cfg, theme, &collab, now())?;

    eprintln!("wrote {}", out.video_path.display());
    eprintln!("wrote {}", out.script_path.display());
    eprintln!("wrote {}", out.metadata_path.display());
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.config)?;
    let items = load_items(news_source_for(&cfg).as_ref(), cfg.max_items)?;
    let frame = preview_frame(&cfg, cfg.theme()?, &items, args.scene, now())?;
    frame
        .save_png(&args.out)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.config)?;
    let items = load_items(news_source_for(&cfg).as_ref(), cfg.max_items)?;
    let (_script, plan) = preview_plan(&cfg, &items, &args.durations, now())?;
    let json = serde_json::to_string_pretty(&plan).context("serialize scene plan")?;
    println!("{json}");
    Ok(())
}
