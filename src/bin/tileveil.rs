use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "tileveil", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the page after N simulated scroll ticks as a PNG.
    Frame(FrameArgs),
    /// Write one PNG per simulated scroll tick.
    Frames(FramesArgs),
    /// Dump the spread state after N simulated scroll ticks as JSON.
    Snapshot(SnapshotArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum VariantArg {
    Set,
    Queue,
    Progress,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BackendArg {
    Cpu,
    Scene,
}

#[derive(Parser, Debug)]
struct PlayArgs {
    /// Effect configuration JSON; defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Page width in pixels.
    #[arg(long, default_value_t = 360)]
    width: u32,

    /// Visible window height in pixels.
    #[arg(long, default_value_t = 240)]
    height: u32,

    /// Full document height in pixels (defaults to three windows).
    #[arg(long)]
    page_height: Option<u32>,

    /// Simulated scroll ticks.
    #[arg(long, default_value_t = 30)]
    ticks: u64,

    /// RNG seed, overriding the configuration.
    #[arg(long)]
    seed: Option<u64>,

    /// Spread variant.
    #[arg(long, value_enum, default_value_t = VariantArg::Set)]
    variant: VariantArg,

    /// Render adapter.
    #[arg(long, value_enum, default_value_t = BackendArg::Cpu)]
    backend: BackendArg,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    play: PlayArgs,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct FramesArgs {
    #[command(flatten)]
    play: PlayArgs,

    /// Output directory for `frame_NNNNN.png` files.
    #[arg(long)]
    out_dir: PathBuf,
}

#[derive(Parser, Debug)]
struct SnapshotArgs {
    #[command(flatten)]
    play: PlayArgs,

    /// Output JSON path; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Frames(args) => cmd_frames(args),
        Command::Snapshot(args) => cmd_snapshot(args),
    }
}

fn build_session(args: &PlayArgs) -> anyhow::Result<tileveil::RevealSession> {
    let mut cfg = match &args.config {
        Some(path) => tileveil::RevealConfig::from_path(path)
            .with_context(|| format!("load config '{}'", path.display()))?,
        None => tileveil::RevealConfig::default(),
    };
    if args.seed.is_some() {
        cfg.seed = args.seed;
    }
    let page_height = args
        .page_height
        .unwrap_or_else(|| args.height.saturating_mul(3));
    let viewport = tileveil::Viewport::new(args.width, args.height, page_height);

    let opts = tileveil::RevealSessionOpts {
        variant: match args.variant {
            VariantArg::Set => tileveil::Variant::Set,
            VariantArg::Queue => tileveil::Variant::Queue,
            VariantArg::Progress => tileveil::Variant::Progress,
        },
        backend: match args.backend {
            BackendArg::Cpu => tileveil::BackendKind::Cpu,
            BackendArg::Scene => tileveil::BackendKind::Scene,
        },
        ..tileveil::RevealSessionOpts::default()
    };
    let mut sess = tileveil::RevealSession::new(cfg, viewport, opts)?;
    sess.mount().context("mount render surface")?;
    Ok(sess)
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let mut sess = build_session(&args.play)?;
    let mut sink = tileveil::InMemorySink::default();
    sess.play(args.play.ticks, &mut sink)?;
    let frame = sess.render()?;
    tileveil::encode::sink::write_png(&args.out, &frame)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_frames(args: FramesArgs) -> anyhow::Result<()> {
    let mut sess = build_session(&args.play)?;
    let mut sink = tileveil::PngSequenceSink::new(&args.out_dir);
    let stats = sess.play(args.play.ticks, &mut sink)?;

    eprintln!(
        "wrote {} frames to {} ({} of {} tiles revealed)",
        stats.frames,
        args.out_dir.display(),
        stats.driver.infected,
        stats.driver.total
    );
    Ok(())
}

fn cmd_snapshot(args: SnapshotArgs) -> anyhow::Result<()> {
    let mut sess = build_session(&args.play)?;
    let mut sink = tileveil::InMemorySink::default();
    sess.play(args.play.ticks, &mut sink)?;
    let json = sess.snapshot().to_json_pretty()?;

    match &args.out {
        Some(out) => {
            std::fs::write(out, json.as_bytes())
                .with_context(|| format!("write snapshot '{}'", out.display()))?;
            eprintln!("wrote {}", out.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
