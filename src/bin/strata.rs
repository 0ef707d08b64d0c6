use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "strata", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single time as a PNG.
    Frame(FrameArgs),
    /// Render the root canvas's frame range into one spritesheet PNG.
    Sheet(SheetArgs),
    /// Print the layer hit at a canvas-space point.
    Hit(HitArgs),
}

#[derive(Parser, Debug)]
struct RenderOpts {
    /// Quality, 0 (best) to 10 (fastest). Defaults to STRATA_QUALITY or 3.
    #[arg(long)]
    quality: Option<u8>,

    /// Flatten onto this color (`#rrggbb` or `#rrggbbaa`). Defaults to STRATA_BACKGROUND.
    #[arg(long)]
    background: Option<String>,

    /// Log progress to stderr through tracing.
    #[arg(long)]
    progress: bool,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input scene document JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Time in seconds.
    #[arg(long, default_value_t = 0.0)]
    time: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    opts: RenderOpts,
}

#[derive(Parser, Debug)]
struct SheetArgs {
    /// Input scene document JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Frames per row; 0 puts every frame in one row.
    #[arg(long, default_value_t = 0)]
    columns: u32,

    #[arg(long, default_value_t = 0)]
    rows: u32,

    #[arg(long, default_value_t = 0)]
    offset_x: u32,

    #[arg(long, default_value_t = 0)]
    offset_y: u32,

    #[arg(long, value_enum, default_value_t = DirectionChoice::Horizontal)]
    direction: DirectionChoice,

    #[command(flatten)]
    opts: RenderOpts,
}

#[derive(Parser, Debug)]
struct HitArgs {
    /// Input scene document JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Time in seconds.
    #[arg(long, default_value_t = 0.0)]
    time: f64,

    #[arg(long, allow_negative_numbers = true)]
    x: f64,

    #[arg(long, allow_negative_numbers = true)]
    y: f64,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DirectionChoice {
    Horizontal,
    Vertical,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Sheet(args) => cmd_sheet(args),
        Command::Hit(args) => cmd_hit(args),
    }
}

fn load_scene(path: &Path) -> anyhow::Result<strata::CanvasHandle> {
    let doc = strata::Document::from_path(path)
        .with_context(|| format!("load scene '{}'", path.display()))?;
    let root = doc
        .instantiate()
        .with_context(|| format!("build scene '{}'", path.display()))?;
    Ok(root)
}

fn settings(opts: &RenderOpts) -> anyhow::Result<strata::RenderSettings> {
    let mut settings = strata::RenderSettings::from_env();
    if let Some(q) = opts.quality {
        anyhow::ensure!(q <= 10, "quality must be 0..=10, got {q}");
        settings.quality = q;
    }
    if let Some(bg) = &opts.background {
        settings.background =
            Some(strata::Color::parse_hex(bg).with_context(|| format!("parse background '{bg}'"))?);
    }
    Ok(settings)
}

fn progress(opts: &RenderOpts) -> Box<dyn strata::ProgressCallback> {
    if opts.progress {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(std::io::stderr)
            .try_init();
        Box::new(strata::TracingProgress::default())
    } else {
        Box::new(strata::NoProgress)
    }
}

fn write_png(path: &Path, surface: &strata::Surface) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        path,
        &surface.to_rgba8(),
        surface.width(),
        surface.height(),
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

fn report(outcome: strata::RenderOutcome) -> anyhow::Result<()> {
    match outcome {
        strata::RenderOutcome::Complete => Ok(()),
        strata::RenderOutcome::DepthLimited => {
            eprintln!(
                "warning: canvases nested deeper than {} were left transparent",
                strata::MAX_DEPTH
            );
            Ok(())
        }
        strata::RenderOutcome::Cancelled => anyhow::bail!("render cancelled"),
    }
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let root = load_scene(&args.in_path)?;
    let settings = settings(&args.opts)?;
    let mut cb = progress(&args.opts);

    let frame = strata::render_frame(&root, strata::Time::seconds(args.time), &settings, cb.as_mut())?;
    report(frame.outcome)?;

    write_png(&args.out, &frame.surface)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_sheet(args: SheetArgs) -> anyhow::Result<()> {
    let root = load_scene(&args.in_path)?;
    let settings = settings(&args.opts)?;
    let mut cb = progress(&args.opts);

    let mut target = strata::SpritesheetTarget::new(strata::SheetParams {
        columns: args.columns,
        rows: args.rows,
        offset_x: args.offset_x,
        offset_y: args.offset_y,
        direction: match args.direction {
            DirectionChoice::Horizontal => strata::SheetDirection::Horizontal,
            DirectionChoice::Vertical => strata::SheetDirection::Vertical,
        },
    });
    let outcome = strata::render_to_target(&root, &mut target, &settings, cb.as_mut())?;
    report(outcome)?;

    let frames = root.rend_desc().frame_count();
    write_png(&args.out, target.sheet())?;
    eprintln!("wrote {} ({frames} frames)", args.out.display());
    Ok(())
}

fn cmd_hit(args: HitArgs) -> anyhow::Result<()> {
    let root = load_scene(&args.in_path)?;
    let p = strata::Point::new(args.x, args.y);
    match strata::hit_test(&root, strata::Time::seconds(args.time), p) {
        Some(id) => println!("{id}"),
        None => println!("none"),
    }
    Ok(())
}
