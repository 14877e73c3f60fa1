use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "a11y-snapshot", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compose an accessibility snapshot of an image and write it as a PNG.
    Render(RenderArgs),
    /// Print the composite size and legend placement as JSON.
    Layout(LayoutArgs),
}

#[derive(Parser, Debug)]
struct InputArgs {
    /// Snapshot image (any format the `image` crate decodes).
    #[arg(long)]
    image: PathBuf,

    /// Marker JSON file.
    #[arg(long)]
    markers: PathBuf,

    /// Composer config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Font used to shape legend text. Without it text is measured but not drawn.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Desaturate the captured snapshot.
    #[arg(long, default_value_t = false)]
    desaturate: bool,

    /// Device pixels per point of the input image (overrides the config).
    #[arg(long)]
    scale: Option<f64>,

    /// Apply the desaturation ceiling of this host OS major version.
    #[arg(long)]
    os_major: Option<u32>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct LayoutArgs {
    #[command(flatten)]
    input: InputArgs,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Layout(args) => cmd_layout(args),
    }
}

fn compose(input: &InputArgs) -> anyhow::Result<a11y_snapshot::SnapshotComposer> {
    let mut config = match &input.config {
        Some(path) => a11y_snapshot::SnapshotConfig::from_json_path(path)?,
        None => a11y_snapshot::SnapshotConfig::default(),
    };
    if let Some(scale) = input.scale {
        config.capture.scale = scale;
    }
    if input.desaturate {
        config.capture.desaturate = true;
    }
    if let Some(major) = input.os_major {
        config.capture.desaturation_limit = a11y_snapshot::DesaturationLimit::for_os_major(major);
    }

    let decoded = image::open(&input.image)
        .with_context(|| format!("decode image '{}'", input.image.display()))?
        .into_rgba8();
    let (width, height) = decoded.dimensions();
    let bitmap = a11y_snapshot::Bitmap::from_straight_rgba8(
        width,
        height,
        config.capture.scale,
        decoded.into_raw(),
    )?;
    let mut subject = a11y_snapshot::RasterView::new(bitmap);
    let mut markers = a11y_snapshot::StaticMarkers::from_json_path(&input.markers)?;

    let mut composer = a11y_snapshot::SnapshotComposer::new(config)?;
    if let Some(font) = &input.font {
        let bytes =
            std::fs::read(font).with_context(|| format!("read font '{}'", font.display()))?;
        composer = composer.with_shaper(Box::new(a11y_snapshot::ParleyShaper::new(bytes)?));
    }
    composer.compose(&mut subject, &mut markers)?;
    Ok(composer)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut composer = compose(&args.input)?;
    let out = composer.render()?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        &args.out,
        &out.to_rgba8_unpremultiplied(),
        out.width,
        out.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_layout(args: LayoutArgs) -> anyhow::Result<()> {
    let mut composer = compose(&args.input)?;
    let size = composer.size_that_fits()?;
    let arrangement = composer.arrange(size)?;

    let frame = |r: a11y_snapshot::Rect| [r.x0, r.y0, r.width(), r.height()];
    let report = serde_json::json!({
        "size": [size.width, size.height],
        "strategy": format!("{:?}", arrangement.strategy),
        "snapshot": frame(arrangement.snapshot_frame),
        "legend": arrangement
            .legend
            .iter()
            .map(|e| frame(e.frame))
            .collect::<Vec<_>>(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
