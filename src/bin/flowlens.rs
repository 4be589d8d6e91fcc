use std::{
    fs::File,
    io::{BufReader, BufWriter, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser, Debug)]
#[command(name = "flowlens", version)]
struct Cli {
    /// Engine settings JSON; missing fields use defaults.
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset.
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Stack screenshots into one composite PNG and record its layout.
    Compose(ComposeArgs),
    /// Reproject composite annotations onto their slides.
    Map(MapArgs),
    /// Render one slide's severity heatmap as a PNG.
    Heatmap(HeatmapArgs),
}

#[derive(Parser, Debug)]
struct ComposeArgs {
    /// Input images, top to bottom.
    #[arg(long = "image", required = true)]
    images: Vec<PathBuf>,

    /// Output composite PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Output layout JSON path. Defaults to the PNG path with a `.layout.json` suffix.
    #[arg(long)]
    layout: Option<PathBuf>,

    /// Skip shrinking the composite to the configured upload limits.
    #[arg(long)]
    full_size: bool,
}

#[derive(Parser, Debug)]
struct MapArgs {
    /// Annotation list JSON from the analysis service.
    #[arg(long)]
    annotations: PathBuf,

    /// Number of slides the annotations were authored against.
    #[arg(long)]
    slides: usize,

    /// Layout JSON written by `compose`. Omit for legacy single-image data.
    #[arg(long)]
    layout: Option<PathBuf>,

    /// Output path; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct HeatmapArgs {
    /// Slide annotation JSON written by `map`.
    #[arg(long)]
    annotations: PathBuf,

    /// Slide index (0-based).
    #[arg(long)]
    slide: usize,

    /// Render width in pixels. Defaults to the `--under` image width.
    #[arg(long)]
    width: Option<u32>,

    /// Render height in pixels. Defaults to the `--under` image height.
    #[arg(long)]
    height: Option<u32>,

    /// Flatten the heatmap over this slide image.
    #[arg(long)]
    under: Option<PathBuf>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let settings = match &cli.settings {
        Some(path) => flowlens::EngineSettings::load(path)?,
        None => flowlens::EngineSettings::default(),
    };

    match cli.cmd {
        Command::Compose(args) => cmd_compose(args, &settings),
        Command::Map(args) => cmd_map(args, &settings),
        Command::Heatmap(args) => cmd_heatmap(args, &settings),
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> anyhow::Result<T> {
    let f = File::open(path).with_context(|| format!("open {what} '{}'", path.display()))?;
    let value = serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parse {what} JSON '{}'", path.display()))?;
    Ok(value)
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    ensure_parent_dir(path)?;
    let f = File::create(path).with_context(|| format!("create '{}'", path.display()))?;
    let mut w = BufWriter::new(f);
    serde_json::to_writer_pretty(&mut w, value)
        .with_context(|| format!("write '{}'", path.display()))?;
    w.flush()?;
    Ok(())
}

fn ensure_parent_dir(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}

fn cmd_compose(args: ComposeArgs, settings: &flowlens::EngineSettings) -> anyhow::Result<()> {
    let mut images = Vec::with_capacity(args.images.len());
    for path in &args.images {
        let bytes =
            std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
        let img = flowlens::RasterImage::probe(bytes)
            .with_context(|| format!("probe image '{}'", path.display()))?;
        images.push(img);
    }

    let mut composite = flowlens::compose(&images, &settings.compose)?;
    if !args.full_size {
        composite = composite.fit_for_upload(&settings.compose)?;
    }

    ensure_parent_dir(&args.out)?;
    let png = composite.encode(image::ImageFormat::Png)?;
    std::fs::write(&args.out, png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    let layout_path = args
        .layout
        .unwrap_or_else(|| args.out.with_extension("layout.json"));
    write_json(&layout_path, &composite.layout)?;

    eprintln!("wrote {}", args.out.display());
    eprintln!("wrote {}", layout_path.display());
    Ok(())
}

fn cmd_map(args: MapArgs, settings: &flowlens::EngineSettings) -> anyhow::Result<()> {
    let bytes = std::fs::read(&args.annotations)
        .with_context(|| format!("read annotations '{}'", args.annotations.display()))?;
    let points = flowlens::parse_annotations(&bytes)?;
    let layout: Option<flowlens::CompositeLayout> = match &args.layout {
        Some(path) => Some(read_json(path, "layout")?),
        None => None,
    };

    let mapped =
        flowlens::map_annotations(&points, args.slides, layout.as_ref(), &settings.mapper)?;

    match &args.out {
        Some(path) => {
            write_json(path, &mapped)?;
            eprintln!("wrote {}", path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            serde_json::to_writer_pretty(&mut lock, &mapped)?;
            writeln!(lock)?;
        }
    }
    Ok(())
}

fn cmd_heatmap(args: HeatmapArgs, settings: &flowlens::EngineSettings) -> anyhow::Result<()> {
    let annotations: Vec<flowlens::SlideAnnotation> = read_json(&args.annotations, "annotations")?;

    let base = match &args.under {
        Some(path) => Some(
            image::open(path)
                .with_context(|| format!("open slide image '{}'", path.display()))?
                .to_rgba8(),
        ),
        None => None,
    };

    let width = args
        .width
        .or_else(|| base.as_ref().map(|b| b.width()))
        .context("--width is required without --under")?;
    let height = args
        .height
        .or_else(|| base.as_ref().map(|b| b.height()))
        .context("--height is required without --under")?;

    let heat = flowlens::render_slide_heatmap(
        &annotations,
        args.slide,
        flowlens::PixelSize::new(width, height),
        &settings.heatmap,
    )?;
    if heat.is_empty() {
        anyhow::bail!("heatmap size {width}x{height} is empty; nothing to write");
    }

    let out = match base {
        Some(base) => {
            let base = if base.dimensions() == (width, height) {
                base
            } else {
                image::imageops::resize(&base, width, height, image::imageops::FilterType::Triangle)
            };
            flowlens::overlay_onto(&base, &heat)?
        }
        None => heat.to_rgba_image()?,
    };

    ensure_parent_dir(&args.out)?;
    out.save_with_format(&args.out, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}
