use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use haloframe::{
    AppConfig, BadgeRenderer, CropEditor, Customization, DetectedFace, FaceDetection,
    GenerationService, PassthroughService, RenderTarget, SourceImage, Vec2, Wizard,
    assets::{mime_for_path, sniff_mime},
    badge::canvas_for_width,
    crop::FixedFaceDetector,
    render::text::BadgeFont,
};

#[derive(Parser, Debug)]
#[command(name = "haloframe", version)]
struct Cli {
    /// Log progress to stderr (repeat for more detail).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crop a photo to an aspect ratio and write the confirmed crop as PNG.
    Crop(CropArgs),
    /// Draw a photo into the circular frame, optionally with the arc badge.
    Badge(BadgeArgs),
    /// Crop, generate and export in one go.
    Run(RunArgs),
}

#[derive(Parser, Debug)]
struct CropArgs {
    /// Input photo (PNG, JPEG or WEBP).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    #[arg(long, default_value = "1:1")]
    aspect: String,

    /// Apply the brightness/contrast/saturation enhancement.
    #[arg(long)]
    enhance: bool,

    /// Face box `x,y,width,height` in image pixels; the largest one frames the crop.
    #[arg(long = "face")]
    faces: Vec<DetectedFace>,

    /// Zoom applied after the initial framing.
    #[arg(long)]
    zoom: Option<f64>,

    /// Pan `dx,dy` in viewport pixels, applied as a drag.
    #[arg(long, value_parser = parse_pair, allow_hyphen_values = true)]
    pan: Option<Vec2>,

    /// Also write the viewport-sized preview here.
    #[arg(long)]
    preview: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct BadgeArgs {
    /// Input photo.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Customization JSON (same keys as the badge panel).
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value = "1:1")]
    aspect: String,

    /// Show the arc badge.
    #[arg(long)]
    badge: bool,

    #[arg(long)]
    scale: Option<f64>,

    /// Image offset `dx,dy` in canvas pixels.
    #[arg(long, value_parser = parse_pair, allow_hyphen_values = true)]
    offset: Option<Vec2>,

    /// Font file for the lettering (defaults to a system bold sans-serif face).
    #[arg(long)]
    font: Option<PathBuf>,

    /// Keep the outside of the circle transparent instead of white.
    #[arg(long)]
    preview: bool,
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Input photo.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Application config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Style preset id (`classic`, `modern`, `realistic`).
    #[arg(long)]
    style: Option<String>,

    /// Prompt sent instead of the preset's.
    #[arg(long)]
    prompt: Option<String>,

    /// Generation endpoint, overriding the config.
    #[arg(long)]
    endpoint: Option<String>,

    /// Skip generation and use the crop as is.
    #[arg(long)]
    offline: bool,

    #[arg(long, default_value = "1:1")]
    aspect: String,

    /// Face box `x,y,width,height` in image pixels.
    #[arg(long = "face")]
    faces: Vec<DetectedFace>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Command::Crop(args) => cmd_crop(args),
        Command::Badge(args) => cmd_badge(args),
        Command::Run(args) => cmd_run(args),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}

fn parse_pair(s: &str) -> Result<Vec2, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected dx,dy, got \"{s}\""))?;
    let x: f64 = x.trim().parse().map_err(|e| format!("{s}: {e}"))?;
    let y: f64 = y.trim().parse().map_err(|e| format!("{s}: {e}"))?;
    if !x.is_finite() || !y.is_finite() {
        return Err(format!("{s}: values must be finite"));
    }
    Ok(Vec2::new(x, y))
}

/// Bytes plus the MIME type a browser would declare for the file.
fn read_photo(path: &Path) -> anyhow::Result<(Vec<u8>, String)> {
    let bytes = std::fs::read(path).with_context(|| format!("read '{}'", path.display()))?;
    let mime = mime_for_path(path)
        .or_else(|| sniff_mime(&bytes))
        .unwrap_or("application/octet-stream");
    Ok((bytes, mime.to_string()))
}

fn load_photo(path: &Path) -> anyhow::Result<SourceImage> {
    let (bytes, mime) = read_photo(path)?;
    haloframe::validate_upload(&mime, bytes.len() as u64).map_err(haloframe::HaloError::from)?;
    Ok(haloframe::decode_image(&bytes)?)
}

fn detection_for(faces: Vec<DetectedFace>) -> FaceDetection {
    if faces.is_empty() {
        FaceDetection::Unavailable
    } else {
        FaceDetection::Available(Box::new(FixedFaceDetector::new(faces)))
    }
}

fn write_file(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("write '{}'", path.display()))
}

fn cmd_crop(args: CropArgs) -> anyhow::Result<()> {
    let image = load_photo(&args.in_path)?;
    let mut editor = CropEditor::open(image, &args.aspect, &detection_for(args.faces));
    tracing::info!(status = ?editor.status(), "crop editor ready");

    if let Some(zoom) = args.zoom {
        editor.set_zoom(zoom);
        editor.commit_zoom();
    }
    if let Some(pan) = args.pan {
        editor.pointer_down(0, haloframe::Point::ORIGIN);
        editor.pointer_move(0, haloframe::Point::ORIGIN + pan);
        editor.pointer_up(0);
    }
    editor.set_enhanced(args.enhance);

    if let Some(path) = args.preview.as_deref() {
        editor.render_preview()?.save_png(path)?;
    }
    let photo = editor.confirm()?;
    write_file(&args.out, &photo.png)?;

    let area = editor.crop_area();
    eprintln!(
        "wrote {} ({}x{}, crop {:.1},{:.1} {:.1}x{:.1})",
        args.out.display(),
        photo.width,
        photo.height,
        area.x,
        area.y,
        area.width,
        area.height
    );
    Ok(())
}

fn cmd_badge(args: BadgeArgs) -> anyhow::Result<()> {
    let image = load_photo(&args.in_path)?;
    let mut customization = match args.config.as_deref() {
        Some(path) => Customization::from_json_path(path)?,
        None => Customization::default(),
    };
    if args.badge {
        customization.show_badge = true;
    }
    if let Some(scale) = args.scale {
        customization.scale = scale;
    }
    if let Some(offset) = args.offset {
        customization.offset = offset;
    }

    let cfg = AppConfig::load(None)?;
    let mut renderer = match args.font.as_deref() {
        Some(path) => BadgeRenderer::new(Some(BadgeFont::from_path(path)?))?,
        None => cfg.badge_renderer(),
    };
    let canvas = canvas_for_width(&args.aspect, cfg.export_width)?;
    let target = if args.preview {
        RenderTarget::Preview
    } else {
        RenderTarget::Export
    };
    let raster = renderer.render(&image, &customization, canvas, target)?;
    raster.save_png(&args.out)?;
    eprintln!(
        "wrote {} ({}x{})",
        args.out.display(),
        raster.width,
        raster.height
    );
    Ok(())
}

fn cmd_run(args: RunArgs) -> anyhow::Result<()> {
    let cfg = AppConfig::load(args.config.as_deref())?;
    let (bytes, mime) = read_photo(&args.in_path)?;

    let mut wizard = Wizard::new(
        cfg.badge_renderer(),
        cfg.initial_customization(),
        cfg.export_width,
    );
    wizard.select_file(&bytes, &mime, &detection_for(args.faces))?;
    if let Some(editor) = wizard.editor_mut().filter(|e| e.aspect() != args.aspect) {
        editor.set_aspect_ratio(&args.aspect);
    }
    wizard.confirm_crop()?;
    wizard.select_style(args.style.as_deref().unwrap_or(&cfg.default_style))?;

    let service: Box<dyn GenerationService> = if args.offline {
        Box::new(PassthroughService)
    } else {
        match args.endpoint {
            Some(url) => {
                let http = haloframe::HttpGenerationService::new(url, cfg.generate_timeout())?;
                Box::new(http) as Box<dyn GenerationService>
            }
            None => cfg.boxed_generation_service()?,
        }
    };

    let (ticket, mut request) = wizard.begin_generation()?;
    if let Some(prompt) = args.prompt {
        request.prompt = prompt;
    }
    let result = service.generate(&request);
    wizard.finish_generation(ticket, result)?;

    wizard.proceed_to_download()?;
    let exported = wizard.export()?;
    write_file(&args.out, &exported.png)?;
    eprintln!(
        "wrote {} ({}x{}, style {})",
        args.out.display(),
        exported.width,
        exported.height,
        wizard.selected_style().id
    );
    Ok(())
}
