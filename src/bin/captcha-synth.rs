use std::path::{Path, PathBuf};

use anyhow::Context as _;
use captcha_synth::{BoundingBox, CaptchaConfig, ImageCaptcha, OutputFormat};
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "captcha-synth", version)]
struct Cli {
    /// Log pipeline events to stderr.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write one CAPTCHA image.
    Write(WriteArgs),
    /// Write the final, boxed and per-character images plus `boxes.json`.
    Detail(DetailArgs),
}

#[derive(Args, Debug)]
struct GeneratorArgs {
    /// Generator config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for reproducible output (overrides the config seed).
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Parser, Debug)]
struct WriteArgs {
    /// Text to render.
    #[arg(long)]
    text: String,

    /// Output image path. The extension picks the format when recognized.
    #[arg(long)]
    out: PathBuf,

    /// Also write the bounding boxes as JSON.
    #[arg(long)]
    boxes_out: Option<PathBuf>,

    #[command(flatten)]
    generator: GeneratorArgs,
}

#[derive(Parser, Debug)]
struct DetailArgs {
    /// Text to render.
    #[arg(long)]
    text: String,

    /// Directory receiving every output file.
    #[arg(long)]
    out_dir: PathBuf,

    #[command(flatten)]
    generator: GeneratorArgs,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    if cli.verbose {
        let _ = tracing_subscriber::fmt()
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init();
    }
    match cli.cmd {
        Command::Write(args) => cmd_write(args),
        Command::Detail(args) => cmd_detail(args),
    }
}

fn build_generator(args: &GeneratorArgs) -> anyhow::Result<ImageCaptcha> {
    let mut config = match &args.config {
        Some(path) => CaptchaConfig::from_path(path)?,
        None => CaptchaConfig::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    Ok(ImageCaptcha::new(config)?)
}

fn cmd_write(args: WriteArgs) -> anyhow::Result<()> {
    let mut captcha = build_generator(&args.generator)?;
    ensure_parent_dir(&args.out)?;
    let format = OutputFormat::from_path(&args.out).unwrap_or(captcha.config().format);

    match &args.boxes_out {
        None => {
            captcha
                .write_with_format(&args.text, &args.out, format)
                .with_context(|| format!("write image '{}'", args.out.display()))?;
        }
        Some(boxes_out) => {
            let detail = captcha.generate_with_detail(&args.text)?;
            captcha_synth::write_image(&detail.image, &args.out, format)
                .with_context(|| format!("write image '{}'", args.out.display()))?;
            ensure_parent_dir(boxes_out)?;
            write_boxes(boxes_out, &detail.boxes)?;
            eprintln!("wrote {}", boxes_out.display());
        }
    }

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_detail(args: DetailArgs) -> anyhow::Result<()> {
    let mut captcha = build_generator(&args.generator)?;
    let detail = captcha.generate_with_detail(&args.text)?;

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;

    let png = OutputFormat::Png;
    let final_path = args.out_dir.join("final.png");
    captcha_synth::write_image(&detail.image, &final_path, png)
        .with_context(|| format!("write image '{}'", final_path.display()))?;
    let boxed_path = args.out_dir.join("final_with_boxes.png");
    captcha_synth::write_image(&detail.image_with_boxes, &boxed_path, png)
        .with_context(|| format!("write image '{}'", boxed_path.display()))?;
    for (i, only) in detail.char_images.iter().enumerate() {
        let path = args.out_dir.join(format!("char_{i:02}.png"));
        captcha_synth::write_image(only, &path, png)
            .with_context(|| format!("write image '{}'", path.display()))?;
    }
    write_boxes(&args.out_dir.join("boxes.json"), &detail.boxes)?;

    eprintln!(
        "wrote {} ({} boxes, {} character images)",
        args.out_dir.display(),
        detail.boxes.len(),
        detail.char_images.len()
    );
    Ok(())
}

fn write_boxes(path: &Path, boxes: &[BoundingBox]) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(boxes).context("serialize boxes")?;
    std::fs::write(path, json).with_context(|| format!("write boxes '{}'", path.display()))
}

fn ensure_parent_dir(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}
