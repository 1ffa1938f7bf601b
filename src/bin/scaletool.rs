use clap::{Parser, Subcommand};
use image::{DynamicImage, GenericImageView};
use scale_ocr::decoder::segment::decode_pattern;
use scale_ocr::detector::canonical::{canonical_luminance, decode_image_bytes};
use scale_ocr::detector::region::crop_region;
use scale_ocr::detector::sampler::{is_active, sample_decimal, sample_slot};
use scale_ocr::detector::slots::digit_slots;
use scale_ocr::tools::{
    SampleOutcome, dataset_iter, dataset_root_from_env, encode_png, grayscale_stats, load_bytes,
    reading_rate, render_photo, render_reading,
};
use scale_ocr::utils::binarization::{otsu_threshold, threshold_binarize};
use scale_ocr::{DecoderConfig, WeightReader, logger};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "scaletool", version, about = "Seven-segment scale reader tools")]
struct Cli {
    /// JSON calibration file (defaults are used when omitted)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode one photo and print the reading
    Decode {
        #[arg(long)]
        image: PathBuf,
        /// Print `{ "text", "confidence" }` JSON instead of plain text
        #[arg(long)]
        json: bool,
    },
    /// Print per-slot probe means and patterns for one photo
    Debug {
        #[arg(long)]
        image: PathBuf,
        /// Write the canonical bitmap as PNG
        #[arg(long)]
        dump: Option<PathBuf>,
    },
    /// Suggest a binarization threshold for the configured crop
    Calibrate {
        #[arg(long)]
        image: PathBuf,
    },
    /// Render a synthetic photo of a reading
    Render {
        #[arg(long)]
        text: String,
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value_t = 640)]
        width: u32,
        #[arg(long, default_value_t = 400)]
        height: u32,
        /// Write only the canonical bitmap instead of a full photo
        #[arg(long)]
        canonical: bool,
    },
    /// Compute reading rate on a labeled dataset (file stem = expected text)
    ReadingRate {
        #[arg(long)]
        root: Option<PathBuf>,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Print the effective configuration as JSON
    DumpConfig,
}

fn main() -> ExitCode {
    logger::init();
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            error!("{}", err);
            return ExitCode::FAILURE;
        }
    };

    let result = match cli.command {
        Command::Decode { image, json } => decode_cmd(&config, &image, json),
        Command::Debug { image, dump } => debug_cmd(&config, &image, dump.as_deref()),
        Command::Calibrate { image } => calibrate_cmd(&config, &image),
        Command::Render {
            text,
            out,
            width,
            height,
            canonical,
        } => render_cmd(&config, &text, &out, width, height, canonical),
        Command::ReadingRate { root, limit } => reading_rate_cmd(&config, root, limit),
        Command::DumpConfig => config.to_json().map(|json| println!("{}", json)).map_err(Into::into),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

type CmdResult = Result<(), Box<dyn std::error::Error>>;

fn load_config(path: Option<&Path>) -> scale_ocr::Result<DecoderConfig> {
    let config = match path {
        Some(path) => {
            info!("Loading calibration from {}", path.display());
            DecoderConfig::from_json_file(path)?
        }
        None => DecoderConfig::default(),
    };
    let config = config.with_env_overrides();
    config.validate()?;
    Ok(config)
}

fn load_image(path: &Path) -> Result<DynamicImage, Box<dyn std::error::Error>> {
    let bytes = load_bytes(path)?;
    Ok(decode_image_bytes(&bytes)?)
}

fn decode_cmd(config: &DecoderConfig, image: &Path, json: bool) -> CmdResult {
    let reader = WeightReader::new(config.clone())?;
    let bytes = load_bytes(image)?;
    let start = Instant::now();
    let reading = reader.read(&bytes)?;
    info!("Decoded {} in {:?}", image.display(), start.elapsed());

    if json {
        println!("{}", serde_json::to_string(&reading.output())?);
    } else {
        println!("{}", reading.text);
        if reading.gap_count() > 0 {
            println!(
                "  ({} of {} slots not read as digits)",
                reading.gap_count(),
                reading.digits.len()
            );
        }
    }
    Ok(())
}

fn debug_cmd(config: &DecoderConfig, image: &Path, dump: Option<&Path>) -> CmdResult {
    let img = load_image(image)?;
    let (width, height) = img.dimensions();
    println!("Image: {} ({}x{})", image.display(), width, height);

    let region = crop_region(&img, config.crop)?;
    let gray = canonical_luminance(&region, config);
    let stats = grayscale_stats(&gray);
    println!(
        "Canonical luminance range: {}-{}, average: {}",
        stats.min, stats.max, stats.avg
    );

    let bitmap = threshold_binarize(
        &gray,
        config.canonical.width as usize,
        config.canonical.height as usize,
        config.binarize_threshold,
    );
    println!(
        "Binary: lit_pixels={} lit_ratio={:.2}%",
        bitmap.lit_count(),
        bitmap.lit_ratio() * 100.0
    );

    for (i, &slot) in digit_slots(config).iter().enumerate() {
        let sample = sample_slot(&bitmap, slot, config);
        let ratios: Vec<String> = sample
            .means
            .iter()
            .map(|m| format!("{:.2}", m / 255.0))
            .collect();
        println!(
            "  Slot {} (x={}, w={}): pattern={} ratios=[{}] -> {:?}",
            i,
            slot.x,
            slot.width,
            sample.pattern,
            ratios.join(" "),
            decode_pattern(sample.pattern)
        );
    }
    if let Some(decimal) = sample_decimal(&bitmap, config) {
        println!(
            "  Decimal point: ratio={:.2} lit={}",
            decimal / 255.0,
            is_active(decimal, config.activation_threshold)
        );
    }

    if let Some(path) = dump {
        bitmap.to_gray_image().save(path)?;
        println!("Canonical bitmap written to {}", path.display());
    }
    Ok(())
}

fn calibrate_cmd(config: &DecoderConfig, image: &Path) -> CmdResult {
    let img = load_image(image)?;
    let region = crop_region(&img, config.crop)?;
    let gray = canonical_luminance(&region, config);
    let stats = grayscale_stats(&gray);
    let suggested = otsu_threshold(&gray);

    println!(
        "Canonical luminance range: {}-{}, average: {}",
        stats.min, stats.max, stats.avg
    );
    println!("Configured binarize_threshold: {}", config.binarize_threshold);
    println!("Suggested binarize_threshold (Otsu): {}", suggested);
    Ok(())
}

fn render_cmd(
    config: &DecoderConfig,
    text: &str,
    out: &Path,
    width: u32,
    height: u32,
    canonical: bool,
) -> CmdResult {
    let image = if canonical {
        DynamicImage::ImageLuma8(render_reading(config, text)?.to_gray_image())
    } else {
        DynamicImage::ImageRgb8(render_photo(config, text, width, height)?)
    };
    std::fs::write(out, encode_png(&image)?)?;
    println!("Rendered {:?} to {}", text, out.display());
    Ok(())
}

fn reading_rate_cmd(config: &DecoderConfig, root: Option<PathBuf>, limit: Option<usize>) -> CmdResult {
    let root = root.unwrap_or_else(dataset_root_from_env);
    let paths: Vec<PathBuf> = dataset_iter(&root, limit).collect();
    if paths.is_empty() {
        return Err(format!("no images found under {}", root.display()).into());
    }

    let start = Instant::now();
    let report = reading_rate(&paths, config);
    for (path, outcome) in &report.samples {
        match outcome {
            SampleOutcome::Correct => {}
            SampleOutcome::Mismatch { expected, got } => {
                println!("MISS: {} expected={} got={:?}", path.display(), expected, got)
            }
            SampleOutcome::Failed(err) => println!("FAIL: {} {}", path.display(), err),
        }
    }
    println!(
        "\nReading rate: {}/{} = {:.2}% ({:?})",
        report.correct(),
        report.total(),
        report.rate(),
        start.elapsed()
    );
    Ok(())
}
