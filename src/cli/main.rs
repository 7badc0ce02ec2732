use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};

use geotag::codec::image_info;
use geotag::config::Config;
use geotag::exif::read_coordinates;
use geotag::geocode::{NominatimGeocoder, resolve_address};
use geotag::gps::Coordinate;
use geotag::pipeline::{self, Embedding, ImageProcessor, OutputFormat};

#[derive(Parser, Debug)]
#[command(
    name = "geotag",
    version,
    about = "Convert images to JPEG, PNG or WebP and embed GPS coordinates resolved from an address"
)]
struct Cli {
    /// Image files or directories to process
    #[arg(value_name = "PATH")]
    paths: Vec<PathBuf>,

    /// Address to geocode (e.g. "Champ de Mars, Paris")
    #[arg(short, long, conflicts_with_all = ["lat", "lon"])]
    address: Option<String>,

    /// Latitude in decimal degrees
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    lat: Option<f64>,

    /// Longitude in decimal degrees
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    lon: Option<f64>,

    /// Output format: jpeg, jpg, png or webp
    #[arg(short, long, default_value = "jpeg")]
    format: String,

    /// Directory for output files (default: next to each source)
    #[arg(short, long, value_name = "DIR")]
    out_dir: Option<PathBuf>,

    /// Path to config file (default: config.json next to binary)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Initialize a default config.json and exit
    #[arg(long)]
    init: bool,

    /// Resolve the location, print it and exit
    #[arg(long)]
    lookup: bool,

    /// Print GPS coordinates stored in the image(s) and exit
    #[arg(long = "show-gps")]
    show_gps: bool,

    /// Print format, dimensions and color mode of the image(s) and exit
    #[arg(long)]
    info: bool,

    /// Output results as JSON
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Handle --init
    if cli.init {
        let config = Config::default();
        let path = cli.config.as_deref();
        config.save(path)?;
        let save_path = match path {
            Some(p) => p.to_path_buf(),
            None => Config::config_path()?,
        };
        println!("Default config written to {}", save_path.display());
        return Ok(());
    }

    // Handle --show-gps
    if cli.show_gps {
        let images = collect(&cli.paths)?;
        return show_gps(&images, cli.json);
    }

    // Handle --info
    if cli.info {
        let images = collect(&cli.paths)?;
        return show_info(&images, cli.json);
    }

    let config = Config::load(cli.config.as_deref())?;

    // Validate the format before any network or pixel work
    let format = OutputFormat::parse(&cli.format)?;

    let coordinate = resolve_location(&cli, &config).await?;

    // Handle --lookup
    if cli.lookup {
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&coordinate)?);
        } else {
            println!("{coordinate}");
        }
        return Ok(());
    }

    let images = collect(&cli.paths)?;
    log::info!("Found {} image(s) to process", images.len());
    log::info!("Location: {coordinate}");

    if let Some(dir) = &cli.out_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    }

    let processor = ImageProcessor::new(config.encoding.clone());
    let mut results = Vec::new();
    let total = images.len();

    for (i, image_path) in images.iter().enumerate() {
        log::info!("[{}/{}] Processing: {}", i + 1, total, image_path.display());

        let result = process_one(&processor, image_path, &coordinate, format, &cli, &config);
        match &result.error {
            Some(err) => log::error!("  Error: {err}"),
            None => {
                if let Some(output) = &result.output {
                    log::info!("  Wrote: {}", output.display());
                }
                match &result.embedding {
                    Some(Embedding::Embedded) => log::info!("  GPS embedded"),
                    Some(Embedding::Skipped) => {
                        log::info!("  {format} output does not carry GPS coordinates")
                    }
                    Some(Embedding::FellBack(reason)) => {
                        log::warn!("  Saved without GPS: {reason}")
                    }
                    None => {}
                }
            }
        }
        results.push(result);
    }

    // JSON output
    if cli.json {
        let json_results: Vec<serde_json::Value> = results
            .iter()
            .map(|r| {
                serde_json::json!({
                    "path": r.path.display().to_string(),
                    "output": r.output.as_ref().map(|p| p.display().to_string()),
                    "mime_type": r.mime_type,
                    "gps_embedded": r.embedding.as_ref().is_some_and(Embedding::is_embedded),
                    "fallback_reason": match &r.embedding {
                        Some(Embedding::FellBack(reason)) => Some(reason.as_str()),
                        _ => None,
                    },
                    "error": r.error,
                })
            })
            .collect();

        println!("{}", serde_json::to_string_pretty(&json_results)?);
    }

    // Summary
    let success = results.iter().filter(|r| r.error.is_none()).count();
    let failed = results.len() - success;
    log::info!("Done: {success} succeeded, {failed} failed out of {total} images");

    Ok(())
}

/// Per-image outcome for reporting.
struct FileResult {
    path: PathBuf,
    output: Option<PathBuf>,
    mime_type: Option<&'static str>,
    embedding: Option<Embedding>,
    error: Option<String>,
}

fn process_one(
    processor: &ImageProcessor,
    source: &Path,
    coordinate: &Coordinate,
    format: OutputFormat,
    cli: &Cli,
    config: &Config,
) -> FileResult {
    let mut result = FileResult {
        path: source.to_path_buf(),
        output: None,
        mime_type: None,
        embedding: None,
        error: None,
    };

    if let Err(e) = write_output(processor, source, coordinate, format, cli, config, &mut result) {
        result.error = Some(format!("{e:#}"));
    }
    result
}

fn write_output(
    processor: &ImageProcessor,
    source: &Path,
    coordinate: &Coordinate,
    format: OutputFormat,
    cli: &Cli,
    config: &Config,
    result: &mut FileResult,
) -> Result<()> {
    let name = pipeline::output_file_name(source, format, &config.output.file_suffix);
    let dir = match &cli.out_dir {
        Some(dir) => dir.clone(),
        None => source.parent().map(Path::to_path_buf).unwrap_or_default(),
    };
    let output = dir.join(name);

    if output.exists() && !config.output.overwrite {
        anyhow::bail!(
            "{} already exists (set output.overwrite to replace it)",
            output.display()
        );
    }

    let bytes = std::fs::read(source)
        .with_context(|| format!("Failed to read {}", source.display()))?;
    let processed = processor.process_as(
        &bytes,
        coordinate.latitude(),
        coordinate.longitude(),
        format,
    )?;

    std::fs::write(&output, &processed.bytes)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    result.output = Some(output);
    result.mime_type = Some(processed.mime_type);
    result.embedding = Some(processed.embedding);
    Ok(())
}

/// Coordinates from `--lat/--lon`, or from geocoding `--address`.
async fn resolve_location(cli: &Cli, config: &Config) -> Result<Coordinate> {
    if let (Some(lat), Some(lon)) = (cli.lat, cli.lon) {
        return Ok(Coordinate::new(lat, lon)?);
    }

    let Some(address) = cli.address.as_deref() else {
        anyhow::bail!("No location specified. Use --address or --lat/--lon.");
    };

    let geocoder = NominatimGeocoder::new(&config.geocoder)?;
    match resolve_address(&geocoder, address)
        .await
        .context("Geocoding failed")?
    {
        Some(coordinate) => Ok(coordinate),
        None => anyhow::bail!("No location found for {address:?}"),
    }
}

fn collect(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    if paths.is_empty() {
        anyhow::bail!("No input files or directories specified. Use --help for usage.");
    }
    let images = pipeline::collect_images(paths);
    if images.is_empty() {
        anyhow::bail!("No supported image files found in the specified paths.");
    }
    Ok(images)
}

fn show_gps(images: &[PathBuf], json: bool) -> Result<()> {
    let mut entries = Vec::new();

    for path in images {
        let bytes =
            std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        let entry = match read_coordinates(&bytes) {
            Ok(Some(coordinate)) => {
                if !json {
                    println!("{}: {coordinate}", path.display());
                }
                serde_json::json!({ "path": path.display().to_string(), "gps": coordinate })
            }
            Ok(None) => {
                if !json {
                    println!("{}: no GPS data", path.display());
                }
                serde_json::json!({ "path": path.display().to_string(), "gps": null })
            }
            Err(e) => {
                if !json {
                    println!("{}: {e}", path.display());
                }
                serde_json::json!({ "path": path.display().to_string(), "error": e.to_string() })
            }
        };
        entries.push(entry);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    }
    Ok(())
}

fn show_info(images: &[PathBuf], json: bool) -> Result<()> {
    let mut entries = Vec::new();

    for path in images {
        let bytes =
            std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        match image_info(&bytes) {
            Ok(info) => {
                if !json {
                    println!(
                        "{}: {} {}x{} {:?}",
                        path.display(),
                        info.mime_type,
                        info.width,
                        info.height,
                        info.color_mode
                    );
                }
                entries.push(serde_json::json!({
                    "path": path.display().to_string(),
                    "info": info,
                }));
            }
            Err(e) => {
                log::error!("{}: {e}", path.display());
                entries.push(serde_json::json!({
                    "path": path.display().to_string(),
                    "error": e.to_string(),
                }));
            }
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    }
    Ok(())
}
