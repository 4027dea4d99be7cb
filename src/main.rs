use asset_extractor::config;
use asset_extractor::export::{self, ExportRequest};
use asset_extractor::imaging::{ImageBackend, RustBackend, ScaleFactor};
use asset_extractor::output;
use asset_extractor::preview::render_overlay;
use asset_extractor::selection::{SelectionFile, commit_all};
use asset_extractor::session::{RunOutcome, Session};
use asset_extractor::types::Rectangle;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::warn;
use tracing_subscriber::EnvFilter;

const PREVIEW_FILENAME: &str = "preview.png";

/// Source image plus the selections to apply to it.
#[derive(clap::Args, Clone)]
struct SelectionArgs {
    /// Sprite sheet or screenshot to cut assets from
    image: PathBuf,

    /// Selection rectangle in source pixels (repeatable)
    #[arg(long = "rect", value_name = "X,Y,W,H")]
    rects: Vec<Rectangle>,

    /// JSON file with recorded rectangles and drags
    #[arg(long, value_name = "FILE")]
    selections: Option<PathBuf>,
}

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "asset-extractor")]
#[command(about = "Cut game assets out of a sprite sheet")]
#[command(long_about = "\
Cut game assets out of a sprite sheet

Each selected rectangle is cropped, its flat background is keyed out to
transparency (the colour at the crop's top-left corner), it is upscaled with
a bilinear filter, and it is written as asset_N.png. Selections smaller than
11x11 pixels are dropped.

Selections come from --rect flags and/or a JSON selection file:

  {
    \"display\": [400, 400],
    \"rectangles\": [{\"x\": 30, \"y\": 30, \"width\": 40, \"height\": 40}],
    \"drags\": [{\"from\": [120, 120], \"to\": [280, 280]}]
  }

Drags are pointer positions on a display of size `display` (source pixels
when omitted).

Run 'asset-extractor gen-config' to generate a documented config file.")]
#[command(version = version_string())]
struct Cli {
    /// Config file (default: ./asset-extractor.toml if present)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log every processing step to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Process the selections and export the assets
    Extract {
        #[command(flatten)]
        selection: SelectionArgs,

        /// Upscale factor: 1, 2 or 4
        #[arg(long)]
        scale: Option<ScaleFactor>,

        /// Output directory
        #[arg(long, default_value = "assets")]
        output: PathBuf,

        /// Write only this asset (asset_2.png or 2)
        #[arg(long, value_name = "NAME")]
        only: Option<String>,

        /// Skip the zip bundle
        #[arg(long)]
        no_archive: bool,

        /// Zip bundle file name
        #[arg(long, value_name = "NAME")]
        archive_name: Option<String>,

        /// Also write preview.png with the selections drawn over the image
        #[arg(long)]
        preview: bool,
    },
    /// Decode the image and validate selections without processing
    Check(SelectionArgs),
    /// Print a stock config file with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Extract {
            selection,
            scale,
            output,
            only,
            no_archive,
            archive_name,
            preview,
        } => {
            let mut config = config::load_config(cli.config.as_deref())?;
            if let Some(scale) = scale {
                config.processing.scale = scale;
            }
            if let Some(name) = archive_name {
                config::validate_archive_name(&name)?;
                config.export.archive_name = name;
            }

            let mut session = Session::new(RustBackend::new(), config.processing.scale);
            load_source(&mut session, &selection.image)?;
            for rect in apply_selections(&mut session, &selection)? {
                warn!(%rect, "selection dropped: too small");
            }

            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_process_event(&event) {
                        println!("{}", line);
                    }
                }
            });
            let outcome = session.process(Some(tx));
            printer.join().map_err(|_| "progress printer panicked")?;

            if let RunOutcome::Skipped(reason) = outcome {
                println!("{}", output::format_skip_reason(reason));
                return Ok(());
            }

            if preview {
                write_preview(&session, &output)?;
            }

            let request = ExportRequest {
                artifacts: session.artifacts(),
                scale: session.artifact_scale().unwrap_or(session.scale()),
                only: only.as_deref(),
                archive: !no_archive,
            };
            let report = export::write_export(&output, &request, &config.export)?;
            println!();
            output::print_export_output(&report, &output);
        }
        Command::Check(selection) => {
            let config = config::load_config(cli.config.as_deref())?;
            let mut session = Session::new(RustBackend::new(), config.processing.scale);
            let dims = load_source(&mut session, &selection.image)?;
            let dropped = apply_selections(&mut session, &selection)?;
            output::print_check_output(
                &selection.image,
                dims,
                session.selections(),
                &dropped,
                session.scale(),
            );
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Install the stderr subscriber. `RUST_LOG` wins unless `--verbose` is set.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_source(
    session: &mut Session<RustBackend>,
    image: &Path,
) -> Result<asset_extractor::imaging::Dimensions, Box<dyn std::error::Error>> {
    let pixels = session.backend().load(image)?;
    Ok(session.set_source(pixels))
}

/// Commit `--rect` flags, then the selection file. Returns dropped candidates.
fn apply_selections(
    session: &mut Session<RustBackend>,
    args: &SelectionArgs,
) -> Result<Vec<Rectangle>, Box<dyn std::error::Error>> {
    let file = args
        .selections
        .as_deref()
        .map(SelectionFile::load)
        .transpose()?;
    let Some(selector) = session.selector_mut() else {
        return Ok(Vec::new());
    };
    let mut dropped = commit_all(selector, &args.rects);
    if let Some(file) = file {
        dropped.extend(file.apply(selector));
    }
    Ok(dropped)
}

fn write_preview(
    session: &Session<RustBackend>,
    dir: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some(source) = session.source() else {
        return Ok(());
    };
    let overlay = render_overlay(source, session.selections(), None);
    let bytes = session.backend().encode_png(&overlay)?;
    std::fs::create_dir_all(dir)?;
    let path = dir.join(PREVIEW_FILENAME);
    std::fs::write(&path, bytes)?;
    println!("Preview: {}", path.display());
    Ok(())
}
