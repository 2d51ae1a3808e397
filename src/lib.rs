//! Labelscope: exploratory data analysis for YOLO-layout detection datasets.
//!
//! A dataset root is expected to look like Ultralytics/Roboflow exports:
//! `train/images`, `train/labels` and a `data.yaml` naming the classes.
//! Labelscope answers the usual first questions about such a dataset:
//! how many images and boxes there are, how big the images are, what the
//! boxes on a given image look like, and how box sizes are distributed per
//! class.
//!
//! # Modules
//!
//! - [`summary`]: file counts, image size statistics and per-class tallies
//! - [`overlay`]: one image with its boxes and class names drawn on it
//! - [`distribution`]: per-class box width/height/area samples
//! - [`figure`]: histogram figures of those samples
//! - [`dataset`]: layout discovery and the class-name mapping
//! - [`label`]: YOLO label-line parsing
//! - [`error`]: Error types for labelscope operations

pub mod dataset;
pub mod distribution;
pub mod error;
pub mod figure;
pub mod fonts;
pub mod geometry;
pub mod label;
pub mod logging;
pub mod overlay;
pub mod summary;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use error::LabelscopeError;

/// The labelscope CLI application.
#[derive(Parser)]
#[command(name = "labelscope")]
#[command(version, about)]
#[command(propagate_version = true)]
struct Cli {
    /// TrueType/OpenType font used for chart and box label text.
    #[arg(long, global = true, env = "LABELSCOPE_FONT")]
    font: Option<PathBuf>,

    /// More log output (-v info, -vv debug). RUST_LOG overrides this.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Report image counts, image sizes and objects per class.
    Summary(SummaryArgs),
    /// Draw one image with its annotated boxes.
    Show(ShowArgs),
    /// Plot per-class histograms of box width, height and area.
    Boxes(BoxesArgs),
}

/// Arguments for the summary subcommand.
#[derive(clap::Args)]
struct SummaryArgs {
    /// Dataset root containing data.yaml and the split directories.
    root: PathBuf,

    /// Split directory to read.
    #[arg(long, default_value = dataset::DEFAULT_SPLIT)]
    split: String,

    /// Output format for the report ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

/// Arguments for the show subcommand.
#[derive(clap::Args)]
struct ShowArgs {
    /// Dataset root containing data.yaml and the split directories.
    root: PathBuf,

    /// Split directory to read.
    #[arg(long, default_value = dataset::DEFAULT_SPLIT)]
    split: String,

    /// Zero-based position of the image in file-name order.
    #[arg(long, default_value_t = 0)]
    index: usize,

    /// Where to write the annotated image [default: <stem>_annotated.png].
    #[arg(long)]
    out: Option<PathBuf>,
}

/// Arguments for the boxes subcommand.
#[derive(clap::Args)]
struct BoxesArgs {
    /// Directory of YOLO .txt label files.
    labels_dir: PathBuf,

    /// Where to write the histogram figure.
    #[arg(long, default_value = "box_distributions.png")]
    out: PathBuf,

    /// Number of bins per histogram.
    #[arg(long, default_value_t = figure::DEFAULT_BINS)]
    bins: usize,
}

/// Run the labelscope CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), LabelscopeError> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Some(Commands::Summary(args)) => run_summary(args),
        Some(Commands::Show(args)) => run_show(args, cli.font),
        Some(Commands::Boxes(args)) => run_boxes(args, cli.font),
        None => {
            println!("labelscope {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Exploratory data analysis for YOLO-layout detection datasets.");
            println!();
            println!("Run 'labelscope --help' for usage information.");
            Ok(())
        }
    }
}

/// Execute the summary subcommand.
fn run_summary(args: SummaryArgs) -> Result<(), LabelscopeError> {
    let summary = summary::summarize_split(&args.root, &args.split)?;

    match args.output.as_str() {
        "text" => print!("{}", summary),
        "json" => {
            let json = serde_json::to_string_pretty(&summary)
                .map_err(|source| LabelscopeError::ReportJsonWrite { source })?;
            println!("{json}");
        }
        other => {
            return Err(LabelscopeError::UnsupportedFormat(format!(
                "'{}' (supported: text, json)",
                other
            )));
        }
    }

    Ok(())
}

/// Execute the show subcommand.
fn run_show(args: ShowArgs, font: Option<PathBuf>) -> Result<(), LabelscopeError> {
    let layout = dataset::DatasetLayout::discover(&args.root, &args.split)?;
    let class_names = dataset::read_data_yaml(&layout.data_yaml)?;

    let annotated =
        overlay::annotate_image(&layout.images_dir, &layout.labels_dir, &class_names, args.index)?;

    let output = args
        .out
        .unwrap_or_else(|| PathBuf::from(format!("{}_annotated.png", annotated.stem)));
    let style = overlay::OverlayStyle {
        font,
        ..overlay::OverlayStyle::default()
    };
    overlay::render_annotated_image(&annotated, &output, &style)?;

    println!("{}", annotated.title());
    for item in &annotated.overlays {
        let r = &item.rect;
        println!(
            "  {:<16} ({:.1}, {:.1}) - ({:.1}, {:.1})",
            item.label, r.x0, r.y0, r.x1, r.y1
        );
    }
    println!("Wrote {}", output.display());
    Ok(())
}

/// Execute the boxes subcommand.
fn run_boxes(args: BoxesArgs, font: Option<PathBuf>) -> Result<(), LabelscopeError> {
    let outcome = distribution::plot_box_distributions(&args.labels_dir, args.bins)?;

    let (distribution, figure) = match outcome {
        distribution::PlotOutcome::NoData => {
            println!("No data to plot histograms.");
            return Ok(());
        }
        distribution::PlotOutcome::Figure {
            distribution,
            figure,
        } => (distribution, figure),
    };

    println!(
        "{:<10} {:>8} {:>12} {:>12} {:>12}",
        "class", "boxes", "mean width", "mean height", "mean area"
    );
    for row in distribution.class_summaries() {
        println!(
            "{:<10} {:>8} {:>12.4} {:>12.4} {:>12.4}",
            row.class_id.to_string(),
            row.boxes,
            row.mean_width,
            row.mean_height,
            row.mean_area
        );
    }

    let style = figure::FigureStyle {
        font,
        ..figure::FigureStyle::default()
    };
    figure::render_histogram_figure(&figure, &args.out, &style)?;
    println!("Wrote {}", args.out.display());
    Ok(())
}
