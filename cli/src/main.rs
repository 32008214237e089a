//! sheetflow CLI - charge-sheet rendering and PDF export tool

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use sheetflow::export::{self, run_export, run_export_async};
use sheetflow::{
    BlockKind, CaptureBackend, CaptureOptions, DirectorySink, ExportAction, ExportOptions,
    ImageCapture, JsonFormat, RasterTiler, Sheetflow, SheetflowResult,
};

#[derive(Parser)]
#[command(name = "sheetflow")]
#[command(version)]
#[command(about = "Render generated charge-sheet text to HTML, text, JSON and PDF", long_about = None)]
struct Cli {
    /// Input text file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output directory
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render to every format (HTML, text, JSON, PDF)
    Convert {
        /// Input text file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Case identifier used in the PDF filename
        #[arg(long)]
        id: Option<String>,
    },

    /// Render the on-screen view as HTML
    Html {
        /// Input text file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Leave out the signature block
        #[arg(long)]
        no_signature: bool,
    },

    /// Render as plain text
    Text {
        /// Input text file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Render the classified blocks as JSON
    Json {
        /// Input text file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show block statistics and page count
    Info {
        /// Input text file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print the statistics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export a vector PDF
    Pdf {
        #[command(flatten)]
        export: ExportArgs,
    },

    /// Export a raster PDF from a captured image of the rendered view
    Raster {
        #[command(flatten)]
        export: ExportArgs,

        /// PNG or JPEG capture of the rendered view (omit to report no capture support)
        #[arg(long, value_name = "IMAGE")]
        image: Option<PathBuf>,

        /// Device scale applied to the capture
        #[arg(long, default_value = "2.0")]
        scale: f32,

        /// The capture contains images from another origin
        #[arg(long)]
        cross_origin_content: bool,

        /// Refuse cross-origin images during capture
        #[arg(long)]
        deny_cross_origin: bool,
    },

    /// Show version information
    Version,
}

#[derive(clap::Args)]
struct ExportArgs {
    /// Input text file
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Output directory
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Case identifier used in the filename
    #[arg(long, env = "SHEETFLOW_ID")]
    id: Option<String>,

    /// JSON file with export options
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Draw "Page n/N" footers
    #[arg(long)]
    page_numbers: bool,

    /// What to do with the generated PDF
    #[arg(long, value_enum, default_value = "download")]
    action: ActionArg,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum ActionArg {
    /// Open with an automatic print dialog
    Print,
    /// Save under the computed filename
    Download,
}

impl From<ActionArg> for ExportAction {
    fn from(action: ActionArg) -> Self {
        match action {
            ActionArg::Print => ExportAction::Print,
            ActionArg::Download => ExportAction::Download,
        }
    }
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Convert { input, output, id }) => {
            cmd_convert(&input, output.as_deref(), id)
        }
        Some(Commands::Html {
            input,
            output,
            no_signature,
        }) => cmd_html(&input, output.as_deref(), no_signature),
        Some(Commands::Text { input, output }) => cmd_text(&input, output.as_deref()),
        Some(Commands::Json {
            input,
            output,
            compact,
        }) => cmd_json(&input, output.as_deref(), compact),
        Some(Commands::Info { input, json }) => cmd_info(&input, json),
        Some(Commands::Pdf { export }) => cmd_pdf(&export),
        Some(Commands::Raster {
            export,
            image,
            scale,
            cross_origin_content,
            deny_cross_origin,
        }) => cmd_raster(
            &export,
            image.as_deref(),
            CaptureOptions::default()
                .with_scale(scale)
                .with_cross_origin(!deny_cross_origin),
            cross_origin_content,
        ),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: convert if input is provided
            if let Some(input) = cli.input {
                cmd_convert(&input, cli.output.as_deref(), None)
            } else {
                println!("{}", "Usage: sheetflow <FILE> [OUTPUT]".yellow());
                println!("       sheetflow --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_convert(input: &Path, output: Option<&Path>, id: Option<String>) -> CliResult {
    let output_dir = output.map(|p| p.to_path_buf()).unwrap_or_else(|| {
        let stem = input.file_stem().unwrap_or_default().to_string_lossy();
        PathBuf::from(format!("{}_output", stem))
    });

    fs::create_dir_all(&output_dir)?;

    let pb = ProgressBar::new(4);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")?
            .progress_chars("#>-"),
    );

    pb.set_message("Classifying text...");
    let mut builder = Sheetflow::new();
    if let Some(id) = id {
        builder = builder.with_identifier(id);
    }
    let result = builder.parse_file(input)?;
    pb.inc(1);

    pb.set_message("Rendering HTML...");
    fs::write(output_dir.join("sheet.html"), result.to_html())?;
    pb.inc(1);

    pb.set_message("Rendering text and JSON...");
    fs::write(output_dir.join("sheet.txt"), result.to_text())?;
    fs::write(
        output_dir.join("blocks.json"),
        result.to_json(JsonFormat::Pretty)?,
    )?;
    pb.inc(1);

    pb.set_message("Exporting PDF...");
    let sink = DirectorySink::new(&output_dir);
    let artifact = run_export(ExportAction::Download, &sink, || result.export_pdf())?;
    pb.inc(1);

    pb.finish_with_message("Done!");

    println!("\n{}", "Output files:".green().bold());
    println!("  {} sheet.html", "├─".dimmed());
    println!("  {} sheet.txt", "├─".dimmed());
    println!("  {} blocks.json", "├─".dimmed());
    println!("  {} {}", "└─".dimmed(), artifact.filename);

    Ok(())
}

fn cmd_html(input: &Path, output: Option<&Path>, no_signature: bool) -> CliResult {
    let mut builder = Sheetflow::new();
    if no_signature {
        builder = builder.without_screen_signature();
    }
    let html = builder.parse_file(input)?.to_html();
    write_or_print(output, &html)
}

fn cmd_text(input: &Path, output: Option<&Path>) -> CliResult {
    let text = Sheetflow::new().parse_file(input)?.to_text();
    write_or_print(output, &text)
}

fn cmd_json(input: &Path, output: Option<&Path>, compact: bool) -> CliResult {
    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let json = Sheetflow::new().parse_file(input)?.to_json(format)?;
    write_or_print(output, &json)
}

fn cmd_info(input: &Path, json: bool) -> CliResult {
    let result = Sheetflow::new().parse_file(input)?;
    let stats = result.stats();

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Lines".bold(), stats.block_count);
    println!("{}: {}", "PDF pages".bold(), result.paginate()?.page_count());
    println!("{}: {}", "Filename".bold(), result.filename());

    println!();
    println!("{}", "Blocks".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    for kind in [
        BlockKind::Heading,
        BlockKind::SectionTitle,
        BlockKind::Bullet,
        BlockKind::KeyValue,
        BlockKind::Paragraph,
        BlockKind::Spacer,
    ] {
        println!("{}: {}", kind.as_str().bold(), stats.count_of(kind));
    }

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "Words".bold(), stats.word_count);
    println!("{}: {}", "Characters".bold(), stats.char_count);
    println!("{}: {}", "Bold spans".bold(), stats.bold_span_count);

    Ok(())
}

fn cmd_pdf(args: &ExportArgs) -> CliResult {
    let (result, sink) = prepare_export(args)?;
    let action = ExportAction::from(args.action);

    let artifact = run_export(action, &sink, || result.export_pdf())?;
    report_artifact(action, &sink, &artifact);
    Ok(())
}

fn cmd_raster(
    args: &ExportArgs,
    image: Option<&Path>,
    capture: CaptureOptions,
    cross_origin_content: bool,
) -> CliResult {
    let (result, sink) = prepare_export(args)?;
    let action = ExportAction::from(args.action);

    let backend = match image {
        Some(path) => {
            let capture: Arc<dyn CaptureBackend> = Arc::new(
                ImageCapture::open(path)?.with_cross_origin_content(cross_origin_content),
            );
            Some(capture)
        }
        None => None,
    };
    let tiler = RasterTiler::new(backend).with_options(capture);

    let rt = tokio::runtime::Runtime::new()?;
    let artifact = rt.block_on(run_export_async(
        action,
        &sink,
        result.export_raster(&tiler),
    ))?;
    report_artifact(action, &sink, &artifact);
    Ok(())
}

fn prepare_export(args: &ExportArgs) -> Result<(SheetflowResult, DirectorySink), Box<dyn std::error::Error>> {
    let mut options = match args.config {
        Some(ref path) => ExportOptions::from_json(&fs::read_to_string(path)?)?,
        None => ExportOptions::default(),
    };
    if let Some(ref id) = args.id {
        options = options.with_identifier(id.clone());
    }
    if args.page_numbers {
        options = options.with_page_numbers(true);
    }

    let output_dir = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&output_dir)?;

    let result = Sheetflow::new()
        .with_export_options(options)
        .parse_file(&args.input)?;
    Ok((result, DirectorySink::new(output_dir)))
}

fn report_artifact(action: ExportAction, sink: &DirectorySink, artifact: &export::Artifact) {
    let path = sink.path_for(artifact);
    match action {
        ExportAction::Download => {
            println!("{} {}", "Saved to".green(), path.display());
        }
        ExportAction::Print => {
            println!(
                "{} {} {}",
                "Open".green(),
                path.display(),
                "to print".green()
            );
        }
    }
    println!("{}: {}", "Pages".bold(), artifact.page_count);
}

fn write_or_print(output: Option<&Path>, content: &str) -> CliResult {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn cmd_version() {
    println!("{} {}", "sheetflow".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Charge-sheet rendering and PDF export tool");
    println!();
    println!("License: MIT");
}
