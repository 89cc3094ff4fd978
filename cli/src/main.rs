//! pdfoutline CLI - heading outline inference for PDF files

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdfoutline::{
    render, DocumentResult, JsonFormat, LineSource, OutlineExtractor, ParseOptions, PdfLineSource,
};

/// Directory used when no output directory is given.
const DEFAULT_OUTPUT_DIR: &str = "output_json";

#[derive(Parser)]
#[command(name = "pdfoutline")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Infer a title and H1-H3 outline from PDF text layout", long_about = None)]
struct Cli {
    /// Input PDF file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output directory
    #[arg(short, long, value_name = "DIR", env = "PDFOUTLINE_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Keep going past pages that fail to decode
    #[arg(long, global = true)]
    lenient: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the outline of one PDF
    Extract {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "json")]
        format: Format,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Extract outlines for every PDF in a directory
    Batch {
        /// Directory containing PDF files
        #[arg(value_name = "DIR", default_value = ".")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR", env = "PDFOUTLINE_OUTPUT_DIR")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show the cleaned text lines the outline is inferred from
    Lines {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Only show this page
        #[arg(long)]
        page: Option<u32>,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Format {
    /// JSON document
    Json,
    /// Indented plain text
    Text,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let options = parse_options(cli.lenient);
    let extractor = OutlineExtractor::new().with_parse_options(options.clone());

    let result = match cli.command {
        Some(Commands::Extract {
            input,
            output,
            format,
            compact,
        }) => cmd_extract(&extractor, &input, output.as_deref(), format, compact),
        Some(Commands::Batch {
            input,
            output,
            compact,
        }) => cmd_batch(&extractor, &input, output.as_deref(), compact),
        Some(Commands::Lines { input, page }) => cmd_lines(&input, page, options),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            if let Some(input) = cli.input {
                cmd_default(&extractor, &input, cli.output_dir.as_deref())
            } else {
                println!("{}", "Usage: pdfoutline <FILE>".yellow());
                println!("       pdfoutline --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn parse_options(lenient: bool) -> ParseOptions {
    if lenient {
        ParseOptions::new().lenient()
    } else {
        ParseOptions::new()
    }
}

fn json_format(compact: bool) -> JsonFormat {
    if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    }
}

/// `<output_dir>/<stem>.json` for an input PDF.
fn output_path(output_dir: &Path, input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    output_dir.join(format!("{}.json", stem))
}

fn write_result(
    result: &DocumentResult,
    path: &Path,
    format: JsonFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let json = render::to_json(result, format)?;
    log::debug!("Writing {}", path.display());
    fs::write(path, json)?;
    Ok(())
}

fn report(result: &DocumentResult) {
    if result.is_error() {
        println!("{}", "Could not process document".yellow());
    } else {
        println!(
            "{} {} ({} headings)",
            "Title:".bold(),
            result.title,
            result.heading_count()
        );
    }
}

fn cmd_default(
    extractor: &OutlineExtractor,
    input: &Path,
    output_dir: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let output_dir = output_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));
    fs::create_dir_all(&output_dir)?;

    println!("{} '{}'...", "Processing".cyan(), input.display());
    let result = extractor.extract_path(input);
    report(&result);

    let path = output_path(&output_dir, input);
    write_result(&result, &path, JsonFormat::Pretty)?;
    println!("{} {}", "Saved to".green(), path.display());

    Ok(())
}

fn cmd_extract(
    extractor: &OutlineExtractor,
    input: &Path,
    output: Option<&Path>,
    format: Format,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let result = extractor.extract_path(input);

    let content = match format {
        Format::Json => render::to_json(&result, json_format(compact))?,
        Format::Text => render::to_text(&result),
    };

    if let Some(path) = output {
        fs::write(path, &content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }

    Ok(())
}

/// PDF files directly inside a directory, sorted by name.
fn collect_pdfs(dir: &Path) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let mut pdfs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_pdf = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("pdf"))
            .unwrap_or(false);
        if is_pdf && path.is_file() {
            pdfs.push(path);
        }
    }
    pdfs.sort();
    Ok(pdfs)
}

fn cmd_batch(
    extractor: &OutlineExtractor,
    input: &Path,
    output: Option<&Path>,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let pdfs = collect_pdfs(input)?;
    if pdfs.is_empty() {
        return Err(format!("No PDF files found in {}", input.display()).into());
    }

    let output_dir = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));
    fs::create_dir_all(&output_dir)?;

    let pb = ProgressBar::new(pdfs.len() as u64 + 1);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    pb.set_message("Extracting outlines...");
    let results = extractor.extract_paths(&pdfs);
    pb.inc(1);

    let format = json_format(compact);
    let mut failed = 0;
    for (path, result) in &results {
        pb.set_message(path.display().to_string());
        if result.is_error() {
            failed += 1;
        }
        write_result(result, &output_path(&output_dir, path), format)?;
        pb.inc(1);
    }

    pb.finish_with_message("Done!");

    println!(
        "\n{} {} files written to {}",
        "Done!".green().bold(),
        results.len(),
        output_dir.display()
    );
    if failed > 0 {
        println!("{} {} could not be processed", "Warning:".yellow(), failed);
    }

    Ok(())
}

fn cmd_lines(
    input: &Path,
    page: Option<u32>,
    options: ParseOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let source = PdfLineSource::open_with_options(input, options)?;
    let doc = source.load()?;

    let extractor = OutlineExtractor::new();
    let lines = extractor.clean_lines(&doc);
    let stats = extractor.font_statistics(&lines);

    println!(
        "{}: {:.1}  {}: {:?}",
        "Body size".bold(),
        stats.body_size,
        "Heading sizes".bold(),
        stats.heading_sizes
    );
    println!("{}", "─".repeat(60).dimmed());

    for line in lines.iter().filter(|l| page.map_or(true, |p| l.page == p)) {
        let marker = if line.is_bold() { "B" } else { " " };
        println!(
            "{:>4} {:>5.1} {} {}",
            line.page.to_string().dimmed(),
            line.font_size,
            marker.bold(),
            line.text
        );
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pdfoutline".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF heading outline inference");
    println!();
    println!("License: MIT");
}
