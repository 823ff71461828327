//! pdfchapter CLI - chapter-aware PDF page extraction tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdfchapter::extract::{DEFAULT_MAX_PAGES, DEFAULT_RENDER_SCALE};
use pdfchapter::{
    ContentExtractor, ConversationMessage, Error, ExtractMode, ExtractOptions, LoadedDocument,
    LopdfBackend, PdfBackend, RasterImage, Segment,
};

type CliResult = Result<(), Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "pdfchapter")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Split PDFs into chapters and extract chapter pages as images", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the document outline
    #[command(alias = "toc")]
    Outline {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Print the chapters inferred from the outline
    Segments {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output zero-based segments as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render the chapter containing a page to PNG files
    Extract {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Page number (1-based)
        #[arg(short, long)]
        page: u32,

        /// Extract only the given page
        #[arg(long)]
        single: bool,

        /// Largest chapter allowed, in pages
        #[arg(long, env = "PDFCHAPTER_MAX_PAGES", default_value_t = DEFAULT_MAX_PAGES)]
        max_pages: u32,

        /// Render scale (1.0 = 72 dpi)
        #[arg(long, env = "PDFCHAPTER_SCALE", default_value_t = DEFAULT_RENDER_SCALE)]
        scale: f32,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
    },

    /// Print the chat context message for a chapter or page
    Context {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Page number (1-based)
        #[arg(short, long)]
        page: u32,

        /// Use only the given page
        #[arg(long)]
        single: bool,

        /// Largest chapter allowed, in pages
        #[arg(long, env = "PDFCHAPTER_MAX_PAGES", default_value_t = DEFAULT_MAX_PAGES)]
        max_pages: u32,

        /// Render scale (1.0 = 72 dpi)
        #[arg(long, env = "PDFCHAPTER_SCALE", default_value_t = DEFAULT_RENDER_SCALE)]
        scale: f32,
    },

    /// Print the text of a chapter
    Text {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Page number (1-based); prints the chapter containing it
        #[arg(short, long, required_unless_present = "chapter")]
        page: Option<u32>,

        /// Chapter number (1-based, as listed by `segments`)
        #[arg(short, long, conflicts_with = "page")]
        chapter: Option<usize>,
    },

    /// Show document information
    Info {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Outline { input } => cmd_outline(&input),
        Commands::Segments { input, json } => cmd_segments(&input, json),
        Commands::Extract {
            input,
            page,
            single,
            max_pages,
            scale,
            output,
        } => cmd_extract(
            &input,
            page,
            extract_options(single, max_pages, scale),
            output.as_deref(),
        ),
        Commands::Context {
            input,
            page,
            single,
            max_pages,
            scale,
        } => cmd_context(&input, page, extract_options(single, max_pages, scale)),
        Commands::Text {
            input,
            page,
            chapter,
        } => cmd_text(&input, page, chapter),
        Commands::Info { input } => cmd_info(&input),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn extract_options(single: bool, max_pages: u32, scale: f32) -> ExtractOptions {
    let mode = if single {
        ExtractMode::SinglePage
    } else {
        ExtractMode::Chapter
    };
    ExtractOptions::new()
        .with_max_pages(max_pages)
        .with_render_scale(scale)
        .with_mode(mode)
}

/// Open a document with the backend that can render pages, when built in.
#[cfg(feature = "mupdf")]
fn open_renderable(input: &Path) -> Result<LoadedDocument<Box<dyn PdfBackend>>, Error> {
    let backend: Box<dyn PdfBackend> = Box::new(pdfchapter::MupdfBackend::open(input)?);
    Ok(LoadedDocument::load(backend))
}

#[cfg(not(feature = "mupdf"))]
fn open_renderable(input: &Path) -> Result<LoadedDocument<Box<dyn PdfBackend>>, Error> {
    log::warn!("Built without the mupdf feature; pages cannot be rendered");
    let backend: Box<dyn PdfBackend> = Box::new(LopdfBackend::load_file(input)?);
    Ok(LoadedDocument::load(backend))
}

/// Convert a 1-based page number from the command line to a page index.
fn page_index(page: u32, total_pages: u32) -> Result<u32, Error> {
    if page == 0 || page > total_pages {
        return Err(Error::PageOutOfRange(page, total_pages));
    }
    Ok(page - 1)
}

fn cmd_outline(input: &Path) -> CliResult {
    let outline = pdfchapter::outline_from_file(input)?;

    if outline.is_empty() {
        println!("{}", "No outline found".yellow());
        return Ok(());
    }

    for (i, entry) in outline.iter().enumerate() {
        let indent = "  ".repeat(entry.level.saturating_sub(1) as usize);
        println!(
            "{:>4} {}{} {}",
            format!("{}.", i + 1).dimmed(),
            indent,
            entry.title,
            format!("(p. {})", entry.target_page).dimmed()
        );
    }

    Ok(())
}

fn cmd_segments(input: &Path, json: bool) -> CliResult {
    let doc = pdfchapter::open_file(input)?;

    if json {
        println!("{}", serde_json::to_string_pretty(doc.segments())?);
        return Ok(());
    }

    for (i, segment) in doc.segments().iter().enumerate() {
        println!(
            "{:>4} {} {}",
            format!("{}.", i + 1).dimmed(),
            segment.title.bold(),
            format!("(pages {}, {} pages)", segment.display_range(), segment.page_count())
                .dimmed()
        );
    }

    Ok(())
}

fn cmd_extract(
    input: &Path,
    page: u32,
    options: ExtractOptions,
    output: Option<&Path>,
) -> CliResult {
    let doc = open_renderable(input)?;
    let index = page_index(page, doc.total_pages())?;
    let mode = options.mode;
    let extractor = ContentExtractor::new(options);

    let (label, first_page, count) = match mode {
        ExtractMode::Chapter => {
            let segment = extractor.locate_segment(&doc, index)?;
            (
                segment.title.clone(),
                segment.start_page,
                segment.page_count(),
            )
        }
        ExtractMode::SinglePage => (format!("page_{}", page), index, 1),
    };

    let output_dir = output.map(|p| p.to_path_buf()).unwrap_or_else(|| {
        let stem = input.file_stem().unwrap_or_default().to_string_lossy();
        PathBuf::from(format!("{}_{}", stem, label))
    });
    fs::create_dir_all(&output_dir)?;

    let pb = ProgressBar::new(count as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );
    pb.set_message("Rendering pages...");

    let result = match mode {
        ExtractMode::Chapter => {
            extractor.extract_segment_with_progress(Some(&doc), index, |done, _| {
                pb.set_position(done as u64)
            })
        }
        ExtractMode::SinglePage => extractor.extract_single_page(Some(&doc), index),
    };

    let images = match result {
        Ok(images) => images,
        Err(Error::ExtractionAborted {
            page: failed,
            source,
            rendered,
        }) => {
            pb.abandon_with_message("Aborted");
            let written = write_pages(&output_dir, first_page, &rendered)?;
            println!(
                "{} kept {} pages in {}",
                "Partial:".yellow(),
                written,
                output_dir.display()
            );
            return Err(format!("Page {} failed to render: {}", failed + 1, source).into());
        }
        Err(e) => {
            pb.abandon();
            return Err(e.into());
        }
    };

    pb.set_message("Writing PNG files...");
    let written = write_pages(&output_dir, first_page, &images)?;
    pb.finish_with_message("Done!");

    println!(
        "\n{} {} pages written to {}",
        "Done!".green().bold(),
        written,
        output_dir.display()
    );

    Ok(())
}

/// Write images as page_XXXX.png, numbered by 1-based document page.
fn write_pages(dir: &Path, first_page: u32, images: &[RasterImage]) -> Result<usize, Error> {
    for (page, image) in (first_page..).zip(images) {
        let path = dir.join(format!("page_{:04}.png", page + 1));
        fs::write(&path, image.to_png()?)?;
        log::debug!("Wrote {}", path.display());
    }
    Ok(images.len())
}

fn cmd_context(input: &Path, page: u32, options: ExtractOptions) -> CliResult {
    let doc = open_renderable(input)?;
    let index = page_index(page, doc.total_pages())?;
    let mode = options.mode;

    let images = ContentExtractor::new(options).extract(Some(&doc), index)?;
    let message = ConversationMessage::context(mode, &images)?;

    println!("{}", serde_json::to_string_pretty(&message)?);
    Ok(())
}

/// Pick the chapter named on the command line, by page or by number.
fn select_segment<B: PdfBackend>(
    doc: &LoadedDocument<B>,
    page: Option<u32>,
    chapter: Option<usize>,
) -> Result<&Segment, Box<dyn std::error::Error>> {
    if let Some(number) = chapter {
        let count = doc.segments().len();
        return number
            .checked_sub(1)
            .and_then(|i| doc.segments().get(i))
            .ok_or_else(|| {
                format!("Chapter {} not found (document has {} chapters)", number, count).into()
            });
    }

    let index = page_index(page.unwrap_or(1), doc.total_pages())?;
    Ok(doc
        .segment_at(index)
        .ok_or(Error::PageNotInAnySegment { page: index })?)
}

fn cmd_text(input: &Path, page: Option<u32>, chapter: Option<usize>) -> CliResult {
    let doc = pdfchapter::open_file(input)?;
    let segment = select_segment(&doc, page, chapter)?;

    eprintln!(
        "{} {}",
        segment.title.bold(),
        format!("(pages {})", segment.display_range()).dimmed()
    );
    print!("{}", doc.backend().segment_text(segment)?);
    Ok(())
}

fn cmd_info(input: &Path) -> CliResult {
    let backend = LopdfBackend::load_file(input)?;
    let outline_size = match backend.outline() {
        Ok(outline) => outline.len().to_string(),
        Err(e) => format!("unreadable ({})", e),
    };
    let version = backend.version().to_string();
    let encrypted = backend.is_encrypted();
    let doc = LoadedDocument::load(backend);

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: PDF {}", "Format".bold(), version);
    println!("{}: {}", "Pages".bold(), doc.total_pages());
    println!(
        "{}: {}",
        "Encrypted".bold(),
        if encrypted { "Yes" } else { "No" }
    );
    println!("{}: {}", "Bookmarks".bold(), outline_size);
    println!("{}: {}", "Chapters".bold(), doc.segments().len());

    if let Some(largest) = doc.segments().iter().max_by_key(|s| s.page_count()) {
        println!(
            "{}: {} ({} pages)",
            "Largest chapter".bold(),
            largest.title,
            largest.page_count()
        );
    }

    Ok(())
}

fn cmd_version() {
    println!(
        "{} {}",
        "pdfchapter".cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!("Chapter-aware PDF page extraction tool");
    println!();
    println!(
        "Rendering: {}",
        if cfg!(feature = "mupdf") {
            "MuPDF"
        } else {
            "unavailable (build with --features mupdf)"
        }
    );
    println!("License: MIT");
}
