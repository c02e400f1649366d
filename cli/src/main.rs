//! pdfstruct CLI - structural inference over PDF primitive dumps

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;

use pdfstruct::{parse_dump_file_with_options, Document, JsonFormat, ParseOptions, RenderOptions, TreeStyle};

#[derive(Parser)]
#[command(name = "pdfstruct")]
#[command(version)]
#[command(about = "Infer sections, content and tables from PDF primitive dumps", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a dump to structured JSON
    Json {
        /// Primitive dump file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },

    /// Convert a dump to Markdown
    #[command(alias = "md")]
    Markdown {
        /// Primitive dump file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Include YAML frontmatter
        #[arg(short, long)]
        frontmatter: bool,

        /// Emit a table of contents
        #[arg(long)]
        toc: bool,

        /// Deepest level listed in the table of contents
        #[arg(long, default_value = "3")]
        toc_depth: usize,

        /// Table rendering mode
        #[arg(long, value_enum, default_value = "markdown")]
        table_mode: TableMode,

        /// Maximum heading level (1-6)
        #[arg(long, default_value = "6")]
        max_heading: u8,

        /// Hide page numbers under headings
        #[arg(long)]
        no_pages: bool,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },

    /// Print the section outline
    Tree {
        /// Primitive dump file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Use box-drawing characters
        #[arg(long)]
        unicode: bool,

        /// Hide page numbers
        #[arg(long)]
        no_pages: bool,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },

    /// Show document information and statistics
    Info {
        /// Primitive dump file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print statistics as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },
}

/// Flags shared by every subcommand that runs the pipeline.
#[derive(Args)]
struct PipelineArgs {
    /// Ignore the embedded outline and infer headings from typography
    #[arg(long)]
    no_toc: bool,

    /// Skip table detection
    #[arg(long)]
    no_tables: bool,

    /// Process pages on a single thread
    #[arg(long)]
    sequential: bool,

    /// Minimum heading size relative to body text
    #[arg(long, value_name = "RATIO")]
    heading_ratio: Option<f32>,

    /// Maximum heading depth for inferred headings
    #[arg(long, value_name = "N")]
    max_depth: Option<u8>,

    /// Vector primitives per page above which bordered detection is skipped
    #[arg(long, value_name = "N")]
    table_cap: Option<usize>,
}

impl PipelineArgs {
    fn to_options(&self) -> ParseOptions {
        let mut options = ParseOptions::new()
            .with_toc(!self.no_toc)
            .with_tables(!self.no_tables)
            .with_parallel(!self.sequential);

        if let Some(ratio) = self.heading_ratio {
            options = options.with_heading_size_ratio(ratio);
        }
        if let Some(depth) = self.max_depth {
            options = options.with_max_heading_depth(depth);
        }
        if let Some(cap) = self.table_cap {
            options = options.with_table_candidate_cap(cap);
        }
        options
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum TableMode {
    /// Standard Markdown tables
    Markdown,
    /// HTML tables when cells are merged
    Html,
}

impl From<TableMode> for pdfstruct::TableFallback {
    fn from(mode: TableMode) -> Self {
        match mode {
            TableMode::Markdown => pdfstruct::TableFallback::Markdown,
            TableMode::Html => pdfstruct::TableFallback::Html,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Json {
            input,
            output,
            compact,
            pipeline,
        } => cmd_json(&input, output.as_deref(), compact, &pipeline),
        Commands::Markdown {
            input,
            output,
            frontmatter,
            toc,
            toc_depth,
            table_mode,
            max_heading,
            no_pages,
            pipeline,
        } => {
            let render_options = RenderOptions::new()
                .with_frontmatter(frontmatter)
                .with_toc(toc)
                .with_toc_depth(toc_depth)
                .with_table_fallback(table_mode.into())
                .with_max_heading(max_heading)
                .with_page_numbers(!no_pages);
            cmd_markdown(&input, output.as_deref(), &render_options, &pipeline)
        }
        Commands::Tree {
            input,
            unicode,
            no_pages,
            pipeline,
        } => cmd_tree(&input, unicode, no_pages, &pipeline),
        Commands::Info { input, json, pipeline } => cmd_info(&input, json, &pipeline),
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn load(input: &Path, pipeline: &PipelineArgs) -> pdfstruct::Result<Document> {
    log::debug!("loading {}", input.display());
    let doc = parse_dump_file_with_options(input, pipeline.to_options())?;
    if !doc.warnings.is_empty() {
        eprintln!("{} {} warning(s)", "Parsed with".yellow(), doc.warnings.len());
    }
    Ok(doc)
}

fn write_output(output: Option<&Path>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn cmd_json(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
    pipeline: &PipelineArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = load(input, pipeline)?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let json = pdfstruct::render::to_json(&doc, format)?;
    write_output(output, &json)
}

fn cmd_markdown(
    input: &Path,
    output: Option<&Path>,
    render_options: &RenderOptions,
    pipeline: &PipelineArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = load(input, pipeline)?;
    let markdown = pdfstruct::render::to_markdown(&doc, render_options)?;
    write_output(output, &markdown)
}

fn cmd_tree(input: &Path, unicode: bool, no_pages: bool, pipeline: &PipelineArgs) -> Result<(), Box<dyn std::error::Error>> {
    let doc = load(input, pipeline)?;

    let style = if unicode { TreeStyle::Unicode } else { TreeStyle::Ascii };
    let options = RenderOptions::new()
        .with_tree_style(style)
        .with_page_numbers(!no_pages);

    print!("{}", pdfstruct::render::to_tree(&doc, &options));
    Ok(())
}

fn cmd_info(input: &Path, json: bool, pipeline: &PipelineArgs) -> Result<(), Box<dyn std::error::Error>> {
    let doc = load(input, pipeline)?;
    let stats = doc.stats();

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Title".bold(), doc.title);
    println!("{}: {}", "Pages".bold(), doc.page_count);

    if let Some(ref author) = doc.metadata.author {
        println!("{}: {}", "Author".bold(), author);
    }
    if let Some(ref creator) = doc.metadata.creator {
        println!("{}: {}", "Creator".bold(), creator);
    }
    if let Some(ref producer) = doc.metadata.producer {
        println!("{}: {}", "Producer".bold(), producer);
    }
    if let Some(ref created) = doc.metadata.created {
        println!("{}: {}", "Created".bold(), created);
    }
    if let Some(ref modified) = doc.metadata.modified {
        println!("{}: {}", "Modified".bold(), modified);
    }

    println!();
    println!("{}", "Structure".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "Sections".bold(), stats.section_count);
    println!("{}: {}", "Max depth".bold(), stats.max_depth);
    println!("{}: {}", "Blocks".bold(), stats.block_count);
    println!("{}: {}", "Tables".bold(), stats.table_count);
    println!("{}: {}", "Spans".bold(), stats.span_count);

    if !doc.warnings.is_empty() {
        println!();
        println!("{}", "Warnings".yellow().bold());
        println!("{}", "─".repeat(40).dimmed());
        for warning in &doc.warnings {
            println!("  {}", warning);
        }
    }

    Ok(())
}
