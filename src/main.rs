//! Document redaction CLI.
//!
//! Parses a document, detects sensitive items and writes a redacted text copy.
//! The `extract`, `analyze` and `formats` subcommands expose the individual
//! stages for inspection.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use docscrub::{
    Exporter, FileExporter, InputFile, ParsedDocument, ParserRegistry, RedactionEngine,
    RedactionMethod, RedactionOptions, SensitiveDataAnalyzer, SensitiveItem,
};

/// Document Redaction Tool
///
/// Detect and redact personal information in PDF, office, spreadsheet,
/// HTML, Markdown and text documents. By default, performs redaction.
#[derive(Parser)]
#[command(name = "docscrub")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Input document path
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Directory for the redacted copy (defaults to the input's directory)
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Redaction method: replace, asterisks or blackout
    #[arg(short, long, value_name = "METHOD", default_value = "replace")]
    method: RedactionMethod,

    /// Marker used by the replace method
    #[arg(long, value_name = "TEXT", default_value = docscrub::redaction::DEFAULT_REPLACEMENT)]
    replacement: String,

    /// Make each replacement as long as the text it replaces
    #[arg(long)]
    preserve_length: bool,

    /// Match detected text case-sensitively
    #[arg(long)]
    case_sensitive: bool,

    /// Also match inside longer words
    #[arg(long)]
    no_whole_word: bool,

    /// Extra literal text to redact everywhere (can be specified multiple times)
    #[arg(short, long, value_name = "PATTERN")]
    pattern: Vec<String>,

    /// Redact detected items at or above this confidence instead of the default selection
    #[arg(long, value_name = "SCORE", conflicts_with = "all")]
    min_confidence: Option<f64>,

    /// Redact every detected item
    #[arg(long)]
    all: bool,

    /// Keep name matches that contain common words
    #[arg(long, global = true)]
    no_common_word_filter: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the sections a document parses into
    Extract {
        /// Input document path
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Write the assembled text to this file instead of listing sections
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// List the sensitive items detected in a document
    Analyze {
        /// Input document path
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Print items as JSON
        #[arg(long)]
        json: bool,
    },

    /// List supported file extensions
    Formats,
}

/// Which detected items get redacted.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Selection {
    Default,
    All,
    MinConfidence(f64),
}

/// Redaction command handler with dependency injection.
struct RedactionHandler {
    registry: ParserRegistry,
    analyzer: SensitiveDataAnalyzer,
    engine: RedactionEngine,
    verbose: bool,
}

impl RedactionHandler {
    /// Creates a handler with every built-in parser registered.
    fn new(filter_common_words: bool, verbose: bool) -> Self {
        let mut analyzer = SensitiveDataAnalyzer::new();
        analyzer.set_common_word_filtering(filter_common_words);
        Self {
            registry: ParserRegistry::with_default_parsers(),
            analyzer,
            engine: RedactionEngine::new(),
            verbose,
        }
    }

    fn parse(&self, input: &Path) -> Result<ParsedDocument> {
        if !input.exists() {
            anyhow::bail!("Input file does not exist: {}", input.display());
        }

        let file = InputFile::from_path(input)
            .with_context(|| format!("Failed to read {}", input.display()))?;
        if !self.registry.has_parser_for_file(&file) {
            anyhow::bail!(
                "Unsupported file type: {} (supported: {})",
                input.display(),
                self.registry.supported_file_types()
            );
        }

        self.registry
            .parse_file(&file)
            .with_context(|| format!("Failed to parse {}", input.display()))
    }

    /// Executes a redaction operation.
    fn redact(
        &self,
        input: &Path,
        output_dir: &Path,
        options: &RedactionOptions,
        selection: Selection,
        patterns: &[String],
    ) -> Result<()> {
        let document = self.parse(input)?;
        let detected = self.analyzer.analyze(&document);
        let detected_count = detected.len();
        let items = select_items(detected, selection, patterns);

        if self.verbose {
            println!("Input:   {}", input.display());
            println!("Output:  {}", output_dir.display());
            println!("Sections: {}", document.sections.len());
            println!("Detected: {} item(s), {} selected", detected_count, items.len());
        }

        if items.is_empty() {
            println!("⚠ No items selected for redaction");
            return Ok(());
        }

        let (redacted, report) = self.engine.apply_with_report(&document, &items, options);

        if self.verbose {
            println!("\nRedaction Summary:");
            println!("  Sections processed: {}", report.sections_processed);
            println!("  Sections modified:  {}", report.sections_modified);
            println!("  Instances redacted: {}", report.instances_redacted);
        }

        let path = FileExporter::new(output_dir)
            .export(&redacted)
            .with_context(|| "Export failed")?;

        if report.has_redactions() {
            println!(
                "✓ Successfully redacted {} instance(s) → {}",
                report.instances_redacted,
                path.display()
            );
        } else {
            println!("⚠ No instances found to redact → {}", path.display());
        }

        Ok(())
    }

    /// Prints or saves the parsed sections.
    fn extract(&self, input: &Path, output: Option<&Path>) -> Result<()> {
        let document = self.parse(input)?;

        if let Some(output_path) = output {
            std::fs::write(output_path, &document.content)
                .with_context(|| format!("Failed to write to {}", output_path.display()))?;
            println!(
                "✓ Extracted {} section(s) → {}",
                document.sections.len(),
                output_path.display()
            );
        } else {
            for section in &document.sections {
                println!("[{}] {}", section.kind, section.content);
            }
        }

        Ok(())
    }

    /// Prints detected items.
    fn analyze(&self, input: &Path, json: bool) -> Result<()> {
        let document = self.parse(input)?;
        let items = self.analyzer.analyze(&document);

        if json {
            let rendered =
                serde_json::to_string_pretty(&items).context("Failed to serialize items")?;
            println!("{rendered}");
            return Ok(());
        }

        if items.is_empty() {
            println!("No sensitive items found");
            return Ok(());
        }

        for item in &items {
            println!(
                "{} {:.2} {:<12} {} ({}x)",
                if item.selected { "✓" } else { " " },
                item.confidence,
                item.category.as_str(),
                item.text,
                item.positions.len()
            );
        }

        Ok(())
    }

    fn formats(&self) {
        for ext in self.registry.supported_extensions() {
            println!("{ext}");
        }
    }
}

/// Picks the items to redact and appends custom patterns.
fn select_items(
    detected: Vec<SensitiveItem>,
    selection: Selection,
    patterns: &[String],
) -> Vec<SensitiveItem> {
    let mut items: Vec<SensitiveItem> = detected
        .into_iter()
        .filter(|item| match selection {
            Selection::Default => item.selected,
            Selection::All => true,
            Selection::MinConfidence(min) => item.confidence >= min,
        })
        .collect();

    items.extend(
        patterns
            .iter()
            .filter(|p| !p.is_empty())
            .map(|p| SensitiveItem::custom(p.as_str())),
    );
    items
}

fn build_selection(all: bool, min_confidence: Option<f64>) -> Result<Selection> {
    match (all, min_confidence) {
        (true, _) => Ok(Selection::All),
        (false, Some(min)) if (0.0..=1.0).contains(&min) => Ok(Selection::MinConfidence(min)),
        (false, Some(min)) => anyhow::bail!("--min-confidence must be between 0 and 1, got {min}"),
        (false, None) => Ok(Selection::Default),
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let handler = RedactionHandler::new(!cli.no_common_word_filter, cli.verbose);

    match &cli.command {
        Some(Commands::Extract { input, output }) => {
            handler.extract(input, output.as_deref())?;
        }
        Some(Commands::Analyze { input, json }) => {
            handler.analyze(input, *json)?;
        }
        Some(Commands::Formats) => handler.formats(),
        None => {
            // Default: redaction mode
            let input = cli
                .input
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("--input is required"))?;
            let output_dir = match &cli.output_dir {
                Some(dir) => dir.clone(),
                None => input
                    .parent()
                    .filter(|p| !p.as_os_str().is_empty())
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| PathBuf::from(".")),
            };

            let options = RedactionOptions::default()
                .with_method(cli.method)
                .with_replacement_text(cli.replacement.clone())
                .with_preserve_length(cli.preserve_length)
                .with_case_sensitive(cli.case_sensitive)
                .with_whole_word(!cli.no_whole_word);
            let selection = build_selection(cli.all, cli.min_confidence)?;

            handler.redact(input, &output_dir, &options, selection, &cli.pattern)?;
        }
    }

    Ok(())
}
