//! penpolish CLI - article export and AI writing analysis

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use colored::{ColoredString, Colorize};
use indicatif::{ProgressBar, ProgressStyle};

use penpolish::analysis::{render_outline, AnalysisResult, TreeLayout};
use penpolish::{AiSettings, ExportFormat, ExportedFile, Penpolish, Provider, SettingsStore};

type CliResult = Result<(), Box<dyn std::error::Error>>;

const POLISHED_DOCX_NAME: &str = "polished.docx";

#[derive(Parser)]
#[command(name = "penpolish")]
#[command(version)]
#[command(about = "Export markdown articles to DOCX and get AI writing feedback", long_about = None)]
struct Cli {
    /// Input markdown file
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
    /// Export a markdown file with inline images
    Export {
        /// Input markdown file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Output file name (extension added when missing)
        #[arg(long)]
        name: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "docx")]
        format: FormatArg,

        /// Maximum displayed image width in pixels
        #[arg(long, value_name = "PX")]
        max_width: Option<u32>,

        /// Document title
        #[arg(long)]
        title: Option<String>,

        /// Normalize text to Unicode NFC
        #[arg(long)]
        nfc: bool,

        /// Timeout for each remote image request, in seconds
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,
    },

    /// Analyze an article with the configured AI provider
    Analyze {
        /// Input markdown file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Article title (defaults to the file name)
        #[arg(long)]
        title: Option<String>,

        /// Provider to use instead of the configured one
        #[arg(long, value_enum)]
        provider: Option<ProviderArg>,

        /// Model to use instead of the configured one
        #[arg(long)]
        model: Option<String>,

        /// API key to use instead of the configured one
        #[arg(long, env = "PENPOLISH_API_KEY", hide_env_values = true)]
        api_key: Option<String>,

        /// Base URL of a proxy or compatible endpoint
        #[arg(long)]
        base_url: Option<String>,

        /// Print the raw result as JSON
        #[arg(long)]
        json: bool,

        /// Write the logic-structure tree as SVG
        #[arg(long, value_name = "FILE")]
        tree_svg: Option<PathBuf>,

        /// Width of the SVG tree in pixels
        #[arg(long, default_value = "960")]
        tree_width: f64,

        /// Write the polished article
        #[arg(long, value_name = "FILE")]
        polished: Option<PathBuf>,

        /// Export the polished article to Word, with its images embedded
        #[arg(long, value_name = "FILE")]
        polished_docx: Option<PathBuf>,
    },

    /// Show or change the stored provider settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the current settings
    Show,

    /// Print the settings file location
    Path,

    /// Update settings
    Set {
        /// Provider (switching resets model and base URL to its defaults)
        #[arg(long, value_enum)]
        provider: Option<ProviderArg>,

        #[arg(long)]
        api_key: Option<String>,

        #[arg(long)]
        model: Option<String>,

        #[arg(long)]
        base_url: Option<String>,
    },

    /// Restore default settings
    Reset,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    /// Word document
    Docx,
    /// Plain text
    Text,
    /// Document model as JSON
    Json,
}

impl From<FormatArg> for ExportFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Docx => ExportFormat::Docx,
            FormatArg::Text => ExportFormat::Text,
            FormatArg::Json => ExportFormat::Json,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum ProviderArg {
    /// Google Gemini
    Gemini,
    /// OpenAI or a compatible endpoint
    Openai,
}

impl From<ProviderArg> for Provider {
    fn from(provider: ProviderArg) -> Self {
        match provider {
            ProviderArg::Gemini => Provider::Gemini,
            ProviderArg::Openai => Provider::OpenAi,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Export {
            input,
            output,
            name,
            format,
            max_width,
            title,
            nfc,
            timeout,
        }) => {
            let mut builder = Penpolish::new().with_format(format.into());
            if let Some(width) = max_width {
                builder = builder.with_max_image_width(width);
            }
            if let Some(title) = title {
                builder = builder.with_title(title);
            }
            if nfc {
                builder = builder.with_nfc();
            }
            if let Some(secs) = timeout {
                builder = builder.with_timeout(Duration::from_secs(secs));
            }
            cmd_export(builder, &input, output.as_deref(), name.as_deref())
        }
        Some(Commands::Analyze {
            input,
            title,
            provider,
            model,
            api_key,
            base_url,
            json,
            tree_svg,
            tree_width,
            polished,
            polished_docx,
        }) => {
            let overrides = SettingsOverrides {
                provider: provider.map(Into::into),
                api_key,
                model,
                base_url,
            };
            let outputs = AnalyzeOutputs {
                json,
                tree_svg,
                tree_width,
                polished,
                polished_docx,
            };
            cmd_analyze(&input, title.as_deref(), overrides, &outputs)
        }
        Some(Commands::Config { action }) => cmd_config(action),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: export to DOCX if input is provided
            if let Some(input) = cli.input {
                cmd_export(Penpolish::new(), &input, cli.output.as_deref(), None)
            } else {
                println!("{}", "Usage: penpolish <FILE> [OUTPUT]".yellow());
                println!("       penpolish --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn spinner(message: &'static str) -> Result<ProgressBar, Box<dyn std::error::Error>> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}

fn cmd_export(
    builder: Penpolish,
    input: &Path,
    output: Option<&Path>,
    name: Option<&str>,
) -> CliResult {
    let markdown = fs::read_to_string(input)?;
    let stem = input
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .into_owned();
    let filename = name.map(str::to_string).unwrap_or(stem);

    let mut builder = builder;
    if builder.options().base_dir.is_none() {
        if let Some(parent) = input.parent() {
            builder = builder.with_base_dir(parent);
        }
    }

    let pb = spinner("Loading images and building document...")?;
    let rt = tokio::runtime::Runtime::new()?;
    let file = rt.block_on(builder.export(&markdown, &filename));
    let file = match file {
        Ok(file) => file,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e.into());
        }
    };

    let output_dir = output
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."));
    let path = file.save_to(&output_dir)?;
    pb.finish_with_message("Done!");

    let stats = &file.stats;
    println!("{} {}", "Saved to".green(), path.display());
    println!(
        "  {} paragraphs, {} words, {} image(s) embedded",
        stats.paragraph_count, stats.word_count, stats.embedded_image_count
    );
    if stats.missing_image_count > 0 {
        println!(
            "  {} {} image(s) could not be loaded and were replaced by markers",
            "Warning:".yellow().bold(),
            stats.missing_image_count
        );
    }

    Ok(())
}

struct SettingsOverrides {
    provider: Option<Provider>,
    api_key: Option<String>,
    model: Option<String>,
    base_url: Option<String>,
}

impl SettingsOverrides {
    fn apply(self, settings: &mut AiSettings) {
        if let Some(provider) = self.provider {
            settings.switch_provider(provider);
        }
        if let Some(api_key) = self.api_key {
            settings.api_key = api_key;
        }
        if let Some(model) = self.model {
            settings.model = model;
        }
        if let Some(base_url) = self.base_url {
            settings.base_url = base_url;
        }
    }
}

struct AnalyzeOutputs {
    json: bool,
    tree_svg: Option<PathBuf>,
    tree_width: f64,
    polished: Option<PathBuf>,
    polished_docx: Option<PathBuf>,
}

fn cmd_analyze(
    input: &Path,
    title: Option<&str>,
    overrides: SettingsOverrides,
    outputs: &AnalyzeOutputs,
) -> CliResult {
    let content = fs::read_to_string(input)?;
    let title = title.map(str::to_string).unwrap_or_else(|| {
        input
            .file_stem()
            .unwrap_or_default()
            .to_string_lossy()
            .into_owned()
    });

    let mut settings = SettingsStore::default_location()?.load();
    overrides.apply(&mut settings);
    log::debug!(
        "Using {} with model {}",
        settings.provider.name(),
        settings.effective_model()
    );

    let pb = spinner("Analyzing article...")?;
    let rt = tokio::runtime::Runtime::new()?;
    let result = rt.block_on(Penpolish::new().analyze(&title, &content, &settings));
    pb.finish_and_clear();
    let result = result?;

    if outputs.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_analysis(&result);
    }

    if let Some(path) = &outputs.tree_svg {
        let layout = TreeLayout::for_width(&result.structure, outputs.tree_width);
        fs::write(path, layout.to_svg())?;
        println!("{} {}", "Tree saved to".green(), path.display());
    }
    if let Some(path) = &outputs.polished {
        fs::write(path, &result.polished_content)?;
        println!("{} {}", "Polished text saved to".green(), path.display());
    }
    if let Some(target) = &outputs.polished_docx {
        let pb = spinner("Exporting polished article...")?;
        let saved = rt.block_on(export_polished_docx(
            &result.polished_content,
            input.parent(),
            target,
        ));
        pb.finish_and_clear();
        let (path, file) = saved?;
        println!("{} {}", "Polished article saved to".green(), path.display());
        if file.stats.missing_image_count > 0 {
            println!(
                "  {} {} image(s) could not be loaded and were replaced by markers",
                "Warning:".yellow().bold(),
                file.stats.missing_image_count
            );
        }
    }

    Ok(())
}

/// Run polished text through the DOCX export pipeline and save it at `target`.
///
/// Relative image paths resolve against the source article's directory.
async fn export_polished_docx(
    content: &str,
    base_dir: Option<&Path>,
    target: &Path,
) -> Result<(PathBuf, ExportedFile), Box<dyn std::error::Error>> {
    let filename = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| POLISHED_DOCX_NAME.to_string());
    let dir = target
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    let mut builder = Penpolish::new().with_format(ExportFormat::Docx);
    if let Some(base) = base_dir.filter(|p| !p.as_os_str().is_empty()) {
        builder = builder.with_base_dir(base);
    }
    let file = builder.export(content, &filename).await?;
    let path = file.save_to(&dir)?;
    Ok((path, file))
}

fn score(value: f64) -> ColoredString {
    let text = format!("{:.0}", value);
    if value >= 80.0 {
        text.green().bold()
    } else if value >= 60.0 {
        text.yellow().bold()
    } else {
        text.red().bold()
    }
}

fn heading(title: &str) {
    println!();
    println!("{}", title.cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
}

/// Where a correction applies, quoted; `None` when the model gave no snippet.
fn snippet_line(snippet: &str) -> Option<String> {
    let snippet = snippet.trim();
    (!snippet.is_empty()).then(|| format!("at \"{}\"", snippet))
}

fn print_analysis(result: &AnalysisResult) {
    let s = &result.scores;
    heading("Scores");
    println!("{}: {}", "Total".bold(), score(s.total));
    println!(
        "Readability {}  Logic {}  Emotion {}  Creativity {}",
        score(s.readability),
        score(s.logic),
        score(s.emotion),
        score(s.creativity)
    );

    heading("Summary");
    println!("{}", result.summary);
    println!("{}: {}", "Tone".bold(), result.tone_analysis);
    println!("{}: {}", "Keywords".bold(), result.keywords.join(", "));

    heading(&format!("Corrections ({})", result.corrections.len()));
    for (i, c) in result.corrections.iter().enumerate() {
        println!(
            "{:>3}. [{}] {} → {}",
            i + 1,
            c.kind.as_str().magenta(),
            c.original.red(),
            c.suggestion.green()
        );
        println!("     {}", c.reason.dimmed());
        if let Some(line) = snippet_line(&c.location_snippet) {
            println!("     {}", line.italic());
        }
    }

    let t = &result.title_analysis;
    heading("Title");
    println!(
        "{}: {} ({} viral potential)",
        "Score".bold(),
        score(t.score),
        t.viral_potential.as_str()
    );
    println!("{}", t.critique);
    for suggestion in &t.suggestions {
        println!("  {} {}", "•".dimmed(), suggestion);
    }
    if !t.examples.is_empty() {
        println!("{}", "Alternatives:".bold());
        for example in &t.examples {
            println!("  {} {}", "•".dimmed(), example);
        }
    }

    heading("Structure");
    print!("{}", render_outline(&result.structure));
}

fn cmd_config(action: ConfigAction) -> CliResult {
    let store = SettingsStore::default_location()?;

    match action {
        ConfigAction::Show => {
            let settings = store.load();
            println!("{}", "AI Settings".cyan().bold());
            println!("{}", "─".repeat(40).dimmed());
            println!("{}: {}", "Provider".bold(), settings.provider);
            println!("{}: {}", "Model".bold(), settings.effective_model());
            println!(
                "{}: {}",
                "Base URL".bold(),
                if settings.base_url.is_empty() {
                    "(default)"
                } else {
                    settings.base_url.as_str()
                }
            );
            println!(
                "{}: {}",
                "API key".bold(),
                if settings.has_api_key() {
                    settings.masked_api_key().normal()
                } else {
                    "not set".yellow()
                }
            );
        }
        ConfigAction::Path => {
            println!("{}", store.path().display());
        }
        ConfigAction::Set {
            provider,
            api_key,
            model,
            base_url,
        } => {
            let mut settings = store.load();
            SettingsOverrides {
                provider: provider.map(Into::into),
                api_key,
                model,
                base_url,
            }
            .apply(&mut settings);
            store.save(&settings)?;
            println!("{} {}", "Saved to".green(), store.path().display());
        }
        ConfigAction::Reset => {
            store.reset()?;
            println!("{}", "Settings reset to defaults".green());
        }
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "penpolish".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Markdown-to-DOCX export and AI writing analysis");
    println!();
    println!("License: MIT");
}
