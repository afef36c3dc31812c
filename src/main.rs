use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use slidesmith_core::{Config, DocumentInput, GenerationRequest, Pipeline};
use slidesmith_genai::PresentationPattern;

#[derive(Debug, Parser)]
#[command(
    name = "slidesmith",
    version,
    about = "Generate a search-grounded slide deck from a topic or document"
)]
struct Cli {
    /// Topic to build the deck around.
    #[arg(long)]
    topic: Option<String>,

    /// Document to use as the primary source (pdf, docx, pptx, xlsx, csv, txt, md).
    #[arg(long)]
    file: Option<PathBuf>,

    /// Presentation style: standard, data-analysis, visual, anatomy, process.
    #[arg(long, default_value = "standard")]
    pattern: String,

    /// Path to the TOML config file.
    #[arg(long, default_value = "slidesmith.toml")]
    config: PathBuf,

    /// Write the result JSON here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;
    let pipeline = Pipeline::new(&config)?;

    let document = cli
        .file
        .as_deref()
        .map(DocumentInput::from_path)
        .transpose()?;
    let request = GenerationRequest {
        topic: cli.topic,
        document,
        pattern: PresentationPattern::from_name(&cli.pattern),
    };

    let result = pipeline.run(request).await?;

    if result.is_empty() {
        // Valid run, empty deck: guidance rather than a failure trace.
        eprintln!("The model produced no slides. Try a different topic or document.");
        std::process::exit(2);
    }

    let json = serde_json::to_string_pretty(&result)?;
    match cli.out {
        Some(path) => {
            std::fs::write(&path, json)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(slides = result.slides.len(), path = %path.display(), "deck written");
        }
        None => println!("{json}"),
    }

    Ok(())
}
