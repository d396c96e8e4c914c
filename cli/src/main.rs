use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

use testgen_export::{export_csv, export_json};
use testgen_generation::{generate_test_suite, GenerateOptions, OllamaClient};

#[derive(Parser)]
#[command(name = "testgen")]
#[command(about = "Generate QA test cases from feature documentation using a local LLM", long_about = None)]
#[command(version)]
struct Cli {
    /// Feature documentation to read (.txt, .md, or .pdf)
    input: PathBuf,

    /// Directory the exported files are written to
    #[arg(long, default_value = "output")]
    output_dir: PathBuf,

    /// Export format(s) to write
    #[arg(long, value_enum, default_value = "both")]
    format: Format,

    /// Ollama model to prompt
    #[arg(long, env = "TESTGEN_MODEL", default_value = "llama3.1:8b")]
    model: String,

    /// Base URL of the Ollama endpoint
    #[arg(long, env = "TESTGEN_API_URL", default_value = "http://localhost:11434")]
    api_url: String,

    /// Maximum chunk length in characters
    #[arg(long, default_value_t = 800)]
    chunk_size: usize,

    /// Characters shared between consecutive chunks
    #[arg(long, default_value_t = 100)]
    overlap: usize,

    /// Retries per chunk after the first attempt
    #[arg(long, default_value_t = 2)]
    max_retries: usize,

    /// Maximum test cases requested per chunk
    #[arg(long, default_value_t = 8)]
    max_cases: usize,

    /// Token cap per completion
    #[arg(long, default_value_t = 1200)]
    num_predict: u32,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 120)]
    timeout_secs: u64,

    /// Condense each chunk into bullet-point facts before generation
    #[arg(long)]
    condense: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Csv,
    Both,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let client = OllamaClient::new(cli.api_url.clone(), Duration::from_secs(cli.timeout_secs));
    let opts = GenerateOptions {
        model: cli.model.clone(),
        chunk_size: cli.chunk_size,
        overlap: cli.overlap,
        max_retries: cli.max_retries,
        max_cases_per_chunk: cli.max_cases,
        num_predict: cli.num_predict,
        temperature: None,
        condense: cli.condense,
    };

    info!(input = %cli.input.display(), model = %cli.model, "starting generation");
    let suite = generate_test_suite(&client, &cli.input, &opts)
        .await
        .with_context(|| format!("failed to generate test cases from {}", cli.input.display()))?;
    info!(cases = suite.test_cases.len(), "generation complete");

    let stem = cli
        .input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("test_suite");

    if matches!(cli.format, Format::Json | Format::Both) {
        let out = cli.output_dir.join(format!("{stem}_test_cases.json"));
        export_json(&suite, &out)
            .with_context(|| format!("failed to export JSON to {}", out.display()))?;
        println!("Wrote {}", out.display());
    }

    if matches!(cli.format, Format::Csv | Format::Both) {
        let out = cli.output_dir.join(format!("{stem}_test_cases.csv"));
        export_csv(&suite, &out)
            .with_context(|| format!("failed to export CSV to {}", out.display()))?;
        println!("Wrote {}", out.display());
    }

    Ok(())
}
