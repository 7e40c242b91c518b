mod config;

use anyhow::Context as _;
use clap::{Parser, ValueEnum};
use std::io::Write as _;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use unrelated_apigw_integration::document::{
    DocumentFormat, apply_to_document, load_document, render_document,
};

/// Enrich a Swagger 2.0 document with `x-amazon-apigateway-integration` blocks.
#[derive(Debug, Parser)]
#[command(name = "unrelated-apigw-swagger", version, about)]
struct Cli {
    /// Swagger 2.0 document to enrich (JSON or YAML).
    #[arg(long, short, env = "APIGW_INPUT")]
    input: PathBuf,

    /// Integration config file (defaults to `$XDG_CONFIG_HOME/unrelated/apigw-swagger.yaml` if present).
    #[arg(long, short, env = "APIGW_CONFIG")]
    config: Option<PathBuf>,

    /// Backend base URL; overrides `backendBaseUrl` from the config file.
    #[arg(long, env = "APIGW_BACKEND_BASE_URL")]
    backend_base_url: Option<String>,

    /// Output file (stdout if omitted).
    #[arg(long, short, env = "APIGW_OUTPUT")]
    output: Option<PathBuf>,

    /// Output format (defaults to the output file's extension, else the input's).
    #[arg(long, value_enum, env = "APIGW_FORMAT")]
    format: Option<OutputFormat>,

    /// Do not add mock OPTIONS operations to paths that lack one.
    #[arg(long, env = "APIGW_NO_PREFLIGHT")]
    no_preflight: bool,

    /// Log filter used when `RUST_LOG` is not set.
    #[arg(long, env = "APIGW_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Emit logs as JSON.
    #[arg(long, env = "APIGW_LOG_JSON")]
    log_json: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

impl From<OutputFormat> for DocumentFormat {
    fn from(f: OutputFormat) -> Self {
        match f {
            OutputFormat::Json => DocumentFormat::Json,
            OutputFormat::Yaml => DocumentFormat::Yaml,
        }
    }
}

fn init_tracing(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.log_json);
    run(&cli)
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let mut settings = config::load(cli.config.as_deref())?
        .into_settings(cli.backend_base_url.as_deref())
        .context("build integration settings")?;
    if cli.no_preflight {
        settings.set_synthesize_preflight(false);
    }

    let mut doc = load_document(&cli.input)
        .with_context(|| format!("load document {}", cli.input.display()))?;
    let summary = apply_to_document(&mut doc, &settings).context("apply integrations")?;

    let format = cli.format.map_or_else(
        || DocumentFormat::from_path(cli.output.as_deref().unwrap_or(&cli.input)),
        DocumentFormat::from,
    );
    let rendered = render_document(&doc, format).context("render document")?;

    match &cli.output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("write {}", path.display()))?;
            tracing::info!(
                output = %path.display(),
                operations = summary.http_operations + summary.preflight_operations,
                "document written"
            );
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(rendered.as_bytes())
                .context("write stdout")?;
            stdout.flush().context("flush stdout")?;
        }
    }
    Ok(())
}
