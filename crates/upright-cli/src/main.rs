//! Upright CLI: bake EXIF orientation into JPEG pixels and strip the tag.
//!
//! Settings come from UPRIGHT_* environment variables (or `.env`); flags
//! override them. Exit code 0 means the batch ran, even if some files failed.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use upright_cli::{format_line, init_tracing, resolve_inputs};
use upright_core::{
    BatchConfig, ExtensionMatch, LogLevel, OperatingMode, UprightError, WriteStrategy,
};
use upright_processing::BatchProcessor;
use upright_worker::BatchRunner;

#[derive(Parser)]
#[command(
    name = "upright",
    about = "Apply EXIF orientation to JPEG pixels and remove the orientation tag"
)]
struct Cli {
    /// Files or directories (directories are scanned one level deep for .jpg/.jpeg)
    #[arg(required = true)]
    paths: Vec<PathBuf>,
    /// Only read and log orientation tags; never write files
    #[arg(long)]
    inspect: bool,
    /// JPEG quality for re-encoded images
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=100))]
    quality: Option<u8>,
    /// Overwrite files directly instead of writing a temp file and renaming it
    #[arg(long)]
    in_place: bool,
    /// Match only lowercase .jpg/.jpeg extensions when scanning directories
    #[arg(long)]
    case_sensitive: bool,
    /// Print log lines and the final summary as JSON
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn apply_to(&self, mut config: BatchConfig) -> BatchConfig {
        if self.inspect {
            config.mode = OperatingMode::Inspect;
        }
        if let Some(quality) = self.quality {
            config.jpeg_quality = quality;
        }
        if self.in_place {
            config.write_strategy = WriteStrategy::InPlace;
        }
        if self.case_sensitive {
            config.extension_match = ExtensionMatch::CaseSensitive;
        }
        config
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.apply_to(BatchConfig::from_env().context("Failed to load configuration")?);
    config.validate()?;

    let inputs = resolve_inputs(&cli.paths)?;
    let runner = BatchRunner::new(BatchProcessor::new(config));
    let mut handle = runner.start(inputs)?;

    let token = handle.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, stopping after the current file");
            token.cancel();
        }
    });

    while let Some(line) = handle.next_line().await {
        println!("{}", format_line(&line, cli.json).context("Serialize log line")?);
    }

    let summary = handle.finish().await?;
    if cli.json {
        let out = serde_json::to_string(&serde_json::json!({ "summary": summary }))
            .context("Serialize summary")?;
        println!("{}", out);
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let level = err
                .downcast_ref::<UprightError>()
                .map_or(LogLevel::Error, UprightError::log_level);
            let message = format!("{:#}", err);
            match level {
                LogLevel::Debug => tracing::debug!(error = %message, "Batch not started"),
                LogLevel::Warn => tracing::warn!(error = %message, "Batch not started"),
                LogLevel::Error => tracing::error!(error = %message, "Batch failed"),
            }
            eprintln!("error: {}", message);

            let code = err
                .downcast_ref::<UprightError>()
                .map_or(1, UprightError::exit_code);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}
