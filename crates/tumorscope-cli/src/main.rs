use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;
use tumorscope_core::DEFAULT_FEATURE_COUNT;
use tumorscope_model::ModelBundle;
use tumorscope_serve::ServeConfig;

mod display;
mod predict;

#[derive(Parser)]
#[command(
    name = "tumorscope",
    version,
    about = "Cancer-type classification of single-sample gene-expression CSVs"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct ArtifactArgs {
    /// Directory holding scaler.json, pca.json, rf_model.json and label_encoder.json.
    #[arg(long, env = "TUMORSCOPE_ARTIFACTS", default_value = ".")]
    artifacts: PathBuf,
}

#[derive(Subcommand)]
enum Command {
    /// Serve POST /predict and GET /health.
    Serve {
        #[command(flatten)]
        artifacts: ArtifactArgs,
        #[arg(long, env = "TUMORSCOPE_BIND", default_value = "127.0.0.1:5000")]
        bind: SocketAddr,
        /// Refuse to start unless the bundle expects exactly this many gene columns
        /// (the shipped model expects 20531).
        #[arg(long, env = "TUMORSCOPE_EXPECTED_FEATURES")]
        expected_features: Option<usize>,
        /// Upload size limit in MiB.
        #[arg(long, env = "TUMORSCOPE_MAX_UPLOAD_MB", default_value_t = 64)]
        max_upload_mb: usize,
        /// Add the predicted class probability to responses.
        #[arg(long, env = "TUMORSCOPE_INCLUDE_CONFIDENCE")]
        include_confidence: bool,
    },
    /// Classify one CSV file and print the JSON response.
    Predict {
        file: PathBuf,
        #[command(flatten)]
        artifacts: ArtifactArgs,
        /// Send the file to a running server instead of loading the bundle.
        #[arg(long, env = "TUMORSCOPE_SERVER")]
        server: Option<String>,
        #[arg(long)]
        include_confidence: bool,
        /// Also print every class probability (local mode only).
        #[arg(long)]
        probabilities: bool,
    },
    /// Describe the model bundle.
    Inspect {
        #[command(flatten)]
        artifacts: ArtifactArgs,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Serve {
            artifacts,
            bind,
            expected_features,
            max_upload_mb,
            include_confidence,
        } => {
            let bundle = load_bundle(&artifacts.artifacts)?;
            check_feature_count(&bundle, expected_features)?;
            let config = ServeConfig {
                bind,
                max_upload_bytes: max_upload_mb.saturating_mul(1024 * 1024),
                include_confidence,
            };
            info!("tumorscope v{}", env!("CARGO_PKG_VERSION"));
            tumorscope_serve::serve(Arc::new(bundle), config)
                .await
                .context("running prediction server")?;
        }
        Command::Predict {
            file,
            artifacts,
            server,
            include_confidence,
            probabilities,
        } => {
            let response = match server {
                Some(url) => predict::predict_remote(&url, &file).await?,
                None => {
                    let bundle = load_bundle(&artifacts.artifacts)?;
                    let (sample_id, prediction) = predict::predict_local(&bundle, &file)?;
                    if probabilities {
                        display::print_probabilities(&prediction);
                    }
                    predict::to_response(sample_id, &prediction, include_confidence)
                }
            };
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Command::Inspect { artifacts } => {
            let bundle = load_bundle(&artifacts.artifacts)?;
            display::print_bundle_card(&artifacts.artifacts, &bundle.summary());
        }
    }
    Ok(())
}

fn load_bundle(dir: &Path) -> anyhow::Result<ModelBundle> {
    ModelBundle::load(dir).with_context(|| format!("loading model bundle from {}", dir.display()))
}

/// Compare the bundle's input width with an operator-pinned value.
fn check_feature_count(bundle: &ModelBundle, expected: Option<usize>) -> anyhow::Result<()> {
    let width = bundle.n_features();
    match expected {
        Some(expected) => {
            anyhow::ensure!(
                width == expected,
                "model bundle expects {width} gene columns, but --expected-features is {expected}"
            );
        }
        None if width != DEFAULT_FEATURE_COUNT => {
            tracing::warn!(
                width,
                shipped = DEFAULT_FEATURE_COUNT,
                "model bundle width differs from the shipped model"
            );
        }
        None => {}
    }
    Ok(())
}
