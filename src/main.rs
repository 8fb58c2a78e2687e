use insurance_insights::{
    config::Config,
    dashboard,
    dataset::Dataset,
    export::{export_all, ExportFormat},
    monitor::JobMonitor,
    predictor::{self, ModelArtifact, ModelKind},
    render::HtmlRenderer,
    web::{self, DashboardState, PredictorState},
};

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about = "Insurance charge dashboard and predictor", long_about = None)]
struct Cli {
    /// Configuration file layered over the built-in defaults
    #[arg(short, long, env = "INSURANCE_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the charge dashboard
    Dashboard {
        /// Dataset file (CSV or Parquet)
        #[arg(short, long)]
        data: Option<PathBuf>,
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Serve the charge predictor
    Predictor {
        /// Model artifact produced by `train`
        #[arg(short, long)]
        model: Option<PathBuf>,
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Print the overview KPIs and the load report
    Summary {
        #[arg(short, long)]
        data: Option<PathBuf>,
    },
    /// Write the cleaned dataset and every aggregate table
    Export {
        #[arg(short, long)]
        data: Option<PathBuf>,
        /// Output directory
        #[arg(short, long, default_value = "data/output")]
        out: PathBuf,
        #[arg(short, long, value_enum, default_value_t = ExportFormat::Parquet)]
        format: ExportFormat,
    },
    /// Fit a charge model on the dataset and save it as an artifact
    Train {
        #[arg(short, long)]
        data: Option<PathBuf>,
        /// Where to write the artifact (defaults to the configured model path)
        #[arg(short, long)]
        out: Option<PathBuf>,
        #[arg(short, long, value_enum, default_value_t = ModelKind::RandomForest)]
        kind: ModelKind,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "insurance_insights=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    tracing::debug!("Arguments {:#?}", cli);

    let config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;

    match cli.command {
        Command::Dashboard { data, port } => {
            let dataset = Dataset::load(&data.unwrap_or(config.dataset.path)).await?;
            let mut server = config.dashboard;
            if let Some(port) = port {
                server.port = port;
            }

            let state = DashboardState {
                dataset: Arc::new(dataset),
                renderer: Arc::new(HtmlRenderer::new(server.title.clone())),
            };
            tracing::info!("Starting {} v{}", server.title, env!("CARGO_PKG_VERSION"));
            web::serve(web::dashboard_router(state), server.addr()).await?;
        }
        Command::Predictor { model, port } => {
            let artifact = ModelArtifact::load(&model.unwrap_or(config.model.path))?;
            let mut server = config.predictor;
            if let Some(port) = port {
                server.port = port;
            }

            let state = PredictorState {
                model: Arc::new(artifact),
                renderer: Arc::new(HtmlRenderer::new(server.title.clone())),
            };
            tracing::info!("Starting {} v{}", server.title, env!("CARGO_PKG_VERSION"));
            web::serve(web::predictor_router(state), server.addr()).await?;
        }
        Command::Summary { data } => {
            let dataset = Dataset::load(&data.unwrap_or(config.dataset.path)).await?;
            let summary = serde_json::json!({
                "report": dataset.report(),
                "kpis": dashboard::overview(&dataset).kpis,
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Command::Export { data, out, format } => {
            let monitor = JobMonitor::start("export");
            let dataset = Dataset::load(&data.unwrap_or(config.dataset.path)).await?;
            let written = export_all(&dataset, &out, format).await?;
            for path in written {
                println!("{}", path.display());
            }
            monitor.finish();
        }
        Command::Train { data, out, kind } => {
            let monitor = JobMonitor::start("train");
            let dataset = Dataset::load(&data.unwrap_or(config.dataset.path)).await?;
            let artifact = predictor::train(dataset.records(), kind)?;
            let out = out.unwrap_or(config.model.path);
            artifact
                .save(&out)
                .with_context(|| format!("failed to write model artifact {}", out.display()))?;
            tracing::info!(path = %out.display(), kind = artifact.model.kind(), "Model saved");
            monitor.finish();
        }
    }

    Ok(())
}
