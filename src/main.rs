mod bootstrap;
mod commands;

use crate::bootstrap::{config, logging, plugins};
use anyhow::Result;
use clap::{Parser, Subcommand};
use picbed_events::{AppEvent, EventBus};
use picbed_i18n::{Locale, Translator};
use picbed_uploader::{ReqwestTransport, UploadPipeline};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "picbed", version, about = "Upload images to a picture bed")]
struct Cli {
    /// Config file, defaults to $PICBED_CONFIG or picbed.toml
    #[arg(long, global = true)]
    config: Option<String>,

    /// Only print uploaded URLs
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload images and print their public URLs
    Upload {
        /// Picture bed to use instead of picbed.current
        #[arg(short, long)]
        backend: Option<String>,
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// List registered picture beds
    List,
    /// Show the settings form of a picture bed
    Config { name: String },
    /// Store settings for a picture bed
    Set {
        name: String,
        /// key=value pairs
        #[arg(required = true)]
        pairs: Vec<String>,
        /// Also select this picture bed
        #[arg(long = "use")]
        make_current: bool,
    },
    /// Select the default picture bed
    Use { name: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::initialize();
    let cli = Cli::parse();

    let events = EventBus::new(cli.quiet);
    events.emit(AppEvent::Starting);

    let config_path = cli
        .config
        .clone()
        .or_else(|| std::env::var("PICBED_CONFIG").ok())
        .unwrap_or_else(|| "picbed.toml".to_string());
    let store = config::load(&config_path, &events).await?;

    let translator: Arc<dyn Translator> = Arc::new(Locale::english());
    let registry = plugins::initialize(&events, translator.as_ref());

    let result = match &cli.command {
        Commands::Upload { backend, files } => {
            let transport = ReqwestTransport::new(&store.config()?.transport);
            let pipeline = UploadPipeline::new(
                registry.clone(),
                store.clone(),
                Arc::new(transport),
                Arc::clone(&translator),
                Arc::clone(&events),
            );
            commands::upload(&pipeline, backend.as_deref(), files).await
        }
        Commands::List => commands::list(&registry, &store),
        Commands::Config { name } => commands::show_config(&registry, &store, translator.as_ref(), name),
        Commands::Set {
            name,
            pairs,
            make_current,
        } => {
            commands::set(
                &registry,
                &store,
                translator.as_ref(),
                &events,
                name,
                pairs,
                *make_current,
            )
            .await
        }
        Commands::Use { name } => commands::select(&registry, &store, translator.as_ref(), &events, name).await,
    };

    if let Err(err) = &result {
        events.emit(AppEvent::Error {
            context: "picbed".to_string(),
            error: err.to_string(),
        });
    }
    events.emit(AppEvent::Finished);
    result
}
