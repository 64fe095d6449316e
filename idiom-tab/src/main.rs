//! idiom-tab - one foreign-language idiom per new tab

use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use idiom_agent::{GeminiBackend, IdiomGenerator};
use idiom_core::Dataset;
use idiom_tab::cli::{self, Commands, SettingsCommands};
use idiom_tab::config::{Args, SupplyMode};
use idiom_tab::selector::GenerativeSupply;
use idiom_tab::session::Session;
use idiom_tab::settings;
use idiom_tab::store::{JsonFileStore, StateStore};
use idiom_tab::supply::{DatasetSupply, IdiomSupply};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    // Initialize tracing/logging
    let log_level = args.log_level.clone();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("idiom_tab={log_level},idiom_core={log_level},idiom_agent={log_level}")
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = args.validate() {
        error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    info!(
        data_dir = %args.data_dir.display(),
        mode = %args.mode,
        cache_capacity = args.cache_capacity,
        "idiom-tab starting"
    );

    let store: Arc<dyn StateStore> = Arc::new(JsonFileStore::open(args.state_path()).await?);

    // Settings commands operate on the store directly, no session needed
    if let Some(Commands::Settings(cmd)) = &args.command {
        return run_settings(cmd.clone(), &args, store.as_ref()).await;
    }

    let supply = build_supply(&args, store.as_ref()).await?;
    let session = Session::load(store, supply, args.cache_capacity).await?;

    match &args.command {
        None => cli::interactive(&session).await?,
        Some(Commands::Next) => cli::render_selection(&session.next().await?),
        Some(Commands::Saved { count }) => cli::render_saved(&session.saved().await, *count),
        Some(Commands::Settings(_)) => {}
    }

    Ok(())
}

/// Build the supply strategy the configuration asks for.
async fn build_supply(
    args: &Args,
    store: &dyn StateStore,
) -> anyhow::Result<Box<dyn IdiomSupply>> {
    match args.supply_mode() {
        SupplyMode::Static => Ok(Box::new(DatasetSupply::new(Dataset::bundled()?))),
        SupplyMode::Generative => {
            let generator = build_generator(args, store).await?;
            Ok(Box::new(GenerativeSupply::new(generator)))
        }
    }
}

/// Resolve the credential and build the Gemini backend.
async fn build_generator(
    args: &Args,
    store: &dyn StateStore,
) -> anyhow::Result<Arc<dyn IdiomGenerator>> {
    let api_key = match &args.api_key {
        Some(key) => key.clone(),
        None => settings::load_key(store).await?.ok_or_else(|| {
            anyhow::anyhow!(
                "no generation API key configured - run `idiom-tab settings set-key <KEY>` \
                 or set GEMINI_API_KEY"
            )
        })?,
    };

    let mut backend = GeminiBackend::new(api_key).with_model(args.model.as_str());
    if let Some(url) = &args.api_url {
        backend = backend.with_base_url(url.as_str());
    }
    Ok(Arc::new(backend))
}

async fn run_settings(
    cmd: SettingsCommands,
    args: &Args,
    store: &dyn StateStore,
) -> anyhow::Result<()> {
    match cmd {
        SettingsCommands::SetKey { key } => {
            settings::save_key(store, &key).await?;
            println!("Settings saved successfully!");
        }
        SettingsCommands::Test => {
            let generator = build_generator(args, store).await?;
            match settings::test_key(generator.as_ref()).await {
                Ok(()) => println!("Connection successful! Your API key is working."),
                Err(e) => println!("Connection failed: {e}"),
            }
        }
        SettingsCommands::ClearCache => {
            settings::clear_cache(store).await?;
            println!("Cache cleared! You'll see fresh idioms now.");
        }
    }
    Ok(())
}
