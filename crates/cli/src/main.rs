mod cli;
mod config;
mod views;

use std::fs;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use wordatro_client::ApiClient;
use wordatro_core::{
    AnalysisBackend, ClientState, PreferenceStore, Preferences, RequestKey, Route, UploadFlow,
};

use crate::cli::{Cli, Command};
use crate::config::CliConfig;
use crate::views::{App, CatalogKind};

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn build_app(config: &CliConfig) -> Result<App> {
    if let Some(parent) = config.prefs_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let prefs = PreferenceStore::open(config.prefs_path.clone())
        .with_context(|| format!("failed to open {}", config.prefs_path.display()))?;
    Ok(App {
        client: ApiClient::new(config.base_url.clone()),
        state: Arc::new(ClientState::new(prefs)),
    })
}

/// Apply explicit selections on top of the stored preference record. Only
/// `persist` callers (the home-view selects) write the result back.
fn effective_prefs(
    app: &App,
    dictionary: Option<String>,
    strategy: Option<String>,
    persist: bool,
) -> Result<Preferences> {
    let mut prefs = app.state.prefs.current();
    let changed = dictionary.is_some() || strategy.is_some();
    if let Some(dictionary) = dictionary {
        prefs.dictionary = dictionary;
    }
    if let Some(strategy) = strategy {
        prefs.strategy = strategy;
    }
    if persist && changed {
        app.state.prefs.update(prefs.clone())?;
    }
    Ok(prefs)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = CliConfig::resolve(cli.base_url.clone())?;
    tracing::debug!("using backend {}", config.base_url);
    let app = build_app(&config)?;

    match cli.command {
        Command::Upload { file } => {
            let bytes =
                fs::read(&file).with_context(|| format!("failed to read {}", file.display()))?;
            let name = file
                .file_name()
                .and_then(|n| n.to_str())
                .context("file has no usable name")?;
            let filename = app
                .client
                .upload(name, bytes)
                .await
                .map_err(views::fail)?;
            println!("{filename}");
            Ok(())
        }
        Command::Analyze {
            file,
            dictionary,
            strategy,
            refresh,
        } => {
            let bytes =
                fs::read(&file).with_context(|| format!("failed to read {}", file.display()))?;
            let name = file
                .file_name()
                .and_then(|n| n.to_str())
                .context("file has no usable name")?;
            // Explicit selection persists, as on the home view.
            effective_prefs(&app, dictionary, strategy, true)?;

            let mut flow = UploadFlow::new(app.client.clone(), app.state.clone());
            flow.select_file(name, bytes);
            let Route::Analyze {
                filename,
                dictionary,
                strategy,
            } = flow.submit().await.map_err(views::fail)?;

            let key = RequestKey::compose(filename, dictionary, strategy).map_err(views::fail)?;
            views::results(&app, &key, refresh).await
        }
        Command::Inspect {
            filename,
            dictionary,
            strategy,
        } => {
            // Selections here are view parameters, not stored preferences.
            let prefs = effective_prefs(&app, dictionary, strategy, false)?;
            let key = RequestKey::compose(filename, Some(prefs.dictionary), Some(prefs.strategy))
                .map_err(views::fail)?;
            views::inspect(&app, &key).await
        }
        Command::Dictionaries => views::catalog(&app, CatalogKind::Dictionaries).await,
        Command::Strategies => views::catalog(&app, CatalogKind::Strategies).await,
        Command::Prefs {
            dictionary,
            strategy,
        } => {
            let prefs = effective_prefs(&app, dictionary, strategy, true)?;
            println!("dictionary: {}", prefs.dictionary);
            println!("strategy:   {}", prefs.strategy);
            Ok(())
        }
    }
}
