//! Command implementations.

use std::sync::Arc;

use metacat_api::{AppState, Server};
use metacat_core::{Registry, ResourceType};
use metacat_search::schema::{generate_mapping, provision_indices};
use metacat_search::{ElasticsearchIndex, IndexClient, SearchService};
use metacat_store::SqlStore;

use crate::cli::Command;
use crate::config::CatalogueConfig;
use crate::config_handlers::handle_config_command;
use crate::error::{Error, Result};

/// Dispatch a parsed command.
pub async fn run(config_path: Option<&str>, command: Command) -> Result<()> {
    match command {
        Command::Config { action } => handle_config_command(config_path, action),
        Command::Mapping { plural } => {
            let registry = Registry::catalogue()?;
            println!("{}", render_mapping(&registry, &plural)?);
            Ok(())
        }
        Command::SetupIndices => {
            let config = CatalogueConfig::load(config_path)?;
            setup_indices(&config).await
        }
        Command::Serve { host, port } => {
            let mut config = CatalogueConfig::load(config_path)?;
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            serve(config).await
        }
    }
}

fn index_client(config: &CatalogueConfig) -> Result<IndexClient> {
    let index = ElasticsearchIndex::new(&config.index)?;
    tracing::info!(url = %index.base_url(), "Using Elasticsearch index");
    Ok(IndexClient::new(Arc::new(index)))
}

/// Run the HTTP API until interrupted.
pub async fn serve(config: CatalogueConfig) -> Result<()> {
    let registry = Arc::new(Registry::catalogue()?);
    tracing::info!(resource_types = registry.len(), "Registered resource types");

    let store = SqlStore::connect(&config.database.url).await?;
    store.ensure_schema(&registry).await?;

    let search = SearchService::new(index_client(&config)?, Arc::new(store));
    let state = AppState::new(registry, search);
    Server::new(config.server, state).run().await?;
    Ok(())
}

/// Create every resource index, reporting what was created.
pub async fn setup_indices(config: &CatalogueConfig) -> Result<()> {
    let registry = Registry::catalogue()?;
    let report = provision_indices(&index_client(config)?, &registry).await?;
    for index in &report.created {
        println!("created  {index}");
    }
    for index in &report.existing {
        println!("exists   {index}");
    }
    println!(
        "{} created, {} already present",
        report.created.len(),
        report.existing.len()
    );
    Ok(())
}

/// Pretty-printed mapping of the resource type registered as `plural`.
pub fn render_mapping(registry: &Registry, plural: &str) -> Result<String> {
    let resource_type: &ResourceType = registry.by_plural(plural).ok_or_else(|| {
        let available: Vec<&str> = registry.iter().map(|rt| rt.plural()).collect();
        Error::config(format!(
            "Unknown resource type '{plural}'. Available: {}",
            available.join(", ")
        ))
    })?;
    serde_json::to_string_pretty(&generate_mapping(resource_type))
        .map_err(|e| Error::Core(e.into()))
}
