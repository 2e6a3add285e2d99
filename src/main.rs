use anyhow::Result;
use multilingual_speaker::{
    artifacts::ArtifactStore, config::Config, i18n::LanguageCatalog, janitor, server,
    service::TranslationService,
};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored when variables come from the environment)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("multilingual_speaker=info".parse()?),
        )
        .init();

    info!("Starting multilingual speaker");

    let config = Arc::new(Config::from_env()?);
    let catalog = Arc::new(LanguageCatalog::default());
    info!(
        languages = catalog.len(),
        model = %config.translation_model,
        "Configuration loaded"
    );

    let store = ArtifactStore::new(config.output_dir.clone());
    store.ensure_dir().await?;

    // Dropping the scheduler would stop the cleanup job
    let _janitor = janitor::start_janitor(store, config.cleanup_interval()).await?;

    let service = Arc::new(TranslationService::from_config(config.clone(), catalog));
    server::serve(service, config.port).await
}
