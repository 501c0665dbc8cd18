//! # post-index Binary
//!
//! The entry point that assembles the service from configuration and
//! compile-time features, then answers one query as JSON on stdout.

mod cli;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use configs::{BackendKind, LoggingSettings, Settings};
use domains::{Capability, OrderedStore, Privileges, SummaryOptions};
use services::post_service::{PostService, PostServiceDeps};
use storage_adapters::{HookRegistry, HtmlContentParser, MemoryBackend, SeedFile};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

fn init_tracing(logging: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if logging.json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

#[cfg(feature = "redis")]
fn redis_store(settings: &Settings) -> anyhow::Result<Arc<dyn OrderedStore>> {
    use secrecy::ExposeSecret;
    use storage_adapters::redis::RedisOrderedStore;

    let url = settings
        .backend
        .redis_url
        .as_ref()
        .context("backend.redis_url is not set")?;
    let store = RedisOrderedStore::connect(url.expose_secret(), settings.backend.pool_size)?;
    Ok(Arc::new(store))
}

#[cfg(not(feature = "redis"))]
fn redis_store(_settings: &Settings) -> anyhow::Result<Arc<dyn OrderedStore>> {
    anyhow::bail!("backend.kind = \"redis\" but post-index was built without the `redis` feature")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    // 1. Configuration and logging
    let settings = Settings::load_from(&args.config_dir).context("loading configuration")?;
    init_tracing(&settings.logging);

    // 2. Backends. Post records, settings and privileges always live in memory;
    //    the ordered store can be swapped for Redis.
    let default_sort = settings.posts.default_sort;
    let memory = MemoryBackend::new(
        default_sort,
        Privileges::none().with(Capability::TopicsRead),
    );
    if let Some(path) = args.seed.as_ref().or(settings.backend.seed_file.as_ref()) {
        let seed = SeedFile::load(path)
            .await
            .with_context(|| format!("loading seed file {}", path.display()))?;
        seed.apply(&memory);
    }

    let store: Arc<dyn OrderedStore> = match settings.backend.kind {
        BackendKind::Memory => memory.store.clone(),
        BackendKind::Redis => redis_store(&settings)?,
    };
    info!(backend = ?settings.backend.kind, %default_sort, "post-index ready");

    // 3. Service
    let service = PostService::new(PostServiceDeps {
        store,
        privileges: memory.privileges.clone(),
        settings: memory.settings.clone(),
        hooks: Arc::new(HookRegistry::new()),
        posts: memory.posts.clone(),
        parser: Arc::new(HtmlContentParser::new()),
    })
    .with_summary_options(SummaryOptions {
        strip_tags: settings.posts.summary_strip_tags,
    });

    // 4. Query
    let output = cli::run(&service, args.command).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
