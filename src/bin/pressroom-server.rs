// ABOUTME: Server binary wiring configuration, backend, completion client, and HTTP routes
// ABOUTME: Reads settings from the environment; --http-port overrides the bind port
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Pressroom Server Binary
//!
//! Starts the article API against the configured PocketBase instance, or the
//! in-memory store when `POCKETBASE_URL=memory://`.

use anyhow::Result;
use clap::Parser;
use pressroom::{
    backend,
    config::environment::ServerConfig,
    llm::OpenAiCompletionClient,
    logging, notifications,
    resources::ServerResources,
    server,
};
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "pressroom-server")]
#[command(about = "Pressroom - AI-written news articles over PocketBase")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }

    logging::init_from_env()?;

    info!("Starting Pressroom server");
    info!("{}", config.summary());

    let notifier = notifications::from_config(&config.notifications);
    let store = backend::connect(&config.backend)?;
    let completion = Arc::new(OpenAiCompletionClient::new(
        &config.completion,
        Arc::clone(&notifier),
    ));
    let resources = Arc::new(ServerResources::new(store, completion, notifier));

    display_available_endpoints(&config);

    if let Err(e) = server::serve(&config, resources).await {
        error!("Server error: {:#}", e);
        return Err(e);
    }

    Ok(())
}

#[allow(clippy::cognitive_complexity)]
fn display_available_endpoints(config: &ServerConfig) {
    let base = format!("http://{}:{}", config.host, config.http_port);

    info!("=== Available API Endpoints ===");
    info!("   Health:          GET    {base}/api/health");
    info!("   Join:            POST   {base}/api/auth/join");
    info!("   Login:           POST   {base}/api/auth/login");
    info!("   Articles:        GET    {base}/api/articles?category=");
    info!("   Drafts:          GET    {base}/api/articles/drafts");
    info!("   Generate:        POST   {base}/api/articles");
    info!("   Article:         GET    {base}/api/articles/{{id}}");
    info!("   Edit:            PATCH  {base}/api/articles/{{id}}");
    info!("   Delete:          DELETE {base}/api/articles/{{id}}");
    info!("   React:           POST   {base}/api/articles/{{id}}/reactions");
    info!("=== End of Endpoint List ===");
}
