use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use lc_generate::{ContentGenerator, OpenAiClient, Pipeline};
use lc_scraper::BlogScraper;
use lc_search::WebSearchClient;
use lc_web::{create_app, AppState};

#[derive(Parser, Debug)]
#[command(author, version, about = "LINE配信記事の自動生成サービス", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        #[arg(long, default_value = "0.0.0.0")]
        host: String,
        #[arg(long, default_value_t = 8001)]
        port: u16,
    },
    /// Scrape one blog article and print the extraction as JSON
    Scrape { url: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Serve { host, port } => serve(&host, port).await,
        Commands::Scrape { url } => scrape(&url).await,
    }
}

async fn serve(host: &str, port: u16) -> anyhow::Result<()> {
    let api_key = std::env::var("OPENAI_API_KEY").unwrap_or_else(|_| {
        warn!("OPENAI_API_KEY is not set, generation requests will fail");
        String::new()
    });

    // Clients are built once and shared read-only across requests.
    let scraper = Arc::new(BlogScraper::new()?);
    let search = Arc::new(WebSearchClient::new(api_key.clone())?);
    let backend = Arc::new(OpenAiClient::new(api_key)?);
    let pipeline = Pipeline::new(
        scraper.clone(),
        search,
        ContentGenerator::new(backend),
    );

    let app = create_app(AppState {
        scraper,
        pipeline,
    })
    .await;

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn scrape(url: &str) -> anyhow::Result<()> {
    let scraper = BlogScraper::new()?;
    let article = scraper.scrape(url).await?;
    println!("{}", serde_json::to_string_pretty(&article)?);
    Ok(())
}
