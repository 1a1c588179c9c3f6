use anyhow::Context;
use clap::{Parser, Subcommand};
use keepfts::api::{create_router, AppState};
use keepfts::page::fetch_page;
use keepfts::{
    Analyzer, Document, FallbackPolicy, RetryClient, RetryPolicy, SearchEngine, Stopwords,
};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

// CLI Arguments
#[derive(Parser, Debug)]
#[command(author, version, about = "In-memory full-text search over documents and web pages", long_about = None)]
struct Args {
    /// Load stopword lists from this directory instead of the bundled ones
    #[arg(long, global = true)]
    stopwords: Option<PathBuf>,

    /// Keep tokens that cannot be stemmed instead of dropping them
    #[arg(long, global = true)]
    retain_unstemmable: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Index a JSON array of documents and run a query against it
    Search {
        #[arg(short, long)]
        docs: PathBuf,

        #[arg(short, long)]
        query: String,
    },
    /// Fetch pages, index their metadata and optionally run a query
    Fetch {
        #[arg(required = true)]
        urls: Vec<String>,

        #[arg(short, long)]
        query: Option<String>,

        #[arg(long, default_value_t = 3)]
        max_retries: u32,
    },
    /// Serve the HTTP API
    Serve {
        #[arg(short, long, default_value = "127.0.0.1:3000")]
        addr: String,
    },
}

fn build_engine(args: &Args) -> anyhow::Result<SearchEngine> {
    let stopwords = match &args.stopwords {
        Some(dir) => Arc::new(Stopwords::load_dir(dir)?),
        None => Stopwords::shared(),
    };
    let fallback = if args.retain_unstemmable {
        FallbackPolicy::Retain
    } else {
        FallbackPolicy::Drop
    };

    let analyzer = Analyzer::builder()
        .stopwords(stopwords)
        .fallback(fallback)
        .build();
    Ok(SearchEngine::with_analyzer(analyzer))
}

// Load documents from JSON
fn load_docs_from_json(path: &Path) -> anyhow::Result<Vec<Document>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let docs = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("failed to decode {}", path.display()))?;
    Ok(docs)
}

// Perform search and display results
fn do_search(engine: &SearchEngine, query: &str) {
    let start = Instant::now();
    let matched_ids = engine.search(query);
    let duration = start.elapsed();

    println!("Search found {} documents in {:?}", matched_ids.len(), duration);
    println!();

    for id in matched_ids {
        println!("{id}");
    }
}

async fn fetch(
    mut engine: SearchEngine,
    urls: &[String],
    query: Option<&str>,
    max_retries: u32,
) -> anyhow::Result<()> {
    let client = RetryClient::new(
        reqwest::Client::new(),
        RetryPolicy::default().with_max_retries(max_retries),
    );

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    for url in urls {
        match fetch_page(&client, url, &cancel).await {
            Ok(page) => {
                println!("{url}\t{}", page.meta.title);
                engine.put([&page.document])?;
            }
            Err(keepfts::Error::Cancelled) => anyhow::bail!("interrupted"),
            Err(err) => tracing::warn!(url = %url, error = %err, "failed to fetch page"),
        }
    }

    if let Some(query) = query {
        println!();
        println!("Searching for: \"{query}\"");
        println!();
        do_search(&engine, query);
    }
    Ok(())
}

async fn serve(engine: SearchEngine, addr: &str) -> anyhow::Result<()> {
    let client = RetryClient::new(
        reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?,
        RetryPolicy::default(),
    );
    let app = create_router(AppState::new(engine, client))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("keepfts=info")),
        )
        .init();

    let args = Args::parse();
    let mut engine = build_engine(&args)?;

    match &args.command {
        Command::Search { docs, query } => {
            let start = Instant::now();
            let docs = load_docs_from_json(docs)?;
            engine.put(&docs)?;
            println!("Indexed {} documents in {:?}", docs.len(), start.elapsed());

            println!();
            println!("Searching for: \"{query}\"");
            println!();
            do_search(&engine, query);
        }
        Command::Fetch {
            urls,
            query,
            max_retries,
        } => fetch(engine, urls, query.as_deref(), *max_retries).await?,
        Command::Serve { addr } => serve(engine, addr).await?,
    }

    Ok(())
}
