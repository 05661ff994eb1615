//! One-shot operational commands for mentio.

use clap::{Parser, Subcommand};

use mentio_core::{Scope, SampleWindow};
use mentio_scraper::{scrape_all, ScrapeRequest, SourceClient};
use mentio_sentiment::{
    fingerprint, ingest_batch, normalize, select_aspect_extractor, Analyzer, InferenceClient,
};

#[derive(Debug, Parser)]
#[command(name = "mentio")]
#[command(about = "mentio command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run one ingestion for a product (scrape all tracked sources, then
    /// analyze and store the batch).
    Ingest {
        /// Product slug.
        #[arg(long)]
        product: String,
        /// Override the product's keyword list.
        #[arg(long = "keyword")]
        keywords: Vec<String>,
        /// Narrow the video adapter to a single page.
        #[arg(long)]
        target_url: Option<String>,
    },
    /// Analyze one text ad hoc, without persistence.
    Analyze { text: String },
    /// Print aggregate stats for a product (or globally).
    Stats {
        /// Product slug; omit for the global scope.
        #[arg(long)]
        product: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = mentio_core::load_app_config()?;

    match cli.command {
        Commands::Ingest {
            product,
            keywords,
            target_url,
        } => run_ingest_command(&config, &product, keywords, target_url).await,
        Commands::Analyze { text } => run_analyze_command(&config, &text).await,
        Commands::Stats { product } => run_stats_command(&config, product.as_deref()).await,
    }
}

fn build_analyzer(config: &mentio_core::AppConfig) -> anyhow::Result<Analyzer<InferenceClient>> {
    let backend = match &config.inference_url {
        Some(url) => Some(InferenceClient::new(
            url,
            config.inference_api_key.clone(),
            config.inference_timeout_secs,
        )?),
        None => None,
    };
    Ok(Analyzer::new(
        backend,
        select_aspect_extractor(config.aspect_mode),
    ))
}

async fn run_ingest_command(
    config: &mentio_core::AppConfig,
    slug: &str,
    keywords: Vec<String>,
    target_url: Option<String>,
) -> anyhow::Result<()> {
    let pool_config = mentio_db::PoolConfig::from_app_config(config);
    let pool = mentio_db::connect_pool(&config.database_url, pool_config).await?;

    let product = mentio_db::get_product_by_slug(&pool, slug)
        .await?
        .ok_or_else(|| anyhow::anyhow!("product '{slug}' not found"))?;

    let store = mentio_db::PgStore::new(pool, config.store_timeout_secs);
    let analyzer = build_analyzer(config)?;
    let rules = mentio_core::load_rules(&config.rules_path)?;
    let sources = SourceClient::new(&config.scrape_user_agent, config.scrape_timeout_secs)?;

    let mut search_keywords = if keywords.is_empty() {
        product.keywords.clone()
    } else {
        keywords
    };
    search_keywords.retain(|k| !k.trim().is_empty());
    if search_keywords.is_empty() {
        search_keywords.push(product.name.clone());
    }

    let request = ScrapeRequest {
        keywords: search_keywords,
        target_url,
        video: product.track_video,
        forum: product.track_forum,
        microblog: product.track_microblog,
    };

    let batch = scrape_all(&sources, &request).await;
    for count in &batch.per_source {
        println!("{:<10} {}", count.source.to_string(), count.count);
    }

    let summary = ingest_batch(&store, &analyzer, &rules, product.id, batch.mentions).await;
    println!(
        "scraped {} / saved {} / duplicates {} / filtered {} / failed {}",
        summary.total_scraped,
        summary.total_saved,
        summary.duplicates,
        summary.filtered,
        summary.failed
    );

    Ok(())
}

async fn run_analyze_command(config: &mentio_core::AppConfig, text: &str) -> anyhow::Result<()> {
    let Some(cleaned) = normalize(text) else {
        anyhow::bail!("text has no linguistic content after normalization");
    };

    let analyzer = build_analyzer(config)?;
    let analysis = analyzer.analyze(&fingerprint(&cleaned), &cleaned).await;

    println!("{}", serde_json::to_string_pretty(&analysis)?);
    Ok(())
}

async fn run_stats_command(
    config: &mentio_core::AppConfig,
    slug: Option<&str>,
) -> anyhow::Result<()> {
    let pool_config = mentio_db::PoolConfig::from_app_config(config);
    let pool = mentio_db::connect_pool(&config.database_url, pool_config).await?;

    let scope = match slug {
        Some(slug) => {
            let product = mentio_db::get_product_by_slug(&pool, slug)
                .await?
                .ok_or_else(|| anyhow::anyhow!("product '{slug}' not found"))?;
            Scope::Product(product.id)
        }
        None => Scope::Global,
    };

    let total = mentio_db::aggregates::count_reviews(&pool, scope).await?;
    let sample = mentio_db::aggregates::sample_analyses(
        &pool,
        scope,
        SampleWindow::All,
        config.dashboard_sample_limit,
    )
    .await?;
    let platforms = mentio_db::aggregates::platform_breakdown(&pool, scope).await?;

    println!("reviews: {total}");
    if sample.is_empty() {
        println!("sentiment: n/a (no analyses)");
    } else {
        #[allow(clippy::cast_precision_loss)]
        let denom = sample.len() as f64;
        let sentiment: f64 = sample.iter().map(|s| s.score * 100.0).sum::<f64>() / denom;
        let credibility: f64 = sample.iter().map(|s| s.credibility).sum::<f64>() / denom;
        println!("sentiment: {sentiment:.1} / credibility: {credibility:.1}");
    }
    for p in platforms {
        println!("{:<10} {}", p.platform, p.count);
    }

    Ok(())
}
