use std::path::PathBuf;
use std::time::Duration;

use alexa_top_sites::MAX_PAGE_SIZE;
use alexa_top_sites::Ranking;
use alexa_top_sites::RankingQuery;
use alexa_top_sites::TopSitesClient;
use alexa_top_sites::client::DEFAULT_ENDPOINT;
use alexa_top_sites::output::DEFAULT_OUTPUT_PATH;
use alexa_top_sites::static_credentials;
use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Get a range of Alexa Top Sites for a specific country
#[derive(Parser, Debug)]
#[clap(about, version, author)]
struct Args {
    #[clap(short = 'k', long = "key", env = "AWS_ACCESS_KEY_ID", hide_env_values = true)]
    access_key_id: String,

    #[clap(short = 's', long = "secret", env = "AWS_SECRET_ACCESS_KEY", hide_env_values = true)]
    secret_access_key: String,

    /// Two-letter country code, e.g. US
    #[clap(short, long)]
    country: String,

    /// Number of sites to fetch
    #[clap(short = 'n', long, value_parser = clap::value_parser!(u32).range(1..))]
    count: u32,

    /// Rank of the first site
    #[clap(short = 'b', long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    start: u32,

    #[clap(short, long, default_value = DEFAULT_OUTPUT_PATH)]
    output: PathBuf,

    #[clap(long, default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    #[clap(long, default_value_t = MAX_PAGE_SIZE, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_PAGE_SIZE)))]
    page_size: u32,

    #[clap(long, default_value_t = 30)]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let args = Args::parse();

    let query = RankingQuery::new(&args.country, args.start, args.count, args.page_size)?;

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(args.timeout_secs))
        .build()
        .context("failed to build HTTP client")?;
    let credentials = static_credentials(args.access_key_id, args.secret_access_key);
    let client = TopSitesClient::with_endpoint(http, credentials, &args.endpoint)?;

    let mut ranking = Ranking::new();
    let mut stdout = std::io::stdout().lock();
    let fetched = alexa_top_sites::fetch_ranking(&client, &query, &mut ranking, &mut stdout).await;

    // Keep whatever was fetched before a failing page.
    if fetched.is_ok() || !ranking.is_empty() {
        alexa_top_sites::output::write_json(&args.output, &ranking)?;
    }
    fetched?;

    Ok(())
}
