use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

use definer_server::fetch::DEFAULT_SEARCH_URL;
use definer_server::rate_limit::RateLimiterLayer;
use definer_server::user_agents::DEFAULT_USER_AGENTS_URL;
use definer_server::{AppState, GoogleSource, UserAgentPool, router};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_RATE_LIMIT_RPS: u32 = 100;
const DEFAULT_RATE_LIMIT_BURST: u32 = 100;
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = load_config();
    info!("binding to {}:{}", config.host, config.port);
    info!("search url: {}", config.search_url);
    info!(
        "rate limit: {} req/s (burst {})",
        config.rate_limit_rps, config.rate_limit_burst
    );

    let user_agents = if config.fetch_user_agents {
        let start = Instant::now();
        let client = reqwest::Client::builder()
            .timeout(config.fetch_timeout)
            .build()?;
        let pool = UserAgentPool::load_or_builtin(&client, &config.user_agents_url).await;
        info!("user agents ready in {} ms", start.elapsed().as_millis());
        pool
    } else {
        info!("user agent download disabled; using built-in agent");
        UserAgentPool::builtin()
    };
    let user_agents = Arc::new(user_agents);

    let source = GoogleSource::new(
        config.search_url.clone(),
        Arc::clone(&user_agents),
        config.fetch_timeout,
    )?;
    let state = AppState {
        source: Arc::new(source),
        user_agents,
    };

    let rate_limiter = RateLimiterLayer::new(config.rate_limit_rps, config.rate_limit_burst);
    let app = router(state)
        .layer(rate_limiter)
        .layer(TraceLayer::new_for_http());
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let listener = TcpListener::bind(addr).await?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}

#[derive(Debug, Clone)]
struct Config {
    host: String,
    port: u16,
    search_url: String,
    user_agents_url: String,
    fetch_user_agents: bool,
    fetch_timeout: Duration,
    rate_limit_rps: u32,
    rate_limit_burst: u32,
}

fn load_config() -> Config {
    let mut fetch_user_agents = true;
    let mut cli_user_agents_url: Option<String> = None;
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--no-user-agent-fetch" => fetch_user_agents = false,
            "--user-agents-url" => cli_user_agents_url = args.next(),
            _ => {
                if let Some(url) = arg.strip_prefix("--user-agents-url=") {
                    cli_user_agents_url = Some(url.to_string());
                }
            }
        }
    }

    let host = env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT);
    let search_url = env::var("SEARCH_URL").unwrap_or_else(|_| DEFAULT_SEARCH_URL.to_string());
    let user_agents_url = cli_user_agents_url
        .or_else(|| env::var("USER_AGENTS_URL").ok())
        .unwrap_or_else(|| DEFAULT_USER_AGENTS_URL.to_string());
    let fetch_timeout = Duration::from_secs(
        positive_env("FETCH_TIMEOUT_SECS").unwrap_or(DEFAULT_FETCH_TIMEOUT_SECS),
    );
    let rate_limit_rps = positive_env("RATE_LIMIT_RPS").unwrap_or(DEFAULT_RATE_LIMIT_RPS);
    let rate_limit_burst = positive_env("RATE_LIMIT_BURST").unwrap_or(DEFAULT_RATE_LIMIT_BURST);

    Config {
        host,
        port,
        search_url,
        user_agents_url,
        fetch_user_agents,
        fetch_timeout,
        rate_limit_rps,
        rate_limit_burst,
    }
}

fn positive_env<T>(name: &str) -> Option<T>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    env::var(name).ok().as_deref().and_then(parse_positive)
}

fn parse_positive<T>(raw: &str) -> Option<T>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    raw.trim().parse::<T>().ok().filter(|v| *v > T::default())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let max_level = env_filter
        .max_level_hint()
        .and_then(|hint| hint.into_level())
        .unwrap_or(Level::INFO);
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_level(true)
        .with_max_level(max_level)
        .init();
}
