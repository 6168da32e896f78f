use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use draw_scout::config::Config;
use draw_scout::error::Result;
use draw_scout::fetcher::ApiFootballClient;
use draw_scout::notifier::TelegramNotifier;
use draw_scout::pipeline;
use draw_scout::types::Outcome;

#[tokio::main]
async fn main() {
    // A missing .env is fine; real deployments set the environment directly.
    let _ = dotenvy::dotenv();

    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .init();

    match run(cfg).await {
        Ok(Outcome::FixturesUnavailable(_)) => std::process::exit(1),
        Ok(_) => {}
        Err(e) => {
            error!("Fatal error: {e}");
            std::process::exit(1);
        }
    }
}

async fn run(cfg: Config) -> Result<Outcome> {
    info!(
        "Run start: query={} min_history={} weights=({:.2}, {:.2}, {:.2}) threshold={:.2}",
        cfg.query,
        cfg.scoring.min_history,
        cfg.scoring.weight_draw,
        cfg.scoring.weight_goals,
        cfg.scoring.weight_diff,
        cfg.quality_threshold,
    );

    let api = ApiFootballClient::new(&cfg)?;
    let telegram = TelegramNotifier::new(&cfg)?;

    pipeline::run_once(&cfg, &api, &api, &telegram).await
}
