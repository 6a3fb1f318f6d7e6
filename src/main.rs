use color_eyre::{Result, eyre::Context};
use log::{debug, info};

mod config;
mod diff;
mod error;
mod notify;
mod scraper;
mod snapshot;
mod storage;

use crate::config::Config;
use crate::notify::{EmailNotifier, Mailer};
use crate::scraper::HttpFetcher;
use crate::storage::FileSnapshotStore;

fn main() -> Result<()> {
    color_eyre::install()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::load()?;
    let fetcher = HttpFetcher::new(&config)?;
    let store = FileSnapshotStore::new(config.snapshot_file.clone());
    let notifier = EmailNotifier::new(Mailer::from_config(&config));
    debug!(
        "snapshot file: {}, email enabled: {}",
        store.path().display(),
        notifier.is_enabled()
    );

    let result = diff::run_check(&config.url, &fetcher, &store, &notifier)
        .wrap_err_with(|| format!("check of {} failed", config.url))?;
    info!(
        "Run finished: {} ({} products)",
        result.outcome,
        result.current.names().len()
    );
    if result.changed()
        && let Some(previous) = &result.previous
    {
        debug!("replaced baseline:\n{previous}\nwith:\n{}", result.current);
    }
    Ok(())
}
