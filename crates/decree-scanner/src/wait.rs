//! Bounded polling against the rendered browser state.

use crate::error::{Result, ScanError};
use decree_browser::BrowserActions;
use std::time::{Duration, Instant};

/// Poll the rendered markup until `predicate` holds.
///
/// The markup is checked immediately, then every `poll` until `timeout`
/// elapses. Running out of time yields `ScanError::Timeout`, which aborts a
/// harvest run.
pub async fn wait_until<B, P>(
    browser: &B,
    condition: &str,
    timeout: Duration,
    poll: Duration,
    predicate: P,
) -> Result<()>
where
    B: BrowserActions + ?Sized,
    P: Fn(&str) -> bool + Send + Sync,
{
    let started = Instant::now();
    loop {
        let html = browser.content().await?;
        if predicate(&html) {
            tracing::debug!("{} after {:?}", condition, started.elapsed());
            return Ok(());
        }
        if started.elapsed() >= timeout {
            tracing::error!("Gave up waiting for {} after {:?}", condition, timeout);
            return Err(ScanError::Timeout {
                condition: condition.to_string(),
                waited: timeout,
            });
        }
        tokio::time::sleep(poll).await;
    }
}
