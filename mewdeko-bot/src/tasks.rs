use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use poise::serenity_prelude as serenity;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

use mewdeko_commands::moderation::timers::process_due_timers;
use mewdeko_database::Database;
use mewdeko_database::impls::snipes::{SNIPE_RETENTION_SECS, delete_snipes_older_than};
use mewdeko_database::impls::warnings::expire_all_warnings;
use mewdeko_services::ConverterService;
use mewdeko_utils::time::now_unix_secs;

const WARN_EXPIRY_PERIOD: Duration = Duration::from_secs(12 * 60 * 60);
const TIMER_PERIOD: Duration = Duration::from_secs(60);
const SNIPE_CLEANUP_PERIOD: Duration = Duration::from_secs(6 * 60 * 60);
const CURRENCY_REFRESH_PERIOD: Duration = Duration::from_secs(12 * 60 * 60);

/// Start the periodic maintenance jobs. Each runs once right away.
pub fn spawn_background_jobs(
    http: Arc<serenity::Http>,
    db: Database,
    converter: Arc<ConverterService>,
) {
    let expiry_db = db.clone();
    spawn_job("warn expiry", WARN_EXPIRY_PERIOD, move || {
        let db = expiry_db.clone();
        async move {
            let (forgiven, deleted) = expire_all_warnings(&db).await?;
            if forgiven > 0 || deleted > 0 {
                info!(forgiven, deleted, "expired old warnings");
            }
            Ok(())
        }
    });

    let timer_db = db.clone();
    spawn_job("punishment timers", TIMER_PERIOD, move || {
        let http = Arc::clone(&http);
        let db = timer_db.clone();
        async move {
            process_due_timers(&http, &db).await?;
            Ok(())
        }
    });

    spawn_job("snipe cleanup", SNIPE_CLEANUP_PERIOD, move || {
        let db = db.clone();
        async move {
            let cutoff = now_unix_secs().saturating_sub(SNIPE_RETENTION_SECS);
            let removed = delete_snipes_older_than(&db, cutoff).await?;
            if removed > 0 {
                info!(removed, "deleted old snipes");
            }
            Ok(())
        }
    });

    spawn_job("currency refresh", CURRENCY_REFRESH_PERIOD, move || {
        let converter = Arc::clone(&converter);
        async move {
            let units = converter.refresh().await?;
            info!(units, "refreshed converter units");
            Ok(())
        }
    });
}

fn spawn_job<F, Fut>(name: &'static str, period: Duration, job: F)
where
    F: Fn() -> Fut + Send + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send,
{
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            if let Err(source) = job().await {
                error!(?source, job = name, "background job failed");
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::spawn_job;

    #[tokio::test(start_paused = true)]
    async fn jobs_run_immediately_and_keep_going_after_errors() {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&runs);

        spawn_job("test", Duration::from_secs(60), move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(anyhow::anyhow!("always fails"))
            }
        });

        tokio::task::yield_now().await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(121)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 3);
    }
}
