use std::time::Duration;

use clap::Args;
use jiff::Timestamp;
use rebate_app::context::AppContext;
use tokio::{signal, time};
use tracing::info;

#[derive(Debug, Args)]
pub(crate) struct SweepArgs {
    /// Repeat the sweep every N seconds until interrupted; runs once when omitted
    #[arg(long, env = "SWEEP_INTERVAL_SECONDS")]
    interval_seconds: Option<u64>,

    /// Sweep as of this instant instead of now (single run only)
    #[arg(long, conflicts_with = "interval_seconds")]
    as_of: Option<Timestamp>,
}

pub(crate) async fn run(ctx: &AppContext, args: SweepArgs) -> Result<(), String> {
    let Some(seconds) = args.interval_seconds.filter(|seconds| *seconds > 0) else {
        return sweep_once(ctx, args.as_of.unwrap_or_else(Timestamp::now)).await;
    };

    let mut interval = time::interval(Duration::from_secs(seconds));

    interval.set_missed_tick_behavior(time::MissedTickBehavior::Delay);

    info!(interval_seconds = seconds, "starting lifecycle sweeper");

    loop {
        tokio::select! {
            _ = interval.tick() => sweep_once(ctx, Timestamp::now()).await?,
            result = signal::ctrl_c() => {
                result.map_err(|error| format!("failed to listen for Ctrl+C: {error}"))?;

                info!("stopping lifecycle sweeper");

                return Ok(());
            }
        }
    }
}

async fn sweep_once(ctx: &AppContext, as_of: Timestamp) -> Result<(), String> {
    let changed = ctx
        .lifecycle
        .sweep(as_of)
        .await
        .map_err(|error| format!("sweep failed: {error}"))?;

    for promotion in &changed {
        println!("{} {} -> {}", promotion.uuid, promotion.slug, promotion.status.as_str());
    }

    info!(changed = changed.len(), %as_of, "sweep finished");

    Ok(())
}
