use std::{path::Path, time::Instant};

use chrono::Local;
use quantities::rate::CentsPerKilowattHour;

use crate::{api::proxy::Api, cache::PriceCache, cli::WatchArgs, prelude::*, state::State};

pub fn run(state: &mut State, state_path: &Path, api: &Api, args: &WatchArgs) -> Result {
    let threshold = args
        .threshold
        .or(state.watch_threshold)
        .context("no stored threshold, pass `--threshold`")?;
    state.watch_threshold = Some(threshold);
    state.write_to(state_path);
    info!(%threshold, period = ?args.period, "watching…");

    let mut cache = PriceCache::default();
    cache.warm_up(api);
    check(&cache, threshold);

    let mut last_reload = Instant::now();
    let mut n_polls: u64 = 0;
    loop {
        if args.polls.is_some_and(|limit| n_polls >= limit) {
            break Ok(());
        }
        n_polls += 1;
        std::thread::sleep(args.period);

        let changed = if last_reload.elapsed() >= args.reload_every {
            last_reload = Instant::now();
            match api.latest_prices() {
                Ok(points) => {
                    cache.replace(points);
                    true
                }
                Err(error) => {
                    warn!(error = format!("{error:#}"), "the full reload failed");
                    false
                }
            }
        } else {
            match cache.refresh_if_changed(api) {
                Ok(changed) => changed,
                Err(error) => {
                    // Transient failures keep the previous series.
                    warn!(error = format!("{error:#}"), "the poll failed");
                    false
                }
            }
        };
        if changed {
            info!("the price series changed");
            check(&cache, threshold);
        }
    }
}

fn check(cache: &PriceCache, threshold: CentsPerKilowattHour) {
    let Some(cheapest) = cache.cheapest() else {
        return;
    };
    if cheapest.price <= threshold {
        warn!(
            at = %cheapest.start.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
            price = %cheapest.price,
            %threshold,
            "price alert: the cheapest hour is below the threshold",
        );
    } else {
        info!(cheapest = %cheapest.price, %threshold, "still above the threshold");
    }
}
