use chrono::Local;
use quantities::rate::{self, CentsPerKilowattHour};

use crate::{api::proxy::Api, cache::PriceCache, cli::PricesArgs, core, prelude::*, tables};

pub fn run(api: &Api, args: &PricesArgs) -> Result {
    let date = args.date.unwrap_or_else(|| Local::now().date_naive());
    let mut cache = PriceCache::default();
    // Missing hours render as gaps rather than failing the whole day.
    let rates: Vec<Option<CentsPerKilowattHour>> = (0..24)
        .map(|hour| {
            core::local_instant(date, hour)
                .ok()
                .and_then(|at| cache.resolve(api, at).ok())
        })
        .collect();
    ensure!(rates.iter().any(Option::is_some), "no price data for {date}");

    println!("{}", tables::day_prices_table(&rates));
    let known: Vec<CentsPerKilowattHour> = rates.iter().copied().flatten().collect();
    if let Some(mean) = rate::mean(&known) {
        println!("Day mean: {mean}.");
    }
    Ok(())
}
