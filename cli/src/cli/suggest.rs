use itertools::Itertools;

use crate::{
    api::proxy::Api,
    cache::PriceCache,
    catalog::{Catalog, UnitKind},
    cli::SuggestArgs,
    core::{projection::Projection, window},
    prelude::*,
    state::State,
};

pub fn run(catalog: &Catalog, state: &mut State, api: &Api, args: &SuggestArgs) -> Result {
    ensure!(!state.selection.is_empty(), "select at least one appliance first, see `devices`");
    let pick = args.pick.unwrap_or(state.pick);
    state.pick = pick;
    let projection = Projection::project(catalog, &state.selection, pick)?;

    let mut cache = PriceCache::default();
    let prices = cache.resolve_day(api, args.date)?;

    let bounds = window::normalize_bounds(args.window_start, args.window_end);
    let duration = window::clamp_duration(args.duration);
    let candidates = window::candidates(&prices, bounds, duration);
    let Some(best) = window::cheapest(&candidates) else {
        bail!(
            "the {:02}:00–{:02}:59 interval is too short for a {duration} h run",
            bounds.0, bounds.1,
        );
    };

    let per_use = projection.shiftable_energy(UnitKind::PerUse);
    let per_hour = projection.shiftable_energy(UnitKind::PerHour);
    ensure!(
        per_use + per_hour > quantities::energy::KilowattHours::ZERO,
        "nothing in the selection is schedulable, there is no window to optimize",
    );
    let best_cost = window::slice_cost(best.slice(&prices), per_use, per_hour);

    println!(
        "Cheapest start on {}: {:02}:00–{:02}:59 ({duration} h) at a mean of {}.",
        args.date,
        best.start_hour,
        best.end_hour(),
        best.mean,
    );
    println!("Estimated cost of the schedulable selection: {best_cost}.");
    for window in candidates
        .iter()
        .sorted_by_key(|window| window.mean)
        .skip(1)
        .take(2)
    {
        println!(
            "Next best: {:02}:00–{:02}:59 at {}.",
            window.start_hour,
            window.end_hour(),
            window.mean,
        );
    }

    if let Some(baseline) = window::baseline_cost(&prices, &candidates, per_use, per_hour) {
        let credited = state.ledger.credit(baseline - best_cost);
        if let Some(worst) = window::worst_cost(&prices, &candidates, per_use, per_hour) {
            println!("Versus the most expensive start you would save {}.", worst - best_cost);
        }
        println!(
            "Credited {credited} versus an average start: {} over {} calculations.",
            state.ledger.total, state.ledger.runs,
        );
    }

    let fixed: Vec<&str> = projection.fixed().map(|row| row.name.as_str()).collect();
    if !fixed.is_empty() {
        println!("Excluded from the optimization as continuous: {}.", fixed.join(", "));
    }
    Ok(())
}
