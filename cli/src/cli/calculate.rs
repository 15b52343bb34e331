use crate::{
    api::proxy::Api,
    cache::PriceCache,
    catalog::Catalog,
    cli::CalculateArgs,
    core::{self, compare::Comparison, projection::Projection},
    prelude::*,
    state::State,
};

pub fn run(catalog: &Catalog, state: &mut State, api: &Api, args: &CalculateArgs) -> Result {
    ensure!(!state.selection.is_empty(), "select at least one appliance first, see `devices`");
    let pick = args.pick.unwrap_or(state.pick);
    state.pick = pick;

    let projection = Projection::project(catalog, &state.selection, pick)?;
    let total_energy = projection.total_energy();

    let mut cache = PriceCache::default();
    let rate_1 = cache.resolve(api, core::local_instant(args.date_1, args.hour_1)?)?;
    let rate_2 = cache.resolve(api, core::local_instant(args.date_2, args.hour_2)?)?;
    let comparison = Comparison::new(rate_1, rate_2, total_energy);
    let credited = state.ledger.credit(comparison.credit());

    for row in &projection.rows {
        println!("• {} × {}: {} ({})", row.quantity, row.name, row.energy, row.unit);
    }
    println!("Total consumption: {total_energy}");
    println!(
        "{} {:02}:00 at {rate_1}: {}",
        args.date_1, args.hour_1, comparison.cost_1,
    );
    println!(
        "{} {:02}:00 at {rate_2}: {}",
        args.date_2, args.hour_2, comparison.cost_2,
    );
    let savings = comparison.savings();
    if savings > quantities::cost::Cost::ZERO {
        println!("The second time is cheaper by {savings}.");
    } else if savings < quantities::cost::Cost::ZERO {
        println!("The first time is cheaper by {}.", savings.abs());
    } else {
        println!("Both times cost the same.");
    }
    println!(
        "Credited {credited} to the ledger: {} over {} calculations.",
        state.ledger.total, state.ledger.runs,
    );
    Ok(())
}
