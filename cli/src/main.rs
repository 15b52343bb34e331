mod api;
mod cache;
mod catalog;
mod cli;
mod core;
mod prelude;
mod state;
mod tables;

use clap::{Parser, crate_version};

use crate::{
    api::proxy::Api,
    catalog::Catalog,
    cli::{Args, Command},
    prelude::*,
    state::State,
};

fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().without_time().compact().init();

    let args = Args::parse();
    info!(version = crate_version!(), "starting…");

    let catalog = Catalog::load(args.catalog_path.as_deref())?;
    let mut state = State::read_from(&args.state_path);
    let api = Api::new(args.proxy_url.clone());

    match &args.command {
        Command::Devices => cli::selection::devices(&catalog),
        Command::Select(select_args) => {
            cli::selection::select(&catalog, &mut state, select_args)?;
            state.write_to(&args.state_path);
        }
        Command::Deselect(deselect_args) => {
            cli::selection::deselect(&mut state, deselect_args)?;
            state.write_to(&args.state_path);
        }
        Command::Preset(preset_args) => {
            cli::selection::preset(&catalog, &mut state, preset_args)?;
            state.write_to(&args.state_path);
        }
        Command::Calculate(calculate_args) => {
            cli::calculate::run(&catalog, &mut state, &api, calculate_args)?;
            state.write_to(&args.state_path);
        }
        Command::Suggest(suggest_args) => {
            cli::suggest::run(&catalog, &mut state, &api, suggest_args)?;
            state.write_to(&args.state_path);
        }
        Command::Prices(prices_args) => cli::prices::run(&api, prices_args)?,
        Command::Watch(watch_args) => {
            // The threshold is persisted up front, the loop may never return.
            cli::watch::run(&mut state, &args.state_path, &api, watch_args)?;
        }
        Command::Savings => {
            println!(
                "Saved {} over {} calculations.",
                state.ledger.total, state.ledger.runs,
            );
        }
        Command::Feedback(feedback_args) => cli::feedback::feedback(&api, feedback_args)?,
        Command::Activate(activate_args) => cli::feedback::activate(&api, activate_args)?,
    }
    Ok(())
}
