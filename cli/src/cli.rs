pub mod calculate;
pub mod feedback;
pub mod prices;
pub mod selection;
pub mod suggest;
pub mod watch;

use std::{path::PathBuf, time::Duration};

use chrono::NaiveDate;
use clap::{Parser, Subcommand, value_parser};
use quantities::rate::CentsPerKilowattHour;

use crate::core::projection::PickMode;

#[derive(Parser)]
#[command(author, version, about)]
pub struct Args {
    /// Price proxy base URL.
    #[clap(long = "proxy-url", default_value = "http://localhost:8787", env = "PROXY_URL")]
    pub proxy_url: String,

    /// Where the selection, preferences, and savings ledger live.
    #[clap(long = "state-path", default_value = "spot-saver.json", env = "STATE_PATH")]
    pub state_path: PathBuf,

    /// Appliance catalog override (TOML), the built-in catalog otherwise.
    #[clap(long = "catalog-path", env = "CATALOG_PATH")]
    pub catalog_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the appliance catalog.
    #[clap(name = "devices")]
    Devices,

    /// Add appliances to the selection or change their quantity.
    #[clap(name = "select")]
    Select(SelectArgs),

    /// Remove appliances from the selection.
    #[clap(name = "deselect")]
    Deselect(DeselectArgs),

    /// Replace the selection with a named preset.
    #[clap(name = "preset")]
    Preset(PresetArgs),

    /// Compare the cost of the selection between two points in time.
    #[clap(name = "calculate")]
    Calculate(CalculateArgs),

    /// Find the cheapest contiguous start window on a day.
    #[clap(name = "suggest")]
    Suggest(SuggestArgs),

    /// Show a day's hourly spot prices.
    #[clap(name = "prices")]
    Prices(PricesArgs),

    /// Poll the prices and alert when the cheapest hour drops below the threshold.
    #[clap(name = "watch")]
    Watch(WatchArgs),

    /// Show the cumulative savings ledger.
    #[clap(name = "savings")]
    Savings,

    /// Send feedback to the maintainers.
    #[clap(name = "feedback")]
    Feedback(FeedbackArgs),

    /// Validate a premium key and record the activation.
    #[clap(name = "activate")]
    Activate(ActivateArgs),
}

#[derive(clap::Args)]
pub struct SelectArgs {
    /// Appliance names as printed by `devices`.
    #[clap(required = true)]
    pub names: Vec<String>,

    /// Count or uses per day.
    #[clap(long, default_value = "1")]
    pub quantity: u32,
}

#[derive(clap::Args)]
pub struct DeselectArgs {
    #[clap(required = true)]
    pub names: Vec<String>,
}

#[derive(clap::Args)]
pub struct PresetArgs {
    /// One of: `basic`, `laundry`, `kitchen`, `evening`.
    pub id: String,
}

#[derive(clap::Args)]
pub struct CalculateArgs {
    /// First point in time: date…
    #[clap(long = "date-1")]
    pub date_1: NaiveDate,

    /// …and hour of the local day.
    #[clap(long = "hour-1", value_parser = value_parser!(u32).range(0..=23))]
    pub hour_1: u32,

    /// Second point in time: date…
    #[clap(long = "date-2")]
    pub date_2: NaiveDate,

    /// …and hour of the local day.
    #[clap(long = "hour-2", value_parser = value_parser!(u32).range(0..=23))]
    pub hour_2: u32,

    /// Which end of each appliance's consumption range to use.
    /// Defaults to the stored preference.
    #[clap(long, value_enum)]
    pub pick: Option<PickMode>,
}

#[derive(clap::Args)]
pub struct SuggestArgs {
    /// Day to optimize for.
    #[clap(long)]
    pub date: NaiveDate,

    /// Run length in hours.
    #[clap(long, default_value = "1", value_parser = value_parser!(u32).range(1..=24))]
    pub duration: u32,

    /// Earliest allowed start hour.
    #[clap(long = "window-start", default_value = "0", value_parser = value_parser!(u32).range(0..=23))]
    pub window_start: u32,

    /// Latest allowed hour, order-independent with the start.
    #[clap(long = "window-end", default_value = "23", value_parser = value_parser!(u32).range(0..=23))]
    pub window_end: u32,

    /// Which end of each appliance's consumption range to use.
    #[clap(long, value_enum)]
    pub pick: Option<PickMode>,
}

#[derive(clap::Args)]
pub struct PricesArgs {
    /// Defaults to the current local day.
    #[clap(long)]
    pub date: Option<NaiveDate>,
}

#[derive(clap::Args)]
pub struct WatchArgs {
    /// Alert when the cheapest upcoming hour is at or below this rate,
    /// in snt/kWh. Defaults to the stored threshold.
    #[clap(long, value_parser = CentsPerKilowattHour::parse_lenient)]
    pub threshold: Option<CentsPerKilowattHour>,

    /// Polling period.
    #[clap(long, default_value = "5m", value_parser = humantime::parse_duration)]
    pub period: Duration,

    /// Full reload period, a staleness safety net on top of the
    /// change-detection polls.
    #[clap(long = "reload-every", default_value = "1h", value_parser = humantime::parse_duration)]
    pub reload_every: Duration,

    /// Stop after this many polls, useful for scripting. Runs forever otherwise.
    #[clap(long)]
    pub polls: Option<u64>,
}

#[derive(clap::Args)]
pub struct FeedbackArgs {
    /// Free-form message.
    pub message: String,

    /// Sender name, stored as anonymous when omitted.
    #[clap(long)]
    pub name: Option<String>,

    /// Rating, e.g. `5/5`.
    #[clap(long)]
    pub rating: Option<String>,
}

#[derive(clap::Args)]
pub struct ActivateArgs {
    /// Premium key, case-insensitive.
    pub key: String,

    /// Identifier the activation is recorded for.
    #[clap(long = "device-id")]
    pub device_id: String,
}
