use std::path::Path;

use quantities::energy::KilowattHours;
use serde::Deserialize;

use crate::{core::projection::PickMode, prelude::*};

/// Static catalog entry. The unit string encodes how consumption accrues,
/// see [`UnitKind`].
#[derive(Clone, Debug, Deserialize)]
pub struct Appliance {
    pub category: String,
    pub name: String,
    pub min: KilowattHours,
    pub max: KilowattHours,
    pub unit: String,
    pub schedulable: bool,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum UnitKind {
    /// Flat per-day consumption («kWh/vrk»), not meaningfully time-shiftable.
    Daily,

    /// Accrues for every hour the appliance runs («kWh/h»).
    PerHour,

    /// Fixed cost per use, charged at the start time.
    PerUse,
}

impl Appliance {
    #[must_use]
    pub fn kind(&self) -> UnitKind {
        if self.unit.contains("kWh/vrk") {
            UnitKind::Daily
        } else if self.unit.contains("kWh/h") {
            UnitKind::PerHour
        } else {
            UnitKind::PerUse
        }
    }

    #[must_use]
    pub fn picked(&self, mode: PickMode) -> KilowattHours {
        match mode {
            PickMode::Min => self.min,
            PickMode::Max => self.max,
            PickMode::Average => (self.min + self.max) / 2.0,
        }
    }

    /// Whether shifting this appliance to another hour changes its cost.
    #[must_use]
    pub fn is_time_shiftable(&self) -> bool {
        self.schedulable && self.kind() != UnitKind::Daily
    }
}

pub struct Catalog(Vec<Appliance>);

#[derive(Deserialize)]
struct CatalogFile {
    appliance: Vec<Appliance>,
}

impl Catalog {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read the catalog at `{}`", path.display()))?;
                Self::parse(&text)
            }
            None => Self::builtin(),
        }
    }

    pub fn builtin() -> Result<Self> {
        Self::parse(include_str!("../catalog.toml"))
    }

    fn parse(text: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(text).context("malformed appliance catalog")?;
        ensure!(!file.appliance.is_empty(), "the appliance catalog is empty");
        Ok(Self(file.appliance))
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Appliance> {
        self.0.iter().find(|appliance| appliance.name == name)
    }

    #[must_use]
    pub fn appliances(&self) -> &[Appliance] {
        &self.0
    }
}

/// Baseline appliances every preset starts from.
const PRESET_BASE: &[(&str, u32)] = &[
    ("Hehkulamppu 60 W (4 h/pv)", 1),
    ("LED-lamppu 8 W (4 h/pv)", 1),
    ("Jääkaappi", 1),
    ("Pakastin", 1),
];

const PRESETS: &[(&str, &[(&str, u32)])] = &[
    (
        "basic",
        &[
            ("Jääkaappi-pakastin", 1),
            ("Laajakaistamodeemi", 1),
            ("Televisio (LED)", 1),
            ("Digiboksi", 1),
            ("Kahvinkeitin", 1),
            ("Vedenkeitin", 1),
        ],
    ),
    ("laundry", &[("Pyykinpesukone", 1), ("Kuivausrumpu", 1), ("Kuivauskaappi", 1)]),
    (
        "kitchen",
        &[
            ("Astianpesukone", 1),
            ("Induktioliesi", 1),
            ("Mikroaaltouuni", 1),
            ("Vedenkeitin", 1),
            ("Kahvinkeitin", 1),
            ("Airfryer", 1),
        ],
    ),
    (
        "evening",
        &[
            ("Televisio (LED)", 1),
            ("Pelikonsoli", 1),
            ("Digiboksi", 1),
            ("Kannettava tietokone", 1),
        ],
    ),
];

#[must_use]
pub fn preset_ids() -> Vec<&'static str> {
    PRESETS.iter().map(|(id, _)| *id).collect()
}

/// Preset selection merged over the baseline appliances.
#[must_use]
pub fn preset(id: &str) -> Option<Vec<(&'static str, u32)>> {
    let (_, entries) = PRESETS.iter().find(|(preset_id, _)| *preset_id == id)?;
    let mut merged: Vec<(&'static str, u32)> = PRESET_BASE.to_vec();
    for entry in *entries {
        if !merged.iter().any(|(name, _)| name == &entry.0) {
            merged.push(*entry);
        }
    }
    Some(merged)
}
