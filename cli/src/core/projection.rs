use clap::ValueEnum;
use quantities::energy::KilowattHours;
use serde::{Deserialize, Serialize};

use crate::{
    catalog::{Catalog, UnitKind},
    prelude::*,
    state::Entry,
};

/// Which end of an appliance's consumption range a calculation uses.
/// Global per calculation, not per appliance.
#[derive(
    ValueEnum, Copy, Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize,
)]
#[serde(rename_all = "snake_case")]
pub enum PickMode {
    Min,
    Max,
    #[default]
    Average,
}

#[derive(Clone, Debug)]
pub struct Row {
    pub name: String,
    pub unit: String,
    pub kind: UnitKind,
    pub quantity: u32,
    pub energy: KilowattHours,
    pub time_shiftable: bool,
}

/// The selection projected onto concrete energy figures.
pub struct Projection {
    pub rows: Vec<Row>,
}

impl Projection {
    pub fn project(catalog: &Catalog, selection: &[Entry], mode: PickMode) -> Result<Self> {
        let rows = selection
            .iter()
            .map(|entry| {
                let appliance = catalog
                    .get(&entry.name)
                    .with_context(|| format!("unknown appliance `{}`", entry.name))?;
                let quantity = entry.quantity.max(1);
                Ok(Row {
                    name: appliance.name.clone(),
                    unit: appliance.unit.clone(),
                    kind: appliance.kind(),
                    quantity,
                    energy: appliance.picked(mode) * f64::from(quantity),
                    time_shiftable: appliance.is_time_shiftable(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rows })
    }

    /// Everything, shiftable or not: the two-point comparison charges it all.
    #[must_use]
    pub fn total_energy(&self) -> KilowattHours {
        self.rows.iter().map(|row| row.energy).sum()
    }

    pub fn shiftable(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter().filter(|row| row.time_shiftable)
    }

    /// Daily or non-schedulable rows, excluded from window optimization.
    pub fn fixed(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter().filter(|row| !row.time_shiftable)
    }

    #[must_use]
    pub fn shiftable_energy(&self, kind: UnitKind) -> KilowattHours {
        self.shiftable().filter(|row| row.kind == kind).map(|row| row.energy).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selection(entries: &[(&str, u32)]) -> Vec<Entry> {
        entries
            .iter()
            .map(|(name, quantity)| Entry { name: (*name).to_owned(), quantity: *quantity })
            .collect()
    }

    #[test]
    fn test_quantity_scales_energy() {
        let catalog = Catalog::builtin().unwrap();
        let projection =
            Projection::project(&catalog, &selection(&[("Vedenkeitin", 3)]), PickMode::Max)
                .unwrap();
        // 0.2 kWh per use, three uses.
        assert_eq!(projection.total_energy(), KilowattHours::from(0.2) * 3.0);
    }

    #[test]
    fn test_zero_quantity_is_bumped_to_one() {
        let catalog = Catalog::builtin().unwrap();
        let projection =
            Projection::project(&catalog, &selection(&[("Vedenkeitin", 0)]), PickMode::Max)
                .unwrap();
        assert_eq!(projection.total_energy(), KilowattHours::from(0.2));
    }

    #[test]
    fn test_unknown_appliance_is_rejected() {
        let catalog = Catalog::builtin().unwrap();
        assert!(Projection::project(&catalog, &selection(&[("Fusion reactor", 1)]), PickMode::Min)
            .is_err());
    }

    #[test]
    fn test_shiftable_split() {
        let catalog = Catalog::builtin().unwrap();
        // A fridge (daily) and a washer (per use).
        let projection = Projection::project(
            &catalog,
            &selection(&[("Jääkaappi", 1), ("Pyykinpesukone", 1)]),
            PickMode::Average,
        )
        .unwrap();
        assert_eq!(projection.shiftable().count(), 1);
        assert_eq!(projection.fixed().count(), 1);
        assert_eq!(
            projection.shiftable_energy(UnitKind::PerUse),
            KilowattHours::from((0.2 + 2.5) / 2.0),
        );
        assert_eq!(projection.shiftable_energy(UnitKind::PerHour), KilowattHours::ZERO);
    }

    #[test]
    fn test_empty_selection_has_zero_energy() {
        let catalog = Catalog::builtin().unwrap();
        let projection = Projection::project(&catalog, &[], PickMode::Average).unwrap();
        assert_eq!(projection.total_energy(), KilowattHours::ZERO);
    }
}
