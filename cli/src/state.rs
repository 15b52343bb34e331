use std::path::Path;

use quantities::{cost::Cost, rate::CentsPerKilowattHour};
use serde::{Deserialize, Serialize};

use crate::{core::projection::PickMode, prelude::*};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Entry {
    pub name: String,
    pub quantity: u32,
}

/// Cumulative savings across calculations.
#[derive(Copy, Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Ledger {
    pub total: Cost,
    pub runs: u64,
}

impl Default for Ledger {
    fn default() -> Self {
        Self { total: Cost::ZERO, runs: 0 }
    }
}

impl Ledger {
    /// Credits are clamped at zero, the total never decreases.
    pub fn credit(&mut self, saved: Cost) -> Cost {
        let saved = saved.max(Cost::ZERO);
        self.total += saved;
        self.runs += 1;
        saved
    }
}

/// Persisted preferences: the selection, pick mode, ledger, and the watch
/// threshold. Unknown or corrupt contents fall back to defaults.
#[derive(Default, Deserialize, Serialize)]
#[serde(default)]
pub struct State {
    pub selection: Vec<Entry>,
    pub pick: PickMode,
    pub ledger: Ledger,
    pub watch_threshold: Option<CentsPerKilowattHour>,
}

impl State {
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn read_from(path: &Path) -> Self {
        Self::read_fallibly_from(path).unwrap_or_else(|error| {
            error!(
                error = format!("{error:#}"),
                "failed to load the state, falling back to defaults",
            );
            Self::default()
        })
    }

    fn read_fallibly_from(path: &Path) -> Result<Self> {
        if path.is_file() {
            Ok(serde_json::from_str(&std::fs::read_to_string(path)?)?)
        } else {
            Ok(Self::default())
        }
    }

    /// Best-effort write, a failure is logged but never fatal.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn write_to(&self, path: &Path) {
        let write = || -> Result { Ok(std::fs::write(path, serde_json::to_vec_pretty(self)?)?) };
        if let Err(error) = write() {
            error!(error = format!("{error:#}"), "failed to save the state");
        }
    }

    /// Upserts the appliance, a repeated selection only changes the quantity.
    pub fn select(&mut self, name: &str, quantity: u32) {
        let quantity = quantity.max(1);
        match self.selection.iter_mut().find(|entry| entry.name == name) {
            Some(entry) => entry.quantity = quantity,
            None => self.selection.push(Entry { name: name.to_owned(), quantity }),
        }
    }

    pub fn deselect(&mut self, name: &str) -> bool {
        let length_before = self.selection.len();
        self.selection.retain(|entry| entry.name != name);
        self.selection.len() != length_before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ledger_is_monotone() {
        let mut ledger = Ledger::default();
        assert_eq!(ledger.credit(Cost::from(0.5)), Cost::from(0.5));
        assert_eq!(ledger.credit(Cost::from(-1.0)), Cost::ZERO);
        assert_eq!(ledger.total, Cost::from(0.5));
        assert_eq!(ledger.runs, 2);
    }

    #[test]
    fn test_select_upserts() {
        let mut state = State::default();
        state.select("Pyykinpesukone", 1);
        state.select("Pyykinpesukone", 3);
        assert_eq!(state.selection.len(), 1);
        assert_eq!(state.selection[0].quantity, 3);
        assert!(state.deselect("Pyykinpesukone"));
        assert!(!state.deselect("Pyykinpesukone"));
    }

    #[test]
    fn test_select_bumps_zero_quantity() {
        let mut state = State::default();
        state.select("Jääkaappi", 0);
        assert_eq!(state.selection[0].quantity, 1);
    }

    #[test]
    fn test_corrupt_state_falls_back_to_defaults() {
        let path = std::env::temp_dir().join(format!("spot-saver-state-{}.json", std::process::id()));
        std::fs::write(&path, "{not json").unwrap();
        let state = State::read_from(&path);
        assert!(state.selection.is_empty());
        assert_eq!(state.ledger.runs, 0);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_round_trip() {
        let mut state = State::default();
        state.select("Sähkökiuas", 1);
        state.watch_threshold = Some(CentsPerKilowattHour::from(2.5));
        state.ledger.credit(Cost::from(1.25));
        let text = serde_json::to_string(&state).unwrap();
        let restored: State = serde_json::from_str(&text).unwrap();
        assert_eq!(restored.selection.len(), 1);
        assert_eq!(restored.watch_threshold, Some(CentsPerKilowattHour::from(2.5)));
        assert_eq!(restored.ledger.total, Cost::from(1.25));
    }
}
