use quantities::{
    cost::Cost,
    energy::KilowattHours,
    rate::{self, CentsPerKilowattHour},
};

/// Candidate placement of a contiguous run within the day's hourly prices.
#[derive(Clone, Debug, PartialEq)]
pub struct Window {
    pub start_hour: u32,
    pub duration: u32,
    pub mean: CentsPerKilowattHour,
}

impl Window {
    /// Last hour still inside the window.
    #[must_use]
    pub const fn end_hour(&self) -> u32 {
        self.start_hour + self.duration - 1
    }

    #[must_use]
    pub fn slice<'a>(&self, prices: &'a [CentsPerKilowattHour]) -> &'a [CentsPerKilowattHour] {
        &prices[self.start_hour as usize..(self.start_hour + self.duration) as usize]
    }
}

/// Order-independent interval bounds, each clamped to the day.
#[must_use]
pub fn normalize_bounds(start: u32, end: u32) -> (u32, u32) {
    let start = start.min(23);
    let end = end.min(23);
    (start.min(end), start.max(end))
}

#[must_use]
pub fn clamp_duration(duration: u32) -> u32 {
    duration.clamp(1, 24)
}

/// Every placement that fits inside the bounds, in start order. Empty when
/// the bounded interval is shorter than the duration.
#[must_use]
pub fn candidates(
    prices: &[CentsPerKilowattHour],
    bounds: (u32, u32),
    duration: u32,
) -> Vec<Window> {
    if prices.is_empty() {
        return Vec::new();
    }
    let (start, end) = bounds;
    #[allow(clippy::cast_possible_truncation)]
    let end = end.min(prices.len() as u32 - 1);
    let Some(last_start) = (end + 1).checked_sub(duration) else {
        return Vec::new();
    };
    if last_start < start {
        return Vec::new();
    }
    (start..=last_start)
        .filter_map(|hour| {
            let slice = &prices[hour as usize..(hour + duration) as usize];
            rate::mean(slice).map(|mean| Window { start_hour: hour, duration, mean })
        })
        .collect()
}

/// The placement with the lowest mean rate. On ties the earliest start wins,
/// so the scan keeps the incumbent unless a candidate is strictly cheaper.
#[must_use]
pub fn cheapest(candidates: &[Window]) -> Option<&Window> {
    let mut best: Option<&Window> = None;
    for candidate in candidates {
        if best.is_none_or(|best| candidate.mean < best.mean) {
            best = Some(candidate);
        }
    }
    best
}

/// Cost of running the schedulable selection within the slice. Per-use
/// energy is charged once at the slice's mean rate, per-hour energy at every
/// hour's actual rate.
#[must_use]
pub fn slice_cost(
    slice: &[CentsPerKilowattHour],
    per_use: KilowattHours,
    per_hour: KilowattHours,
) -> Cost {
    let per_use_cost = rate::mean(slice).map_or(Cost::ZERO, |mean| mean * per_use);
    let per_hour_cost = slice.iter().map(|&rate| rate * per_hour).sum::<Cost>();
    per_use_cost + per_hour_cost
}

/// Mean cost over all placements: what an arbitrarily chosen start hour
/// would cost on average.
#[must_use]
pub fn baseline_cost(
    prices: &[CentsPerKilowattHour],
    candidates: &[Window],
    per_use: KilowattHours,
    per_hour: KilowattHours,
) -> Option<Cost> {
    if candidates.is_empty() {
        return None;
    }
    let total: Cost = candidates
        .iter()
        .map(|window| slice_cost(window.slice(prices), per_use, per_hour))
        .sum();
    #[allow(clippy::cast_precision_loss)]
    let count = candidates.len() as f64;
    Some(total / count)
}

/// Cost of the most expensive placement.
#[must_use]
pub fn worst_cost(
    prices: &[CentsPerKilowattHour],
    candidates: &[Window],
    per_use: KilowattHours,
    per_hour: KilowattHours,
) -> Option<Cost> {
    candidates
        .iter()
        .map(|window| slice_cost(window.slice(prices), per_use, per_hour))
        .max()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rates(values: &[f64]) -> Vec<CentsPerKilowattHour> {
        values.iter().copied().map(CentsPerKilowattHour::from).collect()
    }

    #[test]
    fn test_normalize_bounds() {
        assert_eq!(normalize_bounds(20, 6), (6, 20));
        assert_eq!(normalize_bounds(0, 99), (0, 23));
        assert_eq!(normalize_bounds(5, 5), (5, 5));
    }

    #[test]
    fn test_cheapest_finds_the_global_minimum() {
        let prices = rates(&[9.0, 8.0, 1.0, 1.0, 7.0, 6.0, 5.0, 4.0]);
        let candidates = candidates(&prices, (0, 7), 2);
        let best = cheapest(&candidates).unwrap();
        assert_eq!(best.start_hour, 2);
        assert_eq!(best.end_hour(), 3);
        assert_eq!(best.mean, CentsPerKilowattHour::from(1.0));
        for candidate in &candidates {
            assert!(best.mean <= candidate.mean);
        }
    }

    #[test]
    fn test_tie_prefers_the_earlier_start() {
        let prices = rates(&[2.0, 2.0, 5.0, 2.0, 2.0]);
        let candidates = candidates(&prices, (0, 4), 2);
        assert_eq!(cheapest(&candidates).unwrap().start_hour, 0);
    }

    #[test]
    fn test_too_short_interval_has_no_candidates() {
        let prices = rates(&[1.0, 2.0, 3.0, 4.0]);
        assert!(candidates(&prices, (1, 2), 3).is_empty());
        assert!(cheapest(&[]).is_none());
    }

    #[test]
    fn test_duration_filling_the_interval_is_the_only_candidate() {
        let prices = rates(&[5.0, 1.0, 3.0]);
        let candidates = candidates(&prices, (0, 2), 3);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].mean, CentsPerKilowattHour::from(3.0));
    }

    #[test]
    fn test_slice_cost_charges_the_kinds_differently() {
        let slice = rates(&[10.0, 20.0]);
        // Per-use: 1 kWh at the 15 snt/kWh mean. Per-hour: 1 kWh at each hour.
        let cost = slice_cost(&slice, KilowattHours::from(1.0), KilowattHours::from(1.0));
        approx::assert_relative_eq!(cost.into_inner(), 0.45);
    }

    #[test]
    fn test_baseline_sits_between_the_extremes() {
        let prices = rates(&[1.0, 2.0, 30.0, 4.0, 5.0, 6.0]);
        let candidates = candidates(&prices, (0, 5), 2);
        let per_use = KilowattHours::from(2.0);
        let best =
            slice_cost(cheapest(&candidates).unwrap().slice(&prices), per_use, KilowattHours::ZERO);
        let baseline = baseline_cost(&prices, &candidates, per_use, KilowattHours::ZERO).unwrap();
        let worst = worst_cost(&prices, &candidates, per_use, KilowattHours::ZERO).unwrap();
        assert!(best <= baseline);
        assert!(baseline <= worst);
    }
}
