use quantities::{cost::Cost, energy::KilowattHours, rate::CentsPerKilowattHour};

/// The same consumption charged at two points in time.
#[derive(Clone, Copy, Debug)]
pub struct Comparison {
    pub rate_1: CentsPerKilowattHour,
    pub rate_2: CentsPerKilowattHour,
    pub cost_1: Cost,
    pub cost_2: Cost,
}

impl Comparison {
    #[must_use]
    pub fn new(
        rate_1: CentsPerKilowattHour,
        rate_2: CentsPerKilowattHour,
        energy: KilowattHours,
    ) -> Self {
        Self { rate_1, rate_2, cost_1: rate_1 * energy, cost_2: rate_2 * energy }
    }

    /// Positive when the second point in time is the cheaper one.
    #[must_use]
    pub fn savings(&self) -> Cost {
        self.cost_1 - self.cost_2
    }

    /// Credit towards the savings ledger. A comparison that went the wrong
    /// way credits nothing rather than debiting.
    #[must_use]
    pub fn credit(&self) -> Cost {
        self.savings().max(Cost::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_savings() {
        let comparison = Comparison::new(
            CentsPerKilowattHour::from(10.0),
            CentsPerKilowattHour::from(5.0),
            KilowattHours::from(2.0),
        );
        // 2 kWh at 5 snt/kWh cheaper: 10 cents.
        assert_eq!(comparison.savings(), Cost::from(0.1));
        assert_eq!(comparison.credit(), Cost::from(0.1));
    }

    #[test]
    fn test_savings_is_antisymmetric() {
        let energy = KilowattHours::from(3.5);
        let forward = Comparison::new(
            CentsPerKilowattHour::from(12.34),
            CentsPerKilowattHour::from(4.56),
            energy,
        );
        let backward = Comparison::new(
            CentsPerKilowattHour::from(4.56),
            CentsPerKilowattHour::from(12.34),
            energy,
        );
        assert_eq!(forward.savings(), -backward.savings());
    }

    #[test]
    fn test_loss_credits_nothing() {
        let comparison = Comparison::new(
            CentsPerKilowattHour::from(5.0),
            CentsPerKilowattHour::from(10.0),
            KilowattHours::from(2.0),
        );
        assert!(comparison.savings() < Cost::ZERO);
        assert_eq!(comparison.credit(), Cost::ZERO);
    }

    #[test]
    fn test_zero_energy_costs_nothing() {
        let comparison = Comparison::new(
            CentsPerKilowattHour::from(50.0),
            CentsPerKilowattHour::from(1.0),
            KilowattHours::ZERO,
        );
        assert_eq!(comparison.cost_1, Cost::ZERO);
        assert_eq!(comparison.savings(), Cost::ZERO);
    }
}
