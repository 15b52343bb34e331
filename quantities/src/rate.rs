use std::{
    fmt::{Debug, Display, Formatter},
    num::ParseFloatError,
    ops::Mul,
};

use crate::{Quantity, cost::Cost, energy::KilowattHours};

/// Spot rate in euro cents per kilowatt-hour («snt/kWh»).
pub type CentsPerKilowattHour = Quantity<-1, 1>;

impl CentsPerKilowattHour {
    /// Parse a rate that may use a comma as the decimal separator,
    /// as some upstream feeds format prices in the Finnish locale.
    pub fn parse_lenient(text: &str) -> Result<Self, ParseFloatError> {
        text.trim().replace(',', ".").parse::<f64>().map(Self::from)
    }
}

/// The rate is held in cents, hence the conversion to euros here.
impl Mul<KilowattHours> for CentsPerKilowattHour {
    type Output = Cost;

    fn mul(self, rhs: KilowattHours) -> Self::Output {
        Cost::from(self.0.0 / 100.0 * rhs.0.0)
    }
}

/// Arithmetic mean of the rates, or [`None`] for an empty slice.
#[must_use]
pub fn mean(rates: &[CentsPerKilowattHour]) -> Option<CentsPerKilowattHour> {
    if rates.is_empty() {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let count = rates.len() as f64;
    Some(rates.iter().copied().sum::<CentsPerKilowattHour>() / count)
}

impl Display for CentsPerKilowattHour {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2} snt/kWh", self.0)
    }
}

impl Debug for CentsPerKilowattHour {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}snt/kWh", self.0)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_parse_lenient_dot() {
        assert_eq!(CentsPerKilowattHour::parse_lenient("8.2").unwrap().into_inner(), 8.2);
    }

    #[test]
    fn test_parse_lenient_comma() {
        assert_eq!(CentsPerKilowattHour::parse_lenient(" 8,25 ").unwrap().into_inner(), 8.25);
    }

    #[test]
    fn test_parse_lenient_garbage() {
        assert!(CentsPerKilowattHour::parse_lenient("n/a").is_err());
    }

    #[test]
    fn test_cost_conversion() {
        // 10 snt/kWh over 2 kWh is 20 cents.
        let cost = CentsPerKilowattHour::from(10.0) * KilowattHours::from(2.0);
        assert_abs_diff_eq!(cost.into_inner(), 0.2);
    }

    #[test]
    fn test_mean() {
        let rates = [CentsPerKilowattHour::from(1.0), CentsPerKilowattHour::from(3.0)];
        assert_eq!(mean(&rates), Some(CentsPerKilowattHour::from(2.0)));
        assert_eq!(mean(&[]), None);
    }
}
