pub mod compare;
pub mod projection;
pub mod window;

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};

use crate::prelude::*;

/// Local wall-clock (date, hour) as a UTC instant.
pub fn local_instant(date: NaiveDate, hour: u32) -> Result<DateTime<Utc>> {
    ensure!(hour <= 23, "the hour must be within 0..=23, got {hour}");
    let naive = date.and_hms_opt(hour, 0, 0).context("invalid time of day")?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .with_context(|| format!("`{naive}` does not exist in the local timezone"))
        .map(|local| local.to_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_instant_rejects_bad_hour() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        assert!(local_instant(date, 24).is_err());
        assert!(local_instant(date, 23).is_ok());
    }
}
