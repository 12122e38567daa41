use chrono::{DateTime, Utc};

/// Export timestamp, e.g. `03/07/2024 02:05:09 PM`.
pub fn format_export_date(date: DateTime<Utc>) -> String {
    date.format("%m/%d/%Y %I:%M:%S %p").to_string()
}

pub fn format_optional_export_date(date: Option<DateTime<Utc>>) -> String {
    date.map(format_export_date).unwrap_or_default()
}

/// Whole days a client has been open: from (re)activation, or creation, until
/// deactivation or `now`.
pub fn days_open(
    created: DateTime<Utc>,
    reactivated: Option<DateTime<Utc>>,
    deactivated: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> i64 {
    let start = reactivated.unwrap_or(created);
    let end = deactivated.unwrap_or(now);
    (end - start).num_days().max(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn formats_twelve_hour_clock() {
        let date = Utc.with_ymd_and_hms(2024, 3, 7, 14, 5, 9).unwrap();
        assert_eq!(format_export_date(date), "03/07/2024 02:05:09 PM");
        assert_eq!(format_optional_export_date(None), "");
    }

    #[test]
    fn days_open_counts_until_now_or_deactivation() {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let now = created + Duration::days(10) + Duration::hours(5);

        assert_eq!(days_open(created, None, None, now), 10);
        assert_eq!(
            days_open(created, None, Some(created + Duration::days(3)), now),
            3
        );
        assert_eq!(
            days_open(created, Some(created + Duration::days(8)), None, now),
            2
        );
    }
}
