use chrono::{Datelike, Days, Local, NaiveDate, NaiveTime, SecondsFormat, TimeZone, Utc};

pub const DAY_LABELS: [&str; 7] = ["Sön", "Mån", "Tis", "Ons", "Tor", "Fre", "Lör"];

const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "maj", "jun", "jul", "aug", "sep", "okt", "nov", "dec",
];

const WEEKDAYS: [&str; 7] = [
    "Söndag", "Måndag", "Tisdag", "Onsdag", "Torsdag", "Fredag", "Lördag",
];

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// The seven dates of the Sunday-start week containing `today`.
pub fn week_dates(today: NaiveDate) -> [NaiveDate; 7] {
    let back = today.weekday().num_days_from_sunday() as u64;
    let sunday = today - Days::new(back);
    std::array::from_fn(|i| sunday + Days::new(i as u64))
}

/// Canonical `scheduled_date` value: midnight UTC as RFC 3339. Every
/// workout lookup and insert uses this exact string, so date matching is
/// plain equality.
pub fn midnight_utc(date: NaiveDate) -> String {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
        .to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// "Tisdag 4 aug"
pub fn format_date_long(date: NaiveDate) -> String {
    let weekday = WEEKDAYS[date.weekday().num_days_from_sunday() as usize];
    let month = MONTHS[date.month0() as usize];
    format!("{} {} {}", weekday, date.day(), month)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn week_starts_on_sunday_and_contains_today() {
        // 2026-08-04 is a Tuesday.
        let week = week_dates(d(2026, 8, 4));
        assert_eq!(week[0], d(2026, 8, 2));
        assert_eq!(week[6], d(2026, 8, 8));
        assert!(week.contains(&d(2026, 8, 4)));
    }

    #[test]
    fn week_of_a_sunday_starts_on_that_sunday() {
        let week = week_dates(d(2026, 8, 2));
        assert_eq!(week[0], d(2026, 8, 2));
    }

    #[test]
    fn week_crosses_month_boundaries() {
        // 2026-07-01 is a Wednesday; its week starts in June.
        let week = week_dates(d(2026, 7, 1));
        assert_eq!(week[0], d(2026, 6, 28));
        assert_eq!(week[3], d(2026, 7, 1));
    }

    #[test]
    fn midnight_utc_is_stable_and_zero_houred() {
        assert_eq!(midnight_utc(d(2026, 8, 4)), "2026-08-04T00:00:00Z");
        // Equality matching depends on the same date always producing the
        // same string.
        assert_eq!(midnight_utc(d(2026, 8, 4)), midnight_utc(d(2026, 8, 4)));
    }

    #[test]
    fn long_format_is_swedish() {
        assert_eq!(format_date_long(d(2026, 8, 4)), "Tisdag 4 aug");
    }
}
