use chrono::{DateTime, Utc};

/// Format an ISO 8601 timestamp as a long date, e.g. "January 15, 2024".
/// Falls back to the raw date portion if the string doesn't parse.
pub fn format_date(date: &str) -> String {
    match DateTime::parse_from_rfc3339(date) {
        Ok(dt) => dt.format("%B %-d, %Y").to_string(),
        Err(_) => fallback_date(date),
    }
}

/// Format an ISO 8601 timestamp as a short date, e.g. "Jan 15, 2024".
pub fn format_date_short(date: &str) -> String {
    match DateTime::parse_from_rfc3339(date) {
        Ok(dt) => dt.format("%b %-d, %Y").to_string(),
        Err(_) => fallback_date(date),
    }
}

/// Describe a timestamp relative to now: "Today", "Tomorrow", "3 days ago".
/// Dates more than a week out either way fall back to the short format.
pub fn relative_date(date: &str) -> String {
    relative_date_from(date, Utc::now())
}

fn relative_date_from(date: &str, now: DateTime<Utc>) -> String {
    let Ok(dt) = DateTime::parse_from_rfc3339(date) else {
        return fallback_date(date);
    };

    // Calendar-day difference: any time later today is still "Today".
    let days = (dt.with_timezone(&Utc).date_naive() - now.date_naive()).num_days();

    match days {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        -1 => "Yesterday".to_string(),
        2..=7 => format!("In {} days", days),
        -7..=-2 => format!("{} days ago", -days),
        _ => format_date_short(date),
    }
}

fn fallback_date(date: &str) -> String {
    if date.len() >= 10 {
        date.chars().take(10).collect()
    } else {
        date.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2024-01-15T10:30:00Z"), "January 15, 2024");
        assert_eq!(format_date("2024-06-03T00:00:00+02:00"), "June 3, 2024");
    }

    #[test]
    fn test_format_date_short() {
        assert_eq!(format_date_short("2024-01-15T10:30:00Z"), "Jan 15, 2024");
    }

    #[test]
    fn test_format_date_fallback() {
        assert_eq!(format_date("2024-01-15 garbage"), "2024-01-15");
        assert_eq!(format_date("soon"), "soon");
    }

    #[test]
    fn test_relative_date() {
        let now: DateTime<Utc> = "2024-01-15T12:00:00Z".parse().unwrap();

        assert_eq!(relative_date_from("2024-01-15T18:00:00Z", now), "Today");
        assert_eq!(relative_date_from("2024-01-16T09:00:00Z", now), "Tomorrow");
        assert_eq!(relative_date_from("2024-01-14T12:00:00Z", now), "Yesterday");
        assert_eq!(relative_date_from("2024-01-18T12:00:00Z", now), "In 3 days");
        assert_eq!(relative_date_from("2024-01-11T06:00:00Z", now), "4 days ago");
        // Beyond a week falls back to the short date.
        assert_eq!(relative_date_from("2024-03-01T12:00:00Z", now), "Mar 1, 2024");
    }
}
