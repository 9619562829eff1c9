// Timestamp conversion between the wire (ISO-8601), forms and display.

use chrono::{DateTime, NaiveDateTime, Utc};

/// `datetime-local` style text used in forms.
pub const FORM_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Parse form text as a UTC timestamp. Accepts `YYYY-MM-DDTHH:MM`, an
/// optional seconds component, or a full RFC 3339 string.
pub fn parse_form_datetime(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S", FORM_DATETIME_FORMAT, "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .map(|naive| naive.and_utc())
}

pub fn to_form_datetime(dt: &DateTime<Utc>) -> String {
    dt.format(FORM_DATETIME_FORMAT).to_string()
}

/// Pre-filled value for datetime inputs of a new record: start of today.
pub fn default_form_datetime(now: DateTime<Utc>) -> String {
    now.date_naive()
        .and_hms_opt(0, 0, 0)
        .map(|midnight| midnight.format(FORM_DATETIME_FORMAT).to_string())
        .unwrap_or_default()
}

pub fn format_display(dt: &DateTime<Utc>, fmt: &str) -> String {
    dt.format(fmt).to_string()
}

/// Render a wire timestamp string for display; unparseable input is shown
/// unchanged.
pub fn display_wire_instant(wire: &str, fmt: &str) -> String {
    match DateTime::parse_from_rfc3339(wire) {
        Ok(dt) => format_display(&dt.with_timezone(&Utc), fmt),
        Err(_) => wire.to_string(),
    }
}

/// Convert a wire timestamp string to form text; unparseable input is kept.
pub fn wire_to_form(wire: &str) -> String {
    match DateTime::parse_from_rfc3339(wire) {
        Ok(dt) => to_form_datetime(&dt.with_timezone(&Utc)),
        Err(_) => wire.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_form_minutes_as_utc() {
        let dt = parse_form_datetime("2024-05-01T09:30").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap());
        assert_eq!(to_form_datetime(&dt), "2024-05-01T09:30");
    }

    #[test]
    fn accepts_seconds_and_rfc3339() {
        assert_eq!(
            parse_form_datetime("2024-05-01T09:30:15"),
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 15).unwrap())
        );
        assert_eq!(
            parse_form_datetime("2024-05-01T11:30:00+02:00"),
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap())
        );
        assert_eq!(parse_form_datetime("yesterday"), None);
        assert_eq!(parse_form_datetime("  "), None);
    }

    #[test]
    fn default_is_start_of_day() {
        let now = Utc.with_ymd_and_hms(2024, 12, 24, 18, 45, 3).unwrap();
        assert_eq!(default_form_datetime(now), "2024-12-24T00:00");
    }

    #[test]
    fn display_formats() {
        assert_eq!(
            display_wire_instant("2024-05-01T09:30:00Z", "%d/%m/%y %H:%M"),
            "01/05/24 09:30"
        );
        assert_eq!(display_wire_instant("not a date", "%d/%m/%y"), "not a date");
        assert_eq!(wire_to_form("2024-05-01T09:30:00Z"), "2024-05-01T09:30");
    }
}
