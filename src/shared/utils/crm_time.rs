use chrono::{DateTime, NaiveDate, TimeZone, Utc};

/// Parse the timestamp shapes the CRM emits.
///
/// Accepts RFC 3339 (`2024-05-02T09:00:00.000Z`), epoch milliseconds
/// (`1714640400000`) and plain dates (`2024-05-02`, read as midnight UTC).
pub fn parse_crm_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    if let Ok(millis) = raw.parse::<i64>() {
        return Utc.timestamp_millis_opt(millis).single();
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| Utc.from_utc_datetime(&dt))
}
