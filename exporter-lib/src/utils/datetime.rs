/// Current UTC time as an RFC 3339 string, used to stamp error log entries
pub fn get_utc_iso_datetime() -> String {
    return chrono::Utc::now().to_rfc3339();
}
