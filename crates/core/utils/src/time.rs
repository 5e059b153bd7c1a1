use chrono::Utc;

/// Current unix time in milliseconds
pub fn time_get_millis() -> i64 {
  Utc::now().timestamp_millis()
}
