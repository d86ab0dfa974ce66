use time::OffsetDateTime;

/// Current UTC time truncated to millisecond precision, the resolution
/// timestamps are persisted with.
pub fn now() -> OffsetDateTime {
    let now = OffsetDateTime::now_utc();
    now.replace_millisecond(now.millisecond()).unwrap_or(now)
}

pub fn to_millis(value: OffsetDateTime) -> i64 {
    (value.unix_timestamp_nanos() / 1_000_000) as i64
}

pub fn from_millis(value: i64) -> crate::Result<OffsetDateTime> {
    Ok(OffsetDateTime::from_unix_timestamp_nanos(
        i128::from(value) * 1_000_000,
    )?)
}
