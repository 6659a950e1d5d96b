use chrono::{DateTime, Duration, NaiveDateTime, TimeZone};
use chrono_tz::America::Los_Angeles;
use chrono_tz::Tz;

/// Timestamp layout used everywhere in the AC Transit API, e.g.
/// "2017-04-17T22:30:00". Naive local time, always America/Los_Angeles.
pub const ACTRANSIT_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(thiserror::Error, Debug)]
pub enum TimeParseError {
    #[error("error parsing timestamp")]
    Parse(#[from] chrono::ParseError),

    #[error("timestamp {0} does not exist in America/Los_Angeles")]
    NonexistentLocalTime(String),
}

/// Anchors a naive API timestamp to America/Los_Angeles. An ambiguous local
/// time (DST fall-back) resolves to the earlier instant; a nonexistent one
/// (spring-forward gap) is an error.
pub fn parse_actransit_time(s: &str) -> Result<DateTime<Tz>, TimeParseError> {
    let naive = NaiveDateTime::parse_from_str(s, ACTRANSIT_TIME_FORMAT)?;

    naive
        .and_local_timezone(Los_Angeles)
        .earliest()
        .ok_or_else(|| TimeParseError::NonexistentLocalTime(s.to_string()))
}

pub fn format_actransit_time<Z: TimeZone>(t: DateTime<Z>) -> String {
    t.with_timezone(&Los_Angeles)
        .format(ACTRANSIT_TIME_FORMAT)
        .to_string()
}

/// Drops the sub-second remainder, truncating towards zero so negative
/// durations keep their sign
pub fn truncate_to_seconds(duration: Duration) -> Duration {
    Duration::seconds(duration.num_seconds())
}
