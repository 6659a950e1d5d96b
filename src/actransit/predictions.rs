//! Pure transformations over already-fetched predictions. Nothing in here
//! touches the network.

use chrono::{DateTime, Duration, Utc};
use chrono_tz::America::Los_Angeles;
use itertools::Itertools;

use crate::actransit::time_util::{TimeParseError, parse_actransit_time, truncate_to_seconds};
use crate::model::actransit_api_model::{Prediction, Predictions};

impl Prediction {
    /// Duration from `now` until the predicted departure, truncated to whole
    /// seconds. Negative once the departure has passed.
    pub fn time_until_departure(&self, now: DateTime<Utc>) -> Result<Duration, TimeParseError> {
        let departure = parse_actransit_time(&self.predicted_departure)?;
        let now_pacific = now.with_timezone(&Los_Angeles);

        Ok(truncate_to_seconds(departure - now_pacific))
    }

    /// True if the line for this prediction is running early or late
    pub fn is_delayed(&self) -> bool {
        self.delay_seconds() != 0
    }

    /// The predicted delay as a duration. A malformed delay field counts as
    /// zero rather than failing the whole prediction.
    pub fn friendly_delay(&self) -> Duration {
        Duration::seconds(self.delay_seconds())
    }

    fn delay_seconds(&self) -> i64 {
        self.predicted_delay_in_seconds.parse().unwrap_or(0)
    }
}

/// Stable ascending sort on the predicted departure instant. Predictions
/// whose departure timestamp doesn't parse sort after all parsable ones,
/// keeping their relative input order.
pub fn sort_by_departure(predictions: &mut Predictions) {
    predictions.sort_by_cached_key(|p| {
        parse_actransit_time(&p.predicted_departure)
            .map(|t| t.timestamp())
            .unwrap_or(i64::MAX)
    });
}

/// Filters out similar predictions: ones for the same line with the same
/// predicted departure time. The first occurrence survives, even when the
/// duplicates are for different vehicles or trips.
pub fn filter_duplicates(predictions: Predictions) -> Predictions {
    predictions
        .into_iter()
        .unique_by(|p| (p.route_name.clone(), p.predicted_departure.clone()))
        .collect_vec()
}
