use serde::{Deserialize, Deserializer, Serialize};

/// Element of the api response from https://api.actransit.org/transit/stops
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Stop {
    #[serde(rename = "StopId", deserialize_with = "string_or_number")]
    pub stop_id: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(
        rename = "Latitude",
        default,
        deserialize_with = "optional_string_or_number"
    )]
    pub latitude: Option<String>,
    #[serde(
        rename = "Longitude",
        default,
        deserialize_with = "optional_string_or_number"
    )]
    pub longitude: Option<String>,
    /// The API sends the literal string "null" for stops without a schedule
    #[serde(rename = "ScheduledTime", default)]
    pub scheduled_time: Option<String>,
}

impl Stop {
    pub fn latitude(&self) -> Option<f64> {
        self.latitude.as_deref().and_then(|l| l.parse().ok())
    }

    pub fn longitude(&self) -> Option<f64> {
        self.longitude.as_deref().and_then(|l| l.parse().ok())
    }
}

/// Element of the api response from
/// https://api.actransit.org/transit/stops/:stopId/predictions
///
/// Timestamps are naive local times in America/Los_Angeles with no offset,
/// e.g. "2017-04-17T22:30:00". Numeric fields are kept as the raw decimal
/// strings the API sends and only converted where arithmetic is needed.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Prediction {
    #[serde(rename = "StopId", deserialize_with = "string_or_number")]
    pub stop_id: String,
    #[serde(rename = "TripId", deserialize_with = "string_or_number")]
    pub trip_id: String,
    #[serde(rename = "VehicleId", deserialize_with = "string_or_number")]
    pub vehicle_id: String,
    #[serde(rename = "RouteName")]
    pub route_name: String,
    /// Negative means early, positive means late, zero means on time
    #[serde(
        rename = "PredictedDelayInSeconds",
        deserialize_with = "string_or_number"
    )]
    pub predicted_delay_in_seconds: String,
    #[serde(rename = "PredictedDeparture")]
    pub predicted_departure: String,
    #[serde(rename = "PredictionDateTime")]
    pub prediction_date_time: String,
}

pub type Predictions = Vec<Prediction>;

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Number(serde_json::Number),
}

impl From<StringOrNumber> for String {
    fn from(value: StringOrNumber) -> Self {
        match value {
            StringOrNumber::String(s) => s,
            StringOrNumber::Number(n) => n.to_string(),
        }
    }
}

// The API is inconsistent about whether ids and coordinates are JSON strings
// or JSON numbers, so both are accepted
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(StringOrNumber::deserialize(deserializer)?.into())
}

fn optional_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<StringOrNumber>::deserialize(deserializer)?.map(String::from))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_decodes_string_and_number_fields() {
        let stops: Vec<Stop> = serde_json::from_str(
            r#"[
                {
                    "StopId": "58123",
                    "Name": "3rd St:Santa Clara Av",
                    "Latitude": "37.7732681",
                    "Longitude": "-122.2882275",
                    "ScheduledTime": "null"
                },
                {
                    "StopId": 52246,
                    "Name": "8th St:Portola Av",
                    "Latitude": 37.7688136,
                    "Longitude": -122.2729918
                }
            ]"#,
        )
        .unwrap();

        assert_eq!(stops[0].stop_id, "58123");
        assert_eq!(stops[0].scheduled_time.as_deref(), Some("null"));
        assert_eq!(stops[1].stop_id, "52246");
        assert_eq!(stops[1].latitude.as_deref(), Some("37.7688136"));
        assert_eq!(stops[1].longitude(), Some(-122.2729918));
        assert_eq!(stops[1].scheduled_time, None);
    }

    #[test]
    fn prediction_decodes_api_field_names() {
        let prediction: Prediction = serde_json::from_str(
            r#"{
                "StopId": "55765",
                "TripId": 5340688,
                "VehicleId": "5019",
                "RouteName": "80",
                "PredictedDelayInSeconds": "-240",
                "PredictedDeparture": "2017-04-17T22:30:00",
                "PredictionDateTime": "2017-04-17T22:28:58"
            }"#,
        )
        .unwrap();

        assert_eq!(prediction.trip_id, "5340688");
        assert_eq!(prediction.route_name, "80");
        assert_eq!(prediction.predicted_delay_in_seconds, "-240");
    }
}
