//! Query API over the AC Transit upstream: fetch, then normalize.

pub mod client;
pub mod predictions;
pub mod time_util;

use crate::model::actransit_api_model::{Predictions, Stop};
use client::{TransitClient, TransitError};

/// Retrieves all available stops. Pass-through to the client; the stop list
/// gets no further processing.
pub async fn get_all_stops(
    client: &TransitClient,
    url_override: Option<&str>,
) -> Result<Vec<Stop>, TransitError> {
    client.fetch_stops(url_override).await
}

/// Retrieves predictions for a stop by ID, sorted by ascending departure.
/// Deduplication is opt-in, callers that want it apply
/// [`predictions::filter_duplicates`] to the result.
pub async fn get_predictions_for_stop(
    client: &TransitClient,
    stop_id: &str,
    url_override: Option<&str>,
) -> Result<Predictions, TransitError> {
    let mut predictions = client.fetch_predictions(stop_id, url_override).await?;
    predictions::sort_by_departure(&mut predictions);

    Ok(predictions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::routing::get;

    #[tokio::test]
    async fn predictions_for_stop_come_back_sorted() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let router = Router::new().route(
            "/",
            get(|| async {
                r#"[
                    {
                        "StopId": "55765",
                        "TripId": "5340688",
                        "VehicleId": "5019",
                        "RouteName": "80",
                        "PredictedDelayInSeconds": "-240",
                        "PredictedDeparture": "2017-04-17T22:43:00",
                        "PredictionDateTime": "2017-04-17T22:28:58"
                    },
                    {
                        "StopId": "55765",
                        "TripId": "5340689",
                        "VehicleId": "5117",
                        "RouteName": "80",
                        "PredictedDelayInSeconds": "-1860",
                        "PredictedDeparture": "2017-04-17T22:30:00",
                        "PredictionDateTime": "2017-04-17T22:28:48"
                    }
                ]"#
            }),
        );
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        let client = TransitClient::new("1234".to_string());
        let predictions = get_predictions_for_stop(&client, "55765", Some(&format!("http://{addr}")))
            .await
            .unwrap();

        assert_eq!(predictions[0].predicted_departure, "2017-04-17T22:30:00");
        assert_eq!(predictions[1].predicted_departure, "2017-04-17T22:43:00");
    }
}
