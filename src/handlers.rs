//! Thin presentation layer over the query API. Handlers fetch, map errors to
//! responses, and render; all normalization happens in the core.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use chrono::Utc;
use itertools::Itertools;
use tracing::error;

use crate::actransit;
use crate::actransit::client::{TransitClient, TransitError};
use crate::model::actransit_api_model::Prediction;

/// Returns all transit stops as JSON
pub async fn all_transit_stops(State(client): State<TransitClient>) -> Response {
    let stops = match actransit::get_all_stops(&client, None).await {
        Ok(stops) => stops,
        Err(e) => return bad_gateway(e),
    };

    if stops.is_empty() {
        return not_found("No stops found");
    }

    Json(stops).into_response()
}

/// Returns a departure board for a specific stop
pub async fn transit_stop(
    State(client): State<TransitClient>,
    Path(stop_id): Path<String>,
) -> Response {
    let predictions = match actransit::get_predictions_for_stop(&client, &stop_id, None).await {
        Ok(predictions) => predictions,
        Err(e) => return bad_gateway(e),
    };

    let predictions = actransit::predictions::filter_duplicates(predictions);
    if predictions.is_empty() {
        return not_found("No predictions found");
    }

    Html(render_predictions_page(&stop_id, &predictions)).into_response()
}

fn render_predictions_page(stop_id: &str, predictions: &[Prediction]) -> String {
    let now = Utc::now();
    let rows = predictions
        .iter()
        .map(|p| {
            let until = p
                .time_until_departure(now)
                .map(|d| format!("{} min", d.num_minutes()))
                .unwrap_or_else(|_| "unknown".to_string());
            let delay = if p.is_delayed() {
                format!("{} s off schedule", p.friendly_delay().num_seconds())
            } else {
                "on time".to_string()
            };

            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape_html(&p.route_name),
                escape_html(&p.predicted_departure),
                until,
                delay
            )
        })
        .join("\n");

    let stop_id = escape_html(stop_id);
    format!(
        "<!DOCTYPE html>\n<html><head><title>Predictions</title></head><body>\
         <h1>Departures for stop {stop_id}</h1>\
         <table>\
         <tr><th>Route</th><th>Departure</th><th>Leaves in</th><th>Status</th></tr>\n\
         {rows}\n\
         </table></body></html>"
    )
}

// The stop ID comes straight from the request path and route names from the
// upstream, neither can go into the page as-is
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn bad_gateway(e: TransitError) -> Response {
    error!("{e}");

    (
        StatusCode::BAD_GATEWAY,
        format!("Something went wrong while trying to retrieve AC Transit data: {e}"),
    )
        .into_response()
}

fn not_found(message: &str) -> Response {
    (StatusCode::NOT_FOUND, format!("Not Found 👻 -- {message}")).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_a_row_per_prediction() {
        let prediction = Prediction {
            stop_id: "55765".to_string(),
            trip_id: "5340688".to_string(),
            vehicle_id: "5019".to_string(),
            route_name: "80".to_string(),
            predicted_delay_in_seconds: "-240".to_string(),
            predicted_departure: "2017-04-17T22:30:00".to_string(),
            prediction_date_time: "2017-04-17T22:28:58".to_string(),
        };

        let page = render_predictions_page("55765", &[prediction]);

        assert!(page.contains("Departures for stop 55765"));
        assert!(page.contains("<td>80</td>"));
        assert!(page.contains("-240 s off schedule"));
    }

    #[test]
    fn escapes_markup_in_stop_id_and_route_name() {
        let mut prediction = Prediction {
            stop_id: "55765".to_string(),
            trip_id: "5340688".to_string(),
            vehicle_id: "5019".to_string(),
            route_name: "80".to_string(),
            predicted_delay_in_seconds: "0".to_string(),
            predicted_departure: "2017-04-17T22:30:00".to_string(),
            prediction_date_time: "2017-04-17T22:28:58".to_string(),
        };
        prediction.route_name = "<script>alert(1)</script>".to_string();

        let page = render_predictions_page("55765<img src=x>", &[prediction]);

        assert!(!page.contains("<script>"));
        assert!(!page.contains("<img"));
        assert!(page.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(page.contains("Departures for stop 55765&lt;img src=x&gt;"));
    }
}
