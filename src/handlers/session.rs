use actix_web::{web, HttpResponse, Error};
use base64::Engine;

use crate::handlers::upload::error_response;
use crate::models::response::{ChartResponse, ErrorResponse};
use crate::services::session::CHART_CONTAINER;
use crate::services::{ChartSink, DatasetSource, Session};

/// Read-only view model for the shell
pub async fn get_session<G, K>(session: web::Data<Session<G, K>>) -> Result<HttpResponse, Error>
where
    G: DatasetSource + Clone,
    K: ChartSink + Clone,
{
    match session.snapshot() {
        Ok(snapshot) => Ok(HttpResponse::Ok().json(snapshot)),
        Err(e) => Ok(error_response(&e.into())),
    }
}

/// The chart currently live in the shared container
pub async fn get_chart<G, K>(session: web::Data<Session<G, K>>) -> Result<HttpResponse, Error>
where
    G: DatasetSource + Clone,
    K: ChartSink + Clone,
{
    match session.sink().current(CHART_CONTAINER) {
        Ok(Some(chart)) => {
            let encoded = base64::engine::general_purpose::STANDARD.encode(chart.svg.as_bytes());
            Ok(HttpResponse::Ok().json(ChartResponse {
                container: CHART_CONTAINER.to_string(),
                spec: chart.spec,
                data_uri: format!("data:image/svg+xml;base64,{}", encoded),
            }))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ErrorResponse {
            error: "No chart has been rendered".to_string(),
            status_code: 404,
        })),
        Err(e) => Ok(error_response(&e.into())),
    }
}
