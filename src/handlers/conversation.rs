use actix_web::{web, HttpResponse, Error};
use log::{error, info};

use crate::error::InsightError;
use crate::handlers::upload::error_response;
use crate::models::conversation::QueryRequest;
use crate::models::response::QueryResponse;
use crate::services::query_dispatcher::EXAMPLE_QUESTIONS;
use crate::services::session::SubmitOutcome;
use crate::services::{ChartSink, DatasetSource, Session};

/// Handle typed text
pub async fn submit_text<G, K>(
    query_req: web::Json<QueryRequest>,
    session: web::Data<Session<G, K>>,
) -> Result<HttpResponse, Error>
where
    G: DatasetSource + Clone,
    K: ChartSink + Clone,
{
    info!("Received query: {}", query_req.text);
    Ok(submit_response(session.submit_text(&query_req.text)))
}

/// Handle a click on one of the example questions
pub async fn click_suggestion<G, K>(
    query_req: web::Json<QueryRequest>,
    session: web::Data<Session<G, K>>,
) -> Result<HttpResponse, Error>
where
    G: DatasetSource + Clone,
    K: ChartSink + Clone,
{
    info!("Suggestion clicked: {}", query_req.text);
    Ok(submit_response(session.click_suggestion(&query_req.text)))
}

pub async fn list_suggestions() -> HttpResponse {
    HttpResponse::Ok().json(EXAMPLE_QUESTIONS)
}

fn submit_response(outcome: Result<SubmitOutcome, InsightError>) -> HttpResponse {
    match outcome {
        Ok(SubmitOutcome::Answered) => HttpResponse::Ok().json(QueryResponse {
            status: "answered".to_string(),
            message: None,
        }),
        Ok(SubmitOutcome::Pending) => HttpResponse::Accepted().json(QueryResponse {
            status: "typing".to_string(),
            message: None,
        }),
        // blank input is dropped silently
        Err(InsightError::EmptyQuery) => HttpResponse::Ok().json(QueryResponse {
            status: "ignored".to_string(),
            message: None,
        }),
        Err(e) => {
            if let InsightError::Internal(_) = e {
                error!("Error processing query: {}", e);
            }
            error_response(&e)
        }
    }
}

pub async fn request_clear<G, K>(session: web::Data<Session<G, K>>) -> Result<HttpResponse, Error>
where
    G: DatasetSource + Clone,
    K: ChartSink + Clone,
{
    match session.request_clear() {
        Ok(()) => Ok(HttpResponse::Ok().json(QueryResponse {
            status: "confirm".to_string(),
            message: Some("Are you sure you want to clear the chat history?".to_string()),
        })),
        Err(e) => Ok(error_response(&e.into())),
    }
}

pub async fn confirm_clear<G, K>(session: web::Data<Session<G, K>>) -> Result<HttpResponse, Error>
where
    G: DatasetSource + Clone,
    K: ChartSink + Clone,
{
    match session.confirm_clear() {
        Ok(true) => Ok(HttpResponse::Ok().json(QueryResponse {
            status: "cleared".to_string(),
            message: None,
        })),
        Ok(false) => Ok(HttpResponse::Conflict().json(QueryResponse {
            status: "not_requested".to_string(),
            message: Some("Request a clear before confirming it".to_string()),
        })),
        Err(e) => Ok(error_response(&e.into())),
    }
}

pub async fn cancel_clear<G, K>(session: web::Data<Session<G, K>>) -> Result<HttpResponse, Error>
where
    G: DatasetSource + Clone,
    K: ChartSink + Clone,
{
    match session.cancel_clear() {
        Ok(()) => Ok(HttpResponse::Ok().json(QueryResponse {
            status: "cancelled".to_string(),
            message: None,
        })),
        Err(e) => Ok(error_response(&e.into())),
    }
}
