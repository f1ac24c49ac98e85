use actix_web::{web, HttpResponse, Error};
use actix_multipart::Multipart;
use futures::StreamExt;
use log::{info, warn};

use crate::config::Config;
use crate::error::InsightError;
use crate::models::response::{UploadResponse, ErrorResponse};
use crate::models::upload::FileHandle;
use crate::services::session::UploadOutcome;
use crate::services::{ChartSink, DatasetSource, Session};

/// Handle a file picked or dropped in the shell
pub async fn select_file<G, K>(
    mut payload: Multipart,
    session: web::Data<Session<G, K>>,
    config: web::Data<Config>,
) -> Result<HttpResponse, Error>
where
    G: DatasetSource + Clone,
    K: ChartSink + Clone,
{
    let mut file: Option<FileHandle> = None;

    while let Some(item) = payload.next().await {
        let mut field = item?;
        let content_disposition = field.content_disposition();

        if content_disposition.get_name() != Some("file") {
            continue;
        }

        let filename = content_disposition
            .get_filename()
            .unwrap_or_default()
            .to_string();
        let mime_type = field
            .content_type()
            .map(|m| m.essence_str().to_string())
            .unwrap_or_default();

        // drained and counted, never parsed
        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let data = chunk?;
            bytes.extend_from_slice(&data);
            if bytes.len() > config.max_upload_bytes {
                let err = InsightError::FileTooLarge {
                    size: bytes.len(),
                    limit: config.max_upload_bytes,
                };
                warn!("🚫 {}", err);
                return Ok(error_response(&err));
            }
        }

        file = Some(FileHandle::new(filename, mime_type, bytes));
    }

    let Some(file) = file else {
        return Ok(HttpResponse::BadRequest().json(ErrorResponse {
            error: "No file uploaded".to_string(),
            status_code: 400,
        }));
    };

    info!("📥 Received \"{}\" ({}, {} bytes)", file.name, file.mime_type, file.bytes.len());

    match session.select_file(file) {
        Ok(UploadOutcome::Started) => Ok(HttpResponse::Accepted().json(UploadResponse {
            status: "uploading".to_string(),
            message: None,
        })),
        Err(e) => Ok(error_response(&e)),
    }
}

/// Map a session condition onto the JSON error body
pub fn error_response(err: &InsightError) -> HttpResponse {
    let status_code = err.status_code();
    let status = actix_web::http::StatusCode::from_u16(status_code)
        .unwrap_or(actix_web::http::StatusCode::INTERNAL_SERVER_ERROR);
    HttpResponse::build(status).json(ErrorResponse {
        error: err.to_string(),
        status_code,
    })
}
