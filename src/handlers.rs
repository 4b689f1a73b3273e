use actix_multipart::{Field, Multipart};
use actix_web::{web, HttpResponse};
use futures_util::StreamExt;
use tracing::Instrument;
use uuid::Uuid;

use crate::error::PredictError;
use crate::inference::{validate_content_type, InferenceService};
use crate::models::LivenessResponse;

const UPLOAD_FIELD: &str = "file";

pub async fn root() -> HttpResponse {
    HttpResponse::Ok().json(LivenessResponse {
        message: "Brain Tumor Classification API is running!".to_string(),
    })
}

pub async fn predict(
    service: web::Data<InferenceService>,
    payload: Multipart,
) -> Result<HttpResponse, PredictError> {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("predict", %request_id);

    async move {
        let bytes = read_upload(payload, service.max_upload_bytes()).await?;
        tracing::debug!(bytes = bytes.len(), "Upload received");

        let result = web::block(move || service.classify(&bytes))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Blocking pool failed");
                PredictError::Inference(e.to_string())
            })?;

        match result {
            Ok(prediction) => Ok(HttpResponse::Ok().json(prediction)),
            Err(err @ PredictError::Inference(_)) => {
                tracing::error!(error = %err, "Prediction failed");
                Err(err)
            }
            Err(err) => {
                tracing::warn!(error = %err, "Prediction rejected");
                Err(err)
            }
        }
    }
    .instrument(span)
    .await
}

/// Returns the bytes of the `file` field. Other fields are skipped.
async fn read_upload(mut payload: Multipart, limit: usize) -> Result<Vec<u8>, PredictError> {
    while let Some(item) = payload.next().await {
        let mut field = item?;

        if field.content_disposition().get_name() != Some(UPLOAD_FIELD) {
            drain(&mut field).await?;
            continue;
        }

        let content_type = field.content_type().map(|mime| mime.essence_str());
        if let Err(err) = validate_content_type(content_type) {
            tracing::warn!(content_type = ?content_type, "Rejected upload content type");
            return Err(err);
        }

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk?;
            if bytes.len() + chunk.len() > limit {
                return Err(PredictError::PayloadTooLarge { limit });
            }
            bytes.extend_from_slice(&chunk);
        }
        return Ok(bytes);
    }

    Err(PredictError::MissingFile)
}

async fn drain(field: &mut Field) -> Result<(), PredictError> {
    while let Some(chunk) = field.next().await {
        chunk?;
    }
    Ok(())
}
