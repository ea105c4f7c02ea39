//! Request body extraction into [`FormInput`].

use crate::ApiError;
use axum::body::Bytes;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::{BytesRejection, FormRejection, JsonRejection};
use axum::extract::{Form, FromRequest, Multipart, Request};
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::Json;
use serde_json::Value;
use storefront_core::{FormInput, IMAGE_FIELD, ImageUpload};
use tracing::debug;

/// Body of a write request, normalized into a [`FormInput`].
///
/// Accepts `application/json`, `multipart/form-data` and
/// `application/x-www-form-urlencoded`. The multipart part named `image1`
/// becomes the uploaded image; an empty file input is ignored. A body with no
/// content type is read as JSON, and an empty body as an empty form.
#[derive(Debug, Clone, Default)]
pub struct FormBody(pub FormInput);

fn content_type(req: &Request) -> String {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_ascii_lowercase())
        .unwrap_or_default()
}

fn rejected_multipart(err: MultipartRejection) -> ApiError {
    ApiError::Rejected(err.status(), err.body_text())
}

fn multipart_error(err: MultipartError) -> ApiError {
    ApiError::Rejected(err.status(), err.body_text())
}

fn rejected_json(err: JsonRejection) -> ApiError {
    ApiError::Rejected(err.status(), err.body_text())
}

fn rejected_form(err: FormRejection) -> ApiError {
    ApiError::Rejected(err.status(), err.body_text())
}

fn rejected_bytes(err: BytesRejection) -> ApiError {
    ApiError::Rejected(err.status(), err.body_text())
}

async fn read_multipart(mut multipart: Multipart) -> Result<FormInput, ApiError> {
    let mut form = FormInput::new();
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if let Some(file_name) = field.file_name().map(str::to_string) {
            let declared = field.content_type().map(str::to_string);
            let bytes = field.bytes().await.map_err(multipart_error)?;
            if name != IMAGE_FIELD {
                debug!(field = %name, "Ignoring unexpected file part");
                continue;
            }
            if file_name.is_empty() && bytes.is_empty() {
                continue;
            }
            let original = (!file_name.is_empty()).then_some(file_name);
            form.set_image(ImageUpload::new(original, declared, bytes.to_vec()));
        } else {
            let value = field.text().await.map_err(multipart_error)?;
            form.push_part(&name, &value);
        }
    }
    Ok(form)
}

fn read_json(body: Value) -> Result<FormInput, ApiError> {
    FormInput::from_json(body).map_err(ApiError::from)
}

impl<S> FromRequest<S> for FormBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = content_type(&req);

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(rejected_multipart)?;
            return Ok(FormBody(read_multipart(multipart).await?));
        }

        if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(rejected_form)?;
            let mut form = FormInput::new();
            for (name, value) in &pairs {
                form.push_part(name, value);
            }
            return Ok(FormBody(form));
        }

        if content_type.starts_with("application/json") {
            let Json(body) = Json::<Value>::from_request(req, state)
                .await
                .map_err(rejected_json)?;
            return Ok(FormBody(read_json(body)?));
        }

        if !content_type.is_empty() {
            return Err(ApiError::Rejected(
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                format!("Unsupported content type: {}", content_type),
            ));
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(rejected_bytes)?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(FormBody(FormInput::new()));
        }
        let body: Value = serde_json::from_slice(&bytes).map_err(|e| {
            ApiError::Rejected(StatusCode::BAD_REQUEST, format!("Malformed JSON body: {}", e))
        })?;
        Ok(FormBody(read_json(body)?))
    }
}
