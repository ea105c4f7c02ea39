//! [`AdminBackend`] over the Storefront HTTP API.

use crate::{AdminBackend, Resource, Submission};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use storefront_core::{
    CATEGORY_IDS_FIELD, Category, Envelope, IMAGE_FIELD, ListQuery, Page, Product,
    ProductWithCategories, content_type_for_filename,
};
use storefront_error::{
    HttpError, HttpErrorKind, JsonError, StorefrontResult, TuiError, TuiErrorKind,
    ValidationError,
};
use tracing::{debug, instrument};

/// Longest slice of a non-JSON error body kept in an error message.
const MAX_ERROR_BODY: usize = 200;

/// HTTP client for the Storefront API.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    /// Client for the API rooted at `base_url`, e.g. `http://127.0.0.1:8000`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> StorefrontResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("storefront-admin/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| HttpError::new(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self::with_client(client, base_url))
    }

    /// Use an existing client.
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// API root.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn collection(resource: Resource) -> &'static str {
        match resource {
            Resource::Categories => "/categories",
            Resource::Products => "/products",
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> StorefrontResult<T> {
        let response = request
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| HttpError::new(format!("Request failed: {}", e)))?;
        decode(response).await
    }

    fn json_body(submission: &Submission) -> Value {
        let mut body = Map::new();
        for (name, value) in &submission.fields {
            body.insert(name.clone(), Value::String(value.clone()));
        }
        if let Some(ids) = &submission.category_ids {
            body.insert(
                CATEGORY_IDS_FIELD.to_string(),
                Value::Array(ids.iter().cloned().map(Value::String).collect()),
            );
        }
        Value::Object(body)
    }

    async fn multipart_body(submission: &Submission) -> StorefrontResult<Form> {
        let mut form = Form::new();
        for (name, value) in &submission.fields {
            form = form.text(name.clone(), value.clone());
        }
        if let Some(ids) = &submission.category_ids {
            if ids.is_empty() {
                form = form.text(CATEGORY_IDS_FIELD, "");
            }
            for id in ids {
                form = form.text(format!("{}[]", CATEGORY_IDS_FIELD), id.clone());
            }
        }
        if let Some(path) = &submission.image {
            let bytes = tokio::fs::read(path).await.map_err(|e| {
                TuiError::new(TuiErrorKind::Upload(format!("{}: {}", path.display(), e)))
            })?;
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "upload".to_string());
            let part = Part::bytes(bytes)
                .file_name(file_name.clone())
                .mime_str(content_type_for_filename(&file_name))
                .map_err(|e| HttpError::new(format!("Invalid upload type: {}", e)))?;
            form = form.part(IMAGE_FIELD, part);
        }
        Ok(form)
    }
}

/// Unwrap an envelope, mapping failure statuses onto the error contract.
async fn decode<T: DeserializeOwned>(response: Response) -> StorefrontResult<T> {
    let status = response.status();
    let bytes = response
        .bytes()
        .await
        .map_err(|e| HttpError::new(format!("Failed to read response: {}", e)))?;
    debug!(status = %status, bytes = bytes.len(), "Received response");

    if status == StatusCode::FORBIDDEN {
        return Err(HttpError::with_kind(HttpErrorKind::Forbidden).into());
    }

    let envelope: Envelope<T> = match serde_json::from_slice(&bytes) {
        Ok(envelope) => envelope,
        Err(e) if status.is_success() => {
            return Err(JsonError::new(format!("Malformed envelope: {}", e)).into());
        }
        Err(_) => {
            let text = String::from_utf8_lossy(&bytes);
            let message: String = text.chars().take(MAX_ERROR_BODY).collect();
            return Err(HttpError::with_kind(HttpErrorKind::Status {
                status: status.as_u16(),
                message,
            })
            .into());
        }
    };

    if status == StatusCode::UNPROCESSABLE_ENTITY {
        let mut errors = ValidationError::new();
        for (field, messages) in envelope.errors.unwrap_or_default() {
            for message in messages {
                errors.add(field.clone(), message);
            }
        }
        if errors.is_empty() {
            errors.add(
                "form",
                envelope
                    .message
                    .unwrap_or_else(|| "The given data was invalid.".to_string()),
            );
        }
        return Err(errors.into());
    }

    if !status.is_success() || !envelope.success {
        return Err(HttpError::with_kind(HttpErrorKind::Status {
            status: status.as_u16(),
            message: envelope.message.unwrap_or_default(),
        })
        .into());
    }

    envelope
        .data
        .ok_or_else(|| HttpError::with_kind(HttpErrorKind::Decode("missing data".to_string())).into())
}

#[async_trait]
impl AdminBackend for HttpBackend {
    #[instrument(skip(self))]
    async fn list_categories(&self, query: &ListQuery) -> StorefrontResult<Page<Category>> {
        self.send(self.client.get(self.url("/categories")).query(&query.to_pairs()))
            .await
    }

    #[instrument(skip(self))]
    async fn list_products(&self, query: &ListQuery) -> StorefrontResult<Page<Product>> {
        self.send(self.client.get(self.url("/products")).query(&query.to_pairs()))
            .await
    }

    #[instrument(skip(self))]
    async fn category(&self, id: i64) -> StorefrontResult<Category> {
        self.send(self.client.get(self.url(&format!("/categories/{}", id))))
            .await
    }

    #[instrument(skip(self))]
    async fn product(&self, id: i64) -> StorefrontResult<ProductWithCategories> {
        self.send(self.client.get(self.url(&format!("/products/{}/edit", id))))
            .await
    }

    #[instrument(skip(self, submission), fields(resource = %submission.resource, id = ?submission.id))]
    async fn save(&self, submission: &Submission) -> StorefrontResult<()> {
        let collection = Self::collection(submission.resource);
        let builder = match submission.id {
            Some(id) if submission.image.is_some() => {
                self.client.post(self.url(&format!("{}/{}", collection, id)))
            }
            Some(id) => self.client.put(self.url(&format!("{}/{}", collection, id))),
            None => self.client.post(self.url(collection)),
        };
        let request = if submission.image.is_some() {
            builder.multipart(Self::multipart_body(submission).await?)
        } else {
            builder.json(&Self::json_body(submission))
        };
        let _: Value = self.send(request).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, resource: Resource, id: i64) -> StorefrontResult<()> {
        let path = format!("{}/{}", Self::collection(resource), id);
        let _: Value = self.send(self.client.delete(self.url(&path))).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_body_carries_category_ids_as_array() {
        let submission = Submission {
            resource: Resource::Products,
            id: None,
            fields: vec![("name".to_string(), "Lamp".to_string())],
            category_ids: Some(vec!["1".to_string(), "2".to_string()]),
            image: None,
        };
        let body = HttpBackend::json_body(&submission);
        assert_eq!(body["name"], "Lamp");
        assert_eq!(body["category_id"], serde_json::json!(["1", "2"]));
    }

    #[test]
    fn base_url_drops_trailing_slash() {
        let backend = HttpBackend::with_client(Client::new(), "http://localhost:8000/");
        assert_eq!(backend.url("/products"), "http://localhost:8000/products");
    }
}
