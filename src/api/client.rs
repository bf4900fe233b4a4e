use reqwest::{multipart, Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::errors::ApiError;
use crate::config::ApiConfig;
use crate::domain::ImageUpload;
use crate::observability::api_metrics;

/// Thin JSON client over the backend REST API.
///
/// Paths are given as segment lists so ids and emails are percent-encoded
/// instead of spliced into the URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(seconds) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(seconds));
        }
        let client = builder.build()?;

        let base_url = parse_base_url(&config.base_url)?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute URL for a path, without sending anything.
    pub fn url(&self, segments: &[&str]) -> Url {
        endpoint_url(&self.base_url, segments)
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let url = self.url(segments);
        debug!(method = %method, url = %url, "Backend request");
        self.client.request(method, url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<String, ApiError> {
        api_metrics().record_request();

        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                api_metrics().record_error();
                warn!(error = %err, "Backend request failed to complete");
                return Err(err.into());
            }
        };

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            api_metrics().record_error();
            let err = ApiError::from_body(status.as_u16(), body);
            debug!(status = status.as_u16(), error = %err, "Backend returned an error");
            return Err(err);
        }

        Ok(body)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let body = self.send(request).await?;
        let body = if body.trim().is_empty() { "null" } else { body.as_str() };
        serde_json::from_str(body).map_err(|err| {
            api_metrics().record_error();
            ApiError::Serialization(err)
        })
    }

    pub async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ApiError> {
        self.send_json(self.request(Method::GET, segments)).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<T, ApiError> {
        self.send_json(self.request(Method::POST, segments).json(body))
            .await
    }

    pub async fn post_empty<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ApiError> {
        self.send_json(self.request(Method::POST, segments)).await
    }

    /// Post a bare string as a JSON string literal (`"value"`), the body
    /// shape the approve/reject endpoints expect for the admin id.
    pub async fn post_raw_string<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        value: &str,
    ) -> Result<T, ApiError> {
        self.post(segments, value).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<T, ApiError> {
        self.send_json(self.request(Method::PUT, segments).json(body))
            .await
    }

    /// PATCH whose response body is ignored.
    pub async fn patch<B: Serialize + ?Sized>(&self, segments: &[&str], body: &B) -> Result<(), ApiError> {
        self.send(self.request(Method::PATCH, segments).json(body))
            .await
            .map(|_| ())
    }

    /// PUT whose response body is ignored.
    pub async fn put_unit<B: Serialize + ?Sized>(&self, segments: &[&str], body: &B) -> Result<(), ApiError> {
        self.send(self.request(Method::PUT, segments).json(body))
            .await
            .map(|_| ())
    }

    /// DELETE whose response body is ignored.
    pub async fn delete(&self, segments: &[&str]) -> Result<(), ApiError> {
        self.send(self.request(Method::DELETE, segments))
            .await
            .map(|_| ())
    }

    pub async fn delete_with_query(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> Result<(), ApiError> {
        self.send(self.request(Method::DELETE, segments).query(query))
            .await
            .map(|_| ())
    }

    /// Multipart upload with the file under the `file` field.
    pub async fn upload_file<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        upload: &ImageUpload,
    ) -> Result<T, ApiError> {
        let part = multipart::Part::bytes(upload.bytes.clone())
            .file_name(upload.file_name.clone())
            .mime_str(&upload.content_type)?;
        let form = multipart::Form::new().part("file", part);
        self.send_json(self.request(Method::POST, segments).multipart(form))
            .await
    }
}

/// Parse the configured API base, which must be able to take path segments.
pub fn parse_base_url(raw: &str) -> Result<Url, ApiError> {
    let base_url = Url::parse(raw.trim_end_matches('/'))
        .map_err(|err| ApiError::InvalidResponse(format!("invalid base URL '{raw}': {err}")))?;
    if base_url.cannot_be_a_base() {
        return Err(ApiError::InvalidResponse(format!(
            "base URL '{raw}' cannot carry a path"
        )));
    }
    Ok(base_url)
}

/// Append percent-encoded segments to a base URL.
pub fn endpoint_url(base_url: &Url, segments: &[&str]) -> Url {
    let mut url = base_url.clone();
    // parse_base_url guarantees the base can take more segments
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MaduveConfig;

    fn client(base_url: &str) -> ApiClient {
        let mut config = MaduveConfig::default().api;
        config.base_url = base_url.to_string();
        ApiClient::new(&config).unwrap()
    }

    #[test]
    fn test_segments_are_appended_to_base_path() {
        let client = client("http://localhost:5000/api/");
        assert_eq!(
            client.url(&["admin", "requests", "pending"]).as_str(),
            "http://localhost:5000/api/admin/requests/pending"
        );
    }

    #[test]
    fn test_segments_are_percent_encoded() {
        let client = client("http://localhost:5000/api");
        assert_eq!(
            client.url(&["users", "email", "a b/c@example.com"]).as_str(),
            "http://localhost:5000/api/users/email/a%20b%2Fc@example.com"
        );
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let mut config = MaduveConfig::default().api;
        config.base_url = "not a url".to_string();
        assert!(ApiClient::new(&config).is_err());
    }
}
