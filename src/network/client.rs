//! HTTP client for the student API - one method per endpoint

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{RequestBuilder, Url};

use crate::constants::{CREATE_PATH, DELETE_PATH, LIST_PATH, UPDATE_PATH};
use crate::models::{NewStudent, Student, StudentDraft, StudentId};
use crate::network::error::ApiError;

/// Typed client over the four student endpoints
#[derive(Clone, Debug)]
pub struct StudentClient {
    http: reqwest::Client,
    base_url: Url,
}

impl StudentClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        Ok(StudentClient {
            http: create_client(timeout),
            base_url: parse_base_url(base_url)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// GET the full student list
    pub async fn list_students(&self) -> Result<Vec<Student>, ApiError> {
        let url = self.endpoint(&LIST_PATH, None);
        let body = send(self.http.get(url)).await?;
        serde_json::from_str(&body).map_err(ApiError::Decode)
    }

    /// POST a new student; the server assigns the id
    pub async fn create_student(&self, student: &NewStudent) -> Result<(), ApiError> {
        let url = self.endpoint(&CREATE_PATH, None);
        send(self.http.post(url).json(student)).await.map(|_| ())
    }

    /// PUT the editable fields of an existing student
    pub async fn update_student(&self, id: &StudentId, draft: &StudentDraft) -> Result<(), ApiError> {
        let url = self.endpoint(&UPDATE_PATH, Some(id));
        send(self.http.put(url).json(draft)).await.map(|_| ())
    }

    /// DELETE a student by id
    pub async fn delete_student(&self, id: &StudentId) -> Result<(), ApiError> {
        let url = self.endpoint(&DELETE_PATH, Some(id));
        send(self.http.delete(url)).await.map(|_| ())
    }

    /// Build an endpoint URL; the id segment is percent-encoded
    pub fn endpoint(&self, path: &[&str], id: Option<&StudentId>) -> Url {
        let mut url = self.base_url.clone();
        // parse_base_url rejects cannot-be-a-base URLs, so this always succeeds
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(path);
            if let Some(id) = id {
                segments.push(id.as_str());
            }
        }
        url
    }
}

/// Send a request and return the body of a 2xx response
async fn send(request: RequestBuilder) -> Result<String, ApiError> {
    let response = request.send().await.map_err(ApiError::Transport)?;
    let status = response.status();
    let body = response.text().await.map_err(ApiError::Transport)?;

    if !status.is_success() {
        return Err(ApiError::Status {
            status: status.as_u16(),
            body,
        });
    }
    Ok(body)
}

fn parse_base_url(raw: &str) -> Result<Url, ApiError> {
    let invalid = |reason: String| ApiError::InvalidBaseUrl {
        url: raw.to_string(),
        reason,
    };

    let url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.cannot_be_a_base() {
        return Err(invalid("URL cannot carry a path".to_string()));
    }
    Ok(url)
}

/// Create an HTTP client that speaks JSON by default
pub fn create_client(timeout: Duration) -> reqwest::Client {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    reqwest::Client::builder()
        .default_headers(headers)
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}
