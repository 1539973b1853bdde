//! HTTP client for the roster service.
//!
//! Pass-through only: each call serializes the request, decodes the
//! payload, and wraps any failure in `TransportError`. No roster logic.

use crate::error::TransportError;
use crate::roster::types::{NewStudent, Student};

#[derive(Debug, Clone)]
pub struct RosterClient {
  base_url: String,
  http: reqwest::Client,
}

#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
  message: String,
}

#[derive(Debug, serde::Deserialize)]
struct DeletedBody {
  id: i64,
}

impl RosterClient {
  pub fn new(base_url: impl Into<String>) -> Self {
    let base_url = base_url.into().trim_end_matches('/').to_string();
    Self {
      base_url,
      http: reqwest::Client::new(),
    }
  }

  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  /// Fetch the full student list.
  pub async fn list_students(&self) -> Result<Vec<Student>, TransportError> {
    let response = self
      .http
      .get(format!("{}/students", self.base_url))
      .send()
      .await?;

    Ok(Self::check(response).await?.json().await?)
  }

  /// Create a student; returns the record with its server-assigned id.
  pub async fn add_student(&self, new: &NewStudent) -> Result<Student, TransportError> {
    let response = self
      .http
      .post(format!("{}/students", self.base_url))
      .json(new)
      .send()
      .await?;

    Ok(Self::check(response).await?.json().await?)
  }

  /// Delete a student by id; returns the deleted id.
  pub async fn delete_student(&self, id: i64) -> Result<i64, TransportError> {
    let response = self
      .http
      .delete(format!("{}/students/{id}", self.base_url))
      .send()
      .await?;

    let body: DeletedBody = Self::check(response).await?.json().await?;
    Ok(body.id)
  }

  /// Turn a non-2xx response into `TransportError::Status`, keeping the
  /// server's `{message}` body when it has one.
  async fn check(response: reqwest::Response) -> Result<reqwest::Response, TransportError> {
    let status = response.status();
    if status.is_success() {
      return Ok(response);
    }

    let message = match response.json::<ErrorBody>().await {
      Ok(body) => body.message,
      Err(_) => status
        .canonical_reason()
        .unwrap_or("unknown error")
        .to_string(),
    };

    Err(TransportError::Status {
      status: status.as_u16(),
      message,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_trailing_slash_is_trimmed() {
    let client = RosterClient::new("http://localhost:3000/");
    assert_eq!(client.base_url(), "http://localhost:3000");
  }
}
