//! HTTP client for the key-value server
//!
//! Provides a simple interface for issuing single requests against the
//! `/store/{key}` resource.

use crate::error::{KvError, Result};
use crate::store::SetOutcome;
use reqwest::{Method, StatusCode};

/// Raw server reply: status plus the plain-text body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: StatusCode,
    pub body: String,
}

impl Reply {
    /// Keep the body of a 200/201 reply, map every other status to an error
    pub fn into_result(self) -> Result<String> {
        match self.status {
            StatusCode::OK | StatusCode::CREATED => Ok(self.body),
            StatusCode::NOT_FOUND => Err(KvError::KeyNotFound),
            StatusCode::METHOD_NOT_ALLOWED => Err(KvError::MethodNotAllowed),
            status => Err(KvError::Status(status.to_string())),
        }
    }
}

/// Client for a key-value server
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
}

impl Client {
    /// Client for a server at `base_url`, e.g. `http://127.0.0.1:8080`
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    /// Client for a server on localhost
    pub fn local(port: u16) -> Self {
        Self::new(format!("http://127.0.0.1:{}", port))
    }

    /// Resource URL for `key`, encoded as a single path segment.
    ///
    /// URL parsing collapses `.` and `..` segments even when escaped, so
    /// those two keys cannot be addressed.
    fn url(&self, key: &str) -> Result<String> {
        if key == "." || key == ".." {
            return Err(KvError::InvalidArgument(format!(
                "key {:?} cannot be used in a URL",
                key
            )));
        }
        Ok(format!(
            "{}/store/{}",
            self.base_url,
            urlencoding::encode(key)
        ))
    }

    /// Send one request; non-2xx statuses are returned, not raised
    pub async fn send(&self, method: Method, key: &str, value: Option<&str>) -> Result<Reply> {
        let mut request = self.http.request(method, self.url(key)?);
        if let Some(value) = value {
            request = request.body(value.to_string());
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        Ok(Reply { status, body })
    }

    /// Set a key-value pair
    pub async fn set(&self, key: &str, value: &str) -> Result<SetOutcome> {
        let reply = self.send(Method::PUT, key, Some(value)).await?;
        let created = reply.status == StatusCode::CREATED;
        reply.into_result()?;
        Ok(if created {
            SetOutcome::Created
        } else {
            SetOutcome::Updated
        })
    }

    /// Get a value by key
    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        match self.send(Method::GET, key, None).await?.into_result() {
            Ok(value) => Ok(Some(value)),
            Err(KvError::KeyNotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Delete a key
    pub async fn delete(&self, key: &str) -> Result<bool> {
        match self.send(Method::DELETE, key, None).await?.into_result() {
            Ok(_) => Ok(true),
            Err(KvError::KeyNotFound) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply(status: StatusCode, body: &str) -> Reply {
        Reply {
            status,
            body: body.to_string(),
        }
    }

    #[test]
    fn test_reply_into_result() {
        assert_eq!(
            reply(StatusCode::OK, "bar").into_result().unwrap(),
            "bar"
        );
        assert_eq!(
            reply(StatusCode::CREATED, "Key created").into_result().unwrap(),
            "Key created"
        );
        assert!(matches!(
            reply(StatusCode::NOT_FOUND, "Key not found").into_result(),
            Err(KvError::KeyNotFound)
        ));
        assert!(matches!(
            reply(StatusCode::METHOD_NOT_ALLOWED, "").into_result(),
            Err(KvError::MethodNotAllowed)
        ));

        let err = reply(StatusCode::BAD_REQUEST, "").into_result().unwrap_err();
        assert_eq!(err.to_string(), "400 Bad Request");
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = Client::new("http://localhost:8080/");
        assert_eq!(client.url("foo").unwrap(), "http://localhost:8080/store/foo");
        assert_eq!(
            Client::local(9000).url("k").unwrap(),
            "http://127.0.0.1:9000/store/k"
        );
    }

    #[test]
    fn test_key_is_percent_encoded() {
        let client = Client::local(8080);
        assert_eq!(
            client.url("a?b#c").unwrap(),
            "http://127.0.0.1:8080/store/a%3Fb%23c"
        );
        assert_eq!(
            client.url("100%").unwrap(),
            "http://127.0.0.1:8080/store/100%25"
        );
        assert_eq!(
            client.url("a/b c").unwrap(),
            "http://127.0.0.1:8080/store/a%2Fb%20c"
        );
        assert_eq!(client.url("ü").unwrap(), "http://127.0.0.1:8080/store/%C3%BC");
    }

    #[test]
    fn test_dot_keys_are_rejected() {
        let client = Client::local(8080);
        assert!(matches!(client.url("."), Err(KvError::InvalidArgument(_))));
        assert!(matches!(client.url(".."), Err(KvError::InvalidArgument(_))));
        assert!(client.url("...").is_ok());
    }
}
