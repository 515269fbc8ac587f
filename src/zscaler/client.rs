//! ZCON management API client.
//!
//! Holds a cookie based session opened by [`ZconClient::login`].

use super::auth::AuthRequest;
use crate::config::Credentials;
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::{Client, Method, Response};
use serde_json::Value;
use std::time::Duration;

/// Longest response body kept in error messages and logs.
const MAX_LOG_BODY_LENGTH: usize = 200;

/// The two calls the cleanup needs from the management API.
#[async_trait]
pub trait ManagementApi: Send + Sync {
    /// Fetch one page (1-based) of a collection resource.
    async fn get_page(&self, resource: &str, page: u32, page_size: u32) -> Result<Vec<Value>>;

    /// Delete a single record, e.g. `/ecgroup/1/vm/2`.
    async fn delete(&self, path: &str) -> Result<()>;
}

/// Authenticated ZCON client.
pub struct ZconClient {
    http: Client,
    base_url: String,
}

impl ZconClient {
    /// Open a session for `credentials`.
    pub async fn login(credentials: &Credentials, timeout: Option<Duration>) -> Result<ZconClient> {
        let mut builder = Client::builder()
            .user_agent(concat!("zscc-node-cleanup/", env!("CARGO_PKG_VERSION")))
            .cookie_store(true);
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        let client = ZconClient {
            http: builder.build()?,
            base_url: credentials.api_base_url(),
        };

        let timestamp_ms = chrono::Utc::now().timestamp_millis();
        let body = AuthRequest::new(
            &credentials.username,
            &credentials.password,
            &credentials.api_key,
            timestamp_ms,
        )?;
        log::info!(
            "Login to {} as {}",
            client.base_url,
            credentials.username
        );
        let response = client
            .http
            .post(client.url("/auth"))
            .json(&body)
            .send()
            .await?;
        check_status("POST", "/auth", response).await?;
        Ok(client)
    }

    /// End the session. Failures are only logged.
    pub async fn logout(&self) {
        match self.http.delete(self.url("/auth")).send().await {
            Ok(r) if r.status().is_success() => log::debug!("Logged out"),
            Ok(r) => log::warn!("Logout returned {}", r.status()),
            Err(e) => log::warn!("Logout failed: {e}"),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn send(&self, method: Method, path: &str, query: &[(&str, String)]) -> Result<String> {
        log::debug!("{method} {path} {query:?}");
        let response = self
            .http
            .request(method.clone(), self.url(path))
            .query(query)
            .send()
            .await?;
        let label = if method == Method::DELETE { "DELETE" } else { "GET" };
        check_status(label, path, response).await
    }
}

#[async_trait]
impl ManagementApi for ZconClient {
    async fn get_page(&self, resource: &str, page: u32, page_size: u32) -> Result<Vec<Value>> {
        let body = self
            .send(
                Method::GET,
                resource,
                &[("page", page.to_string()), ("pageSize", page_size.to_string())],
            )
            .await?;
        if body.trim().is_empty() {
            return Ok(Vec::new());
        }
        let value: Value = serde_json::from_str(&body).map_err(|e| Error::Api {
            method: "GET",
            path: resource.to_string(),
            status: 200,
            body: format!("response is not JSON ({e}): {}", sanitize_for_log(&body)),
        })?;
        match value {
            Value::Array(items) => Ok(items),
            Value::Null => Ok(Vec::new()),
            other => Err(Error::Api {
                method: "GET",
                path: resource.to_string(),
                status: 200,
                body: format!("expected a JSON array: {}", sanitize_for_log(&other.to_string())),
            }),
        }
    }

    async fn delete(&self, path: &str) -> Result<()> {
        self.send(Method::DELETE, path, &[]).await.map(|_| ())
    }
}

/// Read the body, turning a non-success status into [`Error::Api`].
async fn check_status(method: &'static str, path: &str, response: Response) -> Result<String> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        log::error!("API error: {method} {path} {status} - {}", sanitize_for_log(&body));
        return Err(Error::Api {
            method,
            path: path.to_string(),
            status: status.as_u16(),
            body: sanitize_for_log(&body),
        });
    }
    Ok(body)
}

/// Truncate long bodies and drop control characters.
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let mut end = MAX_LOG_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... [truncated, {} bytes total]", &body[..end], body.len())
    } else {
        body.to_string()
    };
    truncated.replace(|c: char| c.is_control(), "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_short() {
        assert_eq!(sanitize_for_log("{\"code\":\"x\"}\n"), "{\"code\":\"x\"}");
    }

    #[test]
    fn test_sanitize_truncates() {
        let body = "a".repeat(500);
        let out = sanitize_for_log(&body);
        assert!(out.starts_with(&"a".repeat(200)));
        assert!(out.ends_with("[truncated, 500 bytes total]"));
    }
}
