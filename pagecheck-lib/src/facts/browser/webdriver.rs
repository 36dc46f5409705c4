//! Minimal W3C WebDriver client.
//!
//! Only the handful of endpoints needed to load a page, run probe scripts, and capture a
//! screenshot are implemented. Any conforming server works (chromedriver, geckodriver, a
//! Selenium grid).

use super::LOG_TARGET;
use super::driver::{BrowserDriver, BrowserPage, ProbeError, Viewport};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use core::time::Duration;
use reqwest::Method;
use serde_json::{Value, json};
use std::fs;
use std::path::Path;
use url::Url;

/// Extra time granted to a browser command on top of the page-load timeout.
const COMMAND_GRACE: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
struct Connection {
    client: reqwest::Client,
    command_timeout: Duration,
}

impl Connection {
    async fn command(&self, method: Method, url: &str, body: Option<Value>) -> Result<Value, ProbeError> {
        let mut request = self.client.request(method, url).timeout(self.command_timeout);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await.map_err(|e| ProbeError::Command(e.to_string()))?;
        let status = response.status();
        let text = response.text().await.map_err(|e| ProbeError::Command(e.to_string()))?;

        let mut doc: Value =
            serde_json::from_str(&text).map_err(|e| ProbeError::Malformed(format!("HTTP {status}, body is not JSON ({e})")))?;
        let value = doc.get_mut("value").map(Value::take).unwrap_or_default();

        if status.is_success() {
            return Ok(value);
        }

        let error = value.get("error").and_then(Value::as_str).unwrap_or("unknown error");
        let message = value.get("message").and_then(Value::as_str).unwrap_or_default();
        Err(ProbeError::Command(format!("HTTP {}: {error}: {message}", status.as_u16())))
    }
}

/// Drives a browser through a WebDriver server.
#[derive(Debug, Clone)]
pub struct WebDriver {
    connection: Connection,
    base: String,
    page_load_timeout: Duration,
}

impl WebDriver {
    #[must_use]
    pub fn new(client: reqwest::Client, endpoint: &Url, page_load_timeout: Duration) -> Self {
        Self {
            connection: Connection {
                client,
                command_timeout: page_load_timeout.saturating_add(COMMAND_GRACE),
            },
            base: endpoint.as_str().trim_end_matches('/').to_string(),
            page_load_timeout,
        }
    }

    fn capabilities(&self, viewport: Viewport) -> Value {
        let timeout_ms = u64::try_from(self.page_load_timeout.as_millis()).unwrap_or(u64::MAX);

        json!({
            "capabilities": {
                "alwaysMatch": {
                    "pageLoadStrategy": "normal",
                    "timeouts": { "pageLoad": timeout_ms, "script": timeout_ms },
                    "goog:chromeOptions": {
                        "args": ["--headless=new", format!("--window-size={},{}", viewport.width, viewport.height)]
                    },
                    "moz:firefoxOptions": { "args": ["-headless"] }
                }
            }
        })
    }
}

impl BrowserDriver for WebDriver {
    type Page = WebDriverPage;

    async fn ensure_available(&self) -> Result<(), ProbeError> {
        let status = self
            .connection
            .command(Method::GET, &format!("{}/status", self.base), None)
            .await
            .map_err(|e| ProbeError::Unavailable(format!("WebDriver server at {} did not respond ({e})", self.base)))?;

        if status.get("ready").and_then(Value::as_bool) == Some(false) {
            let message = status.get("message").and_then(Value::as_str).unwrap_or("not ready");
            return Err(ProbeError::Unavailable(format!("WebDriver server at {} is {message}", self.base)));
        }

        Ok(())
    }

    async fn open_page(&self, viewport: Viewport) -> Result<WebDriverPage, ProbeError> {
        let created = self
            .connection
            .command(Method::POST, &format!("{}/session", self.base), Some(self.capabilities(viewport)))
            .await?;

        let session_id = created
            .get("sessionId")
            .and_then(Value::as_str)
            .ok_or_else(|| ProbeError::Malformed("new session response carries no sessionId".to_string()))?;

        log::debug!(target: LOG_TARGET, "Opened session {session_id} at {}x{}", viewport.width, viewport.height);

        let page = WebDriverPage {
            connection: self.connection.clone(),
            session: format!("{}/session/{session_id}", self.base),
        };

        let resized = page
            .connection
            .command(
                Method::POST,
                &format!("{}/window/rect", page.session),
                Some(json!({ "width": viewport.width, "height": viewport.height })),
            )
            .await;

        match resized {
            Ok(_) => Ok(page),
            Err(e) => {
                page.close().await;
                Err(e)
            }
        }
    }
}

/// One WebDriver session, used as a single page.
#[derive(Debug)]
pub struct WebDriverPage {
    connection: Connection,
    session: String,
}

impl WebDriverPage {
    async fn execute(&self, kind: &str, script: &str) -> Result<Value, ProbeError> {
        self.connection
            .command(
                Method::POST,
                &format!("{}/execute/{kind}", self.session),
                Some(json!({ "script": script, "args": [] })),
            )
            .await
    }
}

impl BrowserPage for WebDriverPage {
    async fn navigate(&mut self, url: &Url) -> Result<(), ProbeError> {
        let _ = self
            .connection
            .command(Method::POST, &format!("{}/url", self.session), Some(json!({ "url": url.as_str() })))
            .await?;
        Ok(())
    }

    async fn evaluate(&mut self, script: &str) -> Result<Value, ProbeError> {
        self.execute("sync", script).await
    }

    async fn evaluate_async(&mut self, script: &str) -> Result<Value, ProbeError> {
        self.execute("async", script).await
    }

    async fn screenshot(&mut self, path: &Path) -> Result<(), ProbeError> {
        let encoded = self
            .connection
            .command(Method::GET, &format!("{}/screenshot", self.session), None)
            .await?;

        let encoded = encoded
            .as_str()
            .ok_or_else(|| ProbeError::Malformed("screenshot is not a string".to_string()))?;
        let png = STANDARD
            .decode(encoded)
            .map_err(|e| ProbeError::Malformed(format!("screenshot is not valid base64 ({e})")))?;

        fs::write(path, png).map_err(|e| ProbeError::Io(format!("could not write screenshot '{}': {e}", path.display())))
    }

    async fn close(self) {
        if let Err(e) = self.connection.command(Method::DELETE, &self.session, None).await {
            log::warn!(target: LOG_TARGET, "Could not close browser session '{}': {e}", self.session);
        }
    }
}
