//! W3C WebDriver client and the page adapter built on it.
//!
//! [`WebDriverClient`] speaks the JSON wire protocol to a running driver
//! (geckodriver, chromedriver). [`WebDriverDocument`] owns a client plus a
//! small runtime and exposes the session as a blocking [`DocumentQuery`].

use reqwest::{Client, Method};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::domain::{AppError, DocumentQuery, Lookup, NavKey, Result, WebDriverConfig};

/// Key under which W3C drivers return element references.
const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// WebDriver code points for the arrow keys.
const KEY_UP: &str = "\u{E013}";
const KEY_DOWN: &str = "\u{E015}";

/// Opaque reference to an element in the remote page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementRef(pub String);

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    value: Value,
}

/// Error body returned by the driver on a failed command.
#[derive(Debug, Deserialize)]
struct WireError {
    error: String,
    #[serde(default)]
    message: String,
}

/// A driver answer: either the command's value or a protocol error.
#[derive(Debug)]
enum Reply {
    Value(Value),
    Failure(WireError),
}

/// Maps a driver reply onto a query outcome.
///
/// `no such element` and `stale element reference` are expected on a page
/// that re-renders; every other error code is fatal.
fn classify<T>(reply: Reply, convert: impl FnOnce(Value) -> Result<T>) -> Result<Lookup<T>> {
    match reply {
        Reply::Value(value) => convert(value).map(Lookup::Found),
        Reply::Failure(err) => match err.error.as_str() {
            "no such element" => Ok(Lookup::NotFound),
            "stale element reference" => Ok(Lookup::Invalidated),
            _ => Err(AppError::protocol(format!("{}: {}", err.error, err.message))),
        },
    }
}

fn element_ref(value: &Value) -> Result<ElementRef> {
    value
        .get(ELEMENT_KEY)
        .and_then(Value::as_str)
        .map(|id| ElementRef(id.to_string()))
        .ok_or_else(|| AppError::protocol(format!("Malformed element reference: {value}")))
}

fn string_value(value: Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(AppError::protocol(format!("Expected string, got {other}"))),
    }
}

/// Quotes `text` as an `XPath` 1.0 string literal.
fn xpath_literal(text: &str) -> String {
    if !text.contains('\'') {
        return format!("'{text}'");
    }
    if !text.contains('"') {
        return format!("\"{text}\"");
    }
    let parts: Vec<String> = text.split('\'').map(|p| format!("'{p}'")).collect();
    format!("concat({})", parts.join(", \"'\", "))
}

/// Async client bound to one WebDriver session.
pub struct WebDriverClient {
    http: Client,
    base_url: String,
    session_id: String,
}

impl WebDriverClient {
    /// Starts a new browser session.
    ///
    /// # Errors
    /// Returns error if the driver is unreachable or refuses the session.
    pub async fn start(config: &WebDriverConfig) -> Result<Self> {
        let http = Client::builder().build().map_err(AppError::webdriver)?;
        let base_url = config.url.trim_end_matches('/').to_string();

        let body = json!({
            "capabilities": { "alwaysMatch": { "browserName": config.browser } }
        });
        let reply = send(&http, Method::POST, &format!("{base_url}/session"), Some(body)).await?;

        let value = match reply {
            Reply::Value(value) => value,
            Reply::Failure(err) => {
                return Err(AppError::protocol(format!(
                    "Failed to start session: {}: {}",
                    err.error, err.message
                )))
            }
        };
        let session_id = value
            .get("sessionId")
            .and_then(Value::as_str)
            .ok_or_else(|| AppError::protocol("Session response without sessionId"))?
            .to_string();

        tracing::info!(session = %session_id, browser = %config.browser, "WebDriver session started");

        Ok(Self {
            http,
            base_url,
            session_id,
        })
    }

    async fn command(&self, method: Method, path: &str, body: Option<Value>) -> Result<Reply> {
        let url = format!("{}/session/{}{}", self.base_url, self.session_id, path);
        send(&self.http, method, &url, body).await
    }

    /// Navigates the session to `url`.
    ///
    /// # Errors
    /// Returns error if navigation fails.
    pub async fn navigate(&self, url: &str) -> Result<()> {
        let reply = self
            .command(Method::POST, "/url", Some(json!({ "url": url })))
            .await?;
        classify(reply, |_| Ok(()))?
            .found()
            .ok_or_else(|| AppError::protocol(format!("Failed to open {url}")))
    }

    /// Finds all elements matching a CSS selector.
    ///
    /// # Errors
    /// Returns error if the command fails.
    pub async fn find_all(&self, css: &str) -> Result<Vec<ElementRef>> {
        let body = json!({ "using": "css selector", "value": css });
        let reply = self.command(Method::POST, "/elements", Some(body)).await?;
        let found = classify(reply, |value| match value {
            Value::Array(items) => items.iter().map(element_ref).collect(),
            other => Err(AppError::protocol(format!("Expected element list, got {other}"))),
        })?;
        Ok(found.found().unwrap_or_default())
    }

    /// Finds the first element matching an `XPath` expression.
    ///
    /// # Errors
    /// Returns error if the command fails.
    pub async fn find_xpath(&self, xpath: &str) -> Result<Lookup<ElementRef>> {
        let body = json!({ "using": "xpath", "value": xpath });
        let reply = self.command(Method::POST, "/element", Some(body)).await?;
        classify(reply, |value| element_ref(&value))
    }

    /// Visible text of an element.
    ///
    /// # Errors
    /// Returns error if the command fails.
    pub async fn text(&self, element: &ElementRef) -> Result<Lookup<String>> {
        let path = format!("/element/{}/text", element.0);
        let reply = self.command(Method::GET, &path, None).await?;
        classify(reply, string_value)
    }

    /// Attribute of an element, `None` when absent.
    ///
    /// # Errors
    /// Returns error if the command fails.
    pub async fn attribute(&self, element: &ElementRef, name: &str) -> Result<Lookup<Option<String>>> {
        let path = format!("/element/{}/attribute/{name}", element.0);
        let reply = self.command(Method::GET, &path, None).await?;
        classify(reply, |value| match value {
            Value::Null => Ok(None),
            other => string_value(other).map(Some),
        })
    }

    /// Clicks an element.
    ///
    /// # Errors
    /// Returns error if the command fails.
    pub async fn click(&self, element: &ElementRef) -> Result<Lookup<()>> {
        let path = format!("/element/{}/click", element.0);
        let reply = self.command(Method::POST, &path, Some(json!({}))).await?;
        classify(reply, |_| Ok(()))
    }

    /// Sends keystrokes to an element.
    ///
    /// # Errors
    /// Returns error if the command fails.
    pub async fn send_keys(&self, element: &ElementRef, text: &str) -> Result<Lookup<()>> {
        let path = format!("/element/{}/value", element.0);
        let reply = self
            .command(Method::POST, &path, Some(json!({ "text": text })))
            .await?;
        classify(reply, |_| Ok(()))
    }

    /// Ends the session and closes the browser.
    ///
    /// # Errors
    /// Returns error if the driver cannot be reached.
    pub async fn quit(&self) -> Result<()> {
        let url = format!("{}/session/{}", self.base_url, self.session_id);
        send(&self.http, Method::DELETE, &url, None).await?;
        tracing::info!(session = %self.session_id, "WebDriver session closed");
        Ok(())
    }
}

async fn send(http: &Client, method: Method, url: &str, body: Option<Value>) -> Result<Reply> {
    tracing::trace!(%method, url, "WebDriver command");

    let mut request = http.request(method, url);
    if let Some(body) = body {
        request = request.json(&body);
    }

    let response = request.send().await.map_err(AppError::webdriver)?;
    let status = response.status();
    let envelope: Envelope = response.json().await.map_err(AppError::webdriver)?;

    if status.is_success() {
        Ok(Reply::Value(envelope.value))
    } else {
        let err: WireError = serde_json::from_value(envelope.value).map_err(AppError::json_parse)?;
        Ok(Reply::Failure(err))
    }
}

/// Blocking page adapter over a WebDriver session.
pub struct WebDriverDocument {
    runtime: tokio::runtime::Runtime,
    client: Option<WebDriverClient>,
}

impl WebDriverDocument {
    /// Starts a browser session and opens the chat page.
    ///
    /// # Errors
    /// Returns error if the runtime, session, or navigation fails.
    pub fn connect(config: &WebDriverConfig) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| AppError::io("Failed to start async runtime", e))?;

        let client = runtime.block_on(async {
            let client = WebDriverClient::start(config).await?;
            client.navigate(&config.chat_url).await?;
            Ok::<_, AppError>(client)
        })?;

        Ok(Self {
            runtime,
            client: Some(client),
        })
    }

    fn client(&self) -> Result<&WebDriverClient> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::protocol("WebDriver session already closed"))
    }

    /// Closes the browser.
    ///
    /// # Errors
    /// Returns error if the driver cannot be reached.
    pub fn quit(mut self) -> Result<()> {
        match self.client.take() {
            Some(client) => self.runtime.block_on(client.quit()),
            None => Ok(()),
        }
    }
}

impl Drop for WebDriverDocument {
    fn drop(&mut self) {
        if let Some(client) = self.client.take() {
            if let Err(e) = self.runtime.block_on(client.quit()) {
                tracing::warn!("Failed to close browser session: {}", e);
            }
        }
    }
}

impl DocumentQuery for WebDriverDocument {
    type Node = ElementRef;

    fn find_by_class(&mut self, class: &str) -> Result<Vec<ElementRef>> {
        let client = self.client()?;
        self.runtime.block_on(client.find_all(&format!(".{class}")))
    }

    fn find_by_text(&mut self, needle: &str) -> Result<Lookup<ElementRef>> {
        let xpath = format!("//*[contains(text(), {})]", xpath_literal(needle));
        let client = self.client()?;
        self.runtime.block_on(client.find_xpath(&xpath))
    }

    fn text(&mut self, node: &ElementRef) -> Result<Lookup<String>> {
        let client = self.client()?;
        self.runtime.block_on(client.text(node))
    }

    fn attribute(&mut self, node: &ElementRef, name: &str) -> Result<Lookup<Option<String>>> {
        let client = self.client()?;
        self.runtime.block_on(client.attribute(node, name))
    }

    fn click(&mut self, node: &ElementRef) -> Result<Lookup<()>> {
        let client = self.client()?;
        self.runtime.block_on(client.click(node))
    }

    fn type_text(&mut self, node: &ElementRef, text: &str) -> Result<Lookup<()>> {
        let client = self.client()?;
        self.runtime.block_on(client.send_keys(node, text))
    }

    fn send_key(&mut self, node: &ElementRef, key: NavKey) -> Result<Lookup<()>> {
        let code = match key {
            NavKey::Up => KEY_UP,
            NavKey::Down => KEY_DOWN,
        };
        let client = self.client()?;
        self.runtime.block_on(client.send_keys(node, code))
    }
}
