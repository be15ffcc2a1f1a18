//! Test helpers for integration tests
//!
//! Spawns a server per test on an ephemeral port and wraps the HTTP and
//! websocket clients.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use folio_api::{create_app, create_app_state};
use folio_common::{AppConfig, IdentityVerifier};
use folio_core::Identity;
use futures_util::{SinkExt, StreamExt};
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tokio_tungstenite::{tungstenite::Message, MaybeTlsStream, WebSocketStream};

/// Secret shared by the server and the test token issuer
pub const TEST_SECRET: &str = "integration-test-secret";

/// Domain whose verified emails are admins
pub const ADMIN_DOMAIN: &str = "studio.dev";

pub type WatchSocket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    verifier: IdentityVerifier,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a new test server
    pub async fn start() -> Result<Self> {
        Self::start_with_config(test_config()).await
    }

    /// Start a test server with custom config
    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let verifier = IdentityVerifier::new(&config.identity);
        let state = create_app_state(config).await?;
        let app = create_app(state);

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            addr,
            client,
            verifier,
            _handle: handle,
        })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }

    /// Sign an identity token the server accepts
    pub fn token_for(&self, identity: &Identity) -> Result<String> {
        Ok(self.verifier.issue(identity, chrono::Duration::hours(1))?)
    }

    pub async fn get(&self, path: &str) -> Result<Response> {
        Ok(self.client.get(self.url(path)).send().await?)
    }

    pub async fn get_auth(&self, path: &str, token: &str) -> Result<Response> {
        Ok(self.client.get(self.url(path)).bearer_auth(token).send().await?)
    }

    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        Ok(self.client.post(self.url(path)).json(body).send().await?)
    }

    pub async fn post_auth<T: Serialize>(
        &self,
        path: &str,
        token: &str,
        body: &T,
    ) -> Result<Response> {
        Ok(self
            .client
            .post(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await?)
    }

    pub async fn put(&self, path: &str) -> Result<Response> {
        Ok(self.client.put(self.url(path)).send().await?)
    }

    pub async fn put_auth(&self, path: &str, token: &str) -> Result<Response> {
        Ok(self.client.put(self.url(path)).bearer_auth(token).send().await?)
    }

    pub async fn delete_auth(&self, path: &str, token: &str) -> Result<Response> {
        Ok(self
            .client
            .delete(self.url(path))
            .bearer_auth(token)
            .send()
            .await?)
    }

    /// Open the watch websocket
    pub async fn watch(&self) -> Result<WatchSocket> {
        let url = format!("ws://{}/api/v1/watch", self.addr);
        let (socket, _) = tokio_tungstenite::connect_async(url).await?;
        Ok(socket)
    }
}

/// In-memory store, no Redis, no invite lookups, no reaction cooldown and a
/// rate limit tests never reach
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::for_memory(TEST_SECRET);
    config.authorization.admin_email_domain = Some(ADMIN_DOMAIN.to_string());
    config.reactions.cooldown_ms = 0;
    config.rate_limit.requests_per_second = 1000;
    config.rate_limit.burst = 1000;
    config
}

/// Send one client frame
pub async fn send_json(socket: &mut WatchSocket, frame: &serde_json::Value) -> Result<()> {
    socket.send(Message::Text(frame.to_string())).await?;
    Ok(())
}

/// Next text frame as JSON, skipping control frames
pub async fn next_json(socket: &mut WatchSocket) -> Result<serde_json::Value> {
    loop {
        let message = tokio::time::timeout(Duration::from_secs(5), socket.next())
            .await?
            .ok_or_else(|| anyhow::anyhow!("watch socket closed"))??;
        if let Message::Text(text) = message {
            return Ok(serde_json::from_str(&text)?);
        }
    }
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(
    response: Response,
    expected_status: StatusCode,
) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(())
}

/// Assert an error response and return its code
pub async fn assert_error(response: Response, expected_status: StatusCode) -> Result<String> {
    let body: serde_json::Value = assert_json(response, expected_status).await?;
    body["error"]["code"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("missing error code in {body}"))
}
