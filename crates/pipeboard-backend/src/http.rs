//! HTTP implementation of [`PipelineBackend`].
//!
//! [`HttpBackend`] speaks the REST surface of the pipeboard server. The
//! graph-changed push is realized as a long-poll loop: `GET /pipeline/events`
//! answers `200` with the current graph version as soon as it moves past the
//! client's `since` cursor, or `204` when the poll window elapses quietly.
//! The loop runs on a spawned task; releasing the subscription aborts it.

use std::time::Duration;

use reqwest::StatusCode;
use tokio::sync::mpsc;

use pipeboard_core::{Assignment, Candidate, PipelineGraph, PortLink, Position};

use crate::error::BackendError;
use crate::events::Subscription;
use crate::protocol::{CreateNodeRequest, EventTick, SetAssignmentRequest};
use crate::traits::PipelineBackend;

const POLL_RETRY_DELAY: Duration = Duration::from_secs(1);

/// A remote pipeline backend reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base: String,
}

impl HttpBackend {
    /// Creates a backend client for a server base URL such as
    /// `http://127.0.0.1:3900`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base = base_url.into();
        while base.ends_with('/') {
            base.pop();
        }
        HttpBackend {
            client: reqwest::Client::new(),
            base,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }
}

/// Turns a non-success response into [`BackendError::Status`].
async fn expect_success(response: reqwest::Response) -> Result<reqwest::Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        let message = response.text().await.unwrap_or_default();
        Err(BackendError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait::async_trait]
impl PipelineBackend for HttpBackend {
    async fn fetch_graph(&self) -> Result<PipelineGraph, BackendError> {
        let response = self.client.get(self.url("/pipeline")).send().await?;
        Ok(expect_success(response).await?.json().await?)
    }

    async fn replace_graph(&self, graph: PipelineGraph) -> Result<(), BackendError> {
        let response = self
            .client
            .put(self.url("/pipeline"))
            .json(&graph)
            .send()
            .await?;
        expect_success(response).await?;
        Ok(())
    }

    async fn connect(&self, link: PortLink) -> Result<(), BackendError> {
        let response = self
            .client
            .post(self.url("/pipeline/connections"))
            .json(&link)
            .send()
            .await?;
        expect_success(response).await?;
        Ok(())
    }

    async fn disconnect(&self, link: PortLink) -> Result<(), BackendError> {
        let response = self
            .client
            .delete(self.url("/pipeline/connections"))
            .json(&link)
            .send()
            .await?;
        expect_success(response).await?;
        Ok(())
    }

    async fn set_assignment(
        &self,
        edge_id: &str,
        assignment: Assignment,
    ) -> Result<(), BackendError> {
        let response = self
            .client
            .put(self.url(&format!("/pipeline/edges/{edge_id}/assignment")))
            .json(&SetAssignmentRequest { assignment })
            .send()
            .await?;
        expect_success(response).await?;
        Ok(())
    }

    async fn create_node(&self, kind: &str, position: Position) -> Result<(), BackendError> {
        let response = self
            .client
            .post(self.url("/pipeline/nodes"))
            .json(&CreateNodeRequest {
                kind: kind.to_string(),
                position,
            })
            .send()
            .await?;
        expect_success(response).await?;
        Ok(())
    }

    async fn remove_node(&self, node_id: &str) -> Result<(), BackendError> {
        let response = self
            .client
            .delete(self.url(&format!("/pipeline/nodes/{node_id}")))
            .send()
            .await?;
        expect_success(response).await?;
        Ok(())
    }

    async fn list_candidates(&self) -> Result<Vec<Candidate>, BackendError> {
        let response = self.client.get(self.url("/candidates")).send().await?;
        Ok(expect_success(response).await?.json().await?)
    }

    fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let client = self.client.clone();
        let url = self.url("/pipeline/events");

        let poller = tokio::spawn(async move {
            let mut since: Option<u64> = None;
            loop {
                let mut request = client.get(&url);
                if let Some(version) = since {
                    request = request.query(&[("since", version)]);
                }
                match request.send().await {
                    Ok(response) if response.status() == StatusCode::OK => {
                        match response.json::<EventTick>().await {
                            Ok(tick) => {
                                since = Some(tick.version);
                                if tx.send(()).is_err() {
                                    break;
                                }
                            }
                            Err(err) => {
                                tracing::warn!(error = %err, "malformed event tick");
                                tokio::time::sleep(POLL_RETRY_DELAY).await;
                            }
                        }
                    }
                    Ok(response) if response.status() == StatusCode::NO_CONTENT => {
                        // Quiet poll window; go straight back around.
                    }
                    Ok(response) => {
                        tracing::warn!(status = %response.status(), "event poll rejected");
                        tokio::time::sleep(POLL_RETRY_DELAY).await;
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "event poll failed");
                        tokio::time::sleep(POLL_RETRY_DELAY).await;
                    }
                }
            }
        });

        Subscription::new(rx, move || poller.abort())
    }
}
