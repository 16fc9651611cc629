//! HTTP health probe.
//!
//! # Responsibilities
//! - GET a target URL and classify the response
//! - Turn transport errors into outcomes, never errors
//! - Optionally give up on in-flight requests when the run is cancelled

use std::future::Future;
use reqwest::{redirect, Client, StatusCode};
use serde::Serialize;
use url::Url;

use crate::config::ProbeConfig;
use crate::dispatch::{fetch, Fetched, Probe};
use crate::lifecycle::CancelSignal;

/// Verdict for one HTTP target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum HttpOutcome {
    /// Responded with an accepted status.
    Up { status: u16 },
    /// Responded, but with a failing status.
    Down { status: u16 },
    /// No response: connect, TLS or protocol error.
    Unreachable { reason: String },
    /// The run was cancelled before the response arrived.
    Cancelled,
}

impl HttpOutcome {
    pub fn is_up(&self) -> bool {
        matches!(self, HttpOutcome::Up { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            HttpOutcome::Up { .. } => "up",
            HttpOutcome::Down { .. } => "down",
            HttpOutcome::Unreachable { .. } => "unreachable",
            HttpOutcome::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for HttpOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HttpOutcome::Up { status } => write!(f, "up ({})", status),
            HttpOutcome::Down { status } => write!(f, "down ({})", status),
            HttpOutcome::Unreachable { reason } => write!(f, "unreachable: {}", reason),
            HttpOutcome::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Probes `http`/`https` targets with a GET request.
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: Client,
    redirects_are_up: bool,
    cancel: Option<CancelSignal>,
}

impl HttpProbe {
    pub fn new(config: &ProbeConfig) -> Result<Self, reqwest::Error> {
        // Redirects counted as up are observed directly, not followed.
        let policy = if config.redirects_are_up {
            redirect::Policy::none()
        } else {
            redirect::Policy::default()
        };

        let mut builder = Client::builder()
            .user_agent(config.user_agent.clone())
            .redirect(policy);
        if !config.system_proxy {
            builder = builder.no_proxy();
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            redirects_are_up: config.redirects_are_up,
            cancel: None,
        })
    }

    /// Observe `signal` while a request is in flight: once it fires the probe
    /// stops waiting and reports [`HttpOutcome::Cancelled`].
    pub fn with_cancel(mut self, signal: CancelSignal) -> Self {
        self.cancel = Some(signal);
        self
    }

    fn classify(&self, status: StatusCode) -> HttpOutcome {
        let up = status.is_success() || (self.redirects_are_up && status.is_redirection());
        if up {
            HttpOutcome::Up { status: status.as_u16() }
        } else {
            HttpOutcome::Down { status: status.as_u16() }
        }
    }
}

async fn send(client: Client, url: Url) -> Result<StatusCode, reqwest::Error> {
    let response = client.get(url).send().await?;
    Ok(response.status())
}

impl Probe<Url> for HttpProbe {
    type Outcome = HttpOutcome;

    fn probe(&self, target: Url) -> impl Future<Output = HttpOutcome> + Send {
        let probe = self.clone();
        async move {
            let request = send(probe.client.clone(), target.clone());
            let result = match &probe.cancel {
                None => request.await,
                Some(cancel) => {
                    let fetched = fetch(cancel, request, || {
                        tracing::debug!(target = %target, "Abandoning in-flight probe");
                    })
                    .await;
                    match fetched {
                        Fetched::Done(result) => result,
                        Fetched::Cancelled => return HttpOutcome::Cancelled,
                    }
                }
            };

            match result {
                Ok(status) => {
                    let outcome = probe.classify(status);
                    if !outcome.is_up() {
                        tracing::warn!(target = %target, status = %status, "Probe failed: non-success status");
                    }
                    outcome
                }
                Err(e) => {
                    tracing::warn!(target = %target, error = %e, "Probe failed: connection error");
                    HttpOutcome::Unreachable { reason: e.to_string() }
                }
            }
        }
    }
}
