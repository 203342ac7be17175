//! Welcome email delivery.
//!
//! Registration spawns one detached task per welcome email. The task hands
//! the payload to an `EmailSender`; delivery failure is logged and never
//! surfaces in the registration response, and there are no retries.
//!
//! The default sender for local dev is `LogEmailSender`, which logs and
//! returns `Ok(())`. Deployments point `MYWALLET_EMAIL_API_URL` at an HTTP
//! email API to get real delivery via `HttpEmailSender`.

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Serialize;
use std::{future::Future, pin::Pin, sync::Arc};
use tracing::{error, info};

use crate::APP_USER_AGENT;

#[derive(Clone, Debug, Serialize)]
pub struct WelcomeEmail {
    pub to_email: String,
    pub username: String,
}

/// Email delivery abstraction used by the registration flow.
pub trait EmailSender: Send + Sync {
    /// Deliver a message or return an error; the caller only logs failures.
    fn send<'a>(
        &'a self,
        message: &'a WelcomeEmail,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;
}

/// Local dev sender that logs the payload instead of sending real email.
#[derive(Clone, Debug)]
pub struct LogEmailSender;

impl EmailSender for LogEmailSender {
    fn send<'a>(
        &'a self,
        message: &'a WelcomeEmail,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            info!(
                to_email = %message.to_email,
                username = %message.username,
                "welcome email send stub"
            );
            Ok(())
        })
    }
}

/// Sender that posts the welcome payload to an HTTP email API.
#[derive(Clone, Debug)]
pub struct HttpEmailSender {
    client: Client,
    endpoint: String,
}

impl HttpEmailSender {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(APP_USER_AGENT)
            .build()
            .context("Failed to build email HTTP client")?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

impl EmailSender for HttpEmailSender {
    fn send<'a>(
        &'a self,
        message: &'a WelcomeEmail,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            self.client
                .post(&self.endpoint)
                .json(message)
                .send()
                .await
                .context("Failed to reach email API")?
                .error_for_status()
                .context("Email API rejected the welcome email")?;

            Ok(())
        })
    }
}

/// Pick the sender implementation from configuration.
///
/// # Errors
/// Returns an error if the HTTP sender cannot be constructed.
pub fn sender_from_config(email_api_url: Option<&str>) -> Result<Arc<dyn EmailSender>> {
    match email_api_url {
        Some(url) => Ok(Arc::new(HttpEmailSender::new(url)?)),
        None => Ok(Arc::new(LogEmailSender)),
    }
}

/// Fire-and-forget welcome email, detached from the request that caused it.
pub fn spawn_welcome_email(sender: Arc<dyn EmailSender>, message: WelcomeEmail) {
    tokio::spawn(async move {
        if let Err(err) = sender.send(&message).await {
            error!("Failed to send welcome email: {err:#}");
        }
    });
}
