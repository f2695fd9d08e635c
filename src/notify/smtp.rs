//! SMTP mailer
//!
//! Authenticated relay over TLS (`smtp.gmail.com` by default).

use super::{Mail, Mailer};
use crate::config::MailConfig;
use crate::util::SMTP_TIMEOUT;
use anyhow::{Context, Result};
use async_trait::async_trait;
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(config: &MailConfig) -> Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
            .with_context(|| format!("Invalid SMTP relay '{}'", config.smtp_host))?
            .credentials(Credentials::new(
                config.user.clone(),
                config.password.clone(),
            ))
            .timeout(Some(SMTP_TIMEOUT))
            .build();

        Ok(Self { transport })
    }
}

/// Turn a [`Mail`] into an RFC 5322 message
fn build_message(mail: &Mail) -> Result<Message> {
    let from: Mailbox = mail
        .from
        .parse()
        .with_context(|| format!("Invalid sender address '{}'", mail.from))?;
    let to: Mailbox = mail
        .to
        .parse()
        .with_context(|| format!("Invalid recipient address '{}'", mail.to))?;

    Message::builder()
        .from(from)
        .to(to)
        .subject(mail.subject.clone())
        .header(ContentType::TEXT_PLAIN)
        .body(mail.body.clone())
        .context("Failed to build notification message")
}

#[async_trait]
impl Mailer for SmtpMailer {
    fn name(&self) -> &str {
        "smtp"
    }

    async fn send(&self, mail: Mail) -> Result<()> {
        let message = build_message(&mail)?;

        tracing::debug!(to = %mail.to, "Sending notification over SMTP");

        self.transport
            .send(message)
            .await
            .context("SMTP delivery failed")?;
        Ok(())
    }
}
