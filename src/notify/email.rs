//! SMTP email adapter

use std::sync::Arc;

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::info;

use super::{NotificationChannel, NotifyError, NotifyResult};
use crate::AlertEvent;
use crate::config::{EmailConfig, SmtpConfig};

/// Process-wide SMTP transport plus sender address.
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl Mailer {
    pub fn from_config(config: &SmtpConfig) -> anyhow::Result<Self> {
        let mut builder =
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)?.port(config.port);

        if let (Some(user), Some(pass)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        Ok(Self {
            transport: builder.build(),
            from: config.from.parse()?,
        })
    }
}

pub struct EmailChannel {
    mailer: Option<Arc<Mailer>>,
    config: EmailConfig,
}

impl EmailChannel {
    pub fn new(mailer: Option<Arc<Mailer>>, config: EmailConfig) -> Self {
        Self { mailer, config }
    }
}

/// Rendered HTML body shared by all recipients.
pub fn html_body(event: &AlertEvent) -> String {
    let mut body = format!(
        "<b>{}</b> changed state to {}.",
        event.alert_name,
        event.new_state.to_string().to_uppercase()
    );

    if let Some(description) = &event.body {
        body.push_str(&format!("<p>{description}</p>"));
    }

    body.push_str(&format!("<p><a href=\"{}\">Open alert</a></p>", event.alert_url()));
    body
}

#[async_trait]
impl NotificationChannel for EmailChannel {
    async fn notify(&self, event: &AlertEvent) -> NotifyResult {
        let Some(mailer) = &self.mailer else {
            return Err(NotifyError::NotConfigured("mail"));
        };

        let recipients = self.config.recipients();
        if recipients.is_empty() {
            return Err(NotifyError::InvalidConfig("no addresses configured".to_string()));
        }

        let body = html_body(event);
        for recipient in recipients {
            let to: Mailbox = recipient
                .parse()
                .map_err(|_| NotifyError::InvalidConfig(format!("bad address: {recipient}")))?;

            let message = Message::builder()
                .from(mailer.from.clone())
                .to(to)
                .subject(event.subject.clone())
                .header(ContentType::TEXT_HTML)
                .body(body.clone())
                .map_err(|e| NotifyError::InvalidConfig(e.to_string()))?;

            mailer
                .transport
                .send(message)
                .await
                .map_err(|e| NotifyError::Transport(e.to_string()))?;
        }

        info!(alert_id = event.alert_id, "sent alert email");
        Ok(())
    }

    fn kind(&self) -> &'static str {
        "email"
    }
}
