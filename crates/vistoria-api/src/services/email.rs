//! Email delivery of the rendered inspection report via SMTP.
//!
//! Delivery is strictly best-effort: every failure is logged and swallowed,
//! and the boolean result is only ever inspected for logging. A submission is
//! never failed or altered by its notification.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::sync::Arc;

use vistoria_core::models::InspectionId;
use vistoria_core::Config;
use vistoria_processing::pdf::document_filename;

/// Best-effort notification of a recorded submission.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send the rendered document to `recipient`. Returns whether delivery
    /// was handed to the relay; never propagates an error. A blank recipient
    /// is a no-op.
    async fn notify(&self, recipient: &str, document: &[u8], inspection_id: &InspectionId)
        -> bool;
}

/// SMTP-backed notifier sending the PDF report as an attachment.
#[derive(Clone)]
pub struct SmtpNotifier {
    mailer: Arc<AsyncSmtpTransport<Tokio1Executor>>,
    from: String,
}

impl SmtpNotifier {
    /// Create the notifier from config. Returns `None` if SMTP is not
    /// configured; notification is then skipped entirely.
    pub fn from_config(config: &Config) -> Option<Self> {
        let host = config.smtp_host.as_deref()?;
        let from = config.smtp_from.clone()?;
        let port = config.smtp_port;

        let mailer = if config.smtp_tls {
            let b = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host).ok()?;
            let b = b.port(port);
            let b = if let (Some(u), Some(p)) = (&config.smtp_user, &config.smtp_password) {
                b.credentials(Credentials::new(u.clone(), p.clone()))
            } else {
                b
            };
            tracing::info!(
                host = %host,
                port = port,
                "Mail notifier initialized (SMTP with STARTTLS)"
            );
            b.build()
        } else {
            let b = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host).port(port);
            let b = if let (Some(u), Some(p)) = (&config.smtp_user, &config.smtp_password) {
                b.credentials(Credentials::new(u.clone(), p.clone()))
            } else {
                b
            };
            tracing::info!(host = %host, port = port, "Mail notifier initialized (SMTP)");
            b.build()
        };

        Some(Self {
            mailer: Arc::new(mailer),
            from,
        })
    }

    fn build_message(
        &self,
        recipient: &str,
        document: &[u8],
        inspection_id: &InspectionId,
    ) -> Result<Message, String> {
        let to: Mailbox = recipient
            .parse()
            .map_err(|e| format!("invalid recipient address: {}", e))?;
        let from: Mailbox = self
            .from
            .parse()
            .map_err(|e| format!("invalid SMTP_FROM: {}", e))?;

        let pdf_type =
            ContentType::parse("application/pdf").map_err(|e| format!("content type: {}", e))?;
        let attachment =
            Attachment::new(document_filename(inspection_id)).body(document.to_vec(), pdf_type);

        let body = format!(
            "Inspection {} was recorded. The full report is attached.",
            inspection_id
        );

        Message::builder()
            .from(from)
            .to(to)
            .subject(format!("Inspection report {}", inspection_id))
            .multipart(
                MultiPart::mixed()
                    .singlepart(SinglePart::plain(body))
                    .singlepart(attachment),
            )
            .map_err(|e| e.to_string())
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn notify(
        &self,
        recipient: &str,
        document: &[u8],
        inspection_id: &InspectionId,
    ) -> bool {
        if recipient.trim().is_empty() {
            return true;
        }

        let message = match self.build_message(recipient, document, inspection_id) {
            Ok(message) => message,
            Err(err) => {
                tracing::warn!(inspection_id = %inspection_id, error = %err, "Could not build notification email");
                return false;
            }
        };

        match self.mailer.send(message).await {
            Ok(_) => {
                tracing::info!(inspection_id = %inspection_id, "Notification email sent");
                true
            }
            Err(err) => {
                tracing::warn!(inspection_id = %inspection_id, error = %err, "Notification email failed");
                false
            }
        }
    }
}
