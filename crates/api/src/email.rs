//! Outbound invite email delivery via SMTP.
//!
//! [`InviteMailer`] wraps the `lettre` async SMTP transport to send plain-text
//! invite emails. Configuration is loaded from environment variables; if
//! `SMTP_HOST` is not set, [`EmailConfig::from_env`] returns `None` and no
//! mailer is constructed -- invites are then issued without a notification,
//! and the token must be shared out of band.

use bugtrail_db::models::invite::Invite;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for email delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),
}

// ---------------------------------------------------------------------------
// EmailConfig
// ---------------------------------------------------------------------------

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Default sender address when `SMTP_FROM` is not set.
const DEFAULT_FROM_ADDRESS: &str = "noreply@bugtrail.local";

/// Configuration for the SMTP invite mailer.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// SMTP server hostname.
    pub smtp_host: String,
    /// SMTP server port (defaults to 587).
    pub smtp_port: u16,
    /// RFC 5322 "From" address.
    pub from_address: String,
    /// Optional SMTP username.
    pub smtp_user: Option<String>,
    /// Optional SMTP password.
    pub smtp_password: Option<String>,
}

impl EmailConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `SMTP_HOST` is not set, signalling that email
    /// delivery is not configured and should be skipped.
    ///
    /// | Variable        | Required | Default                   |
    /// |-----------------|----------|---------------------------|
    /// | `SMTP_HOST`     | yes      | —                         |
    /// | `SMTP_PORT`     | no       | `587`                     |
    /// | `SMTP_FROM`     | no       | `noreply@bugtrail.local`  |
    /// | `SMTP_USER`     | no       | —                         |
    /// | `SMTP_PASSWORD` | no       | —                         |
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST").ok()?;
        Some(Self {
            smtp_host,
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            smtp_user: std::env::var("SMTP_USER").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
        })
    }
}

// ---------------------------------------------------------------------------
// InviteMailer
// ---------------------------------------------------------------------------

/// Sends invite emails via SMTP.
pub struct InviteMailer {
    config: EmailConfig,
}

impl InviteMailer {
    /// Create a new mailer with the given configuration.
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Send an invite email carrying the registration link.
    ///
    /// The link embeds the invite token; the recipient completes registration
    /// through it within the validity window.
    pub async fn send_invite(
        &self,
        invite: &Invite,
        company_name: &str,
        invitor_name: &str,
        app_base_url: &str,
    ) -> Result<(), EmailError> {
        use lettre::{
            message::header::ContentType, transport::smtp::authentication::Credentials,
            AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
        };

        let subject = format!("You have been invited to join {company_name}");
        let body = format!(
            "Hi {first} {last},\n\n\
             {invitor} has invited you to join {company} on Bugtrail.\n\n\
             {message}\
             Complete your registration here:\n\
             {link}\n\n\
             This invite expires 7 days after it was sent.",
            first = invite.invitee_first_name,
            last = invite.invitee_last_name,
            invitor = invitor_name,
            company = company_name,
            message = invite
                .message
                .as_deref()
                .map(|m| format!("{m}\n\n"))
                .unwrap_or_default(),
            link = registration_link(app_base_url, invite.company_token, &invite.invitee_email),
        );

        let email = Message::builder()
            .from(self.config.from_address.parse()?)
            .to(invite.invitee_email.parse()?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|e| EmailError::Build(e.to_string()))?;

        let mut transport_builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_host)?
                .port(self.config.smtp_port);

        if let (Some(user), Some(pass)) = (&self.config.smtp_user, &self.config.smtp_password) {
            transport_builder =
                transport_builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        let mailer = transport_builder.build();
        mailer.send(email).await?;

        tracing::info!(to = %invite.invitee_email, invite_id = invite.id, "Invite email sent");
        Ok(())
    }
}

/// Build the registration URL embedded in invite emails.
///
/// The email lands in a query parameter and is percent-encoded so addresses
/// containing `+` or other reserved characters survive the round trip.
fn registration_link(app_base_url: &str, token: Uuid, email: &str) -> String {
    format!(
        "{}/register?token={token}&email={}",
        app_base_url.trim_end_matches('/'),
        urlencoding::encode(email)
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_link_strips_trailing_slash() {
        let token = Uuid::nil();
        let link = registration_link("https://bugtrail.example/", token, "a@b.test");
        assert_eq!(
            link,
            format!("https://bugtrail.example/register?token={token}&email=a%40b.test")
        );
    }

    #[test]
    fn registration_link_encodes_reserved_characters() {
        let token = Uuid::nil();
        let link = registration_link("https://bugtrail.example", token, "nina+dev@acme.test");
        assert_eq!(
            link,
            format!("https://bugtrail.example/register?token={token}&email=nina%2Bdev%40acme.test")
        );
    }

    #[test]
    fn email_error_display_build() {
        let err = EmailError::Build("missing body".to_string());
        assert_eq!(err.to_string(), "Email build error: missing body");
    }

    #[test]
    fn email_error_display_address() {
        let addr_err: Result<lettre::Address, _> = "not-an-email".parse();
        let err = EmailError::Address(addr_err.unwrap_err());
        assert!(err.to_string().contains("Email address parse error"));
    }
}
