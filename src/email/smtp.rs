//! SMTP email provider implementation using lettre
//!
//! Serves two channels: the primary authenticated relay and the sandbox
//! relay used outside production. They share the transport; only the
//! configuration source and the provider name differ.

use super::provider::{validate_message, EmailProvider, EmailProviderError, SendReceipt};
use crate::domain::{EmailMessage, SmtpConfig};
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

/// SMTP-based email provider
pub struct SmtpEmailProvider {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_email: String,
    from_name: Option<String>,
    provider_name: &'static str,
}

impl SmtpEmailProvider {
    /// Create the primary relay provider
    ///
    /// Credentials are mandatory here: an unauthenticated primary relay is
    /// a misconfiguration, reported before any network I/O happens.
    pub fn from_config(config: &SmtpConfig) -> Result<Self, EmailProviderError> {
        match (&config.username, &config.password) {
            (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => {}
            _ => {
                return Err(EmailProviderError::NotConfigured(
                    "SMTP username and password are required".to_string(),
                ))
            }
        }

        Self::build(config, "smtp")
    }

    /// Create the sandbox relay provider
    ///
    /// Same transport as the primary relay, pointed at a non-production
    /// host whose deliveries never reach a real inbox.
    pub fn from_sandbox_config(config: &SmtpConfig) -> Result<Self, EmailProviderError> {
        match (&config.username, &config.password) {
            (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => {}
            _ => {
                return Err(EmailProviderError::NotConfigured(
                    "sandbox SMTP username and password are required".to_string(),
                ))
            }
        }

        Self::build(config, "sandbox")
    }

    fn build(config: &SmtpConfig, provider_name: &'static str) -> Result<Self, EmailProviderError> {
        if config.host.trim().is_empty() {
            return Err(EmailProviderError::NotConfigured(
                "SMTP relay host is empty".to_string(),
            ));
        }

        let mut builder = if config.use_tls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host).map_err(|e| {
                EmailProviderError::NotConfigured(format!(
                    "invalid SMTP relay host {:?}: {}",
                    config.host, e
                ))
            })?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
        };

        builder = builder.port(config.port);

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Ok(Self {
            transport: builder.build(),
            from_email: config.from_email.clone(),
            from_name: config.from_name.clone(),
            provider_name,
        })
    }

    fn build_from_mailbox(&self) -> Result<Mailbox, EmailProviderError> {
        let mailbox = match &self.from_name {
            Some(name) => format!("{} <{}>", name, self.from_email),
            None => self.from_email.clone(),
        };

        mailbox.parse().map_err(|e| {
            EmailProviderError::NotConfigured(format!("Invalid from address: {}", e))
        })
    }

    fn build_email(&self, message: &EmailMessage) -> Result<Message, EmailProviderError> {
        let from = self.build_from_mailbox()?;
        let to: Mailbox = message.to.to_mailbox_string().parse().map_err(|e| {
            EmailProviderError::InvalidMessage(format!("Invalid recipient address: {}", e))
        })?;

        let builder = Message::builder()
            .from(from)
            .to(to)
            .subject(message.subject.clone());

        // Multipart alternative when an HTML rendering exists
        let email = if let Some(html_body) = &message.html_body {
            builder
                .multipart(
                    MultiPart::alternative()
                        .singlepart(
                            SinglePart::builder()
                                .header(ContentType::TEXT_PLAIN)
                                .body(message.text_body.clone()),
                        )
                        .singlepart(
                            SinglePart::builder()
                                .header(ContentType::TEXT_HTML)
                                .body(html_body.clone()),
                        ),
                )
                .map_err(|e| EmailProviderError::InvalidMessage(e.to_string()))?
        } else {
            builder
                .header(ContentType::TEXT_PLAIN)
                .body(message.text_body.clone())
                .map_err(|e| EmailProviderError::InvalidMessage(e.to_string()))?
        };

        Ok(email)
    }

    fn classify_transport_error(e: &lettre::transport::smtp::Error) -> EmailProviderError {
        let error_msg = e.to_string();
        if error_msg.contains("authentication") || error_msg.contains("AUTH") {
            EmailProviderError::AuthenticationFailed(error_msg)
        } else if e.is_permanent() {
            // Connected fine, message refused (bad sender domain etc.)
            EmailProviderError::Rejected(error_msg)
        } else if error_msg.contains("connection") || error_msg.contains("timeout") {
            EmailProviderError::ConnectionError(error_msg)
        } else {
            EmailProviderError::SendFailed(error_msg)
        }
    }
}

#[async_trait]
impl EmailProvider for SmtpEmailProvider {
    async fn send(&self, message: &EmailMessage) -> Result<SendReceipt, EmailProviderError> {
        validate_message(message)?;
        let email = self.build_email(message)?;

        match self.transport.send(email).await {
            Ok(response) => {
                let message_id = response.message().next().map(|s| s.to_string());
                Ok(SendReceipt::new(message_id))
            }
            Err(e) => Err(Self::classify_transport_error(&e)),
        }
    }

    fn provider_name(&self) -> &'static str {
        self.provider_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EmailAddress;

    fn test_smtp_config() -> SmtpConfig {
        SmtpConfig {
            host: "localhost".to_string(),
            port: 1025,
            username: Some("user@example.com".to_string()),
            password: Some("password".to_string()),
            use_tls: false,
            from_email: "test@example.com".to_string(),
            from_name: Some("Test Sender".to_string()),
        }
    }

    #[test]
    fn test_primary_provider_creation() {
        let provider = SmtpEmailProvider::from_config(&test_smtp_config()).unwrap();
        assert_eq!(provider.provider_name(), "smtp");
    }

    #[test]
    fn test_sandbox_provider_creation() {
        let config = SmtpConfig {
            host: "smtp.ethereal.email".to_string(),
            port: 587,
            use_tls: true,
            ..test_smtp_config()
        };
        let provider = SmtpEmailProvider::from_sandbox_config(&config).unwrap();
        assert_eq!(provider.provider_name(), "sandbox");
    }

    #[test]
    fn test_primary_provider_requires_credentials() {
        let config = SmtpConfig {
            username: None,
            password: None,
            ..test_smtp_config()
        };
        let result = SmtpEmailProvider::from_config(&config);
        assert!(matches!(result, Err(EmailProviderError::NotConfigured(_))));
    }

    #[test]
    fn test_primary_provider_rejects_blank_credentials() {
        let config = SmtpConfig {
            username: Some(String::new()),
            password: Some(String::new()),
            ..test_smtp_config()
        };
        let result = SmtpEmailProvider::from_config(&config);
        assert!(matches!(result, Err(EmailProviderError::NotConfigured(_))));
    }

    #[test]
    fn test_build_rejects_blank_host() {
        let config = SmtpConfig {
            host: "  ".to_string(),
            ..test_smtp_config()
        };
        match SmtpEmailProvider::from_config(&config) {
            Err(EmailProviderError::NotConfigured(msg)) => {
                assert!(msg.contains("host"));
            }
            _ => panic!("Expected NotConfigured for a blank relay host"),
        }
    }

    #[test]
    fn test_build_from_mailbox() {
        let provider = SmtpEmailProvider::from_config(&test_smtp_config()).unwrap();
        let mailbox = provider.build_from_mailbox().unwrap();
        assert_eq!(mailbox.email.to_string(), "test@example.com");
    }

    #[test]
    fn test_build_from_mailbox_without_name() {
        let config = SmtpConfig {
            from_name: None,
            ..test_smtp_config()
        };
        let provider = SmtpEmailProvider::from_config(&config).unwrap();
        let mailbox = provider.build_from_mailbox().unwrap();
        assert_eq!(mailbox.email.to_string(), "test@example.com");
    }

    #[test]
    fn test_build_email_plain_text_only() {
        let provider = SmtpEmailProvider::from_config(&test_smtp_config()).unwrap();
        let message = EmailMessage::new(
            EmailAddress::new("user@example.com"),
            "Verify your email",
            "Your code is 123456",
        );
        assert!(provider.build_email(&message).is_ok());
    }

    #[test]
    fn test_build_email_multipart() {
        let provider = SmtpEmailProvider::from_config(&test_smtp_config()).unwrap();
        let message = EmailMessage::new(
            EmailAddress::new("user@example.com"),
            "Verify your email",
            "Your code is 123456",
        )
        .with_html_body("<p>Your code is <b>123456</b></p>");
        assert!(provider.build_email(&message).is_ok());
    }

    #[test]
    fn test_build_email_invalid_recipient() {
        let provider = SmtpEmailProvider::from_config(&test_smtp_config()).unwrap();
        let message = EmailMessage::new(
            EmailAddress::new("not an address"),
            "Verify your email",
            "Your code is 123456",
        );
        let err = provider.build_email(&message).unwrap_err();
        assert!(matches!(err, EmailProviderError::InvalidMessage(_)));
    }

    #[tokio::test]
    async fn test_send_validates_before_transport() {
        let provider = SmtpEmailProvider::from_config(&test_smtp_config()).unwrap();
        let message = EmailMessage::new(EmailAddress::new("user@example.com"), "", "body");

        // Fails on the empty subject before any connection is opened, so
        // this is safe without a live SMTP server.
        let err = provider.send(&message).await.unwrap_err();
        assert!(matches!(err, EmailProviderError::InvalidMessage(_)));
    }
}
