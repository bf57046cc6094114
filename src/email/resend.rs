//! Resend transactional email provider
//!
//! Sends through the Resend HTTPS JSON API. The base URL is taken from
//! configuration so tests can point the provider at a local server.

use super::provider::{validate_message, EmailProvider, EmailProviderError, SendReceipt};
use crate::domain::{EmailMessage, ResendConfig};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct SendEmailRequest<'a> {
    from: String,
    to: Vec<String>,
    subject: &'a str,
    html: &'a str,
    text: &'a str,
}

#[derive(Deserialize)]
struct SendEmailResponse {
    id: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorResponse {
    message: Option<String>,
}

/// Resend API email provider
pub struct ResendEmailProvider {
    client: reqwest::Client,
    api_key: String,
    from_email: String,
    from_name: Option<String>,
    base_url: String,
}

impl ResendEmailProvider {
    /// Create a new Resend provider from configuration
    pub fn from_config(config: &ResendConfig) -> Result<Self, EmailProviderError> {
        if config.api_key.trim().is_empty() {
            return Err(EmailProviderError::NotConfigured(
                "RESEND_API_KEY is empty".to_string(),
            ));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key: config.api_key.clone(),
            from_email: config.from_email.clone(),
            from_name: config.from_name.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn build_from_address(&self) -> String {
        match &self.from_name {
            Some(name) => format!("{} <{}>", name, self.from_email),
            None => self.from_email.clone(),
        }
    }

    async fn classify_error_response(response: reqwest::Response) -> EmailProviderError {
        let status = response.status();
        let detail = response
            .json::<ApiErrorResponse>()
            .await
            .ok()
            .and_then(|body| body.message)
            .unwrap_or_else(|| status.to_string());

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                EmailProviderError::AuthenticationFailed(detail)
            }
            StatusCode::TOO_MANY_REQUESTS => {
                EmailProviderError::Rejected(format!("rate limited: {}", detail))
            }
            s if s.is_client_error() => EmailProviderError::Rejected(detail),
            _ => EmailProviderError::SendFailed(detail),
        }
    }
}

#[async_trait]
impl EmailProvider for ResendEmailProvider {
    async fn send(&self, message: &EmailMessage) -> Result<SendReceipt, EmailProviderError> {
        validate_message(message)?;

        // Config check precedes any network I/O
        if self.api_key.trim().is_empty() {
            return Err(EmailProviderError::NotConfigured(
                "RESEND_API_KEY is empty".to_string(),
            ));
        }

        let payload = SendEmailRequest {
            from: self.build_from_address(),
            to: vec![message.to.to_mailbox_string()],
            subject: &message.subject,
            html: message.html_or_text(),
            text: &message.text_body,
        };

        let response = self
            .client
            .post(format!("{}/emails", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() || e.is_connect() {
                    EmailProviderError::ConnectionError(e.to_string())
                } else {
                    EmailProviderError::SendFailed(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(Self::classify_error_response(response).await);
        }

        let body: SendEmailResponse = response
            .json()
            .await
            .map_err(|e| EmailProviderError::SendFailed(format!("Malformed response: {}", e)))?;

        Ok(SendReceipt::new(body.id))
    }

    fn provider_name(&self) -> &'static str {
        "resend"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EmailAddress;
    use wiremock::matchers::{bearer_token, body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(base_url: &str) -> ResendConfig {
        ResendConfig {
            api_key: "re_test_key".to_string(),
            from_email: "noreply@example.com".to_string(),
            from_name: Some("Portal".to_string()),
            base_url: base_url.to_string(),
        }
    }

    fn test_message() -> EmailMessage {
        EmailMessage::new(
            EmailAddress::new("user@example.com"),
            "Verify your email",
            "Your code is 123456",
        )
    }

    #[test]
    fn test_from_config_rejects_empty_api_key() {
        let config = ResendConfig {
            api_key: "  ".to_string(),
            ..test_config("https://api.resend.com")
        };
        let result = ResendEmailProvider::from_config(&config);
        assert!(matches!(result, Err(EmailProviderError::NotConfigured(_))));
    }

    #[test]
    fn test_build_from_address() {
        let provider =
            ResendEmailProvider::from_config(&test_config("https://api.resend.com")).unwrap();
        assert_eq!(
            provider.build_from_address(),
            "Portal <noreply@example.com>"
        );
    }

    #[tokio::test]
    async fn test_send_success() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/emails"))
            .and(bearer_token("re_test_key"))
            .and(body_partial_json(serde_json::json!({
                "from": "Portal <noreply@example.com>",
                "to": ["user@example.com"],
                "subject": "Verify your email",
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "msg-abc"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let provider = ResendEmailProvider::from_config(&test_config(&server.uri())).unwrap();
        let receipt = provider.send(&test_message()).await.unwrap();
        assert_eq!(receipt.message_id.as_deref(), Some("msg-abc"));
    }

    #[tokio::test]
    async fn test_send_authentication_failure() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/emails"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "statusCode": 401,
                "message": "API key is invalid",
            })))
            .mount(&server)
            .await;

        let provider = ResendEmailProvider::from_config(&test_config(&server.uri())).unwrap();
        let err = provider.send(&test_message()).await.unwrap_err();
        match err {
            EmailProviderError::AuthenticationFailed(msg) => {
                assert!(msg.contains("API key is invalid"));
            }
            other => panic!("Expected AuthenticationFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_send_provider_rejection() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/emails"))
            .respond_with(ResponseTemplate::new(422).set_body_json(serde_json::json!({
                "statusCode": 422,
                "message": "The from domain is not verified",
            })))
            .mount(&server)
            .await;

        let provider = ResendEmailProvider::from_config(&test_config(&server.uri())).unwrap();
        let err = provider.send(&test_message()).await.unwrap_err();
        assert!(matches!(err, EmailProviderError::Rejected(_)));
    }

    #[tokio::test]
    async fn test_send_server_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/emails"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let provider = ResendEmailProvider::from_config(&test_config(&server.uri())).unwrap();
        let err = provider.send(&test_message()).await.unwrap_err();
        assert!(matches!(err, EmailProviderError::SendFailed(_)));
    }

    #[tokio::test]
    async fn test_missing_api_key_makes_no_network_call() {
        let server = MockServer::start().await;

        // Zero requests expected: the config check must run first
        Mock::given(method("POST"))
            .and(path("/emails"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let provider = ResendEmailProvider {
            client: reqwest::Client::new(),
            api_key: String::new(),
            from_email: "noreply@example.com".to_string(),
            from_name: None,
            base_url: server.uri(),
        };

        let err = provider.send(&test_message()).await.unwrap_err();
        assert!(matches!(err, EmailProviderError::NotConfigured(_)));
    }

    #[tokio::test]
    async fn test_send_validates_message_first() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let provider = ResendEmailProvider::from_config(&test_config(&server.uri())).unwrap();
        let message = EmailMessage::new(EmailAddress::new(""), "Subject", "body");
        let err = provider.send(&message).await.unwrap_err();
        assert!(matches!(err, EmailProviderError::InvalidMessage(_)));
    }
}
