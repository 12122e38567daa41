//! Outgoing email through the SendGrid v3 HTTP API.

use serde_json::json;

use crate::server::error::AppError;

const SENDGRID_SEND_URL: &str = "https://api.sendgrid.com/v3/mail/send";
const SENDER_NAME: &str = "Tax Beacon System";

/// Welcome message sent when an account is created for someone.
#[derive(Debug, Clone)]
pub struct UserCreatedMessage {
    pub email: String,
}

impl UserCreatedMessage {
    pub const SUBJECT: &'static str = "Tax Beacon account details";

    pub fn body(&self, app_url: &str) -> String {
        format!(
            "You have been registered in Tax Beacon system with the following credentials:\n\n\
             Username: {}\n\n\
             Sign in at: {}",
            self.email, app_url
        )
    }
}

#[derive(Clone)]
pub struct EmailSender {
    http_client: reqwest::Client,
    api_key: Option<String>,
    from: Option<String>,
    app_url: String,
}

impl EmailSender {
    pub fn new(
        http_client: reqwest::Client,
        api_key: Option<String>,
        from: Option<String>,
        app_url: String,
    ) -> Self {
        Self {
            http_client,
            api_key,
            from,
            app_url,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some() && self.from.is_some()
    }

    /// Sends the account details email.
    ///
    /// Without an API key or sender address nothing is sent and a warning is logged.
    ///
    /// # Returns
    /// - `Ok(true)` - SendGrid accepted the message
    /// - `Ok(false)` - Sending skipped or rejected by SendGrid
    /// - `Err(AppError::ReqwestErr)` - Request could not be sent
    pub async fn send_user_created(&self, message: &UserCreatedMessage) -> Result<bool, AppError> {
        let (Some(api_key), Some(from)) = (self.api_key.as_deref(), self.from.as_deref()) else {
            tracing::warn!(
                "Email is not configured, skipping account details email to {}",
                message.email
            );
            return Ok(false);
        };

        tracing::info!("Attempt to send account details email to {}", message.email);

        let payload = sendgrid_payload(
            from,
            &[message.email.as_str()],
            UserCreatedMessage::SUBJECT,
            &message.body(&self.app_url),
        );

        let response = self
            .http_client
            .post(SENDGRID_SEND_URL)
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        tracing::info!(
            "User {} creation information has been sent, response status code is {}",
            message.email,
            status
        );

        Ok(status.is_success())
    }
}

fn sendgrid_payload(from: &str, to: &[&str], subject: &str, text: &str) -> serde_json::Value {
    let recipients: Vec<serde_json::Value> = to.iter().map(|email| json!({ "email": email })).collect();

    json!({
        "personalizations": [{ "to": recipients }],
        "from": { "email": from, "name": SENDER_NAME },
        "subject": subject,
        "content": [{ "type": "text/plain", "value": text }],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_sendgrid_payload() {
        let payload = sendgrid_payload("noreply@taxbeacon.test", &["a@b.test"], "Hi", "Body");

        assert_eq!(payload["personalizations"][0]["to"][0]["email"], "a@b.test");
        assert_eq!(payload["from"]["name"], SENDER_NAME);
        assert_eq!(payload["content"][0]["type"], "text/plain");
    }

    #[test]
    fn welcome_body_lists_username() {
        let message = UserCreatedMessage {
            email: "jane@acme.test".to_string(),
        };

        let body = message.body("https://app.test");

        assert!(body.contains("Username: jane@acme.test"));
        assert!(body.contains("https://app.test"));
    }

    #[tokio::test]
    async fn unconfigured_sender_skips() {
        let sender = EmailSender::new(reqwest::Client::new(), None, None, String::new());
        let message = UserCreatedMessage {
            email: "jane@acme.test".to_string(),
        };

        assert!(!sender.is_configured());
        assert!(!sender.send_user_created(&message).await.unwrap());
    }
}
