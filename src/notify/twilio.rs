/// SMS notifications through the Twilio REST API
use log::{info, warn};
use serde::Deserialize;
use std::time::Duration;

use crate::config::TwilioConfig;
use crate::drivers::Notifier;
use crate::error::NotificationError;

const API_BASE: &str = "https://api.twilio.com/2010-04-01";
const REQUEST_TIMEOUT_SECS: u64 = 15;

/// Subset of the message resource returned by the API.
#[derive(Debug, Deserialize)]
struct MessageResponse {
    #[serde(default)]
    sid: Option<String>,
    #[serde(default)]
    error_code: Option<i64>,
    #[serde(default)]
    message: Option<String>,
}

pub struct TwilioNotifier {
    client: reqwest::Client,
    config: TwilioConfig,
}

impl TwilioNotifier {
    pub fn new(config: TwilioConfig) -> Result<Self, NotificationError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| NotificationError(format!("HTTP client error: {}", e)))?;
        Ok(TwilioNotifier { client, config })
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/Accounts/{}/Messages.json",
            API_BASE, self.config.account_sid
        )
    }

    fn form<'a>(&'a self, body: &'a str) -> [(&'static str, &'a str); 3] {
        [
            ("Body", body),
            ("To", self.config.to.as_str()),
            ("From", self.config.from.as_str()),
        ]
    }
}

impl Notifier for TwilioNotifier {
    async fn send(&self, text: &str) -> Result<(), NotificationError> {
        info!("Attempting to send text...");

        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&self.form(text)[..])
            .send()
            .await
            .map_err(|e| NotificationError(format!("request failed: {}", e)))?;

        let status = response.status();
        let body: MessageResponse = response
            .json()
            .await
            .map_err(|e| NotificationError(format!("unreadable response ({}): {}", status, e)))?;

        match body.error_code {
            None if status.is_success() => {
                info!(
                    "Successfully sent text {} with contents: {}",
                    body.sid.as_deref().unwrap_or("?"),
                    text
                );
                Ok(())
            }
            code => {
                let reason = body.message.unwrap_or_else(|| status.to_string());
                warn!("Error sending text: {:?} {}", code, reason);
                Err(NotificationError(format!(
                    "Twilio error {}: {}",
                    code.map(|c| c.to_string()).unwrap_or_else(|| status.to_string()),
                    reason
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notifier() -> TwilioNotifier {
        TwilioNotifier::new(TwilioConfig {
            account_sid: "AC123".to_string(),
            auth_token: "secret".to_string(),
            to: "+15550001".to_string(),
            from: "+15550002".to_string(),
        })
        .unwrap()
    }

    #[test]
    fn builds_account_scoped_url() {
        assert_eq!(
            notifier().messages_url(),
            "https://api.twilio.com/2010-04-01/Accounts/AC123/Messages.json"
        );
    }

    #[test]
    fn form_carries_body_and_numbers() {
        let n = notifier();
        let form = n.form("hello");
        assert_eq!(
            form,
            [("Body", "hello"), ("To", "+15550001"), ("From", "+15550002")]
        );
    }

    #[test]
    fn parses_error_responses() {
        let body: MessageResponse =
            serde_json::from_str(r#"{"code": 21211, "error_code": 21211, "message": "bad number"}"#)
                .unwrap();
        assert_eq!(body.error_code, Some(21211));
        assert_eq!(body.message.as_deref(), Some("bad number"));
        assert!(body.sid.is_none());
    }
}
