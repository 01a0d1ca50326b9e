pub mod twilio;

use log::warn;

use crate::config::TwilioConfig;
use crate::drivers::{LogNotifier, Notifier};
use crate::error::NotificationError;

pub use twilio::TwilioNotifier;

/// The notifier chosen at startup from the available credentials.
pub enum OperatorNotifier {
    Sms(TwilioNotifier),
    Log(LogNotifier),
}

impl OperatorNotifier {
    pub fn from_config(twilio: Option<TwilioConfig>) -> Self {
        match twilio.map(TwilioNotifier::new) {
            Some(Ok(notifier)) => OperatorNotifier::Sms(notifier),
            Some(Err(e)) => {
                warn!("{}; falling back to log notifications", e);
                OperatorNotifier::Log(LogNotifier)
            }
            None => OperatorNotifier::Log(LogNotifier),
        }
    }
}

impl Notifier for OperatorNotifier {
    async fn send(&self, text: &str) -> Result<(), NotificationError> {
        match self {
            OperatorNotifier::Sms(notifier) => notifier.send(text).await,
            OperatorNotifier::Log(notifier) => notifier.send(text).await,
        }
    }
}
