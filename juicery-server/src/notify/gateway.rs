//! SMS gateways

use async_trait::async_trait;
use aws_sdk_sns::Client as SnsClient;
use aws_sdk_sns::types::MessageAttributeValue;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SmsError {
    #[error("Invalid phone number: {0}")]
    InvalidPhone(String),

    #[error("SMS gateway error: {0}")]
    Gateway(String),
}

/// Sends one text message to one phone number
#[async_trait]
pub trait SmsGateway: Send + Sync {
    async fn send(&self, phone: &str, message: &str) -> Result<(), SmsError>;

    fn name(&self) -> &'static str;
}

/// AWS SNS direct-to-phone publishing
pub struct SnsGateway {
    client: SnsClient,
    sender_id: Option<String>,
}

impl SnsGateway {
    pub fn new(client: SnsClient, sender_id: Option<String>) -> Self {
        Self { client, sender_id }
    }

    /// Build a client from the default AWS credential and region chain
    pub async fn from_env(sender_id: Option<String>) -> Self {
        let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(SnsClient::new(&aws_config), sender_id)
    }
}

#[async_trait]
impl SmsGateway for SnsGateway {
    async fn send(&self, phone: &str, message: &str) -> Result<(), SmsError> {
        let phone = normalize_phone(phone)?;

        let mut request = self.client.publish().phone_number(&phone).message(message);
        if let Some(sender_id) = &self.sender_id {
            let attr = MessageAttributeValue::builder()
                .data_type("String")
                .string_value(sender_id)
                .build()
                .map_err(|e| SmsError::Gateway(e.to_string()))?;
            request = request.message_attributes("AWS.SNS.SMS.SenderID", attr);
        }

        let output = request
            .send()
            .await
            .map_err(|e| SmsError::Gateway(e.to_string()))?;

        tracing::info!(to = %phone, message_id = ?output.message_id(), "SMS sent");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "sns"
    }
}

/// Gateway used when SMS is disabled: the message is only logged
#[derive(Debug, Default)]
pub struct LogGateway;

#[async_trait]
impl SmsGateway for LogGateway {
    async fn send(&self, phone: &str, message: &str) -> Result<(), SmsError> {
        let phone = normalize_phone(phone)?;
        tracing::info!(to = %phone, message, "SMS disabled, message logged only");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}

/// Strip spaces, dashes and parentheses; the rest must be an optional `+`
/// followed by digits
pub fn normalize_phone(phone: &str) -> Result<String, SmsError> {
    let cleaned: String = phone
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .collect();
    let digits = cleaned.strip_prefix('+').unwrap_or(&cleaned);
    if digits.len() < 5 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(SmsError::InvalidPhone(phone.to_string()));
    }
    Ok(cleaned)
}
