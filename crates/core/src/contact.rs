//! Contact page form.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::CoreError;
use crate::types::Timestamp;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ContactForm {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Subject is required"))]
    pub subject: String,
    #[validate(length(min = 1, message = "Message is required"))]
    pub message: String,
}

/// Returned for an accepted message; the caller clears its form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactAcknowledgement {
    pub reference: Uuid,
    pub received_at: Timestamp,
}

impl ContactForm {
    /// Validate and acknowledge the message.
    pub fn submit(&self) -> Result<ContactAcknowledgement, CoreError> {
        self.validate().map_err(|errors| {
            let mut fields: Vec<String> = errors
                .field_errors()
                .keys()
                .map(|field| field.to_string())
                .collect();
            fields.sort();
            CoreError::Validation(format!("Invalid contact form: {}", fields.join(", ")))
        })?;

        let ack = ContactAcknowledgement {
            reference: Uuid::new_v4(),
            received_at: chrono::Utc::now(),
        };
        tracing::info!(
            reference = %ack.reference,
            email = %self.email,
            subject = %self.subject,
            "Contact message received"
        );
        Ok(ack)
    }
}
