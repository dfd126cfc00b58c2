use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Message type posted by the embedded survey once the respondent submits.
pub const FORM_SUBMIT: &str = "form-submit";

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MessageError {
    #[error("message payload is not valid JSON")]
    InvalidJson(#[source] serde_json::Error),

    #[error("message payload does not have the expected shape")]
    UnexpectedShape(#[source] serde_json::Error),
}

/// Raw data of a cross-frame message: either a JSON-encoded string or an
/// already structured object.
#[derive(Debug, Clone, PartialEq)]
pub enum MessagePayload {
    Text(String),
    Structured(Value),
}

impl MessagePayload {
    #[must_use]
    pub fn text(raw: impl Into<String>) -> Self {
        Self::Text(raw.into())
    }

    /// Decode the payload into a `SubmissionMessage`.
    ///
    /// # Errors
    ///
    /// Returns `MessageError::InvalidJson` when a text payload cannot be parsed,
    /// and `MessageError::UnexpectedShape` when the value is not an object or
    /// its `type` is not a string.
    pub fn decode(&self) -> Result<SubmissionMessage, MessageError> {
        let value = match self {
            MessagePayload::Text(raw) => {
                serde_json::from_str::<Value>(raw).map_err(MessageError::InvalidJson)?
            }
            MessagePayload::Structured(value) => value.clone(),
        };
        serde_json::from_value(value).map_err(MessageError::UnexpectedShape)
    }
}

impl From<Value> for MessagePayload {
    fn from(value: Value) -> Self {
        Self::Structured(value)
    }
}

/// The part of a survey message the wrapper cares about. Other fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionMessage {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

impl SubmissionMessage {
    #[must_use]
    pub fn is_form_submit(&self) -> bool {
        self.kind.as_deref() == Some(FORM_SUBMIT)
    }
}
