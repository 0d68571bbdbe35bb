use crate::{error::Result, models::MailchimpError};
use serde::de::DeserializeOwned;

/// Why the most recent call did not succeed, as captured by the dispatcher.
#[derive(Debug, thiserror::Error)]
pub enum LastError {
    #[error("Mailchimp error: {0}")]
    Api(MailchimpError),
    #[error("Could not decode error body: {0}")]
    Decode(serde_json::Error),
}

impl LastError {
    pub fn api(&self) -> Option<&MailchimpError> {
        match self {
            LastError::Api(err) => Some(err),
            LastError::Decode(_) => None,
        }
    }
}

/// A response obtained from the API, whatever its status code.
#[derive(Debug)]
pub struct ApiResponse {
    status: u16,
    body: String,
    error: Option<LastError>,
}

impl ApiResponse {
    /// Builds a response, capturing the problem document of any non-2xx answer.
    pub(crate) fn new(status: u16, body: String) -> Self {
        let error = if (200..300).contains(&status) {
            None
        } else {
            Some(match serde_json::from_str::<MailchimpError>(&body) {
                Ok(err) => LastError::Api(err),
                Err(err) => LastError::Decode(err),
            })
        };

        Self {
            status,
            body,
            error,
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn is_status(&self, status: u16) -> bool {
        self.status == status
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// The error captured for this call, `None` when the call succeeded.
    pub fn error(&self) -> Option<&LastError> {
        self.error.as_ref()
    }

    pub fn into_error(self) -> Option<LastError> {
        self.error
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.body)?)
    }
}
