use std::collections::BTreeMap;

use serde_json::json;
use thiserror::Error;
use validator::ValidationErrors;

use crate::{db::db::StoreError, error::HttpError};

/// Field name to the messages explaining why its value was rejected.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

pub fn field_errors(errors: &ValidationErrors) -> FieldErrors {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errors)| {
            let messages = errors
                .iter()
                .map(|error| match &error.message {
                    Some(message) => message.to_string(),
                    None => format!("Invalid value ({})", error.code),
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}

/// What the caller was attempting; drives the wording of authorization and
/// internal-error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Retrieve,
    Post,
    Update,
    Delete,
    Search,
}

impl Action {
    pub fn verb(&self) -> &'static str {
        match self {
            Action::Retrieve => "retrieve",
            Action::Post => "post",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::Search => "search",
        }
    }

    pub fn gerund(&self) -> &'static str {
        match self {
            Action::Retrieve => "retrieving",
            Action::Post => "posting",
            Action::Update => "updating",
            Action::Delete => "deleting",
            Action::Search => "searching",
        }
    }
}

#[derive(Debug, Error)]
pub enum ListingError {
    #[error("User must be realtor to {} realestate data", .0.verb())]
    NotRealtor(Action),

    #[error("{0}")]
    NotFound(&'static str),

    #[error("{0}")]
    BadRequest(&'static str),

    #[error("Invalid realestate data")]
    Validation(FieldErrors),

    #[error("Something went wrong when {} realestate data", .action.gerund())]
    Internal {
        action: Action,
        #[source]
        source: StoreError,
    },
}

impl ListingError {
    pub fn internal(action: Action) -> impl FnOnce(StoreError) -> ListingError {
        move |source| ListingError::Internal { action, source }
    }
}

impl From<ListingError> for HttpError {
    fn from(error: ListingError) -> Self {
        match error {
            ListingError::NotRealtor(_) => HttpError::forbidden(error.to_string()),
            ListingError::NotFound(message) => HttpError::not_found(message),
            ListingError::BadRequest(message) => HttpError::bad_request(message),
            ListingError::Validation(ref fields) => {
                HttpError::validation(error.to_string(), json!(fields))
            }
            ListingError::Internal { action, ref source } => {
                tracing::error!(action = action.verb(), error = %source, "listing operation failed");
                HttpError::server_error(error.to_string())
            }
        }
    }
}
