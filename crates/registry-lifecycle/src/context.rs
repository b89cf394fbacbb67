//! Typed key/value carrier threaded through lifecycle calls
//!
//! Keys are case-insensitive. Callers populate actor identity and the
//! request for the operation; the processor writes its result back. A
//! context is never persisted.

use crate::requests::{
    ApproveSchemaRequest, CreateSchemaRequest, RejectSchemaRequest, UpdateSchemaRequest,
};
use crate::{EngineError, Result};
use registry_model::SchemaDetails;
use std::collections::HashMap;

/// Reserved key: acting user name.
pub const USER_KEY: &str = "USER";

/// Reserved key: acting user email.
pub const EMAIL_KEY: &str = "EMAIL";

/// Reserved key: result record written by every processor.
pub const DETAILS_KEY: &str = "SchemaDetails";

/// One value held in a [`SchemaContext`].
#[derive(Debug, Clone)]
pub enum ContextValue {
    /// Plain text entry (actor identity)
    Text(String),

    /// CREATE request payload
    Create(CreateSchemaRequest),

    /// UPDATE request payload
    Update(UpdateSchemaRequest),

    /// APPROVE request payload
    Approve(ApproveSchemaRequest),

    /// REJECT request payload
    Reject(RejectSchemaRequest),

    /// Result record
    Details(SchemaDetails),
}

/// Case-insensitive key/value carrier for one lifecycle call.
#[derive(Debug, Clone, Default)]
pub struct SchemaContext {
    entries: HashMap<String, ContextValue>,
}

impl SchemaContext {
    /// Create an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context carrying the acting user's identity.
    pub fn with_actor(user: impl Into<String>, email: impl Into<String>) -> Self {
        let mut context = Self::new();
        context.set(USER_KEY, ContextValue::Text(user.into()));
        context.set(EMAIL_KEY, ContextValue::Text(email.into()));
        context
    }

    /// Store a value under a case-insensitive key.
    pub fn set(&mut self, key: impl AsRef<str>, value: ContextValue) {
        self.entries.insert(key.as_ref().to_lowercase(), value);
    }

    /// Fetch a value by case-insensitive key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ContextValue> {
        self.entries.get(&key.to_lowercase())
    }

    /// Fetch a required text entry.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ValueNotFound`] when the entry is absent or
    /// not text.
    pub fn text(&self, key: &str) -> Result<&str> {
        match self.get(key) {
            Some(ContextValue::Text(text)) => Ok(text),
            _ => Err(EngineError::ValueNotFound {
                key: key.to_string(),
            }),
        }
    }

    /// Fetch the CREATE request.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ValueNotFound`] when no CREATE request was
    /// supplied.
    pub fn create_request(&self) -> Result<&CreateSchemaRequest> {
        match self.get(CreateSchemaRequest::KEY) {
            Some(ContextValue::Create(request)) => Ok(request),
            _ => Err(EngineError::ValueNotFound {
                key: CreateSchemaRequest::KEY.to_string(),
            }),
        }
    }

    /// Fetch the UPDATE request.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ValueNotFound`] when no UPDATE request was
    /// supplied.
    pub fn update_request(&self) -> Result<&UpdateSchemaRequest> {
        match self.get(UpdateSchemaRequest::KEY) {
            Some(ContextValue::Update(request)) => Ok(request),
            _ => Err(EngineError::ValueNotFound {
                key: UpdateSchemaRequest::KEY.to_string(),
            }),
        }
    }

    /// Fetch the APPROVE request.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ValueNotFound`] when no APPROVE request was
    /// supplied.
    pub fn approve_request(&self) -> Result<&ApproveSchemaRequest> {
        match self.get(ApproveSchemaRequest::KEY) {
            Some(ContextValue::Approve(request)) => Ok(request),
            _ => Err(EngineError::ValueNotFound {
                key: ApproveSchemaRequest::KEY.to_string(),
            }),
        }
    }

    /// Fetch the REJECT request.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ValueNotFound`] when no REJECT request was
    /// supplied.
    pub fn reject_request(&self) -> Result<&RejectSchemaRequest> {
        match self.get(RejectSchemaRequest::KEY) {
            Some(ContextValue::Reject(request)) => Ok(request),
            _ => Err(EngineError::ValueNotFound {
                key: RejectSchemaRequest::KEY.to_string(),
            }),
        }
    }

    /// Store a request under its reserved key.
    pub fn put_create_request(&mut self, request: CreateSchemaRequest) {
        self.set(CreateSchemaRequest::KEY, ContextValue::Create(request));
    }

    /// Store a request under its reserved key.
    pub fn put_update_request(&mut self, request: UpdateSchemaRequest) {
        self.set(UpdateSchemaRequest::KEY, ContextValue::Update(request));
    }

    /// Store a request under its reserved key.
    pub fn put_approve_request(&mut self, request: ApproveSchemaRequest) {
        self.set(ApproveSchemaRequest::KEY, ContextValue::Approve(request));
    }

    /// Store a request under its reserved key.
    pub fn put_reject_request(&mut self, request: RejectSchemaRequest) {
        self.set(RejectSchemaRequest::KEY, ContextValue::Reject(request));
    }

    /// Store the processor's result record.
    pub fn put_details(&mut self, details: SchemaDetails) {
        self.set(DETAILS_KEY, ContextValue::Details(details));
    }

    /// Fetch the processor's result record.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ValueNotFound`] when no processor has written
    /// a result yet.
    pub fn details(&self) -> Result<&SchemaDetails> {
        match self.get(DETAILS_KEY) {
            Some(ContextValue::Details(details)) => Ok(details),
            _ => Err(EngineError::ValueNotFound {
                key: DETAILS_KEY.to_string(),
            }),
        }
    }
}

impl CreateSchemaRequest {
    /// Reserved context key for this request type.
    pub const KEY: &'static str = "CreateSchemaRequest";
}

impl UpdateSchemaRequest {
    /// Reserved context key for this request type.
    pub const KEY: &'static str = "UpdateSchemaRequest";
}

impl ApproveSchemaRequest {
    /// Reserved context key for this request type.
    pub const KEY: &'static str = "ApproveSchemaRequest";
}

impl RejectSchemaRequest {
    /// Reserved context key for this request type.
    pub const KEY: &'static str = "RejectSchemaRequest";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_case_insensitive() {
        let mut context = SchemaContext::new();
        context.set("User", ContextValue::Text("alice".to_string()));

        assert_eq!(context.text("USER").unwrap(), "alice");
        assert_eq!(context.text("user").unwrap(), "alice");
        assert_eq!(context.text("uSeR").unwrap(), "alice");
    }

    #[test]
    fn test_missing_entry_is_value_not_found() {
        let context = SchemaContext::new();

        let result = context.text(USER_KEY);

        match result {
            Err(error @ EngineError::ValueNotFound { .. }) => {
                assert_eq!(error.code(), "VALUE_NOT_FOUND");
                assert_eq!(error.status(), 400);
            }
            other => panic!("expected ValueNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_wrong_typed_entry_is_value_not_found() {
        let mut context = SchemaContext::new();
        context.set(
            CreateSchemaRequest::KEY,
            ContextValue::Text("not a request".to_string()),
        );

        assert!(matches!(
            context.create_request(),
            Err(EngineError::ValueNotFound { .. })
        ));
    }

    #[test]
    fn test_with_actor_populates_identity() {
        let context = SchemaContext::with_actor("alice", "alice@example.com");

        assert_eq!(context.text(USER_KEY).unwrap(), "alice");
        assert_eq!(context.text(EMAIL_KEY).unwrap(), "alice@example.com");
    }
}
