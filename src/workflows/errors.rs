use std::fmt;
use thiserror::Error;
use tracing::warn;

use crate::api::ApiError;
use crate::domain::TransitionError;
use crate::session::SessionError;
use crate::validation::ValidationError;

/// A remote operation a workflow performs, used to pick the message shown
/// when the backend gives none.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ApproveRequest,
    RejectRequest,
    DiscardRequest,
    DiscardAllRequests,
    Signup,
    AdminSignup,
    Login,
    SendConnectRequest,
    AcceptConnectRequest,
    RejectConnectRequest,
    UploadImage,
    DeleteImage,
    UploadPhoto,
    DeletePhoto,
    UpdateProfile,
    ChangeUserStatus,
    DeleteUser,
    UpdateAdmin,
    RemoveAdmin,
    /// Any read; the payload names what was being loaded.
    Load(&'static str),
}

impl Operation {
    pub fn fallback_message(self) -> String {
        match self {
            Operation::ApproveRequest => "Failed to approve request".to_string(),
            Operation::RejectRequest => "Failed to reject request".to_string(),
            Operation::DiscardRequest => "Failed to delete request".to_string(),
            Operation::DiscardAllRequests => "Failed to delete requests".to_string(),
            Operation::Signup => "Signup failed".to_string(),
            Operation::AdminSignup => "Admin signup failed".to_string(),
            Operation::Login => "Login failed".to_string(),
            Operation::SendConnectRequest => "Failed to send connect request".to_string(),
            Operation::AcceptConnectRequest => "Failed to accept request".to_string(),
            Operation::RejectConnectRequest => "Failed to reject request".to_string(),
            Operation::UploadImage => "Failed to upload image".to_string(),
            Operation::DeleteImage => "Failed to delete image".to_string(),
            Operation::UploadPhoto => "Failed to upload photo".to_string(),
            Operation::DeletePhoto => "Failed to delete photo".to_string(),
            Operation::UpdateProfile => "Failed to update profile".to_string(),
            Operation::ChangeUserStatus => "Failed to change user status".to_string(),
            Operation::DeleteUser => "Failed to delete user".to_string(),
            Operation::UpdateAdmin => "Failed to update admin".to_string(),
            Operation::RemoveAdmin => "Failed to remove admin".to_string(),
            Operation::Load(what) => format!("Failed to load {what}"),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Load(what) => write!(f, "load {what}"),
            other => write!(f, "{other:?}"),
        }
    }
}

/// Error surfaced to the user by a workflow. `Display` is the message to show.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("{message}")]
    Remote {
        operation: Operation,
        message: String,
        #[source]
        source: ApiError,
    },

    /// The backend answered but refused, e.g. a login with `success: false`.
    #[error("{0}")]
    Rejected(String),
}

impl WorkflowError {
    /// Wrap a store failure: the backend's own message when it sent one,
    /// otherwise the operation's fallback.
    pub fn remote(operation: Operation, source: ApiError) -> Self {
        let message = source
            .server_message()
            .map(str::to_string)
            .unwrap_or_else(|| operation.fallback_message());
        warn!(operation = %operation, error = %source, "Backend operation failed");
        WorkflowError::Remote {
            operation,
            message,
            source,
        }
    }

    /// True when the error was raised locally, before any network call.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            WorkflowError::Validation(_) | WorkflowError::Transition(_) | WorkflowError::Session(_)
        )
    }
}

pub type WorkflowResult<T> = Result<T, WorkflowError>;

/// Attach the operation to a store result.
pub trait OperationContext<T> {
    fn during(self, operation: Operation) -> WorkflowResult<T>;
}

impl<T> OperationContext<T> for Result<T, ApiError> {
    fn during(self, operation: Operation) -> WorkflowResult<T> {
        self.map_err(|err| WorkflowError::remote(operation, err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_message_is_surfaced_verbatim() {
        let err = WorkflowError::remote(
            Operation::ApproveRequest,
            ApiError::remote(400, "Request already processed"),
        );
        assert_eq!(err.to_string(), "Request already processed");
        assert!(!err.is_local());
    }

    #[test]
    fn test_fallback_when_backend_is_silent() {
        let err = WorkflowError::remote(
            Operation::SendConnectRequest,
            ApiError::from_body(500, "<html>Internal Server Error</html>".to_string()),
        );
        assert_eq!(err.to_string(), "Failed to send connect request");

        let err: WorkflowResult<()> =
            Err(ApiError::InvalidResponse("eof".into())).during(Operation::UploadImage);
        assert_eq!(err.unwrap_err().to_string(), "Failed to upload image");
    }

    #[test]
    fn test_validation_errors_keep_their_text() {
        let err: WorkflowError = ValidationError::MissingAdminId.into();
        assert_eq!(err.to_string(), "Admin ID is missing. Please log in again.");
        assert!(err.is_local());
    }

    #[test]
    fn test_load_fallback_names_the_resource() {
        assert_eq!(
            Operation::Load("pending requests").fallback_message(),
            "Failed to load pending requests"
        );
    }
}
