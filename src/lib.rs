// Maduve client library - workflows over the Maduve REST backend
// This exposes the core components for the CLI and for integration tests

pub mod api;
pub mod cli;
pub mod client;
pub mod config;
pub mod domain;
pub mod observability;
pub mod session;
pub mod telemetry;
pub mod validation;
pub mod workflows;

// Re-export key types for easy access
pub use api::{ApiClient, ApiError, HttpStore, QueryCache, QueryKey, RequestStore};
pub use client::MaduveClient;
pub use config::MaduveConfig;
pub use observability::{api_metrics, create_workflow_span, ApiMetrics, OperationTimer};
pub use session::{PersistedSession, Session, SessionError};
pub use telemetry::{create_command_span, generate_correlation_id, init_telemetry};
pub use validation::ValidationError;
pub use workflows::{
    AccountService, AdminDirectory, ConnectionWorkflow, Dashboard, MemberDirectory,
    ProfileImageService, SignupApprovalWorkflow, WorkflowError, WorkflowResult,
};
