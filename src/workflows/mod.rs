// Client-side workflows: validation, the backend call, then cache invalidation

pub mod accounts;
pub mod admins;
pub mod connections;
pub mod dashboard;
pub mod errors;
pub mod images;
pub mod lifecycle;
pub mod members;
pub mod signup_approval;

#[cfg(test)]
pub mod mocks;

pub use accounts::AccountService;
pub use admins::AdminDirectory;
pub use connections::ConnectionWorkflow;
pub use dashboard::Dashboard;
pub use errors::{Operation, OperationContext, WorkflowError, WorkflowResult};
pub use images::{ImageLinks, ProfileImageService};
pub use lifecycle::{ConnectResponse, ConnectResponseMachine, SignupReview, SignupReviewMachine};
pub use members::MemberDirectory;
pub use signup_approval::SignupApprovalWorkflow;
