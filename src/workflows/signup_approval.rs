use std::sync::Arc;
use tracing::{info, Instrument};

use super::errors::{Operation, OperationContext, WorkflowError, WorkflowResult};
use super::lifecycle::{ReviewEvent, SignupReviewMachine};
use crate::api::{QueryCache, QueryKey, RequestStore};
use crate::domain::{ReviewDecision, TransitionResponse, UserRequest};
use crate::observability::create_workflow_span;
use crate::telemetry::generate_correlation_id;
use crate::validation::require_admin_id;

/// Admin approval of signup requests.
#[derive(Clone)]
pub struct SignupApprovalWorkflow {
    store: Arc<dyn RequestStore>,
    cache: QueryCache,
}

impl SignupApprovalWorkflow {
    pub fn new(store: Arc<dyn RequestStore>, cache: QueryCache) -> Self {
        Self { store, cache }
    }

    pub async fn approve(&self, request_id: &str, admin_id: &str) -> WorkflowResult<TransitionResponse> {
        self.decide(request_id, admin_id, ReviewDecision::Approve).await
    }

    pub async fn reject(&self, request_id: &str, admin_id: &str) -> WorkflowResult<TransitionResponse> {
        self.decide(request_id, admin_id, ReviewDecision::Reject).await
    }

    async fn decide(
        &self,
        request_id: &str,
        admin_id: &str,
        decision: ReviewDecision,
    ) -> WorkflowResult<TransitionResponse> {
        let admin_id = require_admin_id(admin_id)?;
        let span = create_workflow_span("signup_review", &generate_correlation_id());

        async {
            let response = match decision {
                ReviewDecision::Approve => self
                    .store
                    .approve_request(request_id, admin_id)
                    .await
                    .during(Operation::ApproveRequest)?,
                ReviewDecision::Reject => self
                    .store
                    .reject_request(request_id, admin_id)
                    .await
                    .during(Operation::RejectRequest)?,
            };

            info!(
                request_id = %request_id,
                admin_id = %admin_id,
                decision = decision.verb(),
                status = %response.status,
                "Signup request decided"
            );
            self.invalidate_request_views(request_id).await;
            Ok::<_, WorkflowError>(response)
        }
        .instrument(span)
        .await
    }

    /// Drive one request's lifecycle through a decision. The decision is
    /// checked against the current status before anything is sent.
    pub async fn review(
        &self,
        machine: &mut SignupReviewMachine,
        admin_id: &str,
        decision: ReviewDecision,
    ) -> WorkflowResult<TransitionResponse> {
        require_admin_id(admin_id)?;
        machine.inner().check(decision)?;

        let request_id = machine.inner().request_id().to_string();
        machine.handle(&ReviewEvent::Submit(decision));

        match self.decide(&request_id, admin_id, decision).await {
            Ok(response) => {
                machine.handle(&ReviewEvent::Confirmed);
                Ok(response)
            }
            Err(err) => {
                machine.handle(&ReviewEvent::Failed {
                    message: err.to_string(),
                });
                Err(err)
            }
        }
    }

    pub async fn pending_requests(&self) -> WorkflowResult<Vec<UserRequest>> {
        self.cache
            .fetch(QueryKey::PendingRequests, || self.store.pending_requests())
            .await
            .during(Operation::Load("pending requests"))
    }

    pub async fn pending_request(&self, request_id: &str) -> WorkflowResult<UserRequest> {
        self.cache
            .fetch(QueryKey::PendingRequest(request_id.to_string()), || {
                self.store.pending_request(request_id)
            })
            .await
            .during(Operation::Load("request"))
    }

    /// Delete one pending request without deciding it.
    pub async fn discard(&self, request_id: &str) -> WorkflowResult<()> {
        self.store
            .delete_pending_request(request_id)
            .await
            .during(Operation::DiscardRequest)?;
        info!(request_id = %request_id, "Pending request discarded");
        self.invalidate_request_views(request_id).await;
        Ok(())
    }

    pub async fn discard_all(&self) -> WorkflowResult<()> {
        self.store
            .delete_all_pending_requests()
            .await
            .during(Operation::DiscardAllRequests)?;
        info!("All pending requests discarded");
        self.cache
            .invalidate(&[QueryKey::PendingRequests, QueryKey::AdminDashboard])
            .await;
        Ok(())
    }

    async fn invalidate_request_views(&self, request_id: &str) {
        self.cache
            .invalidate(&[
                QueryKey::PendingRequests,
                QueryKey::PendingRequest(request_id.to_string()),
                QueryKey::AdminDashboard,
            ])
            .await;
    }
}

impl std::fmt::Debug for SignupApprovalWorkflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignupApprovalWorkflow").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockRequestStore;
    use crate::config::MaduveConfig;
    use crate::domain::UserStatus;
    use crate::workflows::lifecycle::{ReviewPhase, SignupReview};
    use crate::workflows::mocks::{sample_request, InMemoryStore};

    fn workflow(store: Arc<dyn RequestStore>) -> (SignupApprovalWorkflow, QueryCache) {
        let cache = QueryCache::new(&MaduveConfig::default().cache);
        (SignupApprovalWorkflow::new(store, cache.clone()), cache)
    }

    #[tokio::test]
    async fn test_blank_admin_id_fails_before_any_request() {
        let mut mock = MockRequestStore::new();
        mock.expect_approve_request().times(0);
        mock.expect_reject_request().times(0);
        let (workflow, _) = workflow(Arc::new(mock));

        let err = workflow.approve("r1", "").await.unwrap_err();
        assert_eq!(err.to_string(), "Admin ID is missing. Please log in again.");

        let err = workflow.reject("r1", "   ").await.unwrap_err();
        assert!(err.is_local());
    }

    #[tokio::test]
    async fn test_admin_id_is_passed_through() {
        let mut mock = MockRequestStore::new();
        mock.expect_approve_request()
            .withf(|request_id, admin_id| request_id.to_string() == "r1" && admin_id.to_string() == "admin-7")
            .times(1)
            .returning(|id, _| {
                Ok(TransitionResponse {
                    id: id.to_string(),
                    status: "Active".to_string(),
                    message: "Approved".to_string(),
                })
            });
        let (workflow, _) = workflow(Arc::new(mock));

        let response = workflow.approve("r1", "admin-7").await.unwrap();
        assert_eq!(response.status, "Active");
    }

    #[tokio::test]
    async fn test_approve_invalidates_pending_views_and_dashboard() {
        let store = Arc::new(
            InMemoryStore::new()
                .with_request(sample_request("r1", "Anna"))
                .with_request(sample_request("r2", "Ben")),
        );
        let (workflow, cache) = workflow(store.clone());

        assert_eq!(workflow.pending_requests().await.unwrap().len(), 2);
        workflow.pending_request("r1").await.unwrap();
        let _: Vec<String> = cache
            .fetch(QueryKey::Users, || async { Ok(vec![]) })
            .await
            .unwrap();

        workflow.approve("r1", "admin-1").await.unwrap();

        assert!(!cache.contains(&QueryKey::PendingRequests).await);
        assert!(!cache.contains(&QueryKey::PendingRequest("r1".into())).await);
        assert!(cache.contains(&QueryKey::Users).await);
        assert_eq!(store.request_status("r1"), Some(UserStatus::Active));
        assert_eq!(workflow.pending_requests().await.unwrap().len(), 1);
        assert_eq!(store.call_count("pending_requests"), 2);
    }

    #[tokio::test]
    async fn test_backend_message_or_fallback_on_failure() {
        let store = Arc::new(InMemoryStore::new().with_request(sample_request("r1", "Anna")));
        let (workflow, _) = workflow(store.clone());

        store.fail_with(409, Some("Request already processed"));
        let err = workflow.approve("r1", "admin-1").await.unwrap_err();
        assert_eq!(err.to_string(), "Request already processed");

        store.fail_with(500, None);
        let err = workflow.reject("r1", "admin-1").await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to reject request");

        // failed transitions leave the request where it was
        store.recover();
        assert_eq!(store.request_status("r1"), Some(UserStatus::Pending));
    }

    #[tokio::test]
    async fn test_review_machine_follows_the_store() {
        let store = Arc::new(InMemoryStore::new().with_request(sample_request("r1", "Anna")));
        let (workflow, _) = workflow(store.clone());
        let mut machine = SignupReview::new("r1", UserStatus::Pending).machine();

        workflow
            .review(&mut machine, "admin-1", ReviewDecision::Approve)
            .await
            .unwrap();
        assert_eq!(machine.inner().phase(), ReviewPhase::Approved);
        assert_eq!(machine.inner().status(), UserStatus::Active);

        // a decided request is refused locally; the store is not asked again
        let err = workflow
            .review(&mut machine, "admin-1", ReviewDecision::Reject)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Cannot reject a request that is Active");
        assert_eq!(store.call_count("reject_request"), 0);
        assert_eq!(store.call_count("approve_request"), 1);
    }

    #[tokio::test]
    async fn test_failed_review_returns_machine_to_pending() {
        let store = Arc::new(InMemoryStore::new().with_request(sample_request("r1", "Anna")));
        store.fail_with(503, None);
        let (workflow, _) = workflow(store.clone());
        let mut machine = SignupReview::new("r1", UserStatus::Pending).machine();

        let err = workflow
            .review(&mut machine, "admin-1", ReviewDecision::Approve)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Failed to approve request");
        assert_eq!(machine.inner().phase(), ReviewPhase::Pending);
        assert_eq!(machine.inner().last_error(), Some("Failed to approve request"));
        assert!(machine.inner().check(ReviewDecision::Approve).is_ok());
    }

    #[tokio::test]
    async fn test_discard_all_clears_pending() {
        let store = Arc::new(
            InMemoryStore::new()
                .with_request(sample_request("r1", "Anna"))
                .with_request(sample_request("r2", "Ben")),
        );
        let (workflow, cache) = workflow(store.clone());
        workflow.pending_requests().await.unwrap();

        workflow.discard_all().await.unwrap();

        assert!(!cache.contains(&QueryKey::PendingRequests).await);
        assert!(workflow.pending_requests().await.unwrap().is_empty());
    }
}
