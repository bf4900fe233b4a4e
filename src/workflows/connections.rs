use std::sync::Arc;
use tracing::info;

use super::errors::{Operation, OperationContext, WorkflowResult};
use super::lifecycle::{ConnectEvent, ConnectResponseMachine};
use crate::api::{QueryCache, QueryKey, RequestStore};
use crate::domain::{ConnectAction, ConnectRequest, TransitionResponse};
use crate::validation::{require_user_id, validate_message};

/// User-to-user connect requests: send, answer, and the derived views.
#[derive(Clone)]
pub struct ConnectionWorkflow {
    store: Arc<dyn RequestStore>,
    cache: QueryCache,
}

impl ConnectionWorkflow {
    pub fn new(store: Arc<dyn RequestStore>, cache: QueryCache) -> Self {
        Self { store, cache }
    }

    pub async fn send(
        &self,
        sender_id: &str,
        receiver_id: &str,
        message: &str,
    ) -> WorkflowResult<TransitionResponse> {
        let sender_id = require_user_id(sender_id)?;
        validate_message(message)?;

        let response = self
            .store
            .send_connect_request(sender_id, receiver_id, message.trim())
            .await
            .during(Operation::SendConnectRequest)?;

        info!(
            sender_id = %sender_id,
            receiver_id = %receiver_id,
            request_id = %response.id,
            "Connect request sent"
        );
        self.cache
            .invalidate(&[
                QueryKey::SentRequests(sender_id.to_string()),
                QueryKey::ReceivedRequests(receiver_id.to_string()),
                QueryKey::connection(sender_id, receiver_id),
            ])
            .await;
        Ok(response)
    }

    pub async fn accept(&self, receiver_id: &str, sender_id: &str) -> WorkflowResult<TransitionResponse> {
        self.answer(receiver_id, sender_id, ConnectAction::Accept).await
    }

    pub async fn reject(&self, receiver_id: &str, sender_id: &str) -> WorkflowResult<TransitionResponse> {
        self.answer(receiver_id, sender_id, ConnectAction::Reject).await
    }

    async fn answer(
        &self,
        receiver_id: &str,
        sender_id: &str,
        action: ConnectAction,
    ) -> WorkflowResult<TransitionResponse> {
        let receiver_id = require_user_id(receiver_id)?;

        let response = match action {
            ConnectAction::Accept => self
                .store
                .accept_connect_request(receiver_id, sender_id)
                .await
                .during(Operation::AcceptConnectRequest)?,
            ConnectAction::Reject => self
                .store
                .reject_connect_request(receiver_id, sender_id)
                .await
                .during(Operation::RejectConnectRequest)?,
        };

        info!(
            sender_id = %sender_id,
            receiver_id = %receiver_id,
            action = action.verb(),
            "Connect request answered"
        );
        self.cache
            .invalidate(&[
                QueryKey::ReceivedRequests(receiver_id.to_string()),
                QueryKey::SentRequests(sender_id.to_string()),
                QueryKey::connection(sender_id, receiver_id),
                QueryKey::connection(receiver_id, sender_id),
            ])
            .await;
        Ok(response)
    }

    /// Answer a request through its lifecycle; a request that is no longer
    /// pending is refused without contacting the store.
    pub async fn respond(
        &self,
        machine: &mut ConnectResponseMachine,
        action: ConnectAction,
    ) -> WorkflowResult<TransitionResponse> {
        machine.inner().check(action)?;
        let receiver_id = machine.inner().receiver_id().to_string();
        let sender_id = machine.inner().sender_id().to_string();

        machine.handle(&ConnectEvent::Respond(action));
        match self.answer(&receiver_id, &sender_id, action).await {
            Ok(response) => {
                machine.handle(&ConnectEvent::Confirmed);
                Ok(response)
            }
            Err(err) => {
                machine.handle(&ConnectEvent::Failed {
                    message: err.to_string(),
                });
                Err(err)
            }
        }
    }

    /// Pending requests addressed to `receiver_id`.
    pub async fn received(&self, receiver_id: &str) -> WorkflowResult<Vec<ConnectRequest>> {
        self.cache
            .fetch(QueryKey::ReceivedRequests(receiver_id.to_string()), || {
                self.store.received_requests(receiver_id)
            })
            .await
            .during(Operation::Load("received requests"))
    }

    pub async fn sent(&self, sender_id: &str) -> WorkflowResult<Vec<ConnectRequest>> {
        self.cache
            .fetch(QueryKey::SentRequests(sender_id.to_string()), || {
                self.store.sent_requests(sender_id)
            })
            .await
            .during(Operation::Load("sent requests"))
    }

    /// Cached per ordered pair.
    pub async fn has_active_connection(&self, viewer_id: &str, other_id: &str) -> WorkflowResult<bool> {
        self.cache
            .fetch(QueryKey::connection(viewer_id, other_id), || {
                self.store.connection_status(viewer_id, other_id)
            })
            .await
            .during(Operation::Load("connection status"))
    }
}

impl std::fmt::Debug for ConnectionWorkflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionWorkflow").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockRequestStore;
    use crate::config::MaduveConfig;
    use crate::domain::{ConnectRequestStatus, UserStatus};
    use crate::workflows::lifecycle::{ConnectPhase, ConnectResponse};
    use crate::workflows::mocks::{sample_user, InMemoryStore};

    fn workflow(store: Arc<dyn RequestStore>) -> (ConnectionWorkflow, QueryCache) {
        let cache = QueryCache::new(&MaduveConfig::default().cache);
        (ConnectionWorkflow::new(store, cache.clone()), cache)
    }

    fn two_users() -> Arc<InMemoryStore> {
        Arc::new(
            InMemoryStore::new()
                .with_user(sample_user("a", "Anna", UserStatus::Active))
                .with_user(sample_user("b", "Ben", UserStatus::Active)),
        )
    }

    #[tokio::test]
    async fn test_empty_message_never_reaches_the_store() {
        let mut mock = MockRequestStore::new();
        mock.expect_send_connect_request().times(0);
        let (workflow, _) = workflow(Arc::new(mock));

        for message in ["", "   \n"] {
            let err = workflow.send("a", "b", message).await.unwrap_err();
            assert_eq!(err.to_string(), "Please enter a message");
            assert!(err.is_local());
        }
    }

    #[tokio::test]
    async fn test_send_invalidates_sender_receiver_and_pair() {
        let store = two_users();
        let (workflow, cache) = workflow(store.clone());

        workflow.sent("a").await.unwrap();
        workflow.received("b").await.unwrap();
        workflow.has_active_connection("a", "b").await.unwrap();
        workflow.has_active_connection("b", "a").await.unwrap();

        workflow.send("a", "b", "Hello Ben").await.unwrap();

        assert!(!cache.contains(&QueryKey::SentRequests("a".into())).await);
        assert!(!cache.contains(&QueryKey::ReceivedRequests("b".into())).await);
        assert!(!cache.contains(&QueryKey::connection("a", "b")).await);
        // only the sender's ordering is touched by a send
        assert!(cache.contains(&QueryKey::connection("b", "a")).await);

        let received = workflow.received("b").await.unwrap();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].message, "Hello Ben");
    }

    #[tokio::test]
    async fn test_accept_invalidates_both_pair_orderings() {
        let store = two_users();
        let (workflow, cache) = workflow(store.clone());
        workflow.send("a", "b", "Hello").await.unwrap();
        assert!(!workflow.has_active_connection("a", "b").await.unwrap());
        workflow.has_active_connection("b", "a").await.unwrap();

        workflow.accept("b", "a").await.unwrap();

        assert!(!cache.contains(&QueryKey::connection("a", "b")).await);
        assert!(!cache.contains(&QueryKey::connection("b", "a")).await);
        assert!(workflow.has_active_connection("a", "b").await.unwrap());
    }

    #[tokio::test]
    async fn test_crossing_requests_are_independent() {
        let store = two_users();
        let (workflow, _) = workflow(store.clone());

        workflow.send("a", "b", "Hi from Anna").await.unwrap();
        workflow.send("b", "a", "Hi from Ben").await.unwrap();

        workflow.reject("b", "a").await.unwrap();

        assert_eq!(store.connect_status("a", "b"), Some(ConnectRequestStatus::Rejected));
        assert_eq!(store.connect_status("b", "a"), Some(ConnectRequestStatus::Pending));
        assert_eq!(workflow.received("a").await.unwrap().len(), 1);
        assert!(workflow.received("b").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_respond_refuses_decided_request_locally() {
        let store = two_users();
        let (workflow, _) = workflow(store.clone());
        workflow.send("a", "b", "Hello").await.unwrap();

        let request = workflow.received("b").await.unwrap().remove(0);
        let mut machine = ConnectResponse::for_request(&request).machine();

        workflow.respond(&mut machine, ConnectAction::Accept).await.unwrap();
        assert_eq!(machine.inner().phase(), ConnectPhase::Accepted);
        assert!(machine.inner().offered_actions().is_empty());

        let err = workflow
            .respond(&mut machine, ConnectAction::Reject)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Cannot reject a request that is Accepted");
        assert_eq!(store.call_count("reject_connect_request"), 0);
    }

    #[tokio::test]
    async fn test_failure_surfaces_fallback() {
        let store = two_users();
        let (workflow, _) = workflow(store.clone());
        store.fail_with(500, None);

        let err = workflow.send("a", "b", "Hello").await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to send connect request");
        let err = workflow.accept("b", "a").await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to accept request");
    }
}
