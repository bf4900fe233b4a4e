use statig::prelude::*;

use crate::domain::{ConnectAction, ConnectRequest, ConnectRequestStatus, TransitionError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectEvent {
    Respond(ConnectAction),
    Confirmed,
    Failed { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectPhase {
    Pending,
    Submitting(ConnectAction),
    Accepted,
    Rejected,
}

/// The receiver's answer to one connect request.
pub struct ConnectResponse {
    sender_id: String,
    receiver_id: String,
    status: ConnectRequestStatus,
    phase: ConnectPhase,
    last_error: Option<String>,
}

pub type ConnectResponseMachine = StateMachine<ConnectResponse>;

impl ConnectResponse {
    pub fn new(
        sender_id: impl Into<String>,
        receiver_id: impl Into<String>,
        status: ConnectRequestStatus,
    ) -> Self {
        let phase = match status {
            ConnectRequestStatus::Pending => ConnectPhase::Pending,
            ConnectRequestStatus::Accepted => ConnectPhase::Accepted,
            ConnectRequestStatus::Rejected => ConnectPhase::Rejected,
        };
        Self {
            sender_id: sender_id.into(),
            receiver_id: receiver_id.into(),
            status,
            phase,
            last_error: None,
        }
    }

    pub fn for_request(request: &ConnectRequest) -> Self {
        Self::new(
            request.sender_id.clone(),
            request.receiver_id.clone(),
            request.status,
        )
    }

    pub fn machine(self) -> ConnectResponseMachine {
        self.state_machine()
    }

    pub fn check(&self, action: ConnectAction) -> Result<(), TransitionError> {
        if matches!(self.phase, ConnectPhase::Submitting(_)) {
            return Err(TransitionError::InFlight);
        }
        self.status.respond(action).map(|_| ())
    }

    pub fn sender_id(&self) -> &str {
        &self.sender_id
    }

    pub fn receiver_id(&self) -> &str {
        &self.receiver_id
    }

    pub fn status(&self) -> ConnectRequestStatus {
        self.status
    }

    pub fn phase(&self) -> ConnectPhase {
        self.phase
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn offered_actions(&self) -> &'static [ConnectAction] {
        match self.phase {
            ConnectPhase::Pending => self.status.available_actions(),
            ConnectPhase::Submitting(_) | ConnectPhase::Accepted | ConnectPhase::Rejected => &[],
        }
    }
}

#[state_machine(initial = "State::pending()")]
impl ConnectResponse {
    #[state]
    fn pending(&mut self, event: &ConnectEvent) -> Outcome<State> {
        match event {
            ConnectEvent::Respond(action) => match self.check(*action) {
                Ok(()) => {
                    self.phase = ConnectPhase::Submitting(*action);
                    self.last_error = None;
                    Transition(State::submitting())
                }
                Err(err) => {
                    self.last_error = Some(err.to_string());
                    Handled
                }
            },
            _ => Handled,
        }
    }

    #[state]
    fn submitting(&mut self, event: &ConnectEvent) -> Outcome<State> {
        let ConnectPhase::Submitting(action) = self.phase else {
            return Handled;
        };
        match event {
            ConnectEvent::Confirmed => {
                self.status = action.resulting_status();
                tracing::info!(
                    sender_id = %self.sender_id,
                    receiver_id = %self.receiver_id,
                    status = %self.status,
                    "Connect request answered"
                );
                match action {
                    ConnectAction::Accept => {
                        self.phase = ConnectPhase::Accepted;
                        Transition(State::accepted())
                    }
                    ConnectAction::Reject => {
                        self.phase = ConnectPhase::Rejected;
                        Transition(State::rejected())
                    }
                }
            }
            ConnectEvent::Failed { message } => {
                self.phase = ConnectPhase::Pending;
                self.last_error = Some(message.clone());
                Transition(State::pending())
            }
            ConnectEvent::Respond(_) => Handled,
        }
    }

    #[state]
    fn accepted(event: &ConnectEvent) -> Outcome<State> {
        let _ = event;
        Handled
    }

    #[state]
    fn rejected(event: &ConnectEvent) -> Outcome<State> {
        let _ = event;
        Handled
    }
}
