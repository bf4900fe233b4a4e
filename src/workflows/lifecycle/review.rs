use statig::prelude::*;

use crate::domain::{ReviewDecision, TransitionError, UserRequest, UserStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewEvent {
    Submit(ReviewDecision),
    Confirmed,
    Failed { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewPhase {
    Pending,
    Submitting(ReviewDecision),
    Approved,
    Rejected,
}

/// Admin review of one signup request, as seen by the client.
pub struct SignupReview {
    request_id: String,
    status: UserStatus,
    phase: ReviewPhase,
    last_error: Option<String>,
}

pub type SignupReviewMachine = StateMachine<SignupReview>;

impl SignupReview {
    pub fn new(request_id: impl Into<String>, status: UserStatus) -> Self {
        let phase = match status {
            UserStatus::Active => ReviewPhase::Approved,
            UserStatus::Inactive => ReviewPhase::Rejected,
            _ => ReviewPhase::Pending,
        };
        Self {
            request_id: request_id.into(),
            status,
            phase,
            last_error: None,
        }
    }

    pub fn for_request(request: &UserRequest) -> Self {
        Self::new(request.id.clone(), request.status)
    }

    pub fn machine(self) -> SignupReviewMachine {
        self.state_machine()
    }

    /// Whether `decision` may be submitted right now.
    pub fn check(&self, decision: ReviewDecision) -> Result<(), TransitionError> {
        if matches!(self.phase, ReviewPhase::Submitting(_)) {
            return Err(TransitionError::InFlight);
        }
        self.status.review(decision).map(|_| ())
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn status(&self) -> UserStatus {
        self.status
    }

    pub fn phase(&self) -> ReviewPhase {
        self.phase
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Decisions the admin can still take; empty while submitting or once decided.
    pub fn offered_decisions(&self) -> &'static [ReviewDecision] {
        match self.phase {
            ReviewPhase::Pending => self.status.review_decisions(),
            ReviewPhase::Submitting(_) | ReviewPhase::Approved | ReviewPhase::Rejected => &[],
        }
    }
}

#[state_machine(initial = "State::pending()")]
impl SignupReview {
    #[state]
    fn pending(&mut self, event: &ReviewEvent) -> Outcome<State> {
        match event {
            ReviewEvent::Submit(decision) => match self.check(*decision) {
                Ok(()) => {
                    self.phase = ReviewPhase::Submitting(*decision);
                    self.last_error = None;
                    tracing::info!(
                        request_id = %self.request_id,
                        decision = decision.verb(),
                        "Submitting signup review"
                    );
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
    fn submitting(&mut self, event: &ReviewEvent) -> Outcome<State> {
        let ReviewPhase::Submitting(decision) = self.phase else {
            return Handled;
        };
        match event {
            ReviewEvent::Confirmed => {
                self.status = decision.resulting_status();
                tracing::info!(
                    request_id = %self.request_id,
                    status = %self.status,
                    "Signup request reviewed"
                );
                match decision {
                    ReviewDecision::Approve => {
                        self.phase = ReviewPhase::Approved;
                        Transition(State::approved())
                    }
                    ReviewDecision::Reject => {
                        self.phase = ReviewPhase::Rejected;
                        Transition(State::rejected())
                    }
                }
            }
            ReviewEvent::Failed { message } => {
                self.phase = ReviewPhase::Pending;
                self.last_error = Some(message.clone());
                Transition(State::pending())
            }
            // one decision at a time
            ReviewEvent::Submit(_) => Handled,
        }
    }

    #[state]
    fn approved(event: &ReviewEvent) -> Outcome<State> {
        let _ = event;
        Handled
    }

    #[state]
    fn rejected(event: &ReviewEvent) -> Outcome<State> {
        let _ = event;
        Handled
    }
}
