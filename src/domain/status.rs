//! Lifecycle status enums and the pure transition rules over them.
//!
//! Statuses travel as integer codes. Transition endpoints answer with names
//! instead, so decoding accepts both.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("Cannot {action} a request that is {current}")]
    NotPending {
        action: &'static str,
        current: &'static str,
    },
    #[error("A decision for this request is already being submitted")]
    InFlight,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown status: {0}")]
pub struct UnknownStatus(pub String);

#[derive(Deserialize)]
#[serde(untagged)]
enum StatusRepr {
    Code(u8),
    Name(String),
}

/// Account / signup-request status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "StatusRepr", into = "u8")]
pub enum UserStatus {
    #[default]
    Pending,
    Active,
    Inactive,
    Blocked,
    InTalks,
}

/// What an admin can do with a pending signup request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReviewDecision {
    Approve,
    Reject,
}

impl ReviewDecision {
    pub fn resulting_status(self) -> UserStatus {
        match self {
            ReviewDecision::Approve => UserStatus::Active,
            ReviewDecision::Reject => UserStatus::Inactive,
        }
    }

    pub fn verb(self) -> &'static str {
        match self {
            ReviewDecision::Approve => "approve",
            ReviewDecision::Reject => "reject",
        }
    }
}

impl UserStatus {
    pub const ALL: [UserStatus; 5] = [
        UserStatus::Pending,
        UserStatus::Active,
        UserStatus::Inactive,
        UserStatus::Blocked,
        UserStatus::InTalks,
    ];

    pub fn code(self) -> u8 {
        match self {
            UserStatus::Pending => 0,
            UserStatus::Active => 1,
            UserStatus::Inactive => 2,
            UserStatus::Blocked => 3,
            UserStatus::InTalks => 4,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(UserStatus::Pending),
            1 => Some(UserStatus::Active),
            2 => Some(UserStatus::Inactive),
            3 => Some(UserStatus::Blocked),
            4 => Some(UserStatus::InTalks),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            UserStatus::Pending => "Pending",
            UserStatus::Active => "Active",
            UserStatus::Inactive => "Inactive",
            UserStatus::Blocked => "Blocked",
            UserStatus::InTalks => "In Talks",
        }
    }

    pub fn is_pending(self) -> bool {
        self == UserStatus::Pending
    }

    /// Result of an admin decision. Only pending requests can be decided.
    pub fn review(self, decision: ReviewDecision) -> Result<UserStatus, TransitionError> {
        match self {
            UserStatus::Pending => Ok(decision.resulting_status()),
            other => Err(TransitionError::NotPending {
                action: decision.verb(),
                current: other.label(),
            }),
        }
    }

    pub fn review_decisions(self) -> &'static [ReviewDecision] {
        match self {
            UserStatus::Pending => &[ReviewDecision::Approve, ReviewDecision::Reject],
            UserStatus::Active | UserStatus::Inactive | UserStatus::Blocked | UserStatus::InTalks => &[],
        }
    }
}

impl From<UserStatus> for u8 {
    fn from(status: UserStatus) -> Self {
        status.code()
    }
}

impl TryFrom<StatusRepr> for UserStatus {
    type Error = UnknownStatus;

    fn try_from(repr: StatusRepr) -> Result<Self, Self::Error> {
        match repr {
            StatusRepr::Code(code) => {
                UserStatus::from_code(code).ok_or_else(|| UnknownStatus(code.to_string()))
            }
            StatusRepr::Name(name) => name.parse(),
        }
    }
}

impl FromStr for UserStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "0" | "pending" => Ok(UserStatus::Pending),
            "1" | "active" | "approved" => Ok(UserStatus::Active),
            "2" | "inactive" | "rejected" => Ok(UserStatus::Inactive),
            "3" | "blocked" => Ok(UserStatus::Blocked),
            "4" | "intalks" => Ok(UserStatus::InTalks),
            _ => Err(UnknownStatus(s.to_string())),
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Connect request status. Accepted and Rejected are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "StatusRepr", into = "u8")]
pub enum ConnectRequestStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectAction {
    Accept,
    Reject,
}

impl ConnectAction {
    pub fn resulting_status(self) -> ConnectRequestStatus {
        match self {
            ConnectAction::Accept => ConnectRequestStatus::Accepted,
            ConnectAction::Reject => ConnectRequestStatus::Rejected,
        }
    }

    pub fn verb(self) -> &'static str {
        match self {
            ConnectAction::Accept => "accept",
            ConnectAction::Reject => "reject",
        }
    }
}

impl ConnectRequestStatus {
    pub fn code(self) -> u8 {
        match self {
            ConnectRequestStatus::Pending => 0,
            ConnectRequestStatus::Accepted => 1,
            ConnectRequestStatus::Rejected => 2,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(ConnectRequestStatus::Pending),
            1 => Some(ConnectRequestStatus::Accepted),
            2 => Some(ConnectRequestStatus::Rejected),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ConnectRequestStatus::Pending => "Pending",
            ConnectRequestStatus::Accepted => "Accepted",
            ConnectRequestStatus::Rejected => "Rejected",
        }
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, ConnectRequestStatus::Pending)
    }

    pub fn respond(self, action: ConnectAction) -> Result<ConnectRequestStatus, TransitionError> {
        match self {
            ConnectRequestStatus::Pending => Ok(action.resulting_status()),
            other => Err(TransitionError::NotPending {
                action: action.verb(),
                current: other.label(),
            }),
        }
    }

    pub fn available_actions(self) -> &'static [ConnectAction] {
        match self {
            ConnectRequestStatus::Pending => &[ConnectAction::Accept, ConnectAction::Reject],
            ConnectRequestStatus::Accepted | ConnectRequestStatus::Rejected => &[],
        }
    }
}

impl From<ConnectRequestStatus> for u8 {
    fn from(status: ConnectRequestStatus) -> Self {
        status.code()
    }
}

impl TryFrom<StatusRepr> for ConnectRequestStatus {
    type Error = UnknownStatus;

    fn try_from(repr: StatusRepr) -> Result<Self, Self::Error> {
        match repr {
            StatusRepr::Code(code) => ConnectRequestStatus::from_code(code)
                .ok_or_else(|| UnknownStatus(code.to_string())),
            StatusRepr::Name(name) => match name.trim().to_lowercase().as_str() {
                "pending" => Ok(ConnectRequestStatus::Pending),
                "accepted" => Ok(ConnectRequestStatus::Accepted),
                "rejected" => Ok(ConnectRequestStatus::Rejected),
                _ => Err(UnknownStatus(name)),
            },
        }
    }
}

impl fmt::Display for ConnectRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
