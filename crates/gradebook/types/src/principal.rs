use crate::ids::UserId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An identity taking part in an evaluation, either as viewer or subject.
///
/// Capabilities are not stored here; they are resolved per check by the
/// authorization oracle so that grants revoked between requests take effect.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl Principal {
    pub fn new(user_id: impl Into<UserId>) -> Self {
        Self {
            user_id: user_id.into(),
            display_name: None,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Whether both principals are the same user.
    pub fn is_same_user(&self, other: &Principal) -> bool {
        self.user_id == other.user_id
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.display_name {
            Some(name) => write!(f, "{} ({})", name, self.user_id),
            None => write!(f, "user {}", self.user_id),
        }
    }
}
