//! String identifier newtypes.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Generate a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            /// Create from an existing string.
            pub fn from_string(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            /// Get the inner string.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}

string_id! {
    /// Unique identifier for a gig.
    GigId
}

string_id! {
    /// Unique identifier for a bid.
    BidId
}

string_id! {
    /// Identifier for a user, as issued by the identity service.
    UserId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_generation_is_unique() {
        let id1 = GigId::new();
        let id2 = GigId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_id_serializes_transparently() {
        let id = BidId::from_string("bid-42");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"bid-42\"");
    }

    #[test]
    fn test_id_display() {
        let id = UserId::from("user-7");
        assert_eq!(id.to_string(), "user-7");
    }
}
