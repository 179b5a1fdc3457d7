use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The closed catalog of assignable permission claims.
///
/// Every screen and check that needs "all assignable permissions" iterates
/// [`Claim::ALL`], so administration views and the effective-claim
/// computation stay in sync by construction. The catalog is fixed at compile
/// time; there is deliberately no way to mint a claim outside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Claim {
    #[serde(rename = "Create Note")]
    CreateNote,
    #[serde(rename = "Edit Note")]
    EditNote,
    #[serde(rename = "Delete Note")]
    DeleteNote,
    #[serde(rename = "View Note")]
    ViewNote,
    #[serde(rename = "Create TodoList")]
    CreateTodoList,
    #[serde(rename = "Edit TodoList")]
    EditTodoList,
    #[serde(rename = "Delete TodoList")]
    DeleteTodoList,
    #[serde(rename = "View TodoList")]
    ViewTodoList,
}

impl Claim {
    /// Declaration order is the wire order everywhere a full claim table is
    /// rendered.
    pub const ALL: [Claim; 8] = [
        Claim::CreateNote,
        Claim::EditNote,
        Claim::DeleteNote,
        Claim::ViewNote,
        Claim::CreateTodoList,
        Claim::EditTodoList,
        Claim::DeleteTodoList,
        Claim::ViewTodoList,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Claim::CreateNote => "Create Note",
            Claim::EditNote => "Edit Note",
            Claim::DeleteNote => "Delete Note",
            Claim::ViewNote => "View Note",
            Claim::CreateTodoList => "Create TodoList",
            Claim::EditTodoList => "Edit TodoList",
            Claim::DeleteTodoList => "Delete TodoList",
            Claim::ViewTodoList => "View TodoList",
        }
    }

    /// Parse a stored claim identifier. Unknown strings yield `None` and are
    /// skipped on read; the API itself only accepts catalog members.
    pub fn parse(value: &str) -> Option<Claim> {
        Claim::ALL.iter().copied().find(|c| c.as_str() == value)
    }
}

impl fmt::Display for Claim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_eight_claims_in_stable_order() {
        assert_eq!(Claim::ALL.len(), 8);
        assert_eq!(Claim::ALL[0], Claim::CreateNote);
        assert_eq!(Claim::ALL[7], Claim::ViewTodoList);
    }

    #[test]
    fn parse_round_trips_every_catalog_entry() {
        for claim in Claim::ALL {
            assert_eq!(Claim::parse(claim.as_str()), Some(claim));
        }
        assert_eq!(Claim::parse("Launch Missiles"), None);
    }

    #[test]
    fn serde_uses_the_catalog_identifiers() {
        let json = serde_json::to_string(&Claim::ViewTodoList).unwrap();
        assert_eq!(json, "\"View TodoList\"");
        let back: Claim = serde_json::from_str("\"Edit Note\"").unwrap();
        assert_eq!(back, Claim::EditNote);
    }
}
