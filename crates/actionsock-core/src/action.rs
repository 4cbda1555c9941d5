//! Declared actions and the registry key convention.
//!
//! Every handler is registered under a key built from the envelope's action
//! and optional sub-action:
//!
//! | action    | subAction | key                 |
//! |-----------|-----------|---------------------|
//! | `AUTH`    | -         | `handleAuth`        |
//! | `MESSAGE` | `SEND`    | `handleMessageSend` |
//! | `ZONE`    | `JOIN`    | `handleZoneJoin`    |
//!
//! The words `handle`, the action, and the sub-action are camel-cased: the
//! first word lower-case, each following word with an upper-case first letter
//! and lower-case remainder. Underscores, dashes, and whitespace inside an
//! identifier split it into further words (`USER_PROFILE` -> `UserProfile`).

use std::fmt;

use serde::{Deserialize, Serialize};

const KEY_PREFIX: &str = "handle";

/// Top-level action selecting a handler family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    Auth,
    Error,
    Message,
    Zone,
    User,
    Presence,
}

/// The action that authenticates a connection. It is never gated by the
/// dispatcher, whatever its registry entry says.
pub const AUTH_ACTION: Action = Action::Auth;

impl Action {
    pub const ALL: [Action; 6] = [
        Action::Auth,
        Action::Error,
        Action::Message,
        Action::Zone,
        Action::User,
        Action::Presence,
    ];

    /// Wire spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Auth => "AUTH",
            Action::Error => "ERROR",
            Action::Message => "MESSAGE",
            Action::Zone => "ZONE",
            Action::User => "USER",
            Action::Presence => "PRESENCE",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional refinement of an [`Action`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubAction {
    Send,
    Edit,
    Delete,
    Join,
    Leave,
    List,
    Update,
}

impl SubAction {
    pub const ALL: [SubAction; 7] = [
        SubAction::Send,
        SubAction::Edit,
        SubAction::Delete,
        SubAction::Join,
        SubAction::Leave,
        SubAction::List,
        SubAction::Update,
    ];

    /// Wire spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            SubAction::Send => "SEND",
            SubAction::Edit => "EDIT",
            SubAction::Delete => "DELETE",
            SubAction::Join => "JOIN",
            SubAction::Leave => "LEAVE",
            SubAction::List => "LIST",
            SubAction::Update => "UPDATE",
        }
    }
}

impl fmt::Display for SubAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registry key for a declared action / sub-action pair.
pub fn action_key(action: Action, sub_action: Option<SubAction>) -> String {
    action_key_str(action.as_str(), sub_action.map(SubAction::as_str))
}

/// Registry key for arbitrary identifiers, following the same convention as
/// [`action_key`]. Callers are responsible for spelling identifiers uniquely.
pub fn action_key_str(action: &str, sub_action: Option<&str>) -> String {
    let mut key = String::from(KEY_PREFIX);
    for part in std::iter::once(action).chain(sub_action) {
        for word in part
            .split(|c: char| c == '_' || c == '-' || c.is_whitespace())
            .filter(|w| !w.is_empty())
        {
            push_capitalized(&mut key, word);
        }
    }
    key
}

fn push_capitalized(out: &mut String, word: &str) {
    let mut chars = word.chars();
    if let Some(first) = chars.next() {
        out.extend(first.to_uppercase());
        out.extend(chars.flat_map(char::to_lowercase));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multi_word_identifiers_are_split() {
        assert_eq!(action_key_str("USER_PROFILE", Some("bulk-update")), "handleUserProfileBulkUpdate");
        assert_eq!(action_key_str("zone", Some("  join ")), "handleZoneJoin");
    }

    #[test]
    fn empty_sub_action_adds_nothing() {
        assert_eq!(action_key_str("AUTH", Some("")), "handleAuth");
        assert_eq!(action_key_str("AUTH", None), "handleAuth");
    }

    #[test]
    fn wire_spelling_matches_serde() {
        for a in Action::ALL {
            let json = serde_json::to_string(&a).unwrap_or_default();
            assert_eq!(json, format!("\"{}\"", a.as_str()));
        }
        for s in SubAction::ALL {
            let json = serde_json::to_string(&s).unwrap_or_default();
            assert_eq!(json, format!("\"{}\"", s.as_str()));
        }
    }
}
