//! Role types for chat participants.

use serde::{Deserialize, Serialize};

/// Who authored a chat message.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions that frame the conversation
    #[display("system")]
    System,
    /// The requesting side
    #[display("user")]
    User,
    /// The model's side
    #[display("assistant")]
    Assistant,
}
