pub mod he_net;

use thiserror::Error;

/// What the provider did with an accepted update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The record was changed to the submitted address.
    Updated,

    /// The record already held the submitted address. Not an error;
    /// idempotent updates are fine.
    NoChange,
}

#[derive(Clone, Error, Debug)]
pub enum UpdateError {
    #[error("provider rejected the update: {reason} (response was \"{raw}\")")]
    Rejected { reason: Box<str>, raw: Box<str> },

    #[error("provider answered with HTTP {0}: {1}")]
    Status(u16, Box<str>),

    #[error("HTTP transport error: {0}")]
    Transport(Box<str>),

    #[error("provider response was unreadable: {0}")]
    UnreadableBody(Box<str>),
}
