// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for building and sorting a tangle.
use thiserror::Error;

use crate::traits::MessageId;

/// Error types for methods of `TangleIndex` and `TangleSorter`.
///
/// All of these signal that the given message set can not be ordered until it was corrected, for
/// example by fetching a missing message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TangleError<ID>
where
    ID: MessageId,
{
    /// No message with an empty previous set was found.
    #[error("no root message found in tangle")]
    MissingRoot,

    /// More than one message has an empty previous set.
    #[error("multiple root messages found in tangle: {0} and {1}")]
    MultipleRoots(ID, ID),

    /// Cycle detected or ancestry of a message never reaches the root.
    #[error("badly formed tangle at message {0}")]
    MalformedTangle(ID),

    /// A message points at a message which is not part of the given set.
    #[error("message {message} references unknown message {reference}")]
    UnknownReference { message: ID, reference: ID },

    /// Requested message is not part of the tangle.
    #[error("message {0} not found in tangle")]
    UnknownMessage(ID),

    /// The same message was given more than once.
    #[error("message {0} was given more than once")]
    DuplicateMessage(ID),

    /// A message claims a different root than the one found in the set.
    #[error("message {message} declares root {declared} but tangle root is {root}")]
    RootMismatch { message: ID, declared: ID, root: ID },

    /// The message does not take part in the requested tangle.
    #[error("message {0} is not part of this tangle")]
    NotInTangle(ID),

    /// Number of messages is above the configured limit.
    #[error("tangle contains {0} messages, maximum is {1}")]
    TooManyMessages(usize, usize),
}
