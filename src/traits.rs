// SPDX-License-Identifier: MIT OR Apache-2.0

//! Interfaces a message needs to implement to be ordered inside a tangle.
use std::fmt::{Debug, Display};
use std::hash::Hash as StdHash;

use crate::tangles::TanglePoint;

/// Identifier of a single message.
///
/// Identifiers are compared with `Ord` whenever a deterministic decision between two concurrent
/// messages needs to be made, for content-addressed identifiers this is the byte order of the
/// hash.
pub trait MessageId: Copy + Clone + Debug + Display + PartialEq + Eq + Ord + StdHash {}

impl MessageId for char {}

impl MessageId for u32 {}

impl MessageId for u64 {}

impl MessageId for &'static str {}

/// Interface to express the required tangle information of a message.
///
/// A message can take part in multiple named tangles at the same time (for example a post which
/// belongs to a thread and to a gathering), the name selects which one is looked at.
pub trait TangledMessage<ID>
where
    ID: MessageId,
{
    /// Id of this message.
    fn id(&self) -> ID;

    /// Root and previous pointers of this message in the tangle with the given name.
    ///
    /// Returns `None` if the message does not take part in this tangle. An empty previous set marks
    /// the root of the tangle.
    fn tangle(&self, name: &str) -> Option<TanglePoint<ID>>;
}

impl<ID, T> TangledMessage<ID> for &T
where
    ID: MessageId,
    T: TangledMessage<ID> + ?Sized,
{
    fn id(&self) -> ID {
        (**self).id()
    }

    fn tangle(&self, name: &str) -> Option<TanglePoint<ID>> {
        (**self).tangle(name)
    }
}
