// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tangle pointers as they are carried inside of message content.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::traits::MessageId;

/// Reference point of a message inside one tangle.
///
/// `root` names the origin message of the tangle and `previous` lists the messages which were the
/// known tips of the tangle when this message was created. Both are empty for the root message
/// itself.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(deserialize = "ID: Deserialize<'de>"))]
pub struct TanglePoint<ID> {
    pub root: Option<ID>,
    #[serde(default)]
    pub previous: Vec<ID>,
}

impl<ID> TanglePoint<ID>
where
    ID: MessageId,
{
    pub fn new(root: Option<ID>, previous: Vec<ID>) -> Self {
        Self { root, previous }
    }

    /// Tangle point of the origin message, it has neither a root nor previous messages.
    pub fn root() -> Self {
        Self {
            root: None,
            previous: Vec::new(),
        }
    }

    /// Returns true if this point marks the root of a tangle.
    pub fn is_root(&self) -> bool {
        self.previous.is_empty()
    }
}

/// Named tangles a message takes part in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tangles<ID>(BTreeMap<String, TanglePoint<ID>>);

impl<ID> Tangles<ID>
where
    ID: MessageId,
{
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Add or replace the tangle point for the given tangle name.
    pub fn insert(&mut self, name: impl Into<String>, point: TanglePoint<ID>) {
        self.0.insert(name.into(), point);
    }

    pub fn get(&self, name: &str) -> Option<&TanglePoint<ID>> {
        self.0.get(name)
    }

    /// Names of all tangles in this set.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<ID> Default for Tangles<ID>
where
    ID: MessageId,
{
    fn default() -> Self {
        Self::new()
    }
}
