// SPDX-License-Identifier: MIT OR Apache-2.0

//! Longest distance of messages to the root of a tangle.
use std::collections::{HashMap, HashSet};

use crate::error::TangleError;
use crate::index::TangleIndex;
use crate::traits::MessageId;

/// Memoised "hops to root" of every message visited so far.
///
/// The hops of a message are the number of edges on the longest path back to the root. A message
/// merging two branches of different length is hence always deeper than every message of both
/// branches.
#[derive(Debug)]
pub(crate) struct Depths<ID> {
    hops: HashMap<ID, usize>,
    computed: Vec<(ID, usize)>,
}

impl<ID> Depths<ID>
where
    ID: MessageId,
{
    pub fn new() -> Self {
        Self {
            hops: HashMap::new(),
            computed: Vec::new(),
        }
    }

    /// Drain all values computed since the last call, in the order they were computed.
    pub fn take_computed(&mut self) -> Vec<(ID, usize)> {
        std::mem::take(&mut self.computed)
    }

    fn insert(&mut self, id: ID, hops: usize) {
        self.hops.insert(id, hops);
        self.computed.push((id, hops));
    }

    /// Returns the cached value, if the message was already visited.
    pub fn get(&self, id: ID) -> Option<usize> {
        self.hops.get(&id).copied()
    }

    /// Compute the hops to root of the given message and of all of its ancestors.
    ///
    /// The graph is walked depth-first with an explicit stack, so long chains don't exhaust the
    /// call stack. Reaching a message which is still on the active path means the tangle contains
    /// a cycle.
    pub fn hops_to_root(
        &mut self,
        index: &TangleIndex<ID>,
        id: ID,
    ) -> Result<usize, TangleError<ID>> {
        if let Some(hops) = self.get(id) {
            return Ok(hops);
        }

        if !index.contains(id) {
            return Err(TangleError::UnknownMessage(id));
        }

        let root = index.root();

        // Stack entries are `(id, expanded)`, a node gets pushed a second time with `expanded`
        // set once all its previous messages are queued.
        let mut stack = vec![(id, false)];
        let mut on_path: HashSet<ID> = HashSet::new();

        while let Some((current, expanded)) = stack.pop() {
            if current == root {
                if !self.hops.contains_key(&root) {
                    self.insert(root, 0);
                }
                continue;
            }

            if expanded {
                let mut longest: Option<usize> = None;
                for previous in index.previous(current) {
                    let hops = self
                        .get(previous)
                        .ok_or(TangleError::MalformedTangle(current))?;
                    longest = Some(longest.map_or(hops, |longest| longest.max(hops)));
                }

                // Only the root is allowed to have no previous messages.
                let hops = longest.ok_or(TangleError::MalformedTangle(current))? + 1;
                on_path.remove(&current);
                self.insert(current, hops);
                continue;
            }

            // Message might have been reached through another path in the meantime.
            if self.hops.contains_key(&current) {
                continue;
            }

            on_path.insert(current);

            stack.push((current, true));
            for previous in index.previous(current) {
                if self.hops.contains_key(&previous) {
                    continue;
                }

                if on_path.contains(&previous) {
                    return Err(TangleError::MalformedTangle(previous));
                }

                stack.push((previous, false));
            }
        }

        self.get(id).ok_or(TangleError::MalformedTangle(id))
    }
}
