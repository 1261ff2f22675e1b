// SPDX-License-Identifier: MIT OR Apache-2.0

//! Causal dependency queries between messages of a tangle.
use std::collections::hash_map::Entry;
use std::collections::{BinaryHeap, HashMap, HashSet};

use crate::depth::Depths;
use crate::error::TangleError;
use crate::index::TangleIndex;
use crate::traits::MessageId;

/// Partially explored ancestry of one message.
///
/// Ancestors are visited deepest first. A query for a target on depth `d` only needs to visit
/// ancestors with a depth of at least `d`, the rest stays in the frontier and can be picked up by
/// later queries.
#[derive(Debug)]
struct Search<ID> {
    visited: HashSet<ID>,
    frontier: BinaryHeap<(usize, ID)>,
}

/// Memoised reachability over the previous pointers of a tangle.
#[derive(Debug)]
pub(crate) struct Reachability<ID> {
    searches: HashMap<ID, Search<ID>>,
}

impl<ID> Reachability<ID>
where
    ID: MessageId,
{
    pub fn new() -> Self {
        Self {
            searches: HashMap::new(),
        }
    }

    /// Returns true if `from` causally depends on `to`, that is `to` can be reached by following
    /// one or more previous pointers starting at `from`.
    ///
    /// A message can only depend on messages which are strictly closer to the root, all other
    /// queries are answered without walking the graph.
    pub fn points_to(
        &mut self,
        index: &TangleIndex<ID>,
        depths: &mut Depths<ID>,
        from: ID,
        to: ID,
    ) -> Result<bool, TangleError<ID>> {
        let from_hops = depths.hops_to_root(index, from)?;
        let to_hops = depths.hops_to_root(index, to)?;

        if from_hops <= to_hops {
            return Ok(false);
        }

        let search = match self.searches.entry(from) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let mut frontier = BinaryHeap::new();
                for previous in index.previous(from) {
                    frontier.push((depths.hops_to_root(index, previous)?, previous));
                }
                entry.insert(Search {
                    visited: HashSet::new(),
                    frontier,
                })
            }
        };

        if search.visited.contains(&to) {
            return Ok(true);
        }

        while let Some(&(hops, current)) = search.frontier.peek() {
            // Everything left is closer to the root than the target.
            if hops < to_hops {
                break;
            }
            search.frontier.pop();

            if current == from {
                return Err(TangleError::MalformedTangle(from));
            }

            if !search.visited.insert(current) {
                continue;
            }

            for previous in index.previous(current) {
                if !search.visited.contains(&previous) {
                    search
                        .frontier
                        .push((depths.hops_to_root(index, previous)?, previous));
                }
            }

            if current == to {
                return Ok(true);
            }
        }

        Ok(false)
    }
}
