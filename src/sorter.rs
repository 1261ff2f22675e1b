// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic linear order and heads of a tangle.
use std::cmp::Ordering;
use std::fmt;

use tracing::{debug, trace};

use crate::config::{SortConfig, TieBreak};
use crate::depth::Depths;
use crate::error::TangleError;
use crate::index::TangleIndex;
use crate::observer::{SortEvent, SortObserver};
use crate::reachability::Reachability;
use crate::traits::{MessageId, TangledMessage};

/// Sorts the messages of one tangle into a linear order which respects causality.
///
/// Ordering rules for two messages `i` and `j`:
///
/// 1. If `i` causally depends on `j` (`j` is reachable over previous pointers from `i`), `j` comes
///    first.
/// 2. Otherwise the message with fewer hops to the root comes first.
/// 3. Concurrent messages on the same depth are ordered by `SortConfig::tie_break`, by default
///    by their identifier.
///
/// A message always has more hops to the root than every message it depends on, which makes these
/// rules a strict weak ordering.
///
/// The sorter caches reachability and depth information for the message set it was created with.
/// Create a new sorter for every new message set, `insert` can be used to add newly arrived
/// messages to an existing one.
pub struct TangleSorter<ID>
where
    ID: MessageId,
{
    name: String,
    config: SortConfig,
    index: TangleIndex<ID>,
    depths: Depths<ID>,
    reachability: Reachability<ID>,
    observer: Box<dyn SortObserver<ID> + Send>,
}

impl<ID> TangleSorter<ID>
where
    ID: MessageId + 'static,
{
    /// Build a sorter for the tangle with the given name.
    pub fn new<M>(messages: &[M], name: &str) -> Result<Self, TangleError<ID>>
    where
        M: TangledMessage<ID>,
    {
        Self::with_config(messages, name, SortConfig::default())
    }

    pub fn with_config<M>(
        messages: &[M],
        name: &str,
        config: SortConfig,
    ) -> Result<Self, TangleError<ID>>
    where
        M: TangledMessage<ID>,
    {
        let index = TangleIndex::build_with_config(messages, name, &config)?;
        Ok(Self::from_index(index, name, config))
    }

    /// Create a sorter for an already built index.
    pub fn from_index(index: TangleIndex<ID>, name: &str, config: SortConfig) -> Self {
        Self {
            name: name.to_string(),
            config,
            index,
            depths: Depths::new(),
            reachability: Reachability::new(),
            observer: Box::new(()),
        }
    }

    /// Inform the given observer about all further steps of this sorter.
    pub fn with_observer(mut self, observer: impl SortObserver<ID> + Send + 'static) -> Self {
        self.observer = Box::new(observer);
        self.observer.on_event(SortEvent::IndexBuilt {
            root: self.index.root(),
            messages: self.index.len(),
            edges: self.index.edge_count(),
        });
        self
    }

    pub fn index(&self) -> &TangleIndex<ID> {
        &self.index
    }

    pub fn config(&self) -> &SortConfig {
        &self.config
    }

    /// Add a newly arrived message to this tangle.
    ///
    /// Cached results stay valid as a new message can't change the ancestry of existing ones.
    pub fn insert<M>(&mut self, message: &M) -> Result<(), TangleError<ID>>
    where
        M: TangledMessage<ID>,
    {
        if let Some(max) = self.config.max_messages {
            if self.index.len() >= max {
                return Err(TangleError::TooManyMessages(self.index.len() + 1, max));
            }
        }

        self.index.insert(message, &self.name)?;
        self.observer.on_event(SortEvent::MessageInserted {
            message: message.id(),
        });
        Ok(())
    }

    /// Returns true if message `from` causally depends on message `to`.
    pub fn points_to(&mut self, from: ID, to: ID) -> Result<bool, TangleError<ID>> {
        let result = self
            .reachability
            .points_to(&self.index, &mut self.depths, from, to);
        self.report_depths();
        result
    }

    /// Number of edges on the longest path from the given message back to the root.
    pub fn hops_to_root(&mut self, id: ID) -> Result<usize, TangleError<ID>> {
        let result = self.depths.hops_to_root(&self.index, id);
        self.report_depths();
        result
    }

    fn report_depths(&mut self) {
        for (message, hops) in self.depths.take_computed() {
            trace!(%message, hops, "computed hops to root");
            self.observer
                .on_event(SortEvent::DepthComputed { message, hops });
        }
    }

    /// Compare two messages by their position in the tangle.
    pub fn compare(&mut self, a: ID, b: ID) -> Result<Ordering, TangleError<ID>> {
        if a == b {
            return Ok(Ordering::Equal);
        }

        if self.points_to(a, b)? {
            return Ok(Ordering::Greater);
        }

        if self.points_to(b, a)? {
            return Ok(Ordering::Less);
        }

        let ordering = match self.hops_to_root(a)?.cmp(&self.hops_to_root(b)?) {
            Ordering::Equal => match self.config.tie_break {
                TieBreak::Identity => a.cmp(&b),
                TieBreak::Stable => Ordering::Equal,
            },
            ordering => ordering,
        };

        Ok(ordering)
    }

    /// Returns true if message `a` is sorted before message `b`.
    pub fn less(&mut self, a: ID, b: ID) -> Result<bool, TangleError<ID>> {
        Ok(self.compare(a, b)? == Ordering::Less)
    }

    /// Sort the given messages in place.
    ///
    /// The messages need to be part of the index of this sorter, usually they are the same
    /// messages the sorter was created with. Sorting an already sorted slice does not change it.
    /// On failure the slice is left untouched.
    pub fn sort<M>(&mut self, messages: &mut [M]) -> Result<(), TangleError<ID>>
    where
        M: TangledMessage<ID>,
    {
        let ids: Vec<ID> = messages.iter().map(|message| message.id()).collect();
        let order = self.sort_order(&ids)?;

        // Apply the permutation by following its cycles, `order[i]` is the position of the
        // message which ends up at position `i`.
        let mut placed = vec![false; order.len()];
        for start in 0..order.len() {
            if placed[start] {
                continue;
            }

            let mut current = start;
            loop {
                placed[current] = true;
                let source = order[current];
                if source == start {
                    break;
                }
                messages.swap(current, source);
                current = source;
            }
        }

        Ok(())
    }

    /// Ids of all messages of the index in sorted order.
    pub fn sorted(&mut self) -> Result<Vec<ID>, TangleError<ID>> {
        let ids = self.index.messages().to_vec();
        let order = self.sort_order(&ids)?;
        Ok(order.into_iter().map(|position| ids[position]).collect())
    }

    /// Positions of the given ids in sorted order.
    fn sort_order(&mut self, ids: &[ID]) -> Result<Vec<usize>, TangleError<ID>> {
        // Compute all depths upfront. This validates the ancestry of every message before any
        // comparison is made.
        for id in ids {
            self.hops_to_root(*id)?;
        }

        let mut order: Vec<usize> = (0..ids.len()).collect();
        let mut comparisons = 0;
        let mut failure = None;
        order.sort_by(|a, b| {
            comparisons += 1;
            match self.compare(ids[*a], ids[*b]) {
                Ok(ordering) => ordering,
                Err(err) => {
                    failure.get_or_insert(err);
                    Ordering::Equal
                }
            }
        });

        if let Some(err) = failure {
            return Err(err);
        }

        debug!(
            name = %self.name,
            messages = ids.len(),
            comparisons,
            "sorted tangle"
        );
        self.observer.on_event(SortEvent::Sorted {
            messages: ids.len(),
            comparisons,
        });

        Ok(order)
    }

    /// Current tips of the tangle, in ascending id order.
    pub fn heads(&mut self) -> Vec<ID> {
        let heads = self.index.heads();
        debug!(name = %self.name, ?heads, "computed tangle heads");
        self.observer.on_event(SortEvent::HeadsComputed {
            heads: heads.clone(),
        });
        heads
    }
}

impl<ID> fmt::Debug for TangleSorter<ID>
where
    ID: MessageId,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TangleSorter")
            .field("name", &self.name)
            .field("config", &self.config)
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}

/// Sort the messages of the tangle with the given name in place and return its heads.
pub fn sort_tangle<ID, M>(messages: &mut [M], name: &str) -> Result<Vec<ID>, TangleError<ID>>
where
    ID: MessageId + 'static,
    M: TangledMessage<ID>,
{
    let mut sorter = TangleSorter::new(&*messages, name)?;
    sorter.sort(messages)?;
    Ok(sorter.heads())
}

/// Heads of the tangle with the given name, in ascending id order.
pub fn heads<ID, M>(messages: &[M], name: &str) -> Result<Vec<ID>, TangleError<ID>>
where
    ID: MessageId,
    M: TangledMessage<ID>,
{
    Ok(TangleIndex::build(messages, name)?.heads())
}
