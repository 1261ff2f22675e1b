// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hook for observing the work of a `TangleSorter`.
//!
//! Observers are informed about the major steps of building and sorting a tangle. They are purely
//! informational, sorting results do not depend on them. Logging happens through `tracing`
//! independent of any observer.

/// Events emitted while building and sorting a tangle.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum SortEvent<ID> {
    /// Adjacency index was built from the given messages.
    IndexBuilt { root: ID, messages: usize, edges: usize },

    /// A newly arrived message was added to an existing index.
    MessageInserted { message: ID },

    /// Longest distance of a message to the root was computed (and cached).
    DepthComputed { message: ID, hops: usize },

    /// Messages were sorted, `comparisons` counts comparator invocations.
    Sorted { messages: usize, comparisons: usize },

    /// Current tips of the tangle were determined.
    HeadsComputed { heads: Vec<ID> },
}

/// Receiver of `SortEvent`s.
pub trait SortObserver<ID> {
    fn on_event(&mut self, event: SortEvent<ID>);
}

/// Ignores all events.
impl<ID> SortObserver<ID> for () {
    fn on_event(&mut self, _event: SortEvent<ID>) {}
}

impl<ID, F> SortObserver<ID> for F
where
    F: FnMut(SortEvent<ID>),
{
    fn on_event(&mut self, event: SortEvent<ID>) {
        self(event)
    }
}

#[cfg(test)]
mod tests {
    use super::{SortEvent, SortObserver};

    #[test]
    fn closures_observe_events() {
        let mut events = Vec::new();
        {
            let mut observer = |event: SortEvent<char>| events.push(event);
            observer.on_event(SortEvent::MessageInserted { message: 'a' });
            observer.on_event(SortEvent::HeadsComputed { heads: vec!['a'] });
        }
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], SortEvent::MessageInserted { message: 'a' });
    }
}
