// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adjacency index over the previous pointers of a set of messages.
use std::collections::HashSet;

use petgraph::Direction;
use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;
use tracing::{debug, trace};

use crate::config::SortConfig;
use crate::error::TangleError;
use crate::traits::{MessageId, TangledMessage};

/// Index of all "points-to" edges in a tangle.
///
/// Every message is a node, every entry of a message's previous set is an edge from that message
/// to the referenced one. The index is built once per message set and validated during
/// construction:
///
/// - exactly one message has an empty previous set, it is recorded as the root,
/// - every referenced message is part of the set,
/// - no message is given twice,
/// - declared roots match the recorded root,
/// - previous pointers do not form a cycle.
#[derive(Clone, Debug)]
pub struct TangleIndex<ID>
where
    ID: MessageId,
{
    graph: DiGraphMap<ID, ()>,
    root: ID,
    messages: Vec<ID>,
}

impl<ID> TangleIndex<ID>
where
    ID: MessageId,
{
    /// Build the index for the tangle with the given name.
    pub fn build<M>(messages: &[M], name: &str) -> Result<Self, TangleError<ID>>
    where
        M: TangledMessage<ID>,
    {
        Self::build_with_config(messages, name, &SortConfig::default())
    }

    /// Build the index, honouring the limits of the given configuration.
    ///
    /// Fails with [`TangleError::MalformedTangle`] when previous pointers form a cycle anywhere in
    /// the tangle, including cycles which are detached from the root.
    pub fn build_with_config<M>(
        messages: &[M],
        name: &str,
        config: &SortConfig,
    ) -> Result<Self, TangleError<ID>>
    where
        M: TangledMessage<ID>,
    {
        let index = Self::build_unchecked(messages, name, config)?;

        if let Err(cycle) = toposort(&index.graph, None) {
            return Err(TangleError::MalformedTangle(cycle.node_id()));
        }

        debug!(
            %name,
            root = %index.root,
            messages = index.graph.node_count(),
            edges = index.graph.edge_count(),
            "built tangle index"
        );

        Ok(index)
    }

    /// Validate roots and references without checking the graph for cycles.
    pub(crate) fn build_unchecked<M>(
        messages: &[M],
        name: &str,
        config: &SortConfig,
    ) -> Result<Self, TangleError<ID>>
    where
        M: TangledMessage<ID>,
    {
        if let Some(max) = config.max_messages {
            if messages.len() > max {
                return Err(TangleError::TooManyMessages(messages.len(), max));
            }
        }

        let mut graph: DiGraphMap<ID, ()> =
            DiGraphMap::with_capacity(messages.len(), messages.len());
        let mut root: Option<ID> = None;
        let mut points = Vec::with_capacity(messages.len());

        // Register all nodes first so previous pointers can be checked in a second pass,
        // independent of the order messages were given in.
        for message in messages {
            let id = message.id();
            let point = message
                .tangle(name)
                .ok_or(TangleError::NotInTangle(id))?;

            if graph.contains_node(id) {
                return Err(TangleError::DuplicateMessage(id));
            }
            graph.add_node(id);

            if point.is_root() {
                if let Some(existing) = root {
                    return Err(TangleError::MultipleRoots(existing, id));
                }
                trace!(%id, "found tangle root");
                root = Some(id);
            }

            points.push((id, point));
        }

        let root = root.ok_or(TangleError::MissingRoot)?;

        for (id, point) in &points {
            if let Some(declared) = point.root {
                if !point.is_root() && declared != root {
                    return Err(TangleError::RootMismatch {
                        message: *id,
                        declared,
                        root,
                    });
                }
            }

            for previous in &point.previous {
                if !graph.contains_node(*previous) {
                    return Err(TangleError::UnknownReference {
                        message: *id,
                        reference: *previous,
                    });
                }
                graph.add_edge(*id, *previous, ());
            }
        }

        Ok(Self {
            graph,
            root,
            messages: points.into_iter().map(|(id, _)| id).collect(),
        })
    }

    /// Add a newly arrived message to the index.
    ///
    /// The message needs to reference messages which are already part of the index. Existing
    /// messages are not affected by this, their ancestry stays the same, and no cycle can be
    /// introduced.
    pub fn insert<M>(&mut self, message: &M, name: &str) -> Result<(), TangleError<ID>>
    where
        M: TangledMessage<ID>,
    {
        let id = message.id();
        let point = message
            .tangle(name)
            .ok_or(TangleError::NotInTangle(id))?;

        if self.graph.contains_node(id) {
            return Err(TangleError::DuplicateMessage(id));
        }

        if point.is_root() {
            return Err(TangleError::MultipleRoots(self.root, id));
        }

        if let Some(declared) = point.root {
            if declared != self.root {
                return Err(TangleError::RootMismatch {
                    message: id,
                    declared,
                    root: self.root,
                });
            }
        }

        if let Some(unknown) = point
            .previous
            .iter()
            .find(|previous| !self.graph.contains_node(**previous))
        {
            return Err(TangleError::UnknownReference {
                message: id,
                reference: *unknown,
            });
        }

        self.graph.add_node(id);
        for previous in point.previous {
            self.graph.add_edge(id, previous, ());
        }
        self.messages.push(id);

        trace!(%id, "inserted message into tangle index");

        Ok(())
    }

    /// Id of the root message.
    pub fn root(&self) -> ID {
        self.root
    }

    /// Returns true if the message is part of this index.
    pub fn contains(&self, id: ID) -> bool {
        self.graph.contains_node(id)
    }

    /// Messages the given message directly points to.
    pub fn previous(&self, id: ID) -> impl Iterator<Item = ID> + '_ {
        self.graph.neighbors_directed(id, Direction::Outgoing)
    }

    /// Messages directly pointing at the given message.
    pub fn next(&self, id: ID) -> impl Iterator<Item = ID> + '_ {
        self.graph.neighbors_directed(id, Direction::Incoming)
    }

    /// All message ids, in the order they were added to the index.
    pub fn messages(&self) -> &[ID] {
        &self.messages
    }

    /// Number of messages in the index.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Number of previous pointers in the index.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Messages which are not referenced as previous by any other message, in ascending id order.
    ///
    /// More than one head means the tangle has open forks which a future message should merge.
    pub fn heads(&self) -> Vec<ID> {
        let referenced: HashSet<ID> = self
            .graph
            .all_edges()
            .map(|(_, previous, _)| previous)
            .collect();

        let mut heads: Vec<ID> = self
            .messages
            .iter()
            .filter(|id| !referenced.contains(*id))
            .copied()
            .collect();
        heads.sort();
        heads
    }
}

#[cfg(test)]
mod tests {
    use crate::config::SortConfig;
    use crate::error::TangleError;
    use crate::tangles::TanglePoint;
    use crate::test_utils::{TestMessage, message};

    use super::TangleIndex;

    #[test]
    fn build_linear_chain() {
        let messages = vec![
            message("p3", &["p2"]),
            message("p1", &[]),
            message("p2", &["p1"]),
        ];

        let index = TangleIndex::build(&messages, "thread").unwrap();
        assert_eq!(index.root(), "p1");
        assert_eq!(index.len(), 3);
        assert_eq!(index.edge_count(), 2);
        assert_eq!(index.messages(), &["p3", "p1", "p2"]);
        assert_eq!(index.previous("p3").collect::<Vec<_>>(), vec!["p2"]);
        assert_eq!(index.next("p1").collect::<Vec<_>>(), vec!["p2"]);
        assert_eq!(index.previous("p1").count(), 0);
        assert_eq!(index.heads(), vec!["p3"]);
    }

    #[test]
    fn missing_root() {
        let messages = vec![message("a", &["b"]), message("b", &["a"])];
        assert_eq!(
            TangleIndex::build(&messages, "thread").unwrap_err(),
            TangleError::MissingRoot
        );

        let empty: Vec<TestMessage> = Vec::new();
        assert_eq!(
            TangleIndex::build(&empty, "thread").unwrap_err(),
            TangleError::MissingRoot
        );
    }

    #[test]
    fn multiple_roots() {
        let messages = vec![message("a", &[]), message("b", &[]), message("c", &["a"])];
        assert_eq!(
            TangleIndex::build(&messages, "thread").unwrap_err(),
            TangleError::MultipleRoots("a", "b")
        );
    }

    #[test]
    fn unknown_reference() {
        let messages = vec![message("a", &[]), message("b", &["a", "x"])];
        assert_eq!(
            TangleIndex::build(&messages, "thread").unwrap_err(),
            TangleError::UnknownReference {
                message: "b",
                reference: "x"
            }
        );
    }

    #[test]
    fn duplicate_message() {
        let messages = vec![message("a", &[]), message("b", &["a"]), message("b", &["a"])];
        assert_eq!(
            TangleIndex::build(&messages, "thread").unwrap_err(),
            TangleError::DuplicateMessage("b")
        );
    }

    #[test]
    fn root_mismatch() {
        let messages = vec![
            message("a", &[]),
            TestMessage::new("b", TanglePoint::new(Some("z"), vec!["a"])),
        ];
        assert_eq!(
            TangleIndex::build(&messages, "thread").unwrap_err(),
            TangleError::RootMismatch {
                message: "b",
                declared: "z",
                root: "a"
            }
        );

        let messages = vec![
            message("a", &[]),
            TestMessage::new("b", TanglePoint::new(Some("a"), vec!["a"])),
        ];
        assert!(TangleIndex::build(&messages, "thread").is_ok());
    }

    #[test]
    fn not_in_tangle() {
        let messages = vec![
            message("a", &[]),
            TestMessage::new("b", TanglePoint::new(None, vec!["a"])).in_tangle("gathering"),
        ];
        assert_eq!(
            TangleIndex::build(&messages, "thread").unwrap_err(),
            TangleError::NotInTangle("b")
        );
    }

    #[test]
    fn cycles() {
        // The cycle reaches the root.
        let messages = vec![message("a", &[]), message("b", &["a", "c"]), message("c", &["b"])];
        let err = TangleIndex::build(&messages, "thread").unwrap_err();
        assert!(matches!(err, TangleError::MalformedTangle("b" | "c")));

        // The cycle is detached from an otherwise valid tangle.
        let messages = vec![
            message("a", &[]),
            message("b", &["a"]),
            message("x", &["y"]),
            message("y", &["x"]),
        ];
        let err = TangleIndex::build(&messages, "thread").unwrap_err();
        assert!(matches!(err, TangleError::MalformedTangle("x" | "y")));

        // A message pointing to itself.
        let messages = vec![message("a", &[]), message("b", &["a", "b"])];
        assert_eq!(
            TangleIndex::build(&messages, "thread").unwrap_err(),
            TangleError::MalformedTangle("b")
        );

        // Unchecked indexes still accept them.
        assert!(TangleIndex::build_unchecked(&messages, "thread", &SortConfig::default()).is_ok());
    }

    #[test]
    fn too_many_messages() {
        let messages = vec![message("a", &[]), message("b", &["a"]), message("c", &["b"])];
        let config = SortConfig::default().with_max_messages(2);
        assert_eq!(
            TangleIndex::build_with_config(&messages, "thread", &config).unwrap_err(),
            TangleError::TooManyMessages(3, 2)
        );
    }

    #[test]
    fn insert_messages() {
        let messages = vec![message("a", &[]), message("b", &["a"])];
        let mut index = TangleIndex::build(&messages, "thread").unwrap();
        assert_eq!(index.heads(), vec!["b"]);

        index.insert(&message("c", &["a"]), "thread").unwrap();
        assert_eq!(index.heads(), vec!["b", "c"]);

        index.insert(&message("d", &["b", "c"]), "thread").unwrap();
        assert_eq!(index.heads(), vec!["d"]);
        assert_eq!(index.len(), 4);

        assert_eq!(
            index.insert(&message("e", &["x"]), "thread").unwrap_err(),
            TangleError::UnknownReference {
                message: "e",
                reference: "x"
            }
        );
        assert_eq!(
            index.insert(&message("f", &["d", "f"]), "thread").unwrap_err(),
            TangleError::UnknownReference {
                message: "f",
                reference: "f"
            }
        );
        assert_eq!(
            index.insert(&message("d", &["a"]), "thread").unwrap_err(),
            TangleError::DuplicateMessage("d")
        );
        assert_eq!(
            index.insert(&message("r", &[]), "thread").unwrap_err(),
            TangleError::MultipleRoots("a", "r")
        );

        // Failed inserts leave the index untouched.
        assert_eq!(index.len(), 4);
        assert_eq!(index.heads(), vec!["d"]);
    }
}
