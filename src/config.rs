// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration for sorting tangles.
use serde::{Deserialize, Serialize};

/// Policy deciding the order of concurrent messages with the same distance to the root.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Order concurrent messages by their identifier. Results are identical for every input order
    /// and across peers.
    #[default]
    Identity,

    /// Keep concurrent messages in the order they were given. Results depend on the input order.
    Stable,
}

/// Configuration parameters for `TangleSorter`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SortConfig {
    /// Ordering of concurrent messages on the same depth.
    pub tie_break: TieBreak,

    /// Maximum number of messages accepted for one tangle. Work per sort grows quadratically with
    /// wide tangles, applications handling untrusted input should set a bound here.
    pub max_messages: Option<usize>,
}

impl SortConfig {
    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    pub fn with_max_messages(mut self, max_messages: usize) -> Self {
        self.max_messages = Some(max_messages);
        self
    }
}
