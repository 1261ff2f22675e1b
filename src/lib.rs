// SPDX-License-Identifier: MIT OR Apache-2.0

//! Causal ordering for tangles of linked messages.
//!
//! A tangle is a directed-acyclic-graph of messages where every message points at the messages it
//! has seen before it was created (its "previous" set). Exactly one message, the root, has no
//! previous messages.
//!
//! This crate takes an unordered set of such messages and
//!
//! 1. builds an adjacency index from their previous pointers ([`TangleIndex`]),
//! 2. sorts them into a deterministic linear order in which every message comes after all
//!    messages it causally depends on ([`TangleSorter::sort`]), and
//! 3. identifies the current tips of the graph, its "heads" ([`TangleSorter::heads`]).
//!
//! Messages which are not causally related are ordered by their longest distance to the root
//! ("hops to root") and finally by their identifier.
//!
//! ## Example
//!
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use p2panda_tangle::{TangleSorter, TanglePoint, TangledMessage};
//!
//! struct Post {
//!     id: char,
//!     previous: Vec<char>,
//! }
//!
//! impl TangledMessage<char> for Post {
//!     fn id(&self) -> char {
//!         self.id
//!     }
//!
//!     fn tangle(&self, _name: &str) -> Option<TanglePoint<char>> {
//!         Some(TanglePoint::new(None, self.previous.clone()))
//!     }
//! }
//!
//! //   /--[B]<--\
//! // [A]         [D]
//! //   \--[C]<--/
//! let mut posts = vec![
//!     Post { id: 'd', previous: vec!['b', 'c'] },
//!     Post { id: 'c', previous: vec!['a'] },
//!     Post { id: 'a', previous: vec![] },
//!     Post { id: 'b', previous: vec!['a'] },
//! ];
//!
//! let mut sorter = TangleSorter::new(&posts, "thread")?;
//! sorter.sort(&mut posts)?;
//!
//! let ids: Vec<char> = posts.iter().map(|post| post.id).collect();
//! assert_eq!(ids, vec!['a', 'b', 'c', 'd']);
//! assert_eq!(sorter.heads(), vec!['d']);
//! # Ok(())
//! # }
//! ```
mod config;
mod depth;
mod error;
mod index;
pub mod observer;
mod reachability;
pub mod reference;
mod sorter;
mod tangles;
#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
pub mod traits;

pub use config::{SortConfig, TieBreak};
pub use error::TangleError;
pub use index::TangleIndex;
pub use observer::{SortEvent, SortObserver};
pub use reference::{MessageRef, RefAlgo, RefError};
pub use sorter::{TangleSorter, heads, sort_tangle};
pub use tangles::{TanglePoint, Tangles};
pub use traits::{MessageId, TangledMessage};
