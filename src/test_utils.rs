// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities.
use crate::tangles::{TanglePoint, Tangles};
use crate::traits::TangledMessage;

/// Name of the tangle test messages are part of by default.
pub const TEST_TANGLE: &str = "thread";

/// Message with string ids, taking part in one or more named tangles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestMessage {
    pub id: &'static str,
    pub tangles: Tangles<&'static str>,
}

impl TestMessage {
    /// Message which is part of the default test tangle.
    pub fn new(id: &'static str, point: TanglePoint<&'static str>) -> Self {
        let mut tangles = Tangles::new();
        tangles.insert(TEST_TANGLE, point);
        Self { id, tangles }
    }

    /// Move all tangle pointers of this message into the tangle with the given name.
    pub fn in_tangle(self, name: &str) -> Self {
        let mut tangles = Tangles::new();
        if let Some(point) = self.tangles.get(TEST_TANGLE) {
            tangles.insert(name, point.clone());
        }
        Self {
            id: self.id,
            tangles,
        }
    }

    /// Additionally take part in the tangle with the given name.
    pub fn with_tangle(mut self, name: &str, point: TanglePoint<&'static str>) -> Self {
        self.tangles.insert(name, point);
        self
    }
}

impl TangledMessage<&'static str> for TestMessage {
    fn id(&self) -> &'static str {
        self.id
    }

    fn tangle(&self, name: &str) -> Option<TanglePoint<&'static str>> {
        self.tangles.get(name).cloned()
    }
}

/// Message in the default test tangle pointing at the given previous messages. An empty previous
/// set makes it the root.
pub fn message(id: &'static str, previous: &[&'static str]) -> TestMessage {
    TestMessage::new(id, TanglePoint::new(None, previous.to_vec()))
}

/// Ids of the given messages, in order.
pub fn ids(messages: &[TestMessage]) -> Vec<&'static str> {
    messages.iter().map(|message| message.id).collect()
}

#[cfg(feature = "test_utils")]
pub fn setup_logging() {
    if std::env::var("RUST_LOG").is_ok() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    }
}
