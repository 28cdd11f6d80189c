//! Progress broadcasts.

use crossbeam_channel::Sender;
use tracing::info;

use leaf_world::TILE_EDGE;

/// Capability a subscriber needs to receive progress broadcasts.
pub const NOTIFY_CAPABILITY: &str = "leaffix.notify";

/// Destination for progress broadcasts.
///
/// Fire and forget: the scheduler never retries or waits for delivery.
pub trait NotificationSink {
    /// Deliver `message` to every subscriber holding `capability`.
    fn broadcast(&self, message: &str, capability: &str);
}

impl<T: NotificationSink + ?Sized> NotificationSink for &T {
    fn broadcast(&self, message: &str, capability: &str) {
        (**self).broadcast(message, capability);
    }
}

/// Writes broadcasts to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn broadcast(&self, message: &str, capability: &str) {
        info!(capability, "{message}");
    }
}

/// A broadcast as delivered through a [`ChannelSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub capability: String,
}

/// Forwards broadcasts over a channel, e.g. to a console or chat thread.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: Sender<Notice>,
}

impl ChannelSink {
    #[must_use]
    pub const fn new(tx: Sender<Notice>) -> Self {
        Self { tx }
    }
}

impl NotificationSink for ChannelSink {
    fn broadcast(&self, message: &str, capability: &str) {
        // Ignore send errors - the receiver may have been dropped
        let _ = self.tx.send(Notice {
            message: message.to_string(),
            capability: capability.to_string(),
        });
    }
}

/// Snapshot of progress for status broadcasts and queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusReport {
    pub running: bool,
    pub complete: bool,
    pub index: u64,
    /// Side of the completed square in chunks, 0 when nothing is done yet.
    pub completed_side: u64,
    /// Side of the target square in chunks.
    pub target_side: u32,
}

impl StatusReport {
    /// Side of the completed square in blocks.
    #[must_use]
    pub const fn completed_blocks(&self) -> u64 {
        self.completed_side * TILE_EDGE as u64
    }

    /// One-line answer to a status query.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Leaf fix: {}, completed side {} of {}, index {}.",
            if self.running { "RUNNING" } else { "STOPPED" },
            self.completed_side,
            self.target_side,
            self.index
        )
    }
}

impl core::fmt::Display for StatusReport {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let side = self.completed_side;
        let blocks = self.completed_blocks();
        write!(
            f,
            "Leaf fix:{} index {}, {side} x {side} chunks, {blocks} x {blocks} blocks.",
            if self.complete { " FINISHED" } else { "" },
            self.index
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(complete: bool) -> StatusReport {
        StatusReport {
            running: !complete,
            complete,
            index: 25,
            completed_side: 5,
            target_side: 5,
        }
    }

    #[test]
    fn test_broadcast_text() {
        assert_eq!(
            report(true).to_string(),
            "Leaf fix: FINISHED index 25, 5 x 5 chunks, 80 x 80 blocks."
        );
        assert_eq!(
            report(false).to_string(),
            "Leaf fix: index 25, 5 x 5 chunks, 80 x 80 blocks."
        );
    }

    #[test]
    fn test_summary_text() {
        assert_eq!(
            report(false).summary(),
            "Leaf fix: RUNNING, completed side 5 of 5, index 25."
        );
    }

    #[test]
    fn test_channel_sink_forwards_and_survives_dropped_receiver() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let sink = ChannelSink::new(tx);

        sink.broadcast("hello", NOTIFY_CAPABILITY);
        assert_eq!(
            rx.try_recv().unwrap(),
            Notice {
                message: "hello".to_string(),
                capability: NOTIFY_CAPABILITY.to_string(),
            }
        );

        drop(rx);
        sink.broadcast("nobody listening", NOTIFY_CAPABILITY);
    }
}
