//! # Event Receiver
//!
//! The consuming side of the detector channel, owned by the event reporter.

use crate::publisher::BusStats;
use shared_types::ViolationEvent;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tokio_stream::Stream;

/// Single consumer of detector output.
pub struct EventReceiver {
    receiver: mpsc::Receiver<ViolationEvent>,
    stats: Arc<BusStats>,
}

impl EventReceiver {
    pub(crate) fn new(receiver: mpsc::Receiver<ViolationEvent>, stats: Arc<BusStats>) -> Self {
        Self { receiver, stats }
    }

    /// Receive the next event.
    ///
    /// Returns `None` once every publisher has been dropped and the buffer
    /// is drained.
    pub async fn recv(&mut self) -> Option<ViolationEvent> {
        self.receiver.recv().await
    }

    /// Receive without waiting. `None` when nothing is buffered.
    pub fn try_recv(&mut self) -> Option<ViolationEvent> {
        self.receiver.try_recv().ok()
    }

    /// Stop accepting new events; buffered ones can still be drained.
    pub fn close(&mut self) {
        self.receiver.close();
    }

    pub fn stats(&self) -> Arc<BusStats> {
        Arc::clone(&self.stats)
    }
}

/// A stream wrapper for the receiver.
///
/// Implements `tokio_stream::Stream` for use with stream combinators.
pub struct EventStream {
    receiver: EventReceiver,
}

impl EventStream {
    #[must_use]
    pub fn new(receiver: EventReceiver) -> Self {
        Self { receiver }
    }
}

impl Stream for EventStream {
    type Item = ViolationEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.receiver.poll_recv(cx)
    }
}
