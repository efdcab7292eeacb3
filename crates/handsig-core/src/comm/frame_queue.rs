//! Bounded landmark frame queue with newest-wins semantics
//!
//! The detector usually runs on its own thread and produces frames faster
//! than, or jittery relative to, the consumer. Processing a stale frame is
//! worse than skipping it, so the producer never blocks and the consumer
//! always jumps to the newest queued frame.

use crossbeam_channel::{self as cc, RecvTimeoutError, TryRecvError, TrySendError};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::landmarks::LandmarkFrame;
use crate::{Error, Result};

/// Create a bounded frame queue
///
/// # Panics
/// Panics if `capacity` is zero.
pub fn frame_queue(capacity: usize) -> (FrameProducer, FrameConsumer) {
    assert!(capacity > 0, "Frame queue capacity must be positive");
    let (tx, rx) = cc::bounded(capacity);
    let consumer_alive = Arc::new(AtomicBool::new(true));
    (
        FrameProducer {
            tx,
            evict: rx.clone(),
            consumer_alive: consumer_alive.clone(),
            dropped: Arc::new(AtomicU64::new(0)),
        },
        FrameConsumer {
            rx,
            consumer_alive,
            superseded: 0,
        },
    )
}

/// Sending half, held by the detector thread
#[derive(Debug, Clone)]
pub struct FrameProducer {
    tx: cc::Sender<LandmarkFrame>,
    // Lets a full queue discard its oldest entry
    evict: cc::Receiver<LandmarkFrame>,
    consumer_alive: Arc<AtomicBool>,
    dropped: Arc<AtomicU64>,
}

impl FrameProducer {
    /// Queue a frame without blocking
    ///
    /// When the queue is full the oldest queued frame is discarded.
    /// Fails with [`Error::ChannelClosed`] once the consumer is gone.
    pub fn push(&self, frame: LandmarkFrame) -> Result<()> {
        if !self.consumer_alive.load(Ordering::Acquire) {
            return Err(Error::ChannelClosed);
        }
        let mut frame = frame;
        loop {
            match self.tx.try_send(frame) {
                Ok(()) => return Ok(()),
                Err(TrySendError::Full(rejected)) => {
                    if self.evict.try_recv().is_ok() {
                        self.dropped.fetch_add(1, Ordering::Relaxed);
                    }
                    frame = rejected;
                }
                Err(TrySendError::Disconnected(_)) => return Err(Error::ChannelClosed),
            }
        }
    }

    /// Frames discarded because the queue was full
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tx.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tx.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> Option<usize> {
        self.tx.capacity()
    }
}

/// Receiving half, owned by the frame loop
#[derive(Debug)]
pub struct FrameConsumer {
    rx: cc::Receiver<LandmarkFrame>,
    consumer_alive: Arc<AtomicBool>,
    superseded: u64,
}

impl FrameConsumer {
    /// Wait up to `timeout` for a frame, then skip to the newest one queued
    ///
    /// Returns `Ok(None)` on timeout. Frames already queued when every
    /// producer is dropped are still delivered; after that this fails with
    /// [`Error::ChannelClosed`].
    pub fn next_latest(&mut self, timeout: Duration) -> Result<Option<LandmarkFrame>> {
        let mut latest = match self.rx.recv_timeout(timeout) {
            Ok(frame) => frame,
            Err(RecvTimeoutError::Timeout) => return Ok(None),
            Err(RecvTimeoutError::Disconnected) => return Err(Error::ChannelClosed),
        };
        while let Ok(frame) = self.rx.try_recv() {
            latest = frame;
            self.superseded += 1;
        }
        Ok(Some(latest))
    }

    /// Take the next frame in order without waiting
    pub fn try_next(&self) -> Result<Option<LandmarkFrame>> {
        match self.rx.try_recv() {
            Ok(frame) => Ok(Some(frame)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(Error::ChannelClosed),
        }
    }

    /// Frames skipped by [`next_latest`](Self::next_latest) so far
    #[inline]
    pub fn superseded(&self) -> u64 {
        self.superseded
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

impl Drop for FrameConsumer {
    fn drop(&mut self) {
        self.consumer_alive.store(false, Ordering::Release);
    }
}
