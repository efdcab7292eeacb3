//! Frame transport in, signal transport out
//!
//! A bounded newest-wins queue carries landmark frames from the detector
//! thread to the frame loop; a line writer carries signals to the game.

mod frame_queue;
mod sink;

pub use frame_queue::{frame_queue, FrameConsumer, FrameProducer};
pub use sink::SignalWriter;
