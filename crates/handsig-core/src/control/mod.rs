//! Frame-level control
//!
//! [`FrameOrchestrator`] advances every gesture signal for one frame;
//! [`FrameLoop`] runs it on its own thread behind the frame queue.

mod frame_loop;
mod orchestrator;

pub use frame_loop::{FrameLoop, FrameLoopConfig, FrameLoopHandle, FrameLoopStats};
pub use orchestrator::{FrameOrchestrator, SignalOutput};
