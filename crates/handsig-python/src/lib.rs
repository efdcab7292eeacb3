//! Python bindings for handsig
//!
//! Lets a Python hand-detector front-end feed landmark frames straight into
//! handsig-core and read back the joystick, bow and heart signals.

use pyo3::prelude::*;

mod bindings;

use bindings::*;

/// The handsig Python module
#[pymodule]
fn _handsig(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Initialize tracing for debugging
    let _ = tracing_subscriber::fmt::try_init();

    // Version info
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    m.add("VERSION", handsig_core::VERSION)?;

    m.add_class::<PyGestureConfig>()?;
    m.add_class::<PyFrameOrchestrator>()?;
    m.add_class::<PySignalOutput>()?;

    m.add("JOINT_NAMES", joint_names())?;

    Ok(())
}

fn joint_names() -> Vec<&'static str> {
    handsig_core::landmarks::HandJoint::ALL
        .iter()
        .map(|joint| joint.as_str())
        .collect()
}
