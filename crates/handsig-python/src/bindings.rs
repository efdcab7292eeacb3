//! Python type bindings
//!
//! Wrapper types that expose handsig-core functionality to Python.

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use handsig_core::comm::SignalWriter;
use handsig_core::config::GestureConfig;
use handsig_core::control::{FrameOrchestrator, SignalOutput};
use handsig_core::landmarks::{HandJoint, LandmarkFrame, Point2D, RawHand};

fn value_error(e: handsig_core::Error) -> PyErr {
    PyValueError::new_err(e.to_string())
}

// ============================================================================
// Configuration
// ============================================================================

/// Gesture thresholds, flattened into one object
#[pyclass(name = "GestureConfig")]
#[derive(Clone)]
pub struct PyGestureConfig {
    pub(crate) inner: GestureConfig,
}

#[pymethods]
impl PyGestureConfig {
    #[new]
    fn new() -> Self {
        Self {
            inner: GestureConfig::default(),
        }
    }

    /// Parse a JSON config; missing fields take defaults
    #[staticmethod]
    fn from_json(json: &str) -> PyResult<Self> {
        GestureConfig::from_json_str(json)
            .map(|inner| Self { inner })
            .map_err(value_error)
    }

    /// Load a JSON config file
    #[staticmethod]
    fn load(path: &str) -> PyResult<Self> {
        GestureConfig::from_json_file(path)
            .map(|inner| Self { inner })
            .map_err(value_error)
    }

    fn to_json(&self) -> PyResult<String> {
        self.inner
            .to_json_string()
            .map_err(|e| PyRuntimeError::new_err(e.to_string()))
    }

    /// Write the config as JSON to `path`
    fn save(&self, path: &str) -> PyResult<()> {
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(|e| PyRuntimeError::new_err(e.to_string()))
    }

    /// Raise ValueError if any parameter is out of range
    fn validate(&self) -> PyResult<()> {
        self.inner.validate().map_err(value_error)
    }

    // --- bow ---

    #[getter]
    fn pinch_threshold(&self) -> f64 {
        self.inner.bow.pinch_threshold
    }

    #[setter]
    fn set_pinch_threshold(&mut self, value: f64) {
        self.inner.bow.pinch_threshold = value;
    }

    #[getter]
    fn max_pull(&self) -> f64 {
        self.inner.bow.max_pull
    }

    #[setter]
    fn set_max_pull(&mut self, value: f64) {
        self.inner.bow.max_pull = value;
    }

    #[getter]
    fn min_pinch_frames(&self) -> u32 {
        self.inner.bow.min_pinch_frames
    }

    #[setter]
    fn set_min_pinch_frames(&mut self, value: u32) {
        self.inner.bow.min_pinch_frames = value;
    }

    #[getter]
    fn min_shot_strength(&self) -> f64 {
        self.inner.bow.min_shot_strength
    }

    #[setter]
    fn set_min_shot_strength(&mut self, value: f64) {
        self.inner.bow.min_shot_strength = value;
    }

    #[getter]
    fn charging_threshold(&self) -> f64 {
        self.inner.bow.charging_threshold
    }

    #[setter]
    fn set_charging_threshold(&mut self, value: f64) {
        self.inner.bow.charging_threshold = value;
    }

    #[getter]
    fn shot_timer_frames(&self) -> u32 {
        self.inner.bow.shot_timer_frames
    }

    #[setter]
    fn set_shot_timer_frames(&mut self, value: u32) {
        self.inner.bow.shot_timer_frames = value;
    }

    // --- joystick ---

    /// Tracked joint name, e.g. "index_mcp"
    #[getter]
    fn joystick_joint(&self) -> &'static str {
        self.inner.joystick.joint.as_str()
    }

    #[setter]
    fn set_joystick_joint(&mut self, name: &str) -> PyResult<()> {
        let joint: HandJoint = name.parse().map_err(value_error)?;
        self.inner.joystick.joint = joint;
        Ok(())
    }

    #[getter]
    fn sensitivity(&self) -> f64 {
        self.inner.joystick.sensitivity
    }

    #[setter]
    fn set_sensitivity(&mut self, value: f64) {
        self.inner.joystick.sensitivity = value;
    }

    #[getter]
    fn max_magnitude(&self) -> f64 {
        self.inner.joystick.max_magnitude
    }

    #[setter]
    fn set_max_magnitude(&mut self, value: f64) {
        self.inner.joystick.max_magnitude = value;
    }

    #[getter]
    fn smoothing(&self) -> f64 {
        self.inner.joystick.smoothing
    }

    #[setter]
    fn set_smoothing(&mut self, value: f64) {
        self.inner.joystick.smoothing = value;
    }

    #[getter]
    fn deadzone(&self) -> f64 {
        self.inner.joystick.deadzone
    }

    #[setter]
    fn set_deadzone(&mut self, value: f64) {
        self.inner.joystick.deadzone = value;
    }

    #[getter]
    fn momentum(&self) -> f64 {
        self.inner.joystick.momentum
    }

    #[setter]
    fn set_momentum(&mut self, value: f64) {
        self.inner.joystick.momentum = value;
    }

    // --- heart ---

    #[getter]
    fn index_dist_max(&self) -> f64 {
        self.inner.heart.index_dist_max
    }

    #[setter]
    fn set_index_dist_max(&mut self, value: f64) {
        self.inner.heart.index_dist_max = value;
    }

    #[getter]
    fn thumb_dist_max(&self) -> f64 {
        self.inner.heart.thumb_dist_max
    }

    #[setter]
    fn set_thumb_dist_max(&mut self, value: f64) {
        self.inner.heart.thumb_dist_max = value;
    }

    #[getter]
    fn drift_allowance(&self) -> f64 {
        self.inner.heart.drift_allowance
    }

    #[setter]
    fn set_drift_allowance(&mut self, value: f64) {
        self.inner.heart.drift_allowance = value;
    }

    fn __repr__(&self) -> String {
        format!(
            "GestureConfig(pinch_threshold={}, max_pull={}, joystick_joint={}, momentum={}, drift_allowance={})",
            self.inner.bow.pinch_threshold,
            self.inner.bow.max_pull,
            self.inner.joystick.joint,
            self.inner.joystick.momentum,
            self.inner.heart.drift_allowance
        )
    }
}

// ============================================================================
// Orchestration
// ============================================================================

/// Signals produced for one frame
#[pyclass(name = "SignalOutput")]
#[derive(Clone)]
pub struct PySignalOutput {
    inner: SignalOutput,
}

#[pymethods]
impl PySignalOutput {
    #[getter]
    #[inline]
    fn vx(&self) -> f64 {
        self.inner.vx
    }

    #[getter]
    #[inline]
    fn vy(&self) -> f64 {
        self.inner.vy
    }

    /// "idle", "loaded", "charging" or "shot"
    #[getter]
    fn bow_phase(&self) -> &'static str {
        self.inner.bow_phase.as_str()
    }

    #[getter]
    #[inline]
    fn strength(&self) -> f64 {
        self.inner.strength
    }

    #[getter]
    #[inline]
    fn heart_active(&self) -> bool {
        self.inner.heart_active
    }

    /// The `"vx vy\n"` line the game reads
    fn to_line(&self) -> PyResult<String> {
        let mut writer = SignalWriter::new(Vec::new());
        writer
            .write_line(&self.inner)
            .map_err(|e| PyRuntimeError::new_err(e.to_string()))?;
        String::from_utf8(writer.into_inner()).map_err(|e| PyRuntimeError::new_err(e.to_string()))
    }

    fn __repr__(&self) -> String {
        format!(
            "SignalOutput(vx={:.4}, vy={:.4}, bow_phase={}, strength={:.3}, heart_active={})",
            self.inner.vx,
            self.inner.vy,
            self.inner.bow_phase,
            self.inner.strength,
            self.inner.heart_active
        )
    }
}

/// Per-frame gesture processor
///
/// `process_frame` takes the detector output for one frame as a list of
/// `(label, [(x, y), ...])` tuples in detector order; `label` is "Left",
/// "Right" or None.
#[pyclass(name = "FrameOrchestrator")]
pub struct PyFrameOrchestrator {
    inner: FrameOrchestrator,
}

#[pymethods]
impl PyFrameOrchestrator {
    #[new]
    #[pyo3(signature = (config = None))]
    fn new(config: Option<PyGestureConfig>) -> PyResult<Self> {
        let config = config.map(|c| c.inner).unwrap_or_default();
        FrameOrchestrator::new(config)
            .map(|inner| Self { inner })
            .map_err(value_error)
    }

    /// Process one frame and return its signals
    fn process_frame(&mut self, hands: Vec<(Option<String>, Vec<(f64, f64)>)>) -> PySignalOutput {
        let frame = LandmarkFrame::from_detections(hands.into_iter().map(|(label, points)| {
            RawHand {
                label,
                landmarks: points.into_iter().map(Point2D::from).collect(),
            }
        }));
        PySignalOutput {
            inner: self.inner.process_frame(&frame),
        }
    }

    /// Return every signal to its startup state
    fn reset(&mut self) {
        self.inner.reset();
    }

    /// Replace the config; state is kept, except that a new joystick joint
    /// re-seeds the position filter
    fn set_config(&mut self, config: &PyGestureConfig) -> PyResult<()> {
        self.inner.set_config(config.inner).map_err(value_error)
    }

    #[getter]
    fn config(&self) -> PyGestureConfig {
        PyGestureConfig {
            inner: *self.inner.config(),
        }
    }

    #[getter]
    fn frames_processed(&self) -> u64 {
        self.inner.frames_processed()
    }

    #[getter]
    fn bow_phase(&self) -> &'static str {
        self.inner.bow_state().phase().as_str()
    }

    /// Strength of the most recent shot
    #[getter]
    fn last_shot_strength(&self) -> f64 {
        self.inner.bow_state().last_shot_strength()
    }

    fn __repr__(&self) -> String {
        let v = self.inner.joystick().vector();
        format!(
            "FrameOrchestrator(frames={}, bow_phase={}, vector=({:.4}, {:.4}))",
            self.inner.frames_processed(),
            self.inner.bow_state().phase(),
            v.x,
            v.y
        )
    }
}
