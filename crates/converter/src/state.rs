//! Converter state shared between the orchestrator and the assembler.

/// Mutable per-run state, owned by the orchestrator and passed by
/// reference into the assembler.
///
/// These were ambient globals in older converters of this kind; keeping
/// them in one explicit struct makes the assembler's side effects visible
/// at the call site.
#[derive(Debug, Clone, Default)]
pub struct ConverterState {
    /// Running count of assembled clouds (diagnostics only)
    pub frame_counter: u64,

    /// Offset-corrected header time of the most recently *attempted*
    /// scan, set whether or not a cloud was produced. Downstream
    /// consumers use it to request synchronized poses for auxiliary
    /// frames.
    pub last_sensor_stamp: Option<f64>,

    /// Fixed offset (seconds) added to every sensor stamp before any
    /// pose-history query
    pub time_offset: f64,
}

impl ConverterState {
    pub fn new(time_offset: f64) -> Self {
        Self {
            frame_counter: 0,
            last_sensor_stamp: None,
            time_offset,
        }
    }
}
