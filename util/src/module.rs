//! Tick controller interface
//!
//! Every closed-loop controller in `base_ctrl` is written as an explicit
//! step function: one `tick` consumes the sensor readings for this control
//! cycle and produces the actuator demand for it, together with a status
//! report for archiving. The blocking driver loop that feeds inputs, applies
//! outputs and sleeps between ticks lives with the `DriveBase` context, so
//! the suspension point of every motion is in exactly one place.

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The controller's verdict for one control cycle.
pub enum TickState<O> {
    /// The motion is still in progress, the output shall be applied and the
    /// controller ticked again after its requested delay.
    Continue(O),

    /// The motion is finished. The output shall be applied and the
    /// controller shall not be ticked again.
    Complete(O),
}

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// A controller stepped once per control cycle.
pub trait TickController {
    /// Sensor readings required for one cycle.
    type InputData;
    /// Actuator demands produced by one cycle.
    type OutputData;
    /// A report on the status of the cycle.
    type StatusReport;
    /// An error which can occur during a cycle.
    type TickError;

    /// Perform one control cycle.
    ///
    /// # Outputs
    /// - On success the tick state (continue or complete, both carrying the
    ///   output demands) and a status report.
    /// - On error a `TickError` instance.
    fn tick(
        &mut self,
        input: &Self::InputData,
    ) -> Result<(TickState<Self::OutputData>, Self::StatusReport), Self::TickError>;
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<O> TickState<O> {
    /// Get the output demands regardless of completion state.
    pub fn output(&self) -> &O {
        match self {
            TickState::Continue(o) => o,
            TickState::Complete(o) => o,
        }
    }

    /// True if this state ends the motion.
    pub fn is_complete(&self) -> bool {
        matches!(self, TickState::Complete(_))
    }
}
