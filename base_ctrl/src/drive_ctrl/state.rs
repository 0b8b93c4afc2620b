//! Drive controller state and step function

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use hw_if::ActuatorCmd;
use util::maths::clamp;
use util::module::{TickController, TickState};

use super::{DriveCtrlError, DriveInput, DriveOutput, DriveRequest, Params, StatusReport};
use crate::gain_sched::GainSchedule;
use crate::heading::heading_error_deg;
use crate::speed_profile::SpeedProfile;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// State of an executing drive.
pub struct DriveCtrl {
    request: DriveRequest,
    params: Params,
    schedule: GainSchedule,

    /// Yaw reference held for the whole drive, in degrees.
    reference_deg: f64,

    /// Rotation-equivalent distance target in degrees, `None` for an
    /// unlimited drive.
    rotation_target_deg: Option<f64>,

    profile: Option<SpeedProfile>,
    speed_dps: f64,
    prev_driven_deg: f64,

    integral: f64,
    prev_error_deg: Option<f64>,
    complete: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl DriveCtrl {
    /// Create a controller for one drive request.
    ///
    /// `reference_deg` is the yaw reference to hold, already resolved by
    /// the caller (global reference or start-of-drive yaw for isolated
    /// drives). `rotation_target_deg` is the distance target converted to
    /// wheel degrees, `None` for an unlimited drive.
    pub fn new(
        request: DriveRequest,
        params: Params,
        reference_deg: f64,
        rotation_target_deg: Option<f64>,
    ) -> Self {
        let profile = rotation_target_deg.map(|target| {
            SpeedProfile::from_target(
                target,
                request.brake_start_frac,
                request.main_speed_dps,
                request.stop_speed_dps,
            )
        });

        Self {
            schedule: GainSchedule::new(params.gain_sched.clone()),
            speed_dps: request.main_speed_dps,
            request,
            params,
            reference_deg,
            rotation_target_deg,
            profile,
            prev_driven_deg: 0.0,
            integral: 0.0,
            prev_error_deg: None,
            complete: false,
        }
    }
}

impl TickController for DriveCtrl {
    type InputData = DriveInput;
    type OutputData = DriveOutput;
    type StatusReport = StatusReport;
    type TickError = DriveCtrlError;

    fn tick(
        &mut self,
        input: &DriveInput,
    ) -> Result<(TickState<DriveOutput>, StatusReport), DriveCtrlError> {
        if self.complete {
            return Err(DriveCtrlError::AlreadyComplete);
        }

        let error_deg = heading_error_deg(self.reference_deg, input.yaw_deg);
        let gains = self.schedule.gains(self.speed_dps);

        let dt_s = self.request.tick_ms as f64 / 1000.0;

        self.integral += error_deg * dt_s;

        let derivative = match self.prev_error_deg {
            Some(prev) => (error_deg - prev) / dt_s,
            None => 0.0,
        };
        self.prev_error_deg = Some(error_deg);

        let raw_steering =
            gains.p * error_deg + gains.i * self.integral + gains.d * derivative;
        let mut steering = clamp(
            raw_steering,
            -self.params.steering_limit,
            self.params.steering_limit,
        );

        // Profile the speed against driven distance. Steering is zeroed in
        // the braking window so the base comes to rest straight.
        let braking = match &self.profile {
            Some(profile) => {
                self.speed_dps =
                    profile.next_speed(self.speed_dps, input.driven_deg, self.prev_driven_deg);
                profile.braking(input.driven_deg)
            }
            None => false,
        };
        if braking {
            steering = 0.0;
        }
        self.prev_driven_deg = input.driven_deg;

        let report = StatusReport {
            time_s: 0.0,
            error_deg,
            steering,
            speed_dps: self.speed_dps,
            driven_deg: input.driven_deg,
            braking,
            gain_p: gains.p,
            gain_i: gains.i,
            gain_d: gains.d,
        };

        // Termination: past the rotation target for finite drives, external
        // stop request for unlimited ones.
        let finished = match self.rotation_target_deg {
            Some(target) => input.driven_deg.abs() >= target.abs(),
            None => input.stop_requested,
        };

        if finished {
            self.complete = true;

            let cmd = if self.request.stop {
                ActuatorCmd::PairStop
            } else {
                ActuatorCmd::Hold
            };
            return Ok((
                TickState::Complete(DriveOutput { cmd, delay_ms: 0 }),
                report,
            ));
        }

        Ok((
            TickState::Continue(DriveOutput {
                cmd: ActuatorCmd::Pair {
                    steering: steering as i32,
                    velocity_dps: self.speed_dps as i32,
                },
                delay_ms: self.request.tick_ms,
            }),
            report,
        ))
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
