//! Turn controller state and step function

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use hw_if::hub::DUTY_CYCLE_FULL_SCALE;
use hw_if::{ActuatorCmd, Port};
use util::maths::clamp_mag;
use util::module::{TickController, TickState};

use super::{Params, StatusReport, TurnCtrlError, TurnInput, TurnKind, TurnOutput, TurnPhase, TurnRequest};
use crate::gain_sched::Gains;
use crate::heading::heading_error_deg;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// State of an executing turn.
pub struct TurnCtrl {
    request: TurnRequest,
    params: Params,
    gains: Gains,

    left_port: Port,
    right_port: Port,

    phase: TurnPhase,
    integral: f64,
    prev_error_deg: Option<f64>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TurnCtrl {
    /// Create a controller for one turn request.
    ///
    /// `gains` shall already be evaluated for the request's maximum speed.
    /// The ports identify the drive motors for the pivot geometries.
    pub fn new(
        request: TurnRequest,
        params: Params,
        gains: Gains,
        left_port: Port,
        right_port: Port,
    ) -> Self {
        Self {
            request,
            params,
            gains,
            left_port,
            right_port,
            phase: TurnPhase::Running,
            integral: 0.0,
            prev_error_deg: None,
        }
    }

    /// The actuator demand that rotates the base towards positive yaw at the
    /// given output magnitude, for this turn's geometry.
    fn turn_cmd(&self, output_dps: f64) -> ActuatorCmd {
        match self.request.kind {
            // Full steering spins the pair on the spot
            TurnKind::Tank => ActuatorCmd::Pair {
                steering: 100,
                velocity_dps: output_dps as i32,
            },
            TurnKind::PivotOnLeft => ActuatorCmd::Motor {
                port: self.right_port,
                speed_dps: -output_dps as i32,
            },
            TurnKind::PivotOnRight => ActuatorCmd::Motor {
                port: self.left_port,
                speed_dps: output_dps as i32,
            },
        }
    }
}

impl TickController for TurnCtrl {
    type InputData = TurnInput;
    type OutputData = TurnOutput;
    type StatusReport = StatusReport;
    type TickError = TurnCtrlError;

    fn tick(
        &mut self,
        input: &TurnInput,
    ) -> Result<(TickState<TurnOutput>, StatusReport), TurnCtrlError> {
        if self.phase == TurnPhase::ConfirmedStop {
            return Err(TurnCtrlError::AlreadyComplete);
        }

        let error_deg = heading_error_deg(self.request.target_deg, input.yaw_deg);
        let in_tolerance = error_deg.abs() <= self.params.tolerance_deg;

        // Re-observation after the settle delay: only a still-in-tolerance
        // error confirms the stop, otherwise the base coasted through the
        // target and the turn resumes.
        if self.phase == TurnPhase::Settled {
            if in_tolerance {
                self.phase = TurnPhase::ConfirmedStop;

                let report = StatusReport {
                    time_s: 0.0,
                    error_deg,
                    raw_output_dps: 0.0,
                    output_dps: 0.0,
                    damping: 0.0,
                    phase: self.phase,
                };
                return Ok((
                    TickState::Complete(TurnOutput {
                        cmd: ActuatorCmd::PairStop,
                        delay_ms: 0,
                    }),
                    report,
                ));
            }

            self.phase = TurnPhase::Running;
        }

        let dt_s = self.params.tick_ms as f64 / 1000.0;

        self.integral += error_deg * dt_s;

        let derivative = match self.prev_error_deg {
            Some(prev) => (error_deg - prev) / dt_s,
            None => 0.0,
        };
        self.prev_error_deg = Some(error_deg);

        // The derivative term is damped as the motors approach saturation,
        // where duty-cycle noise would otherwise dominate it.
        let damping = 1.0 - (input.mean_duty / DUTY_CYCLE_FULL_SCALE).powf(self.params.power_exp);

        let raw_output_dps = self.gains.p * error_deg
            + self.gains.i * self.integral
            + self.gains.d * derivative * damping;

        // The minimum-speed floor follows the error sign, not the raw
        // output sign: near the target a derivative-dominated output can
        // point away from it, and flooring that would bounce the base
        // across the tolerance band at minimum speed.
        let output_dps = if raw_output_dps.abs() < self.request.min_speed_dps {
            self.request.min_speed_dps * error_deg.signum()
        } else {
            clamp_mag(
                raw_output_dps,
                self.request.min_speed_dps,
                self.request.max_speed_dps,
            )
        };

        let (state, phase) = if in_tolerance {
            if self.request.smart_stop {
                // Stop, settle, and re-observe on the next tick
                self.phase = TurnPhase::Settled;
                (
                    TickState::Continue(TurnOutput {
                        cmd: ActuatorCmd::PairStop,
                        delay_ms: self.params.settle_ms,
                    }),
                    TurnPhase::Settled,
                )
            } else {
                self.phase = TurnPhase::ConfirmedStop;
                (
                    TickState::Complete(TurnOutput {
                        cmd: ActuatorCmd::PairStop,
                        delay_ms: 0,
                    }),
                    TurnPhase::ConfirmedStop,
                )
            }
        } else {
            (
                TickState::Continue(TurnOutput {
                    cmd: self.turn_cmd(output_dps),
                    delay_ms: self.params.tick_ms,
                }),
                TurnPhase::Running,
            )
        };

        let report = StatusReport {
            time_s: 0.0,
            error_deg,
            raw_output_dps,
            output_dps,
            damping,
            phase,
        };

        Ok((state, report))
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::gain_sched::GainSchedule;

    fn make_ctrl(request: TurnRequest) -> TurnCtrl {
        let params = Params::default();
        let gains = GainSchedule::new(params.gain_sched.clone()).gains(request.max_speed_dps);
        TurnCtrl::new(request, params, gains, Port::E, Port::A)
    }

    fn input(yaw_deg: f64) -> TurnInput {
        TurnInput {
            yaw_deg,
            mean_duty: 0.0,
        }
    }

    #[test]
    fn test_output_clamped_to_speed_bounds() {
        let mut ctrl = make_ctrl(TurnRequest::to_heading(170.0));

        // A 170 deg error at p = 5 is a raw 850, saturating at max speed
        let (state, report) = ctrl.tick(&input(0.0)).unwrap();
        assert_eq!(report.raw_output_dps, 850.0);
        assert_eq!(report.output_dps, 500.0);
        assert_eq!(
            *state.output(),
            TurnOutput {
                cmd: ActuatorCmd::Pair {
                    steering: 100,
                    velocity_dps: 500
                },
                delay_ms: 10,
            }
        );

        // Tiny error is floored at min speed, sign preserved
        let mut fresh = make_ctrl(TurnRequest::to_heading(90.0));
        let (_, report) = fresh.tick(&input(91.0)).unwrap();
        assert_eq!(report.raw_output_dps, -5.0);
        assert_eq!(report.output_dps, -60.0);
    }

    #[test]
    fn test_error_takes_shortest_path() {
        let mut ctrl = make_ctrl(TurnRequest::to_heading(170.0));

        let (_, report) = ctrl.tick(&input(-170.0)).unwrap();
        assert_eq!(report.error_deg, -20.0);
        assert!(report.output_dps < 0.0);
    }

    #[test]
    fn test_smart_stop_needs_two_observations() {
        let mut ctrl = make_ctrl(TurnRequest::to_heading(90.0));

        // First in-tolerance observation stops and settles
        let (state, report) = ctrl.tick(&input(89.8)).unwrap();
        assert!(!state.is_complete());
        assert_eq!(report.phase, TurnPhase::Settled);
        assert_eq!(
            *state.output(),
            TurnOutput {
                cmd: ActuatorCmd::PairStop,
                delay_ms: 90,
            }
        );

        // The base coasted through, so the turn resumes
        let (state, report) = ctrl.tick(&input(92.0)).unwrap();
        assert!(!state.is_complete());
        assert_eq!(report.phase, TurnPhase::Running);

        // Back in tolerance twice in a row confirms the stop
        let (state, _) = ctrl.tick(&input(90.1)).unwrap();
        assert!(!state.is_complete());
        let (state, report) = ctrl.tick(&input(90.1)).unwrap();
        assert!(state.is_complete());
        assert_eq!(report.phase, TurnPhase::ConfirmedStop);
    }

    #[test]
    fn test_sub_floor_output_still_creeps_towards_target() {
        let mut ctrl = make_ctrl(TurnRequest::to_heading(90.0));

        // A step towards the target leaves a derivative pointing away
        // from it on the next tick
        ctrl.tick(&input(89.0)).unwrap();
        let (state, report) = ctrl.tick(&input(89.3)).unwrap();

        // Raw output: p 5 x 0.7 + d 0.4 x (-30) = -8.5. Below the floor
        // the commanded speed follows the error sign, so the base keeps
        // creeping towards the target instead of backing away at minimum
        // speed
        assert!((report.raw_output_dps + 8.5).abs() < 1e-9);
        assert_eq!(report.output_dps, 60.0);
        assert_eq!(
            state.output().cmd,
            ActuatorCmd::Pair {
                steering: 100,
                velocity_dps: 60
            }
        );
    }

    #[test]
    fn test_plain_stop_completes_immediately() {
        let mut ctrl = make_ctrl(TurnRequest {
            smart_stop: false,
            ..TurnRequest::to_heading(90.0)
        });

        let (state, _) = ctrl.tick(&input(89.9)).unwrap();
        assert!(state.is_complete());
        assert_eq!(state.output().cmd, ActuatorCmd::PairStop);
    }

    #[test]
    fn test_tick_after_complete_is_an_error() {
        let mut ctrl = make_ctrl(TurnRequest {
            smart_stop: false,
            ..TurnRequest::to_heading(90.0)
        });

        let (state, _) = ctrl.tick(&input(90.0)).unwrap();
        assert!(state.is_complete());
        assert!(ctrl.tick(&input(90.0)).is_err());
    }

    #[test]
    fn test_pivot_commands_target_single_motors() {
        let mut left_pivot = make_ctrl(TurnRequest {
            kind: TurnKind::PivotOnLeft,
            ..TurnRequest::to_heading(90.0)
        });
        let (state, _) = left_pivot.tick(&input(0.0)).unwrap();
        match state.output().cmd {
            ActuatorCmd::Motor { port, speed_dps } => {
                assert_eq!(port, Port::A);
                assert!(speed_dps < 0);
            }
            cmd => panic!("unexpected command {:?}", cmd),
        }

        let mut right_pivot = make_ctrl(TurnRequest {
            kind: TurnKind::PivotOnRight,
            ..TurnRequest::to_heading(90.0)
        });
        let (state, _) = right_pivot.tick(&input(0.0)).unwrap();
        match state.output().cmd {
            ActuatorCmd::Motor { port, speed_dps } => {
                assert_eq!(port, Port::E);
                assert!(speed_dps > 0);
            }
            cmd => panic!("unexpected command {:?}", cmd),
        }
    }

    #[test]
    fn test_saturated_motors_damp_derivative() {
        let mut ctrl = make_ctrl(TurnRequest::to_heading(90.0));

        let (_, report) = ctrl
            .tick(&TurnInput {
                yaw_deg: 0.0,
                mean_duty: DUTY_CYCLE_FULL_SCALE,
            })
            .unwrap();
        assert!((report.damping - 0.0).abs() < 1e-9);

        let (_, report) = ctrl
            .tick(&TurnInput {
                yaw_deg: 10.0,
                mean_duty: 0.0,
            })
            .unwrap();
        assert!((report.damping - 1.0).abs() < 1e-9);
    }
}
