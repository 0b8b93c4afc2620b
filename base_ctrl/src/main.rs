//! # Drive base control executable
//!
//! Runs a demonstration task on the simulated hub: probe the rig, execute a
//! few chained motions, search for a line and push to contact. The session
//! directory collects the log and the per-tick controller archives, which
//! feed the offline gain fitting.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::eyre::{Result, WrapErr};
use log::info;

// Internal
use base_lib::drive_base::{BaseConfig, DriveBase};
use base_lib::drive_ctrl::DriveRequest;
use base_lib::gate_ctrl::Threshold;
use base_lib::turn_ctrl::TurnRequest;
use hw_if::{Rgbi, SimHub};
use util::logger::{logger_init, LevelFilter};
use util::session::Session;

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    color_eyre::install()?;

    let session = Session::new("base_exec", "sessions")
        .wrap_err("Failed to create the session, is BASE_SW_ROOT set?")?;
    logger_init(LevelFilter::Debug, &session).wrap_err("Failed to initialise the logger")?;

    info!("Drive Base Control Software");
    info!("Session: {:?}", session.session_root);

    let config = BaseConfig::load().wrap_err("Failed to load the parameter files")?;

    // Simulated rig with a line and an obstacle scripted beyond the 50 cm
    // drive (about 3068 deg of rotation), so only the gated motions that
    // follow it reach them
    let mut hub = SimHub::standard_rig();
    hub.set_line_at(
        3300.0,
        20,
        Rgbi {
            channels: [60, 60, 60, 70],
        },
    );
    hub.set_obstacle_at(3700.0);

    let mut base =
        DriveBase::new(hub, config).wrap_err("Failed to initialise the drive base")?;
    base.attach_session(&session)
        .wrap_err("Failed to open the tick archives")?;

    info!("---- DEVICE PROBE ----");
    for (port, kind) in base.detect_devices() {
        info!("Port {}: {:?}", port, kind);
    }

    info!("---- CHAINED MOTIONS ----");
    base.turn_to_heading(TurnRequest::to_heading(90.0))?;
    base.drive_distance(DriveRequest::over_distance(50.0))?;
    base.turn_to_heading(TurnRequest::to_heading(0.0))?;

    info!("---- LINE SEARCH ----");
    let outcome = base.drive_until_reflection(400, Threshold::AtMost(50), 10_000)?;
    info!("Line search ended: {:?}", outcome);

    info!("---- PUSH TO CONTACT ----");
    let (outcome, covered_cm) = base.drive_until_collision(500, None, 5_000)?;
    info!("Contact push ended: {:?} after {:.1} cm", outcome, covered_cm);

    info!("---- ATTACHMENT ----");
    base.run_attachment_for_degrees(200.0, 90.0)?;
    base.run_attachment_for_degrees(200.0, -90.0)?;

    info!(
        "Run complete, final heading {:.1} deg",
        base.hub().true_yaw_deg()
    );

    Ok(())
}
