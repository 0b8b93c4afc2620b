//! # Device probing
//!
//! The hub cannot be asked what is plugged into a port, but a read from the
//! wrong device kind fails in a characteristic way. The probe classifies
//! every port by attempting a motor read first and falling back to a colour
//! sensor read, so task code can locate its devices instead of hard-wiring
//! them.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Serialize;
use std::collections::BTreeMap;

// Internal
use hw_if::{Hub, Port, ALL_PORTS};

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// What the probe found on a port.
#[derive(Serialize, Debug, Copy, Clone, PartialEq, Eq)]
pub enum DeviceKind {
    Motor,
    ColorSensor,
    None,
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Classify the device on a single port.
pub fn detect_device<H: Hub>(hub: &mut H, port: Port) -> DeviceKind {
    if hub.motor_relative_position(port).is_ok() {
        return DeviceKind::Motor;
    }
    if hub.color_reflection(port).is_ok() {
        return DeviceKind::ColorSensor;
    }

    DeviceKind::None
}

/// Classify every port on the hub.
pub fn detect_all<H: Hub>(hub: &mut H) -> BTreeMap<Port, DeviceKind> {
    let mut found = BTreeMap::new();

    for &port in ALL_PORTS.iter() {
        found.insert(port, detect_device(hub, port));
    }

    found
}

/// All ports carrying a device of the given kind, in port order.
pub fn detect_kind<H: Hub>(hub: &mut H, kind: DeviceKind) -> Vec<Port> {
    ALL_PORTS
        .iter()
        .copied()
        .filter(|&port| detect_device(hub, port) == kind)
        .collect()
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use hw_if::SimHub;

    #[test]
    fn test_classifies_standard_rig() {
        let mut hub = SimHub::standard_rig();
        let found = detect_all(&mut hub);

        assert_eq!(found[&Port::A], DeviceKind::Motor);
        assert_eq!(found[&Port::B], DeviceKind::None);
        assert_eq!(found[&Port::C], DeviceKind::ColorSensor);
        assert_eq!(found[&Port::D], DeviceKind::Motor);
        assert_eq!(found[&Port::E], DeviceKind::Motor);
        assert_eq!(found[&Port::F], DeviceKind::Motor);
    }

    #[test]
    fn test_detect_kind_preserves_port_order() {
        let mut hub = SimHub::standard_rig();

        assert_eq!(
            detect_kind(&mut hub, DeviceKind::Motor),
            vec![Port::A, Port::D, Port::E, Port::F]
        );
        assert_eq!(detect_kind(&mut hub, DeviceKind::ColorSensor), vec![Port::C]);
    }

    #[test]
    fn test_empty_hub_is_all_none() {
        let mut hub = SimHub::new(Default::default());

        assert!(detect_all(&mut hub)
            .values()
            .all(|&kind| kind == DeviceKind::None));
        assert!(detect_kind(&mut hub, DeviceKind::Motor).is_empty());
    }
}
