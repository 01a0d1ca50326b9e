use crate::config::Bounds;
use crate::models::Action;

/// On/off control with a dead band between `lower` and `upper`.
///
/// Turns on below the lower bound, off above the upper bound, and never asks
/// for the state the actuator is already in.
pub fn evaluate(current: f32, lower: f32, upper: f32, actuator_on: bool) -> Action {
    if current < lower && !actuator_on {
        Action::TurnOn
    } else if current > upper && actuator_on {
        Action::TurnOff
    } else {
        Action::NoOp
    }
}

/// Hysteresis controller bound to one validated trigger range.
#[derive(Debug, Clone, Copy)]
pub struct HysteresisController {
    bounds: Bounds,
}

impl HysteresisController {
    /// `Bounds` already guarantees `lower < upper`.
    pub fn new(bounds: Bounds) -> Self {
        HysteresisController { bounds }
    }

    pub fn evaluate(&self, current: f32, actuator_on: bool) -> Action {
        evaluate(current, self.bounds.lower, self.bounds.upper, actuator_on)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn controller() -> HysteresisController {
        HysteresisController::new(Bounds::new("test", 68.0, 72.0).unwrap())
    }

    #[test]
    fn switches_at_the_edges_of_the_band() {
        let c = controller();
        assert_eq!(c.evaluate(65.0, false), Action::TurnOn);
        assert_eq!(c.evaluate(75.0, true), Action::TurnOff);
    }

    #[test]
    fn dead_band_holds_current_state() {
        let c = controller();
        for value in [68.0, 70.0, 72.0] {
            assert_eq!(c.evaluate(value, false), Action::NoOp);
            assert_eq!(c.evaluate(value, true), Action::NoOp);
        }
    }

    #[test]
    fn never_repeats_the_current_state() {
        let c = controller();
        assert_eq!(c.evaluate(60.0, true), Action::NoOp);
        assert_eq!(c.evaluate(80.0, false), Action::NoOp);
    }

    proptest! {
        #[test]
        fn no_redundant_transitions(value in -100.0f32..200.0, on in any::<bool>()) {
            let action = controller().evaluate(value, on);
            prop_assert!(!(on && action == Action::TurnOn));
            prop_assert!(!(!on && action == Action::TurnOff));
        }

        #[test]
        fn applying_the_action_reaches_a_fixed_point(value in -100.0f32..200.0, on in any::<bool>()) {
            let c = controller();
            let state = match c.evaluate(value, on) {
                Action::TurnOn => true,
                Action::TurnOff => false,
                Action::NoOp => on,
            };
            prop_assert_eq!(c.evaluate(value, state), Action::NoOp);
        }
    }
}
