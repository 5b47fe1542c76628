use glam::Vec3;
use winit::keyboard::KeyCode;

use crate::scene::LightAxis;

/// Keyboard stand-ins for the three light sliders.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ControlCommand {
    SelectAxis(LightAxis),
    /// Moves the selected coordinate by `direction * step`.
    Step(f32),
    Reset,
}

/// `X`/`Y`/`Z` select an axis, `Up`/`Down` step it, `R` resets.
pub fn command_for_key(key: KeyCode) -> Option<ControlCommand> {
    match key {
        KeyCode::KeyX => Some(ControlCommand::SelectAxis(LightAxis::X)),
        KeyCode::KeyY => Some(ControlCommand::SelectAxis(LightAxis::Y)),
        KeyCode::KeyZ => Some(ControlCommand::SelectAxis(LightAxis::Z)),
        KeyCode::ArrowUp => Some(ControlCommand::Step(1.0)),
        KeyCode::ArrowDown => Some(ControlCommand::Step(-1.0)),
        KeyCode::KeyR => Some(ControlCommand::Reset),
        _ => None,
    }
}

/// Host-side slider positions.
#[derive(Debug, Clone)]
pub struct LightControls {
    initial: Vec3,
    value: Vec3,
    axis: LightAxis,
    step: f32,
    range: f32,
}

impl LightControls {
    pub fn new(initial: Vec3, step: f32, range: f32) -> Self {
        let range = range.abs();
        let initial = initial.clamp(Vec3::splat(-range), Vec3::splat(range));
        Self {
            initial,
            value: initial,
            axis: LightAxis::X,
            step,
            range,
        }
    }

    pub fn axis(&self) -> LightAxis {
        self.axis
    }

    pub fn value(&self) -> Vec3 {
        self.value
    }

    /// Applies `command` and returns the slider notifications it produces,
    /// one per changed coordinate.
    pub fn apply(&mut self, command: ControlCommand) -> Vec<(LightAxis, f32)> {
        match command {
            ControlCommand::SelectAxis(axis) => {
                self.axis = axis;
                Vec::new()
            }
            ControlCommand::Step(direction) => {
                let i = self.axis.index();
                let next = (self.value[i] + direction * self.step).clamp(-self.range, self.range);
                if next == self.value[i] {
                    return Vec::new();
                }
                self.value[i] = next;
                vec![(self.axis, next)]
            }
            ControlCommand::Reset => {
                let changed = LightAxis::ALL
                    .into_iter()
                    .filter(|axis| self.value[axis.index()] != self.initial[axis.index()])
                    .map(|axis| (axis, self.initial[axis.index()]))
                    .collect();
                self.value = self.initial;
                changed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controls() -> LightControls {
        LightControls::new(Vec3::ZERO, 0.5, 2.0)
    }

    #[test]
    fn keys_map_to_commands() {
        assert_eq!(
            command_for_key(KeyCode::KeyZ),
            Some(ControlCommand::SelectAxis(LightAxis::Z))
        );
        assert_eq!(command_for_key(KeyCode::ArrowDown), Some(ControlCommand::Step(-1.0)));
        assert_eq!(command_for_key(KeyCode::KeyQ), None);
    }

    #[test]
    fn step_notifies_only_the_selected_axis() {
        let mut c = controls();
        c.apply(ControlCommand::SelectAxis(LightAxis::Y));
        assert_eq!(c.apply(ControlCommand::Step(1.0)), vec![(LightAxis::Y, 0.5)]);
        assert_eq!(c.value(), Vec3::new(0.0, 0.5, 0.0));
    }

    #[test]
    fn steps_clamp_to_the_range() {
        let mut c = controls();
        for _ in 0..10 {
            c.apply(ControlCommand::Step(1.0));
        }
        assert_eq!(c.value().x, 2.0);
        assert!(c.apply(ControlCommand::Step(1.0)).is_empty());
    }

    #[test]
    fn reset_notifies_each_changed_axis() {
        let mut c = controls();
        c.apply(ControlCommand::Step(-1.0));
        c.apply(ControlCommand::SelectAxis(LightAxis::Z));
        c.apply(ControlCommand::Step(1.0));

        assert_eq!(
            c.apply(ControlCommand::Reset),
            vec![(LightAxis::X, 0.0), (LightAxis::Z, 0.0)]
        );
        assert_eq!(c.value(), Vec3::ZERO);
    }
}
