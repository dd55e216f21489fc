//! Pointer, wheel and key handling for the model transform

use crate::transform::Transform;

/// Radians of rotation per pixel of pointer travel
pub const DRAG_SENSITIVITY: f32 = 0.005;
/// Radians per second of idle spin about Y
pub const IDLE_SPIN_SPEED: f32 = 0.5;
pub const ZOOM_IN_FACTOR: f32 = 1.1;
pub const ZOOM_OUT_FACTOR: f32 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    /// Tap / left button: launches confetti
    Primary,
    /// Right button: drag to rotate
    Secondary,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    ZoomIn,
    ZoomOut,
    Reset,
    Other,
}

/// Platform-independent input, already mapped to surface pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Quit,
    KeyDown(Key),
    PointerDown { button: PointerButton, x: f32, y: f32 },
    PointerUp { button: PointerButton, x: f32, y: f32 },
    PointerMove { x: f32, y: f32 },
    Wheel { delta_y: f32 },
    TouchUp { x: f32, y: f32 },
    TouchMove { x: f32, y: f32 },
}

/// What the caller has to do after an event was applied
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    None,
    SpawnConfetti { x: f32, y: f32 },
    Quit,
}

/// Drag tracking; idle spin runs whenever no drag is in progress
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Interaction {
    /// Last sampled pointer position while the secondary button is held
    pointer_drag: Option<(f32, f32)>,
    /// Last sampled touch position during a touch gesture
    touch_drag: Option<(f32, f32)>,
}

impl Interaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.pointer_drag.is_some() || self.touch_drag.is_some()
    }

    /// Per-frame spin, suppressed for the whole duration of a drag
    pub fn idle_rotate(&self, transform: &mut Transform, dt: f32) {
        if !self.is_dragging() {
            transform.rotation_y += IDLE_SPIN_SPEED * dt;
        }
    }

    /// Apply one input event to the transform
    pub fn handle(&mut self, event: &InputEvent, transform: &mut Transform) -> Outcome {
        match *event {
            InputEvent::Quit | InputEvent::KeyDown(Key::Escape) => return Outcome::Quit,
            InputEvent::KeyDown(Key::ZoomIn) => transform.zoom(ZOOM_IN_FACTOR),
            InputEvent::KeyDown(Key::ZoomOut) => transform.zoom(ZOOM_OUT_FACTOR),
            InputEvent::KeyDown(Key::Reset) => transform.reset(),
            InputEvent::KeyDown(Key::Other) => {}
            InputEvent::PointerDown { button: PointerButton::Secondary, x, y } => {
                self.pointer_drag = Some((x, y));
            }
            InputEvent::PointerDown { button: PointerButton::Primary, x, y } => {
                return Outcome::SpawnConfetti { x, y };
            }
            InputEvent::PointerDown { .. } => {}
            InputEvent::PointerUp { button: PointerButton::Secondary, .. } => {
                self.pointer_drag = None;
            }
            InputEvent::PointerUp { .. } => {}
            InputEvent::PointerMove { x, y } => {
                if let Some(anchor) = self.pointer_drag.as_mut() {
                    drag(anchor, x, y, transform);
                }
            }
            InputEvent::Wheel { delta_y } => {
                if delta_y > 0.0 {
                    transform.zoom(ZOOM_IN_FACTOR);
                } else if delta_y < 0.0 {
                    transform.zoom(ZOOM_OUT_FACTOR);
                }
            }
            InputEvent::TouchMove { x, y } => match self.touch_drag.as_mut() {
                Some(anchor) => drag(anchor, x, y, transform),
                None => self.touch_drag = Some((x, y)),
            },
            InputEvent::TouchUp { x, y } => {
                // A touch that never moved is a tap
                if self.touch_drag.take().is_none() {
                    return Outcome::SpawnConfetti { x, y };
                }
            }
        }
        Outcome::None
    }
}

/// Rotate by the travel since the last sample and move the anchor
fn drag(anchor: &mut (f32, f32), x: f32, y: f32, transform: &mut Transform) {
    let dx = x - anchor.0;
    let dy = y - anchor.1;
    if dx != 0.0 || dy != 0.0 {
        // Vertical travel tilts about X, horizontal travel turns about Y
        transform.rotate(dy * DRAG_SENSITIVITY, dx * DRAG_SENSITIVITY);
        *anchor = (x, y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn press(button: PointerButton, x: f32, y: f32) -> InputEvent {
        InputEvent::PointerDown { button, x, y }
    }

    fn release(button: PointerButton) -> InputEvent {
        InputEvent::PointerUp { button, x: 0.0, y: 0.0 }
    }

    #[test]
    fn test_drag_rotates_by_incremental_delta() {
        let mut ui = Interaction::new();
        let mut t = Transform::new();

        ui.handle(&press(PointerButton::Secondary, 100.0, 100.0), &mut t);
        assert!(ui.is_dragging());
        ui.handle(&InputEvent::PointerMove { x: 110.0, y: 100.0 }, &mut t);
        ui.handle(&InputEvent::PointerMove { x: 110.0, y: 120.0 }, &mut t);

        assert!((t.rotation_y - 10.0 * DRAG_SENSITIVITY).abs() < 1e-6);
        assert!((t.rotation_x - 20.0 * DRAG_SENSITIVITY).abs() < 1e-6);

        ui.handle(&release(PointerButton::Secondary), &mut t);
        assert!(!ui.is_dragging());
    }

    #[test]
    fn test_move_without_drag_does_nothing() {
        let mut ui = Interaction::new();
        let mut t = Transform::new();
        ui.handle(&InputEvent::PointerMove { x: 50.0, y: 80.0 }, &mut t);
        assert_eq!(t, Transform::new());
    }

    #[test]
    fn test_idle_spin_suppressed_while_dragging() {
        let mut ui = Interaction::new();
        let mut t = Transform::new();

        ui.idle_rotate(&mut t, 1.0);
        assert_eq!(t.rotation_y, IDLE_SPIN_SPEED);

        ui.handle(&press(PointerButton::Secondary, 0.0, 0.0), &mut t);
        ui.idle_rotate(&mut t, 1.0);
        assert_eq!(t.rotation_y, IDLE_SPIN_SPEED);

        ui.handle(&release(PointerButton::Secondary), &mut t);
        ui.idle_rotate(&mut t, 1.0);
        assert_eq!(t.rotation_y, 2.0 * IDLE_SPIN_SPEED);
    }

    #[test]
    fn test_zoom_wheel_and_keys() {
        let mut ui = Interaction::new();
        let mut t = Transform::new();
        ui.handle(&InputEvent::Wheel { delta_y: 1.0 }, &mut t);
        ui.handle(&InputEvent::KeyDown(Key::ZoomIn), &mut t);
        assert!((t.scale - 1.21).abs() < 1e-6);

        ui.handle(&InputEvent::Wheel { delta_y: -3.0 }, &mut t);
        ui.handle(&InputEvent::KeyDown(Key::ZoomOut), &mut t);
        assert!((t.scale - 1.21 * 0.81).abs() < 1e-6);

        ui.handle(&InputEvent::Wheel { delta_y: 0.0 }, &mut t);
        assert!((t.scale - 1.21 * 0.81).abs() < 1e-6);
    }

    #[test]
    fn test_reset_is_idempotent_and_fresh_drag_matches() {
        let mut ui = Interaction::new();
        let mut t = Transform::new();
        ui.handle(&press(PointerButton::Secondary, 0.0, 0.0), &mut t);
        ui.handle(&InputEvent::PointerMove { x: 30.0, y: -12.0 }, &mut t);
        ui.handle(&release(PointerButton::Secondary), &mut t);
        ui.handle(&InputEvent::KeyDown(Key::ZoomIn), &mut t);

        ui.handle(&InputEvent::KeyDown(Key::Reset), &mut t);
        let once = t;
        ui.handle(&InputEvent::KeyDown(Key::Reset), &mut t);
        assert_eq!(t, once);
        assert_eq!(t, Transform::new());

        let gesture = [
            press(PointerButton::Secondary, 5.0, 5.0),
            InputEvent::PointerMove { x: 9.0, y: 1.0 },
            release(PointerButton::Secondary),
        ];
        let mut fresh_ui = Interaction::new();
        let mut fresh = Transform::new();
        for event in &gesture {
            ui.handle(event, &mut t);
            fresh_ui.handle(event, &mut fresh);
        }
        assert_eq!(t, fresh);
    }

    #[test]
    fn test_primary_press_spawns_without_touching_transform() {
        let mut ui = Interaction::new();
        let mut t = Transform::new();
        let outcome = ui.handle(&press(PointerButton::Primary, 12.0, 34.0), &mut t);
        assert_eq!(outcome, Outcome::SpawnConfetti { x: 12.0, y: 34.0 });
        assert_eq!(t, Transform::new());
        assert!(!ui.is_dragging());
    }

    #[test]
    fn test_quit_events() {
        let mut ui = Interaction::new();
        let mut t = Transform::new();
        assert_eq!(ui.handle(&InputEvent::Quit, &mut t), Outcome::Quit);
        assert_eq!(ui.handle(&InputEvent::KeyDown(Key::Escape), &mut t), Outcome::Quit);
        assert_eq!(ui.handle(&InputEvent::KeyDown(Key::Other), &mut t), Outcome::None);
    }

    #[test]
    fn test_touch_tap_spawns_and_touch_drag_rotates() {
        let mut ui = Interaction::new();
        let mut t = Transform::new();

        let tap = ui.handle(&InputEvent::TouchUp { x: 3.0, y: 4.0 }, &mut t);
        assert_eq!(tap, Outcome::SpawnConfetti { x: 3.0, y: 4.0 });

        ui.handle(&InputEvent::TouchMove { x: 10.0, y: 10.0 }, &mut t);
        assert!(ui.is_dragging());
        assert_eq!(t, Transform::new());
        ui.handle(&InputEvent::TouchMove { x: 20.0, y: 10.0 }, &mut t);
        assert!((t.rotation_y - 10.0 * DRAG_SENSITIVITY).abs() < 1e-6);

        let end = ui.handle(&InputEvent::TouchUp { x: 20.0, y: 10.0 }, &mut t);
        assert_eq!(end, Outcome::None);
        assert!(!ui.is_dragging());
    }
}
