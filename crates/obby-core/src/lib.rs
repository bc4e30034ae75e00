pub mod geom;
pub mod input;
pub mod progress;
pub mod time;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use crate::geom::Rect;
    use crate::input::{Action, InputState};

    /// Rect literal shorthand for tests.
    pub fn rect(x: f32, y: f32, w: f32, h: f32) -> Rect {
        Rect { x, y, w, h }
    }

    /// Input with the given actions held down, edges already consumed.
    pub fn held(actions: &[Action]) -> InputState {
        let mut input = InputState::new();
        for &action in actions {
            input.press(action);
        }
        input.end_frame();
        input
    }

    /// Input with the given actions freshly pressed this tick (held + press
    /// edge).
    pub fn pressed(actions: &[Action]) -> InputState {
        let mut input = InputState::new();
        for &action in actions {
            input.press(action);
        }
        input
    }
}
