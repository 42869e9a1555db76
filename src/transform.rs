// ============================================================================
// VIEW TRANSFORM — keyboard-driven pan / rotate / shear / scale state
// ============================================================================
//
// Rotation, shear and scale compose relatively: every press left-multiplies a
// fixed step matrix onto what is already there.  Pan is absolute: it moves two
// accumulators and rebuilds the translation from them, so pressing right then
// left lands exactly where it started.  How the translation combines with the
// rest is selected by `PanMode`.

use crate::matrix::{self, Mat4};

/// Radians per rotate press (about 3.6 degrees).
pub const ROTATE_STEP: f32 = 0.0628;
/// Clip-space units per pan press.
pub const PAN_STEP: f32 = 0.01;
/// Shear coefficient set by a shear press.
pub const SHEAR_STEP: f32 = 0.25;
pub const SCALE_UP: f32 = 1.25;
pub const SCALE_DOWN: f32 = 0.75;

/// A discrete, named user action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ViewAction {
    RotateCw,
    RotateCcw,
    PanUp,
    PanDown,
    PanLeft,
    PanRight,
    ShearPositiveX,
    ShearNegativeX,
    ShearPositiveY,
    ShearNegativeY,
    ScaleUp,
    ScaleDown,
    Quit,
}

impl ViewAction {
    pub fn all() -> &'static [ViewAction] {
        &[
            ViewAction::RotateCw,
            ViewAction::RotateCcw,
            ViewAction::PanUp,
            ViewAction::PanDown,
            ViewAction::PanLeft,
            ViewAction::PanRight,
            ViewAction::ShearPositiveX,
            ViewAction::ShearNegativeX,
            ViewAction::ShearPositiveY,
            ViewAction::ShearNegativeY,
            ViewAction::ScaleUp,
            ViewAction::ScaleDown,
            ViewAction::Quit,
        ]
    }
}

/// What the host should do after an action has been applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionOutcome {
    Continue,
    Quit,
}

/// How a pan interacts with rotation, shear and scale.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PanMode {
    /// `view = T(pan) × linear`.  Pan never disturbs the other transforms.
    #[default]
    Layered,
    /// A pan resets the view to a pure translation, dropping any rotation,
    /// shear or scale applied before it.  Later steps compose onto that view.
    Replace,
}

/// The view matrix read by the renderer every frame, plus the state needed
/// to rebuild it.
///
/// Applying an action is a read-modify-write of several fields; hosts that
/// share one instance across threads must put it behind a `Mutex`.
#[derive(Clone, Debug, PartialEq)]
pub struct TransformState {
    /// Accumulated rotation / shear / scale (`Layered` mode only).
    linear: Mat4,
    view: Mat4,
    pan_x: f32,
    pan_y: f32,
    /// Coefficient of the most recent shear press on each axis.
    shear_x: f32,
    shear_y: f32,
    pan_mode: PanMode,
}

impl Default for TransformState {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformState {
    pub fn new() -> Self {
        Self::with_pan_mode(PanMode::default())
    }

    pub fn with_pan_mode(pan_mode: PanMode) -> Self {
        Self {
            linear: matrix::identity(),
            view: matrix::identity(),
            pan_x: 0.0,
            pan_y: 0.0,
            shear_x: 0.0,
            shear_y: 0.0,
            pan_mode,
        }
    }

    pub fn view(&self) -> &Mat4 {
        &self.view
    }

    pub fn pan_offset(&self) -> (f32, f32) {
        (self.pan_x, self.pan_y)
    }

    pub fn shear(&self) -> (f32, f32) {
        (self.shear_x, self.shear_y)
    }

    pub fn pan_mode(&self) -> PanMode {
        self.pan_mode
    }

    /// Back to the identity view, keeping the pan mode.
    pub fn reset(&mut self) {
        *self = Self::with_pan_mode(self.pan_mode);
    }

    /// Projection for the current window aspect ratio times the view.
    pub fn mvp(&self, aspect: f32) -> Mat4 {
        matrix::mul(&ortho_for_aspect(aspect), &self.view)
    }

    pub fn apply_action(&mut self, action: ViewAction) -> ActionOutcome {
        let step = match action {
            ViewAction::RotateCw => matrix::rotation_z(-ROTATE_STEP),
            ViewAction::RotateCcw => matrix::rotation_z(ROTATE_STEP),
            ViewAction::PanUp => return self.pan(0.0, PAN_STEP),
            ViewAction::PanDown => return self.pan(0.0, -PAN_STEP),
            ViewAction::PanLeft => return self.pan(-PAN_STEP, 0.0),
            ViewAction::PanRight => return self.pan(PAN_STEP, 0.0),
            ViewAction::ShearPositiveX => {
                self.shear_x = SHEAR_STEP;
                matrix::shear_x(self.shear_x)
            }
            ViewAction::ShearNegativeX => {
                self.shear_x = -SHEAR_STEP;
                matrix::shear_x(self.shear_x)
            }
            ViewAction::ShearPositiveY => {
                self.shear_y = SHEAR_STEP;
                matrix::shear_y(self.shear_y)
            }
            ViewAction::ShearNegativeY => {
                self.shear_y = -SHEAR_STEP;
                matrix::shear_y(self.shear_y)
            }
            ViewAction::ScaleUp => matrix::uniform_scale(SCALE_UP),
            ViewAction::ScaleDown => matrix::uniform_scale(SCALE_DOWN),
            ViewAction::Quit => return ActionOutcome::Quit,
        };
        self.compose(&step);
        ActionOutcome::Continue
    }

    fn compose(&mut self, step: &Mat4) {
        match self.pan_mode {
            PanMode::Layered => {
                self.linear = matrix::mul(step, &self.linear);
                self.rebuild_view();
            }
            PanMode::Replace => self.view = matrix::mul(step, &self.view),
        }
    }

    fn pan(&mut self, dx: f32, dy: f32) -> ActionOutcome {
        self.pan_x += dx;
        self.pan_y += dy;
        match self.pan_mode {
            PanMode::Layered => self.rebuild_view(),
            PanMode::Replace => self.view = matrix::translation(self.pan_x, self.pan_y, 0.0),
        }
        ActionOutcome::Continue
    }

    fn rebuild_view(&mut self) {
        let t = matrix::translation(self.pan_x, self.pan_y, 0.0);
        self.view = matrix::mul(&t, &self.linear);
    }
}

/// Orthographic projection keeping the unit quad square in a window of the
/// given width / height ratio.  Recomputed every frame by the renderer.
pub fn ortho_for_aspect(aspect: f32) -> Mat4 {
    let ratio = if aspect.is_finite() && aspect > 0.0 { aspect } else { 1.0 };
    matrix::ortho(-ratio, ratio, -1.0, 1.0, 1.0, -1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::{IDENTITY, approx_eq, transform_point};

    const EPS: f32 = 1e-5;

    fn apply_all(state: &mut TransformState, actions: &[ViewAction]) {
        for &action in actions {
            assert_eq!(state.apply_action(action), ActionOutcome::Continue);
        }
    }

    #[test]
    fn starts_at_identity() {
        assert_eq!(TransformState::new().view(), &IDENTITY);
        assert_eq!(TransformState::with_pan_mode(PanMode::Replace).view(), &IDENTITY);
    }

    #[test]
    fn rotation_round_trip_returns_to_identity() {
        let mut state = TransformState::new();
        apply_all(&mut state, &[ViewAction::RotateCw; 4]);
        assert!(!approx_eq(state.view(), &IDENTITY, EPS));
        apply_all(&mut state, &[ViewAction::RotateCcw; 4]);
        assert!(approx_eq(state.view(), &IDENTITY, EPS));
    }

    #[test]
    fn rotate_cw_turns_clockwise() {
        let mut state = TransformState::new();
        state.apply_action(ViewAction::RotateCw);
        let [x, y] = transform_point(state.view(), 1.0, 0.0);
        assert!(x > 0.99);
        assert!(y < 0.0);
        assert!((y + ROTATE_STEP.sin()).abs() < EPS);
    }

    #[test]
    fn scale_compounds_multiplicatively() {
        let mut state = TransformState::new();
        apply_all(&mut state, &[ViewAction::ScaleUp, ViewAction::ScaleDown]);
        assert!(!approx_eq(state.view(), &IDENTITY, EPS));
        let expected = SCALE_UP * SCALE_DOWN;
        for axis in 0..3 {
            assert!((state.view()[axis][axis] - expected).abs() < EPS);
        }
        assert_eq!(state.view()[3][3], 1.0);

        apply_all(&mut state, &[ViewAction::ScaleUp; 2]);
        assert!((state.view()[0][0] - expected * SCALE_UP * SCALE_UP).abs() < EPS);
    }

    #[test]
    fn pan_is_absolute_from_accumulators() {
        for mode in [PanMode::Layered, PanMode::Replace] {
            let mut state = TransformState::with_pan_mode(mode);
            apply_all(&mut state, &[ViewAction::PanRight, ViewAction::PanRight]);
            let (x, _) = state.pan_offset();
            assert!((x - 2.0 * PAN_STEP).abs() < EPS);
            assert!((state.view()[3][0] - 2.0 * PAN_STEP).abs() < EPS);

            apply_all(&mut state, &[ViewAction::PanLeft, ViewAction::PanLeft]);
            let (x, y) = state.pan_offset();
            assert!(x.abs() < EPS && y.abs() < EPS, "{mode:?}");
            assert!(approx_eq(state.view(), &IDENTITY, EPS), "{mode:?}");
        }
    }

    #[test]
    fn pan_directions() {
        let mut state = TransformState::new();
        apply_all(&mut state, &[ViewAction::PanUp, ViewAction::PanUp, ViewAction::PanDown, ViewAction::PanLeft]);
        let (x, y) = state.pan_offset();
        assert!((x + PAN_STEP).abs() < EPS);
        assert!((y - PAN_STEP).abs() < EPS);
    }

    #[test]
    fn layered_pan_keeps_rotation() {
        let mut state = TransformState::new();
        apply_all(&mut state, &[ViewAction::RotateCcw, ViewAction::PanRight]);
        let expected = matrix::mul(
            &matrix::translation(PAN_STEP, 0.0, 0.0),
            &matrix::rotation_z(ROTATE_STEP),
        );
        assert!(approx_eq(state.view(), &expected, EPS));

        // Later steps still rotate about the quad centre, not the panned origin.
        state.apply_action(ViewAction::RotateCw);
        assert!(approx_eq(state.view(), &matrix::translation(PAN_STEP, 0.0, 0.0), EPS));
    }

    #[test]
    fn replace_pan_discards_rotation() {
        let mut state = TransformState::with_pan_mode(PanMode::Replace);
        apply_all(&mut state, &[ViewAction::RotateCcw, ViewAction::ScaleUp, ViewAction::PanUp]);
        assert!(approx_eq(state.view(), &matrix::translation(0.0, PAN_STEP, 0.0), EPS));

        // Steps after the pan compose onto the translated view.
        state.apply_action(ViewAction::ScaleUp);
        let expected = matrix::mul(
            &matrix::uniform_scale(SCALE_UP),
            &matrix::translation(0.0, PAN_STEP, 0.0),
        );
        assert!(approx_eq(state.view(), &expected, EPS));
    }

    #[test]
    fn shear_sets_absolute_coefficient_and_compounds_view() {
        let mut state = TransformState::new();
        apply_all(&mut state, &[ViewAction::ShearPositiveX, ViewAction::ShearPositiveX]);
        assert_eq!(state.shear(), (SHEAR_STEP, 0.0));
        // Two presses of the same 0.25 shear stack to 0.5 in the view.
        assert!((state.view()[1][0] - 2.0 * SHEAR_STEP).abs() < EPS);

        state.apply_action(ViewAction::ShearNegativeX);
        assert_eq!(state.shear(), (-SHEAR_STEP, 0.0));
        assert!((state.view()[1][0] - SHEAR_STEP).abs() < EPS);

        apply_all(&mut state, &[ViewAction::ShearNegativeY]);
        assert_eq!(state.shear(), (-SHEAR_STEP, -SHEAR_STEP));
    }

    #[test]
    fn shear_y_moves_y_by_x() {
        let mut state = TransformState::new();
        state.apply_action(ViewAction::ShearPositiveY);
        let [x, y] = transform_point(state.view(), 1.0, 0.0);
        assert!((x - 1.0).abs() < EPS);
        assert!((y - SHEAR_STEP).abs() < EPS);
    }

    #[test]
    fn actions_left_multiply() {
        let mut state = TransformState::new();
        apply_all(&mut state, &[ViewAction::ShearPositiveX, ViewAction::RotateCcw]);
        let expected = matrix::mul(&matrix::rotation_z(ROTATE_STEP), &matrix::shear_x(SHEAR_STEP));
        assert!(approx_eq(state.view(), &expected, EPS));
    }

    #[test]
    fn quit_leaves_view_untouched() {
        let mut state = TransformState::new();
        state.apply_action(ViewAction::ScaleUp);
        let before = state.clone();
        assert_eq!(state.apply_action(ViewAction::Quit), ActionOutcome::Quit);
        assert_eq!(state, before);
    }

    #[test]
    fn every_action_is_total() {
        for mode in [PanMode::Layered, PanMode::Replace] {
            let mut state = TransformState::with_pan_mode(mode);
            for _ in 0..50 {
                for &action in ViewAction::all() {
                    state.apply_action(action);
                }
            }
            assert!(state.view().iter().flatten().all(|v| v.is_finite()));
        }
    }

    #[test]
    fn reset_restores_identity_and_keeps_mode() {
        let mut state = TransformState::with_pan_mode(PanMode::Replace);
        apply_all(&mut state, &[ViewAction::ScaleUp, ViewAction::PanRight, ViewAction::ShearPositiveY]);
        state.reset();
        assert_eq!(state, TransformState::with_pan_mode(PanMode::Replace));
    }

    #[test]
    fn ortho_for_aspect_keeps_quad_square() {
        let p = ortho_for_aspect(2.0);
        let [x, y] = transform_point(&p, 1.0, 1.0);
        assert!((x - 0.5).abs() < EPS);
        assert!((y - 1.0).abs() < EPS);

        assert_eq!(ortho_for_aspect(0.0), ortho_for_aspect(1.0));
        assert_eq!(ortho_for_aspect(f32::NAN), ortho_for_aspect(1.0));
    }

    #[test]
    fn mvp_is_projection_times_view() {
        let mut state = TransformState::new();
        apply_all(&mut state, &[ViewAction::PanRight, ViewAction::ScaleUp]);
        let expected = matrix::mul(&ortho_for_aspect(4.0 / 3.0), state.view());
        assert!(approx_eq(&state.mvp(4.0 / 3.0), &expected, EPS));
    }
}
