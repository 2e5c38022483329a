use eframe::egui::{Pos2, Rect, Vec2};

pub const MIN_SCALE: f32 = 0.1;
pub const MAX_SCALE: f32 = 3.0;
pub const WHEEL_ZOOM_SENSITIVITY: f32 = 0.001;
pub const BUTTON_ZOOM_STEP: f32 = 0.2;

/// Pan and zoom of the graph canvas.
///
/// Screen position of a simulation point is
/// `container.center() + offset + point * scale`; the offset is in screen
/// pixels and does not depend on the zoom level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    offset: Vec2,
    scale: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            scale: 1.0,
        }
    }
}

impl Viewport {
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn zoom_by(&mut self, delta_scale: f32) {
        if !delta_scale.is_finite() {
            return;
        }
        self.scale = (self.scale + delta_scale).clamp(MIN_SCALE, MAX_SCALE);
    }

    /// Wheel scrolling zooms rather than pans. Positive `wheel_delta_y`
    /// (scrolling down) zooms out.
    pub fn zoom_at_wheel(&mut self, wheel_delta_y: f32) {
        self.zoom_by(-wheel_delta_y * WHEEL_ZOOM_SENSITIVITY);
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        if delta.x.is_finite() && delta.y.is_finite() {
            self.offset += delta;
        }
    }

    pub fn set_offset(&mut self, offset: Vec2) {
        if offset.x.is_finite() && offset.y.is_finite() {
            self.offset = offset;
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn screen_to_simulation(&self, screen: Pos2, container: Rect) -> Vec2 {
        (screen - container.center() - self.offset) / self.scale
    }

    pub fn simulation_to_screen(&self, point: Vec2, container: Rect) -> Pos2 {
        container.center() + self.offset + point * self.scale
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::{pos2, vec2};
    use proptest::prelude::*;

    use super::*;

    fn container() -> Rect {
        Rect::from_min_size(pos2(40.0, 60.0), vec2(800.0, 600.0))
    }

    #[test]
    fn zoom_out_converges_to_minimum() {
        let mut viewport = Viewport::default();
        for _ in 0..5 {
            viewport.zoom_by(-10.0);
            assert_eq!(viewport.scale(), MIN_SCALE);
        }
        viewport.zoom_by(100.0);
        assert_eq!(viewport.scale(), MAX_SCALE);
    }

    #[test]
    fn wheel_down_zooms_out() {
        let mut viewport = Viewport::default();
        viewport.zoom_at_wheel(100.0);
        assert!((viewport.scale() - 0.9).abs() < 1e-6);
        viewport.zoom_at_wheel(-200.0);
        assert!((viewport.scale() - 1.1).abs() < 1e-6);
        viewport.zoom_at_wheel(f32::NAN);
        assert!((viewport.scale() - 1.1).abs() < 1e-6);
    }

    #[test]
    fn pan_is_independent_of_scale() {
        let mut viewport = Viewport::default();
        viewport.zoom_by(1.0);
        viewport.pan_by(vec2(15.0, -5.0));
        viewport.pan_by(vec2(5.0, 5.0));
        assert_eq!(viewport.offset(), vec2(20.0, 0.0));
    }

    #[test]
    fn reset_restores_defaults() {
        let mut viewport = Viewport::default();
        viewport.pan_by(vec2(30.0, 30.0));
        viewport.zoom_by(0.6);
        viewport.reset();
        assert_eq!(viewport, Viewport::default());
    }

    #[test]
    fn container_center_maps_to_pan_origin() {
        let mut viewport = Viewport::default();
        viewport.pan_by(vec2(100.0, 0.0));
        viewport.zoom_by(1.0);

        let center = container().center();
        assert_eq!(
            viewport.screen_to_simulation(center + vec2(100.0, 0.0), container()),
            Vec2::ZERO
        );
        assert_eq!(
            viewport.screen_to_simulation(center + vec2(300.0, 40.0), container()),
            vec2(100.0, 20.0)
        );
    }

    proptest! {
        #[test]
        fn screen_mapping_round_trips(
            px in -2_000.0f32..2_000.0,
            py in -2_000.0f32..2_000.0,
            pan_x in -1_000.0f32..1_000.0,
            pan_y in -1_000.0f32..1_000.0,
            zoom in -1.0f32..2.0,
        ) {
            let mut viewport = Viewport::default();
            viewport.pan_by(vec2(pan_x, pan_y));
            viewport.zoom_by(zoom);

            let screen = pos2(px, py);
            let point = viewport.screen_to_simulation(screen, container());
            let back = viewport.simulation_to_screen(point, container());

            prop_assert!((back.x - px).abs() < 1e-2);
            prop_assert!((back.y - py).abs() < 1e-2);
        }
    }
}
