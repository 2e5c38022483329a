use eframe::egui::Context;

use super::super::{ActiveView, ViewModel};

impl ViewModel {
    pub(in crate::app) fn update_fps_counter(&mut self, ctx: &Context) {
        const FPS_SAMPLE_WINDOW: usize = 180;

        let dt = ctx.input(|input| input.stable_dt);
        if dt <= f32::EPSILON {
            return;
        }

        self.fps_current = (1.0 / dt).clamp(0.0, 1000.0);
        self.fps_samples.push_back(self.fps_current);
        while self.fps_samples.len() > FPS_SAMPLE_WINDOW {
            self.fps_samples.pop_front();
        }
    }

    pub(in crate::app) fn fps_display_text(&self) -> Option<String> {
        if !self.show_fps_bar || self.fps_current <= f32::EPSILON {
            return None;
        }

        let mut text = format!("FPS {:.0}", self.fps_current);
        if !self.fps_samples.is_empty() {
            let average = self.fps_samples.iter().sum::<f32>() / self.fps_samples.len() as f32;
            text.push_str(&format!(" | avg {average:.1}"));
        }
        text.push_str(&format!(" | {:.1} ms", 1000.0 / self.fps_current));
        Some(text)
    }

    /// Total kinetic energy of the layout, a rough "still settling" gauge.
    pub(in crate::app) fn motion_text(&self) -> Option<String> {
        match &self.view {
            ActiveView::Graph(session) if !session.simulation().is_empty() => Some(format!(
                "motion {:.2} | tick {}",
                session.simulation().kinetic_energy(),
                session.simulation().ticks()
            )),
            _ => None,
        }
    }
}
