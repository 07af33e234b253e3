use crate::{
    badge::config::{BADGE_MAX_SCALE, BADGE_MIN_SCALE, Customization, MIN_FONT_SIZE},
    foundation::core::{Canvas, Point, Size, Vec2},
    history::WorkingState,
};

#[derive(Clone, Copy, Debug)]
struct Drag {
    last: Point,
    to_canvas: Vec2,
}

/// Customization panel state: sliders update live and commit on release, discrete controls
/// commit at once, and canvas drags pan the image.
#[derive(Clone, Debug)]
pub struct BadgeEditor {
    state: WorkingState<Customization>,
    drag: Option<Drag>,
}

impl Default for BadgeEditor {
    fn default() -> Self {
        Self::new(Customization::default())
    }
}

impl BadgeEditor {
    pub fn new(initial: Customization) -> Self {
        Self {
            state: WorkingState::new(initial),
            drag: None,
        }
    }

    /// Values to render now.
    pub fn customization(&self) -> &Customization {
        self.state.get()
    }

    pub fn committed(&self) -> &Customization {
        self.state.committed()
    }

    pub fn set_scale(&mut self, scale: f64) {
        if scale.is_finite() {
            self.state
                .update(|c| c.scale = scale.clamp(BADGE_MIN_SCALE, BADGE_MAX_SCALE));
        }
    }

    pub fn set_offset(&mut self, offset: Vec2) {
        self.state.update(|c| c.offset = offset);
    }

    pub fn set_frame_thickness(&mut self, thickness: f64) {
        self.state.update(|c| c.badge.frame_thickness = thickness);
    }

    pub fn set_frame_start(&mut self, percent: f64) {
        self.state.update(|c| c.badge.frame_start_position = percent);
    }

    pub fn set_frame_end(&mut self, percent: f64) {
        self.state.update(|c| c.badge.frame_end_position = percent);
    }

    pub fn set_text_placement(&mut self, placement: f64) {
        self.state.update(|c| c.badge.text_placement = placement);
    }

    /// End of a slider drag.
    pub fn commit(&mut self) -> bool {
        self.state.commit()
    }

    pub fn set_show_badge(&mut self, show: bool) -> bool {
        self.instant(|c| c.show_badge = show)
    }

    pub fn set_badge_color(&mut self, color: &str) -> bool {
        self.instant(|c| c.badge.badge_color = color.to_string())
    }

    pub fn set_text_color(&mut self, color: &str) -> bool {
        self.instant(|c| c.badge.badge_text_color = color.to_string())
    }

    pub fn set_background_color(&mut self, color: &str) -> bool {
        self.instant(|c| c.badge.background_color = color.to_string())
    }

    /// Badge lettering is always upper case.
    pub fn set_badge_text(&mut self, text: &str) -> bool {
        self.instant(|c| c.badge.badge_text = text.to_uppercase())
    }

    pub fn set_font_size(&mut self, size: f64) -> bool {
        if !size.is_finite() {
            return false;
        }
        self.instant(|c| c.badge.font_size = size.max(MIN_FONT_SIZE))
    }

    pub fn set_letter_spacing(&mut self, spacing: f64) -> bool {
        if !spacing.is_finite() {
            return false;
        }
        self.instant(|c| c.badge.letter_spacing = spacing)
    }

    fn instant(&mut self, f: impl FnOnce(&mut Customization)) -> bool {
        self.state.update(f);
        self.state.commit()
    }

    /// Start panning. `at` is in display units; `display` is the on-screen size of `canvas`.
    pub fn drag_start(&mut self, at: Point, display: Size, canvas: Canvas) {
        if display.width <= 0.0 || display.height <= 0.0 {
            return;
        }
        let to_canvas = Vec2::new(
            f64::from(canvas.width) / display.width,
            f64::from(canvas.height) / display.height,
        );
        self.drag = Some(Drag {
            last: scaled(at, to_canvas),
            to_canvas,
        });
    }

    pub fn drag_move(&mut self, at: Point) {
        let Some(drag) = self.drag.as_mut() else {
            return;
        };
        let current = scaled(at, drag.to_canvas);
        let delta = current - drag.last;
        drag.last = current;
        self.state.update(|c| c.offset += delta);
    }

    /// Finish panning and commit, even when nothing moved.
    pub fn drag_end(&mut self) -> bool {
        if self.drag.take().is_none() {
            return false;
        }
        self.state.commit()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn undo(&mut self) -> bool {
        self.state.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.state.redo()
    }

    pub fn can_undo(&self) -> bool {
        self.state.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.state.can_redo()
    }

    /// Start a fresh session from `initial`.
    pub fn reset(&mut self, initial: Customization) {
        self.drag = None;
        self.state.reset(initial);
    }
}

fn scaled(p: Point, by: Vec2) -> Point {
    Point::new(p.x * by.x, p.y * by.y)
}
