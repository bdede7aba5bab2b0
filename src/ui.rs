//! In-buffer UI widgets: the zoom slider, the hover tooltip, and the
//! HUD zoom readout. Widgets only ever exchange small scalars with the
//! views; they never touch particle data.

use crate::display::{draw_text_shadowed, text_width, InputEvent, MouseButtonKind, PixelBuffer};
use crate::zoom::{ZOOM_MAX, ZOOM_MIN};

const TRACK_HEIGHT: u32 = 6;
const HANDLE_RADIUS: i32 = 6;

/// Horizontal zoom slider mapped over [`ZOOM_MIN`, `ZOOM_MAX`]
pub struct ZoomSlider {
    x: i32,
    y: i32,
    width: u32,
    value: f32,
    dragging: bool,
}

impl ZoomSlider {
    pub fn new(x: i32, y: i32, width: u32, value: f32) -> Self {
        Self {
            x,
            y,
            width,
            value: value.clamp(ZOOM_MIN, ZOOM_MAX),
            dragging: false,
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    /// External updates (wheel edge, flight arrival) keep the slider truthful
    pub fn set_value(&mut self, value: f32) {
        self.value = value.clamp(ZOOM_MIN, ZOOM_MAX);
    }

    fn value_at(&self, px: i32) -> f32 {
        let t = (px - self.x) as f32 / self.width as f32;
        ZOOM_MIN + t.clamp(0.0, 1.0) * (ZOOM_MAX - ZOOM_MIN)
    }

    fn hit(&self, px: i32, py: i32) -> bool {
        px >= self.x - HANDLE_RADIUS
            && px <= self.x + self.width as i32 + HANDLE_RADIUS
            && (py - self.y).abs() <= HANDLE_RADIUS * 2
    }

    /// Returns the new value when the user moved the slider
    pub fn handle_event(&mut self, event: &InputEvent) -> Option<f32> {
        match *event {
            InputEvent::MouseDown {
                x,
                y,
                button: MouseButtonKind::Left,
            } if self.hit(x, y) => {
                self.dragging = true;
                self.value = self.value_at(x);
                Some(self.value)
            },
            InputEvent::MouseMove { x, .. } if self.dragging => {
                self.value = self.value_at(x);
                Some(self.value)
            },
            InputEvent::MouseUp {
                button: MouseButtonKind::Left,
                ..
            } => {
                self.dragging = false;
                None
            },
            _ => None,
        }
    }

    /// True while a drag owns the pointer (suppresses orbit/click handling)
    pub fn dragging(&self) -> bool {
        self.dragging
    }

    pub fn render(&self, buffer: &mut PixelBuffer) {
        buffer.fill_rect_blend(
            self.x,
            self.y - TRACK_HEIGHT as i32 / 2,
            self.width,
            TRACK_HEIGHT,
            40,
            60,
            90,
            0.8,
        );
        buffer.draw_rect(
            self.x - 1,
            self.y - TRACK_HEIGHT as i32 / 2 - 1,
            self.width + 2,
            TRACK_HEIGHT + 2,
            80,
            120,
            170,
        );
        let t = (self.value - ZOOM_MIN) / (ZOOM_MAX - ZOOM_MIN);
        let hx = self.x + (t * self.width as f32) as i32;
        buffer.fill_circle(hx, self.y, HANDLE_RADIUS, 140, 200, 255);
    }
}

/// Hover tooltip following the pointer
#[derive(Default)]
pub struct Tooltip {
    text: Option<String>,
    x: i32,
    y: i32,
}

impl Tooltip {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, text: &str, x: i32, y: i32) {
        self.text = Some(text.to_string());
        self.x = x;
        self.y = y;
    }

    pub fn clear(&mut self) {
        self.text = None;
    }

    pub fn visible(&self) -> bool {
        self.text.is_some()
    }

    pub fn render(&self, buffer: &mut PixelBuffer) {
        let Some(text) = &self.text else {
            return;
        };
        let tx = self.x + 15;
        let ty = self.y - 10;
        let w = text_width(text) + 8;
        buffer.fill_rect_blend(tx - 4, ty - 4, w as u32, 15, 10, 16, 34, 0.85);
        buffer.draw_rect(tx - 4, ty - 4, w as u32, 15, 90, 140, 200);
        draw_text_shadowed(buffer, tx, ty, text, 180, 220, 255);
    }
}

/// HUD zoom readout, top-left
pub fn draw_zoom_hud(buffer: &mut PixelBuffer, level: f32) {
    let text = format!("ZOOM: {}X", level.round() as i32);
    draw_text_shadowed(buffer, 12, 12, &text, 140, 200, 255);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drag_sets_value_from_track_position() {
        let mut slider = ZoomSlider::new(100, 50, 200, 1.0);
        let v = slider
            .handle_event(&InputEvent::MouseDown {
                x: 200,
                y: 50,
                button: MouseButtonKind::Left,
            })
            .unwrap();
        assert!((v - 50.5).abs() < 0.5);

        // Drag continues off the track end but clamps
        let v = slider
            .handle_event(&InputEvent::MouseMove { x: 900, y: 55 })
            .unwrap();
        assert_eq!(v, ZOOM_MAX);

        slider.handle_event(&InputEvent::MouseUp {
            x: 900,
            y: 55,
            button: MouseButtonKind::Left,
        });
        assert!(!slider.dragging());
        assert!(slider
            .handle_event(&InputEvent::MouseMove { x: 100, y: 50 })
            .is_none());
    }

    #[test]
    fn clicks_away_from_the_track_are_ignored() {
        let mut slider = ZoomSlider::new(100, 50, 200, 30.0);
        assert!(slider
            .handle_event(&InputEvent::MouseDown {
                x: 500,
                y: 300,
                button: MouseButtonKind::Left,
            })
            .is_none());
        assert_eq!(slider.value(), 30.0);
    }
}
