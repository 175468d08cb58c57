use carchase_core::geometry::Aabb;
use carchase_core::render::{Color, DrawSurface, RecordingSurface, TextAlign};

/// Headless render target: keeps the most recent frame and counts frames.
#[derive(Debug, Clone)]
pub struct FrameRecorder {
    frame: RecordingSurface,
    frames: u64,
}

impl FrameRecorder {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            frame: RecordingSurface::new(width, height),
            frames: 0,
        }
    }

    /// Frames started so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn last_frame(&self) -> &RecordingSurface {
        &self.frame
    }
}

impl DrawSurface for FrameRecorder {
    fn size(&self) -> (f32, f32) {
        self.frame.size()
    }

    fn clear(&mut self, color: Color) {
        self.frames += 1;
        self.frame.clear(color);
    }

    fn fill_rect(&mut self, rect: Aabb, color: Color) {
        self.frame.fill_rect(rect, color);
    }

    fn stroke_line(&mut self, from: (f32, f32), to: (f32, f32), width: f32, color: Color) {
        self.frame.stroke_line(from, to, width, color);
    }

    fn text(&mut self, text: &str, x: f32, y: f32, size: f32, align: TextAlign, color: Color) {
        self.frame.text(text, x, y, size, align, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_frames_and_keeps_last() {
        let mut rec = FrameRecorder::new(800.0, 400.0);
        rec.clear(Color::rgb(0, 0, 0));
        rec.text("first", 0.0, 0.0, 10.0, TextAlign::Left, Color::rgb(1, 1, 1));
        rec.clear(Color::rgb(0, 0, 0));
        rec.text("second", 0.0, 0.0, 10.0, TextAlign::Left, Color::rgb(1, 1, 1));

        assert_eq!(rec.frames(), 2);
        assert_eq!(rec.size(), (800.0, 400.0));
        assert!(rec.last_frame().contains_text("second"));
        assert!(!rec.last_frame().contains_text("first"));
    }
}
