use ab_glyph::{FontRef, PxScale};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;

use crate::classification::domain::mask_label::{ClassificationResult, Rgb};
use crate::shared::frame::Frame;
use crate::shared::region::Region;

pub const DEFAULT_LINE_WIDTH: u32 = 2;
pub const DEFAULT_LABEL_HEIGHT: u32 = 14;

/// DejaVu Sans Mono Bold, see `assets/DejaVu-LICENSE`.
static LABEL_FONT: &[u8] = include_bytes!("../../../assets/DejaVuSansMono-Bold.ttf");

const LABEL_TEXT_COLOR: image::Rgb<u8> = image::Rgb([255, 255, 255]);

/// Draws each face box in its verdict color, with a filled label bar
/// carrying the label text directly above the box (or inside its top edge
/// when the box touches the top of the frame).
#[derive(Clone)]
pub struct FrameAnnotator {
    line_width: u32,
    label_height: u32,
    font: FontRef<'static>,
}

impl Default for FrameAnnotator {
    fn default() -> Self {
        Self::new(DEFAULT_LINE_WIDTH, DEFAULT_LABEL_HEIGHT)
    }
}

impl FrameAnnotator {
    /// A `label_height` of 0 draws boxes only.
    pub fn new(line_width: u32, label_height: u32) -> Self {
        Self {
            line_width: line_width.max(1),
            label_height,
            font: FontRef::try_from_slice(LABEL_FONT).expect("bundled label font must parse"),
        }
    }

    /// Pairs regions and results by position; extra entries on either side
    /// are ignored.
    pub fn annotate(
        &self,
        frame: &mut Frame,
        regions: &[Region],
        results: &[ClassificationResult],
    ) {
        let (width, height) = (frame.width(), frame.height());
        let mut canvas = frame.as_rgb_image_mut();
        for (region, result) in regions.iter().zip(results) {
            let r = region.clamped(width, height);
            if r.is_empty() {
                continue;
            }
            let color = to_pixel(result.color);

            let t = (self.line_width as i32).min((r.width + 1) / 2).min((r.height + 1) / 2);
            for i in 0..t {
                let (w, h) = (r.width - 2 * i, r.height - 2 * i);
                if w > 0 && h > 0 {
                    let ring = Rect::at(r.x + i, r.y + i).of_size(w as u32, h as u32);
                    draw_hollow_rect_mut(&mut canvas, ring, color);
                }
            }

            if self.label_height == 0 {
                continue;
            }
            let h = self.label_height as i32;
            let top = if r.y >= h { r.y - h } else { r.y };
            let bar = Rect::at(r.x, top).of_size(r.width as u32, self.label_height);
            draw_filled_rect_mut(&mut canvas, bar, color);
            draw_text_mut(
                &mut canvas,
                LABEL_TEXT_COLOR,
                r.x + 2,
                top,
                PxScale::from(self.label_height as f32),
                &self.font,
                result.label.as_str(),
            );
        }
    }
}

fn to_pixel(color: Rgb) -> image::Rgb<u8> {
    image::Rgb([color.0, color.1, color.2])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::domain::mask_label::{MaskLabel, MASK_COLOR, NO_MASK_COLOR};

    fn blank(w: u32, h: u32) -> Frame {
        Frame::new(vec![255u8; (w * h * 3) as usize], w, h, 3, 0)
    }

    fn pixel(frame: &Frame, x: usize, y: usize) -> Rgb {
        let a = frame.as_ndarray();
        Rgb(a[[y, x, 0]], a[[y, x, 1]], a[[y, x, 2]])
    }

    fn result(label: MaskLabel) -> ClassificationResult {
        ClassificationResult {
            label,
            color: label.color(),
            mask_confidence: 0.0,
        }
    }

    /// Pixels inside `[x0, x1) × [y0, y1)` that differ from `color`.
    fn count_other_than(
        frame: &Frame,
        color: Rgb,
        (x0, y0, x1, y1): (usize, usize, usize, usize),
    ) -> usize {
        (y0..y1)
            .flat_map(|y| (x0..x1).map(move |x| (x, y)))
            .filter(|&(x, y)| pixel(frame, x, y) != color)
            .count()
    }

    #[test]
    fn test_outline_uses_result_color_and_leaves_inside() {
        let mut frame = blank(100, 100);
        let region = Region::new(20, 30, 40, 40, 0.9);

        let results = [result(MaskLabel::WearingMask)];

        FrameAnnotator::new(2, 0).annotate(&mut frame, &[region], &results);

        assert_eq!(pixel(&frame, 20, 50), MASK_COLOR); // left edge
        assert_eq!(pixel(&frame, 21, 50), MASK_COLOR); // second ring
        assert_eq!(pixel(&frame, 59, 50), MASK_COLOR); // right edge
        assert_eq!(pixel(&frame, 40, 69), MASK_COLOR); // bottom edge
        assert_eq!(pixel(&frame, 40, 50), Rgb(255, 255, 255)); // interior
    }

    #[test]
    fn test_label_bar_sits_above_box() {
        let mut frame = blank(200, 100);
        let region = Region::new(10, 30, 150, 40, 0.9);

        FrameAnnotator::new(2, 10).annotate(&mut frame, &[region], &[result(MaskLabel::NoMask)]);

        // right end of the bar, past the text
        assert_eq!(pixel(&frame, 155, 22), NO_MASK_COLOR);
        assert_eq!(pixel(&frame, 155, 19), Rgb(255, 255, 255));
    }

    #[test]
    fn test_label_text_is_drawn_in_bar() {
        let mut frame = blank(200, 100);
        let region = Region::new(10, 40, 150, 40, 0.9);

        let results = [result(MaskLabel::WearingMask)];

        FrameAnnotator::new(2, 14).annotate(&mut frame, &[region], &results);

        let bar = (10, 26, 160, 40);
        let text_pixels = count_other_than(&frame, MASK_COLOR, bar);
        assert!(text_pixels > 20, "expected glyph pixels in the bar, got {text_pixels}");
        // glyphs stay in the left part of the bar
        assert_eq!(count_other_than(&frame, MASK_COLOR, (140, 26, 160, 40)), 0);
    }

    #[test]
    fn test_different_labels_render_differently() {
        let mut masked = blank(200, 100);
        let mut unmasked = blank(200, 100);
        let region = Region::new(10, 40, 150, 40, 0.9);
        let annotator = FrameAnnotator::default();

        annotator.annotate(&mut masked, &[region.clone()], &[result(MaskLabel::WearingMask)]);
        annotator.annotate(&mut unmasked, &[region], &[result(MaskLabel::NoMask)]);

        let bar = (10, 26, 160, 40);
        assert_ne!(
            count_other_than(&masked, MASK_COLOR, bar),
            count_other_than(&unmasked, NO_MASK_COLOR, bar)
        );
    }

    #[test]
    fn test_zero_label_height_draws_no_bar() {
        let mut frame = blank(100, 100);
        let region = Region::new(20, 30, 40, 40, 0.9);

        FrameAnnotator::new(1, 0).annotate(&mut frame, &[region], &[result(MaskLabel::NoMask)]);

        assert_eq!(count_other_than(&frame, Rgb(255, 255, 255), (0, 0, 100, 30)), 0);
    }

    #[test]
    fn test_label_bar_moves_inside_at_top_edge() {
        let mut frame = blank(120, 50);
        let region = Region::new(5, 0, 110, 30, 0.9);

        FrameAnnotator::new(1, 6).annotate(&mut frame, &[region], &[result(MaskLabel::NoMask)]);

        assert_eq!(pixel(&frame, 100, 4), NO_MASK_COLOR);
    }

    #[test]
    fn test_each_face_gets_its_own_color() {
        let mut frame = blank(200, 100);
        let regions = [
            Region::new(10, 40, 30, 30, 0.9),
            Region::new(120, 40, 30, 30, 0.9),
        ];
        let results = [result(MaskLabel::NoMask), result(MaskLabel::WearingMask)];

        FrameAnnotator::default().annotate(&mut frame, &regions, &results);

        assert_eq!(pixel(&frame, 10, 55), NO_MASK_COLOR);
        assert_eq!(pixel(&frame, 120, 55), MASK_COLOR);
    }

    #[test]
    fn test_box_past_frame_edge_is_clipped() {
        let mut frame = blank(50, 50);
        let region = Region::new(40, 40, 30, 30, 0.9);

        FrameAnnotator::default().annotate(&mut frame, &[region], &[result(MaskLabel::NoMask)]);

        assert_eq!(pixel(&frame, 49, 45), NO_MASK_COLOR);
    }
}
