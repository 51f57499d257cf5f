//! Rasterizes the menu-bar ring. Pure pixel math, so the arc geometry is
//! testable without any windowing system.

use std::f64::consts::PI;

/// Edge length of the indicator bitmap. The status item slot is wider; the
/// backend centers the glyph in it.
pub const ICON_SIZE: u32 = 18;

const RING_THICKNESS: f64 = 3.0;
/// Elapsed arc, the accent blue of the original indicator.
const ARC_COLOR: [u8; 4] = [10, 132, 255, 255];
/// Full track circle under the arc, gray at 30% opacity.
const TRACK_COLOR: [u8; 4] = [128, 128, 128, 77];

/// RGBA bitmap of the indicator: a dimmed track ring with the elapsed arc
/// drawn over it, starting at 12 o'clock and sweeping clockwise.
pub fn render_ring(fraction: f64, size: u32) -> Vec<u8> {
    let fraction = if fraction.is_finite() {
        fraction.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let sweep = fraction * 2.0 * PI;

    let mut rgba = vec![0u8; (size * size * 4) as usize];
    let center = (size as f64 - 1.0) / 2.0;
    let outer = size as f64 / 2.0;
    let inner = outer - RING_THICKNESS;

    for y in 0..size {
        for x in 0..size {
            let dx = x as f64 - center;
            let dy = y as f64 - center;
            let radius = (dx * dx + dy * dy).sqrt();
            if radius > outer || radius < inner {
                continue;
            }

            // Angle measured clockwise from 12 o'clock. Screen y grows
            // downward, hence the negated dy.
            let angle = dx.atan2(-dy);
            let angle = if angle < 0.0 { angle + 2.0 * PI } else { angle };

            let color = if fraction > 0.0 && angle <= sweep {
                ARC_COLOR
            } else {
                TRACK_COLOR
            };
            let offset = ((y * size + x) * 4) as usize;
            rgba[offset..offset + 4].copy_from_slice(&color);
        }
    }

    rgba
}

#[cfg(test)]
mod tests {
    use super::{render_ring, ARC_COLOR, ICON_SIZE};

    fn arc_pixels(rgba: &[u8]) -> usize {
        rgba.chunks_exact(4).filter(|px| *px == ARC_COLOR).count()
    }

    fn ring_pixels(rgba: &[u8]) -> usize {
        rgba.chunks_exact(4).filter(|px| px[3] != 0).count()
    }

    #[test]
    fn buffer_has_rgba_for_every_pixel() {
        let rgba = render_ring(0.5, ICON_SIZE);
        assert_eq!(rgba.len(), (ICON_SIZE * ICON_SIZE * 4) as usize);
    }

    #[test]
    fn empty_and_full_arcs() {
        let empty = render_ring(0.0, ICON_SIZE);
        assert_eq!(arc_pixels(&empty), 0);
        assert!(ring_pixels(&empty) > 0, "the track must always be drawn");

        let full = render_ring(1.0, ICON_SIZE);
        assert_eq!(arc_pixels(&full), ring_pixels(&full));
    }

    #[test]
    fn arc_grows_with_the_fraction() {
        let mut previous = 0;
        for fraction in [0.0, 0.25, 0.5, 0.75, 1.0] {
            let filled = arc_pixels(&render_ring(fraction, ICON_SIZE));
            assert!(filled >= previous, "arc shrank at {fraction}");
            previous = filled;
        }
    }

    #[test]
    fn out_of_range_input_is_clamped() {
        assert_eq!(
            arc_pixels(&render_ring(2.0, ICON_SIZE)),
            arc_pixels(&render_ring(1.0, ICON_SIZE))
        );
        assert_eq!(arc_pixels(&render_ring(-1.0, ICON_SIZE)), 0);
        assert_eq!(arc_pixels(&render_ring(f64::NAN, ICON_SIZE)), 0);
    }

    #[test]
    fn arc_starts_at_twelve_o_clock() {
        let rgba = render_ring(0.1, ICON_SIZE);
        // a sliver just right of top center, in the first pixel row, must
        // already be filled
        let offset = ((ICON_SIZE / 2) * 4) as usize;
        assert_eq!(&rgba[offset..offset + 4], &ARC_COLOR);
    }
}
