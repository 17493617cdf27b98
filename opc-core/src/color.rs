//! Color functions.
//!
//! A color function maps `(t, index, point, count)` to a real-valued
//! [`Rgb`] triple. Values may fall outside `[0, 255]`; they are clamped
//! when the frame is built. Functions should depend on their arguments
//! only, so the same inputs always light the same colors. Per-pixel
//! constants (random offsets and the like) belong in the implementing
//! type, computed once at startup.

use crate::layout::{Layout, Point3};
use crate::pixel::{Pixel, Rgb};

pub trait ColorFunction {
    /// Color of pixel `index` of `count` at `point`, `t` seconds in.
    fn color(&self, t: f64, index: usize, point: Point3, count: usize) -> Rgb;
}

impl<F> ColorFunction for F
where
    F: Fn(f64, usize, Point3, usize) -> Rgb,
{
    fn color(&self, t: f64, index: usize, point: Point3, count: usize) -> Rgb {
        self(t, index, point, count)
    }
}

/// Brightness ramp from black at pixel 0 to white at the last pixel.
///
/// Static, so it is handy for checking wiring order and measuring
/// throughput.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ramp;

impl ColorFunction for Ramp {
    fn color(&self, _t: f64, index: usize, _point: Point3, count: usize) -> Rgb {
        if count == 0 {
            return [0.0; 3];
        }
        let v = index as f64 / count as f64 * 256.0;
        [v, v, v]
    }
}

/// Evaluate `color` for every point of `layout` into `out`.
///
/// `out` is cleared first and reused across frames.
pub fn render<C>(color: &C, t: f64, layout: &Layout, out: &mut Vec<Pixel>)
where
    C: ColorFunction + ?Sized,
{
    let count = layout.len();
    out.clear();
    out.extend(
        layout
            .points()
            .iter()
            .enumerate()
            .map(|(i, &p)| Pixel::from(color.color(t, i, p, count))),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ramp_spans_black_to_white() {
        let layout = Layout::line(4);
        let mut out = Vec::new();
        render(&Ramp, 0.0, &layout, &mut out);
        assert_eq!(
            out,
            vec![
                Pixel::new(0, 0, 0),
                Pixel::new(64, 64, 64),
                Pixel::new(128, 128, 128),
                Pixel::new(192, 192, 192),
            ]
        );
    }

    #[test]
    fn closures_are_color_functions() {
        let layout = Layout::new(vec![Point3::new(0.0, 0.0, 2.0)]);
        let by_height = |t: f64, _i: usize, p: Point3, _n: usize| [p.z * 100.0, t, -1.0];
        let mut out = Vec::new();
        render(&by_height, 7.5, &layout, &mut out);
        assert_eq!(out, vec![Pixel::new(200, 7, 0)]);
    }

    #[test]
    fn render_reuses_buffer() {
        let mut out = vec![Pixel::new(1, 1, 1); 10];
        render(&Ramp, 0.0, &Layout::line(2), &mut out);
        assert_eq!(out.len(), 2);
    }
}
