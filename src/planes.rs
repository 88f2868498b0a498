// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the PlaneMapper struct, which describes a relationship
//! between a rectangle on the integral plane with an origin at 0,0
//! (the canvas), and a rectangle on the complex plane with an
//! arbitrary pair of corners (the viewport).
use num::Complex;

use crate::MandelError;

/// The rectangular region of the complex plane we are looking at.
/// The real part runs along x, the imaginary part along y.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    /// Left edge, inclusive.
    pub x_min: f64,
    /// Right edge, exclusive as far as pixels are concerned.
    pub x_max: f64,
    /// Lower edge, inclusive.
    pub y_min: f64,
    /// Upper edge, exclusive as far as pixels are concerned.
    pub y_max: f64,
}

impl Viewport {
    /// Builds a viewport from its four bounds.  Rejects rectangles
    /// with no area, inverted edges, and anything that isn't a
    /// finite number.
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Result<Viewport, MandelError> {
        let viewport = Viewport {
            x_min,
            x_max,
            y_min,
            y_max,
        };
        viewport.validate()?;
        Ok(viewport)
    }

    /// Builds a viewport from its left-lower and right-upper corners.
    pub fn from_corners(
        leftlower: Complex<f64>,
        rightupper: Complex<f64>,
    ) -> Result<Viewport, MandelError> {
        Viewport::new(leftlower.re, rightupper.re, leftlower.im, rightupper.im)
    }

    pub(crate) fn validate(&self) -> Result<(), MandelError> {
        let finite = [self.x_min, self.x_max, self.y_min, self.y_max]
            .iter()
            .all(|v| v.is_finite());
        // Written as a negation so that NaN bounds fail too.
        if !finite || !(self.x_max > self.x_min) || !(self.y_max > self.y_min) {
            return Err(MandelError::DegenerateViewport {
                x_min: self.x_min,
                x_max: self.x_max,
                y_min: self.y_min,
                y_max: self.y_max,
            });
        }
        Ok(())
    }

    /// Width of the viewport on the real axis.
    pub fn x_range(&self) -> f64 {
        self.x_max - self.x_min
    }

    /// Height of the viewport on the imaginary axis.
    pub fn y_range(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// Width over height.
    pub fn aspect_ratio(&self) -> f64 {
        self.x_range() / self.y_range()
    }
}

/// The largest canvas side we will allocate a frame for.
pub const MAX_DIMENSION: usize = 16384;

/// Describes the width and height of an integral plane that is
/// assumed to start at 0,0.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CanvasSize {
    /// Columns.
    pub width: usize,
    /// Rows.
    pub height: usize,
}

impl CanvasSize {
    /// A canvas with both dimensions given explicitly.
    pub fn new(width: usize, height: usize) -> Result<CanvasSize, MandelError> {
        let canvas = CanvasSize { width, height };
        canvas.validate()?;
        Ok(canvas)
    }

    /// A canvas whose height follows the viewport's aspect ratio, so
    /// that pixels come out square.
    pub fn from_width(width: usize, viewport: &Viewport) -> Result<CanvasSize, MandelError> {
        viewport.validate()?;
        let height = ((width as f64) / viewport.aspect_ratio()).round();
        // A very wide viewport rounds down to nothing, a very narrow one
        // saturates; validation rejects both.
        CanvasSize::new(width, height as usize)
    }

    pub(crate) fn validate(&self) -> Result<(), MandelError> {
        if self.is_empty() {
            return Err(MandelError::EmptyCanvas {
                width: self.width,
                height: self.height,
            });
        }
        if self.width > MAX_DIMENSION || self.height > MAX_DIMENSION {
            return Err(MandelError::CanvasTooLarge {
                width: self.width,
                height: self.height,
                limit: MAX_DIMENSION,
            });
        }
        Ok(())
    }

    /// The total number of points in the integral grid.  Used to
    /// calculate memory needs.
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    /// True when either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Describes the x, y of a point on the canvas.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Pixel(pub usize, pub usize);

/// Contains the definitions of two planes: an integral cartesian plane,
/// and a complex cartesian plane.  Maps points from the first to the
/// second.
#[derive(Debug, Clone)]
pub struct PlaneMapper {
    /// The canvas.  Its origin is at 0,0.
    pub canvas: CanvasSize,
    /// The region of the complex plane spread across the canvas.
    pub viewport: Viewport,
    // Pixels per unit of the complex plane, horizontally and
    // vertically.
    grid_factors: (f64, f64),
}

impl PlaneMapper {
    /// Constructor.  Both planes must have area.
    pub fn new(canvas: CanvasSize, viewport: Viewport) -> Result<PlaneMapper, MandelError> {
        canvas.validate()?;
        viewport.validate()?;

        let grid_factors = (
            (canvas.width as f64) / viewport.x_range(),
            (canvas.height as f64) / viewport.y_range(),
        );

        Ok(PlaneMapper {
            canvas,
            viewport,
            grid_factors,
        })
    }

    /// Given a pixel on the integral cartesian plane, return the
    /// complex number at the equivalent location on the complex
    /// plane.  The pixel grid is half-open: pixel 0,0 lands exactly on
    /// the viewport's minimum corner, and no pixel ever lands on the
    /// maximum edges.
    #[inline]
    pub fn pixel_to_point(&self, pixel: &Pixel) -> Complex<f64> {
        Complex::new(
            ((pixel.0 as f64) / self.grid_factors.0) + self.viewport.x_min,
            ((pixel.1 as f64) / self.grid_factors.1) + self.viewport.y_min,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapper(width: usize, height: usize, x: (f64, f64), y: (f64, f64)) -> PlaneMapper {
        PlaneMapper::new(
            CanvasSize::new(width, height).unwrap(),
            Viewport::new(x.0, x.1, y.0, y.1).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn viewport_fails_on_bad_shape() {
        assert!(Viewport::new(1.0, -1.0, -1.0, 1.0).is_err());
        assert!(Viewport::new(-1.0, 1.0, 1.0, -1.0).is_err());
        assert!(Viewport::new(0.0, 0.0, -1.0, 1.0).is_err());
        assert!(Viewport::new(std::f64::NAN, 1.0, -1.0, 1.0).is_err());
        assert!(Viewport::new(-1.0, std::f64::INFINITY, -1.0, 1.0).is_err());
    }

    #[test]
    fn viewport_passes_on_good_shape() {
        let vp = Viewport::from_corners(Complex::new(-2.5, -1.25), Complex::new(1.0, 1.25));
        assert_eq!(vp.unwrap(), Viewport::new(-2.5, 1.0, -1.25, 1.25).unwrap());
    }

    #[test]
    fn canvas_rejects_zero_dimensions() {
        assert!(CanvasSize::new(0, 10).is_err());
        assert!(CanvasSize::new(10, 0).is_err());
        assert_eq!(CanvasSize::new(3, 4).unwrap().len(), 12);
    }

    #[test]
    fn canvas_height_follows_aspect_ratio() {
        let vp = Viewport::new(-2.5, 1.0, -1.25, 1.25).unwrap();
        assert_eq!(CanvasSize::from_width(1200, &vp).unwrap().height, 857);
        assert_eq!(CanvasSize::from_width(14, &vp).unwrap().height, 10);
        // 4 / 1.4 = 2.857...
        assert_eq!(CanvasSize::from_width(4, &vp).unwrap().height, 3);
    }

    #[test]
    fn canvas_height_rounds_to_nothing() {
        let wide = Viewport::new(0.0, 1000.0, 0.0, 1.0).unwrap();
        match CanvasSize::from_width(2, &wide) {
            Err(MandelError::EmptyCanvas { width: 2, height: 0 }) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn canvas_height_from_a_sliver_is_too_large() {
        let sliver = Viewport::new(0.0, 0.0000001, 0.0, 1.0).unwrap();
        match CanvasSize::from_width(100, &sliver) {
            Err(MandelError::CanvasTooLarge { width: 100, .. }) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn canvas_rejects_sides_past_the_limit() {
        assert!(CanvasSize::new(MAX_DIMENSION, MAX_DIMENSION).is_ok());
        assert!(CanvasSize::new(MAX_DIMENSION + 1, 1).is_err());
        match CanvasSize::new(std::usize::MAX / 2, 3) {
            Err(MandelError::CanvasTooLarge { limit, .. }) => assert_eq!(limit, MAX_DIMENSION),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn pixel_zero_is_viewport_minimum() {
        for &(w, h, x, y) in &[
            (4, 4, (-2.5, 1.0), (-1.25, 1.25)),
            (1200, 857, (-2.5, 1.0), (-1.25, 1.25)),
            (7, 3, (-0.1, 0.0), (-1.04, -0.96)),
        ] {
            let pm = mapper(w, h, x, y);
            assert_eq!(pm.pixel_to_point(&Pixel(0, 0)), Complex::new(x.0, y.0));
        }
    }

    #[test]
    fn pixel_to_point_on_positive_planes() {
        let pm = mapper(5, 5, (0.0, 5.0), (0.0, 5.0));
        assert_eq!(pm.pixel_to_point(&Pixel(2, 2)), Complex::new(2.0, 2.0));
        assert_eq!(pm.pixel_to_point(&Pixel(4, 4)), Complex::new(4.0, 4.0));
    }

    #[test]
    fn pixel_to_points_on_mixed_planes() {
        let pm = mapper(4, 4, (-2.0, 2.0), (-2.0, 2.0));
        assert_eq!(pm.pixel_to_point(&Pixel(2, 2)), Complex::new(0.0, 0.0));
        assert_eq!(pm.pixel_to_point(&Pixel(0, 0)), Complex::new(-2.0, -2.0));
        assert_eq!(pm.pixel_to_point(&Pixel(3, 1)), Complex::new(1.0, -1.0));
    }

    #[test]
    fn last_pixel_stays_below_upper_bounds() {
        let pm = mapper(1200, 857, (-2.5, 1.0), (-1.25, 1.25));
        let last = pm.pixel_to_point(&Pixel(1199, 856));
        assert!(last.re < 1.0);
        assert!(last.im < 1.25);
    }

    #[test]
    fn mapping_is_monotonic() {
        let pm = mapper(37, 23, (-0.75, 0.25), (-0.1, 0.3));
        for x in 1..37 {
            assert!(pm.pixel_to_point(&Pixel(x, 0)).re > pm.pixel_to_point(&Pixel(x - 1, 0)).re);
        }
        for y in 1..23 {
            assert!(pm.pixel_to_point(&Pixel(0, y)).im > pm.pixel_to_point(&Pixel(0, y - 1)).im);
        }
    }
}
