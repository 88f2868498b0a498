#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Mandelbrot renderer
//!
//! The Mandelbrot set is the set of points `c` on the complex plane
//! for which repeatedly squaring `z` and adding `c` (starting from
//! zero) never runs off to infinity.  For each pixel of an image we
//! find the matching point on the complex plane, count how many
//! rounds it takes for `z` to leave the circle of radius two, and
//! turn that count into a color.  Points that never leave within the
//! iteration budget are members of the set and are drawn black.
//!
//! Colors come from a rainbow gradient that cycles as the escape
//! time grows, dimmed so that points which escape quickly fade into
//! the black background and points that linger near the set glow.

extern crate crossbeam;
extern crate failure;
extern crate image;
extern crate itertools;
extern crate log;
extern crate num;

use failure::Fail;

pub mod colorize;
pub mod config;
pub mod escape;
pub mod gradient;
pub mod planes;
pub mod render;
pub mod sink;

pub use colorize::colorize;
pub use config::RenderConfig;
pub use escape::escape_iterations;
pub use gradient::{Color, GradientTable};
pub use planes::{CanvasSize, Pixel, PlaneMapper, Viewport, MAX_DIMENSION};
pub use render::{CancelToken, FrameRenderer, Progress};
pub use sink::{write_image, FrameBuffer, PixelSink};

/// Everything that can stop a render.  All of the configuration
/// variants are raised before any pixel is computed.
#[derive(Debug, Fail)]
pub enum MandelError {
    /// The gradient must split evenly into six ramps of even length.
    #[fail(display = "gradient size {} is not a positive multiple of 12", _0)]
    GradientSize(usize),

    /// The viewport has no area, is inside out, or isn't finite.
    #[fail(
        display = "degenerate viewport: x from {} to {}, y from {} to {}",
        x_min, x_max, y_min, y_max
    )]
    DegenerateViewport {
        /// Left edge.
        x_min: f64,
        /// Right edge.
        x_max: f64,
        /// Lower edge.
        y_min: f64,
        /// Upper edge.
        y_max: f64,
    },

    /// One of the canvas dimensions is zero.
    #[fail(display = "canvas of {}x{} has no pixels", width, height)]
    EmptyCanvas {
        /// Columns.
        width: usize,
        /// Rows.
        height: usize,
    },

    /// One of the canvas dimensions is too big to allocate a frame for.
    #[fail(
        display = "canvas of {}x{} is too large, sides are limited to {}",
        width, height, limit
    )]
    CanvasTooLarge {
        /// Columns.
        width: usize,
        /// Rows.
        height: usize,
        /// The largest side allowed.
        limit: usize,
    },

    /// The frame handed to a render is not the size of its canvas.
    #[fail(
        display = "frame is {}x{} but the canvas is {}x{}",
        frame_width, frame_height, width, height
    )]
    CanvasMismatch {
        /// Columns in the frame.
        frame_width: usize,
        /// Rows in the frame.
        frame_height: usize,
        /// Columns in the canvas.
        width: usize,
        /// Rows in the canvas.
        height: usize,
    },

    /// The iteration budget is zero.
    #[fail(display = "at least one iteration is required")]
    NoIterations,

    /// A pixel was written outside the canvas.
    #[fail(display = "pixel {},{} is outside the canvas", x, y)]
    PixelOutOfBounds {
        /// Column.
        x: usize,
        /// Row.
        y: usize,
    },

    /// Something tried to use a frame that was never finished.
    #[fail(display = "frame is incomplete")]
    IncompleteFrame,

    /// The render was cancelled before the frame was finished.
    #[fail(display = "render cancelled")]
    Cancelled,

    /// A render worker panicked.
    #[fail(display = "a render worker panicked")]
    WorkerPanicked,
}
