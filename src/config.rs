// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Everything a render needs to know before it starts.  None of it
//! changes once the render is under way.

use crate::gradient::GRADIENT_STEP;
use crate::planes::{CanvasSize, Viewport};
use crate::MandelError;

/// The classic full view of the set.
pub const DEFAULT_VIEWPORT: Viewport = Viewport {
    x_min: -2.5,
    x_max: 1.0,
    y_min: -1.25,
    y_max: 1.25,
};

/// Default canvas width; the height follows the viewport.
pub const DEFAULT_WIDTH: usize = 1200;

/// Default iteration budget.
pub const DEFAULT_ITERATIONS: usize = 48;

/// Default gradient size.  One full rainbow per iteration budget.
pub const DEFAULT_GRADIENT_SIZE: usize = 48;

/// The parameters of a single render.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RenderConfig {
    /// The region of the complex plane to draw.
    pub viewport: Viewport,
    /// The image size.
    pub canvas: CanvasSize,
    /// Escape-time cutoff.  Points that last this long are treated as
    /// members of the set.
    pub max_iterations: usize,
    /// Entries in the rainbow gradient.  Must divide by 12.
    pub gradient_size: usize,
}

impl RenderConfig {
    /// Assemble and check a configuration.
    pub fn new(
        viewport: Viewport,
        canvas: CanvasSize,
        max_iterations: usize,
        gradient_size: usize,
    ) -> Result<RenderConfig, MandelError> {
        let config = RenderConfig {
            viewport,
            canvas,
            max_iterations,
            gradient_size,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject anything that would make a render meaningless.  This
    /// runs before any pixel is touched.
    pub fn validate(&self) -> Result<(), MandelError> {
        self.viewport.validate()?;
        self.canvas.validate()?;
        if self.max_iterations == 0 {
            return Err(MandelError::NoIterations);
        }
        if self.gradient_size == 0 || self.gradient_size % GRADIENT_STEP != 0 {
            return Err(MandelError::GradientSize(self.gradient_size));
        }
        Ok(())
    }

    /// A file name (without extension) that records every parameter of
    /// the render, so an image can be reproduced from its name.
    pub fn file_stem(&self) -> String {
        format!(
            "mandel-{},{}_{},{}_{}_{}_{}x{}",
            self.viewport.x_min,
            self.viewport.y_min,
            self.viewport.x_max,
            self.viewport.y_max,
            self.max_iterations,
            self.gradient_size,
            self.canvas.width,
            self.canvas.height
        )
    }
}

impl Default for RenderConfig {
    fn default() -> RenderConfig {
        RenderConfig {
            viewport: DEFAULT_VIEWPORT,
            canvas: CanvasSize {
                width: DEFAULT_WIDTH,
                height: 857,
            },
            max_iterations: DEFAULT_ITERATIONS,
            gradient_size: DEFAULT_GRADIENT_SIZE,
        }
    }
}
