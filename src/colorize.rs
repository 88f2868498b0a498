// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Turns an escape time into a pixel color.

use crate::gradient::{Color, GradientTable};

/// Pick the gradient entry for `iterations` and dim it in proportion
/// to how long the point took to escape.  Points that escape quickly
/// are close to black; points that never escape are black.
#[inline]
pub fn colorize(iterations: usize, limit: usize, gradient: &GradientTable) -> Color {
    if iterations >= limit {
        return Color::BLACK;
    }
    let intensity = (iterations as f64) / (limit as f64);
    let base = gradient.cyclic(iterations);
    let dim = |channel: u8| (f64::from(channel) * intensity).round() as u8;
    Color::new(dim(base.red), dim(base.green), dim(base.blue))
}
