// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The rainbow gradient: a closed trip around the hue wheel, built
//! once per render and then only ever read.

use log::debug;

use crate::MandelError;

/// An 8-bit-per-channel RGB color.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel.
    pub red: u8,
    /// Green channel.
    pub green: u8,
    /// Blue channel.
    pub blue: u8,
}

impl Color {
    /// The interior of the set.
    pub const BLACK: Color = Color {
        red: 0,
        green: 0,
        blue: 0,
    };

    /// Constructor.
    pub const fn new(red: u8, green: u8, blue: u8) -> Color {
        Color { red, green, blue }
    }

    /// The channels in the order an RGB image buffer stores them.
    pub fn channels(self) -> [u8; 3] {
        [self.red, self.green, self.blue]
    }
}

// The table is cut into six segments, and each segment's ramp is cut
// in half again, so the size has to divide by twelve.
pub(crate) const GRADIENT_STEP: usize = 12;

#[derive(Copy, Clone)]
enum Ramp {
    Up,
    Down,
}

#[derive(Copy, Clone)]
enum Channel {
    Red,
    Green,
    Blue,
}

// Each segment holds two channels at full strength (the ones not
// named here are zero, except the one that's ramping) and moves the
// third.  Read in order, they walk red -> magenta -> blue -> cyan ->
// green -> yellow and back to red.
const SEGMENTS: [(Channel, Channel, Ramp); 6] = [
    (Channel::Red, Channel::Blue, Ramp::Up),
    (Channel::Blue, Channel::Red, Ramp::Down),
    (Channel::Blue, Channel::Green, Ramp::Up),
    (Channel::Green, Channel::Blue, Ramp::Down),
    (Channel::Green, Channel::Red, Ramp::Up),
    (Channel::Red, Channel::Green, Ramp::Down),
];

fn ramp_value(ramp: Ramp, offset: usize, length: usize) -> u8 {
    let fraction = (offset as f64) / (length as f64);
    let level = match ramp {
        Ramp::Up => fraction,
        Ramp::Down => 1.0 - fraction,
    };
    (level * 255.0).round() as u8
}

fn segment_color(full: Channel, moving: Channel, value: u8) -> Color {
    let mut color = Color::BLACK;
    for &(channel, v) in &[(full, 255), (moving, value)] {
        match channel {
            Channel::Red => color.red = v,
            Channel::Green => color.green = v,
            Channel::Blue => color.blue = v,
        }
    }
    color
}

/// An immutable, cyclic table of colors.  Escape times index into
/// it modulo its length, so colors band and repeat as the escape time
/// grows past the table size.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GradientTable {
    colors: Vec<Color>,
}

impl GradientTable {
    /// Build the rainbow with `size` entries.  `size` must be a
    /// positive multiple of 12.
    pub fn build(size: usize) -> Result<GradientTable, MandelError> {
        if size == 0 || size % GRADIENT_STEP != 0 {
            return Err(MandelError::GradientSize(size));
        }

        let length = size / SEGMENTS.len();
        let colors: Vec<Color> = SEGMENTS
            .iter()
            .flat_map(|&(full, moving, ramp)| {
                (0..length).map(move |i| segment_color(full, moving, ramp_value(ramp, i, length)))
            })
            .collect();

        debug!("built {}-entry rainbow gradient, segments of {}", size, length);
        Ok(GradientTable { colors })
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Never true for a table that came out of `build`.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// The color for a given escape time, wrapping around the table.
    #[inline]
    pub fn cyclic(&self, index: usize) -> Color {
        self.colors[index % self.colors.len()]
    }

    /// The table in order.
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }
}
