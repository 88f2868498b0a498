// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Where finished pixels go.  The renderer only knows about the
//! `PixelSink` trait; a window, a file, or a plain buffer can sit
//! behind it.

use std::fs::File;
use std::path::Path;

use failure::Error;
use image::png::PNGEncoder;
use image::pnm::{PNMEncoder, PNMSubtype, SampleEncoding};
use image::ColorType;
use log::debug;

use crate::gradient::Color;
use crate::planes::CanvasSize;
use crate::MandelError;

/// Receives colored pixels from a renderer.  Writes may arrive in any
/// order; no pixel depends on another.
pub trait PixelSink {
    /// Called once, before the first pixel of a frame is written.
    fn begin_frame(&mut self, _canvas: CanvasSize) -> Result<(), Error> {
        Ok(())
    }

    /// Store one pixel.
    fn set_pixel(&mut self, x: usize, y: usize, color: Color) -> Result<(), Error>;

    /// Called once, after every pixel of the frame has been written.
    fn frame_complete(&mut self) -> Result<(), Error> {
        Ok(())
    }
}

const CHANNELS: usize = 3;

/// A row-major RGB image held in memory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    canvas: CanvasSize,
    pixels: Vec<u8>,
    complete: bool,
}

impl FrameBuffer {
    /// A black frame the size of the canvas.
    pub fn new(canvas: CanvasSize) -> FrameBuffer {
        FrameBuffer {
            canvas,
            pixels: vec![0 as u8; canvas.len() * CHANNELS],
            complete: false,
        }
    }

    /// Canvas dimensions.
    pub fn canvas(&self) -> CanvasSize {
        self.canvas
    }

    /// True once `frame_complete` has been called.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// The raw RGB bytes, three per pixel, row by row.
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// The color stored at `x`, `y`, if that's on the canvas.
    pub fn get(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.canvas.width || y >= self.canvas.height {
            return None;
        }
        let offset = (y * self.canvas.width + x) * CHANNELS;
        let p = &self.pixels[offset..offset + CHANNELS];
        Some(Color::new(p[0], p[1], p[2]))
    }

    /// Mutable rows of raw bytes, for renderers that fill the buffer
    /// in place.  Rows are disjoint, so each can go to a different
    /// worker.
    pub(crate) fn rows_mut(&mut self) -> std::slice::ChunksMut<'_, u8> {
        let stride = self.canvas.width * CHANNELS;
        self.pixels.chunks_mut(stride)
    }

    pub(crate) fn mark_complete(&mut self) {
        self.complete = true;
    }
}

impl PixelSink for FrameBuffer {
    fn begin_frame(&mut self, canvas: CanvasSize) -> Result<(), Error> {
        self.complete = false;
        if canvas != self.canvas {
            return Err(MandelError::CanvasMismatch {
                frame_width: self.canvas.width,
                frame_height: self.canvas.height,
                width: canvas.width,
                height: canvas.height,
            }
            .into());
        }
        Ok(())
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: Color) -> Result<(), Error> {
        if x >= self.canvas.width || y >= self.canvas.height {
            return Err(MandelError::PixelOutOfBounds { x, y }.into());
        }
        self.complete = false;
        let offset = (y * self.canvas.width + x) * CHANNELS;
        self.pixels[offset..offset + CHANNELS].copy_from_slice(&color.channels());
        Ok(())
    }

    fn frame_complete(&mut self) -> Result<(), Error> {
        self.complete = true;
        Ok(())
    }
}

/// Write each pixel into a single row of bytes.
pub(crate) fn write_row(row: &mut [u8], colors: impl Iterator<Item = Color>) {
    for (target, color) in row.chunks_mut(CHANNELS).zip(colors) {
        target.copy_from_slice(&color.channels());
    }
}

/// Encode a finished frame to disk.  Files ending in `.ppm` or `.pnm`
/// are written as binary pixmaps; everything else is PNG.
pub fn write_image<P: AsRef<Path>>(path: P, frame: &FrameBuffer) -> Result<(), Error> {
    if !frame.is_complete() {
        return Err(MandelError::IncompleteFrame.into());
    }

    let path = path.as_ref();
    let (width, height) = (frame.canvas.width as u32, frame.canvas.height as u32);
    let output = File::create(path)?;
    let pixmap = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("ppm") || e.eq_ignore_ascii_case("pnm"))
        .unwrap_or(false);

    if pixmap {
        let mut encoder =
            PNMEncoder::new(output).with_subtype(PNMSubtype::Pixmap(SampleEncoding::Binary));
        encoder.encode(frame.as_bytes(), width, height, ColorType::RGB(8))?;
    } else {
        PNGEncoder::new(output).encode(frame.as_bytes(), width, height, ColorType::RGB(8))?;
    }
    debug!("wrote {}x{} image to {}", width, height, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas(w: usize, h: usize) -> CanvasSize {
        CanvasSize::new(w, h).unwrap()
    }

    #[test]
    fn new_frames_are_black_and_unfinished() {
        let fb = FrameBuffer::new(canvas(3, 2));
        assert_eq!(fb.as_bytes().len(), 18);
        assert!(fb.as_bytes().iter().all(|&b| b == 0));
        assert!(!fb.is_complete());
    }

    #[test]
    fn set_pixel_lands_row_major() {
        let mut fb = FrameBuffer::new(canvas(3, 2));
        fb.set_pixel(1, 1, Color::new(1, 2, 3)).unwrap();
        assert_eq!(&fb.as_bytes()[12..15], &[1, 2, 3]);
        assert_eq!(fb.get(1, 1), Some(Color::new(1, 2, 3)));
        assert_eq!(fb.get(3, 0), None);
    }

    #[test]
    fn out_of_bounds_writes_fail() {
        let mut fb = FrameBuffer::new(canvas(3, 2));
        let err = fb.set_pixel(0, 2, Color::BLACK).unwrap_err();
        match err.downcast_ref::<MandelError>() {
            Some(MandelError::PixelOutOfBounds { x: 0, y: 2 }) => {}
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn writing_into_a_finished_frame_unfinishes_it() {
        let mut fb = FrameBuffer::new(canvas(2, 2));
        fb.frame_complete().unwrap();
        fb.set_pixel(0, 0, Color::new(9, 9, 9)).unwrap();
        assert!(!fb.is_complete());

        fb.frame_complete().unwrap();
        fb.begin_frame(canvas(2, 2)).unwrap();
        assert!(!fb.is_complete());
    }

    #[test]
    fn frames_only_take_their_own_canvas() {
        let mut fb = FrameBuffer::new(canvas(4, 4));
        fb.frame_complete().unwrap();
        let err = fb.begin_frame(canvas(2, 2)).unwrap_err();
        match err.downcast_ref::<MandelError>() {
            Some(MandelError::CanvasMismatch {
                frame_width: 4,
                width: 2,
                ..
            }) => {}
            other => panic!("unexpected error {:?}", other),
        }
        assert!(!fb.is_complete());
    }

    #[test]
    fn refuses_to_write_unfinished_frames() {
        let dir = tempfile::tempdir().unwrap();
        let fb = FrameBuffer::new(canvas(2, 2));
        let err = write_image(dir.path().join("partial.png"), &fb).unwrap_err();
        assert!(err.downcast_ref::<MandelError>().is_some());
        assert!(!dir.path().join("partial.png").exists());
    }

    #[test]
    fn writes_png_and_ppm() {
        let dir = tempfile::tempdir().unwrap();
        let mut fb = FrameBuffer::new(canvas(2, 2));
        fb.set_pixel(1, 0, Color::new(255, 0, 0)).unwrap();
        fb.frame_complete().unwrap();

        let png = dir.path().join("frame.png");
        write_image(&png, &fb).unwrap();
        let decoded = image::open(&png).unwrap().to_rgb();
        assert_eq!(decoded.width(), 2);
        assert_eq!(decoded.into_raw(), fb.as_bytes().to_vec());

        let ppm = dir.path().join("frame.ppm");
        write_image(&ppm, &fb).unwrap();
        let bytes = std::fs::read(&ppm).unwrap();
        assert!(bytes.starts_with(b"P6"));
        assert!(bytes.ends_with(fb.as_bytes()));
    }
}
