// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The FrameRenderer walks every pixel of the canvas, maps it onto
//! the complex plane, times its escape, colors it, and hands it off.
//! There is a single-threaded path that feeds any `PixelSink` in
//! strict row-major order, and a threaded path that fills a
//! `FrameBuffer` in place, one row per work item.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use failure::Error;
use itertools::iproduct;
use log::{debug, info, warn};

use crate::colorize::colorize;
use crate::config::RenderConfig;
use crate::escape::escape_iterations;
use crate::gradient::{Color, GradientTable};
use crate::planes::{Pixel, PlaneMapper};
use crate::sink::{write_row, FrameBuffer, PixelSink};
use crate::MandelError;

/// How many progress ticks a full frame produces, give or take the
/// remainder.
pub const TICKS_PER_FRAME: usize = 120;

/// Counts pixels and says when another tick's worth has gone by.
#[derive(Debug, Clone)]
pub struct Progress {
    per_tick: usize,
    count: usize,
}

impl Progress {
    /// Spread `ticks` over `total` units of work.  Never ticks more
    /// than once per unit.
    pub fn new(total: usize, ticks: usize) -> Progress {
        Progress {
            per_tick: Progress::per_tick(total, ticks),
            count: 0,
        }
    }

    fn per_tick(total: usize, ticks: usize) -> usize {
        std::cmp::max(total / std::cmp::max(ticks, 1), 1)
    }

    /// Record one unit of work.  True when it completes a tick.
    pub fn advance(&mut self) -> bool {
        self.count += 1;
        if self.count == self.per_tick {
            self.count = 0;
            return true;
        }
        false
    }
}

/// A flag that stops a render between rows.  Clones share the flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// A token that hasn't been cancelled.
    pub fn new() -> CancelToken {
        CancelToken::default()
    }

    /// Ask every render holding this token to stop.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Has anyone asked us to stop?
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Holds a validated configuration, the plane mapping derived from
/// it, and the gradient, all fixed for the life of the renderer.  A
/// renderer can draw the same frame as many times as it is asked to.
#[derive(Debug)]
pub struct FrameRenderer {
    config: RenderConfig,
    plane: PlaneMapper,
    gradient: GradientTable,
}

impl FrameRenderer {
    /// Checks the configuration and builds the gradient.  Every
    /// configuration error surfaces here, before any pixel work.
    pub fn new(config: RenderConfig) -> Result<FrameRenderer, MandelError> {
        config.validate()?;
        let plane = PlaneMapper::new(config.canvas, config.viewport)?;
        let gradient = GradientTable::build(config.gradient_size)?;
        Ok(FrameRenderer {
            config,
            plane,
            gradient,
        })
    }

    /// The configuration this renderer was built from.
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// The gradient every pixel is colored from.
    pub fn gradient(&self) -> &GradientTable {
        &self.gradient
    }

    /// Every pixel of the canvas, row by row, left to right.  Each call
    /// starts over from 0,0.
    pub fn pixels(&self) -> impl Iterator<Item = Pixel> {
        iproduct!(0..self.config.canvas.height, 0..self.config.canvas.width)
            .map(|(y, x)| Pixel(x, y))
    }

    /// The finished color of one pixel.
    #[inline]
    pub fn color_at(&self, pixel: &Pixel) -> Color {
        let point = self.plane.pixel_to_point(pixel);
        let iterations = escape_iterations(point, self.config.max_iterations);
        colorize(iterations, self.config.max_iterations, &self.gradient)
    }

    /// Draw the whole frame into `sink`, single-threaded.
    pub fn render<S: PixelSink + ?Sized>(&self, sink: &mut S) -> Result<(), Error> {
        self.render_with_progress(sink, &CancelToken::new(), || {})
    }

    /// Draw the whole frame into `sink` in row-major order, calling
    /// `on_tick` roughly `TICKS_PER_FRAME` times along the way.  The
    /// first sink error ends the render and is returned as-is; the sink
    /// is only told the frame is complete if every pixel went through.
    pub fn render_with_progress<S, F>(
        &self,
        sink: &mut S,
        cancel: &CancelToken,
        mut on_tick: F,
    ) -> Result<(), Error>
    where
        S: PixelSink + ?Sized,
        F: FnMut(),
    {
        let started = Instant::now();
        let canvas = self.config.canvas;
        info!(
            "rendering {}x{}, {} iterations, gradient of {}",
            canvas.width, canvas.height, self.config.max_iterations, self.config.gradient_size
        );

        sink.begin_frame(canvas)?;
        let mut progress = Progress::new(canvas.len(), TICKS_PER_FRAME);
        for pixel in self.pixels() {
            if pixel.0 == 0 && cancel.is_cancelled() {
                warn!("render cancelled at row {}", pixel.1);
                return Err(MandelError::Cancelled.into());
            }
            sink.set_pixel(pixel.0, pixel.1, self.color_at(&pixel))?;
            if progress.advance() {
                on_tick();
            }
        }
        sink.frame_complete()?;

        info!("frame finished in {:?}", started.elapsed());
        Ok(())
    }

    /// Draw the frame with `threads` workers.  Workers take whole rows
    /// off a shared queue and write them straight into the frame; no
    /// two workers ever hold the same row.  `on_tick` may be called
    /// from any worker.  A cancelled render discards what it has.
    pub fn render_parallel<F>(
        &self,
        threads: usize,
        cancel: &CancelToken,
        on_tick: F,
    ) -> Result<FrameBuffer, Error>
    where
        F: Fn() + Sync,
    {
        let started = Instant::now();
        let canvas = self.config.canvas;
        let threads = std::cmp::max(threads, 1);
        info!(
            "rendering {}x{}, {} iterations, gradient of {}, {} threads",
            canvas.width,
            canvas.height,
            self.config.max_iterations,
            self.config.gradient_size,
            threads
        );

        let per_tick = Progress::per_tick(canvas.len(), TICKS_PER_FRAME);
        let done = AtomicUsize::new(0);
        let mut frame = FrameBuffer::new(canvas);
        {
            let rows = Mutex::new(frame.rows_mut().enumerate());
            let (rows, done, on_tick) = (&rows, &done, &on_tick);
            crossbeam::scope(|spawner| {
                for worker in 0..threads {
                    spawner.spawn(move |_| loop {
                        if cancel.is_cancelled() {
                            break;
                        }
                        // A poisoned queue means another worker died;
                        // the scope reports that below.
                        let next = match rows.lock() {
                            Ok(mut rows) => rows.next(),
                            Err(_) => None,
                        };
                        let (y, row) = match next {
                            Some(next) => next,
                            None => break,
                        };
                        write_row(
                            row,
                            (0..canvas.width).map(|x| self.color_at(&Pixel(x, y))),
                        );
                        let before = done.fetch_add(canvas.width, Ordering::Relaxed);
                        let after = before + canvas.width;
                        for _ in 0..(after / per_tick - before / per_tick) {
                            on_tick();
                        }
                        debug!("worker {} finished row {}", worker, y);
                    });
                }
            })
            .map_err(|_| MandelError::WorkerPanicked)?;
        }

        if cancel.is_cancelled() {
            warn!(
                "render cancelled after {} of {} pixels",
                done.load(Ordering::Relaxed),
                canvas.len()
            );
            return Err(MandelError::Cancelled.into());
        }

        frame.mark_complete();
        info!("frame finished in {:?}", started.elapsed());
        Ok(frame)
    }
}
