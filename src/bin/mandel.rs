extern crate clap;
extern crate env_logger;
extern crate mandelbrot;
extern crate num;
extern crate num_cpus;

use clap::{App, Arg, ArgMatches};
use failure::Error;
use log::info;
use mandelbrot::{
    write_image, CancelToken, CanvasSize, FrameBuffer, FrameRenderer, RenderConfig, Viewport,
    MAX_DIMENSION,
};
use num::Complex;
use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;

fn parse_pair<T>(s: &str, separator: char) -> Option<(T, T)>
where
    T: FromStr,
{
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

fn parse_complex(s: &str) -> Option<Complex<f64>> {
    match parse_pair(s, ',') {
        Some((re, im)) => Some(Complex { re, im }),
        None => None,
    }
}

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_range<T: FromStr + Ord>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

fn validate_side(s: &str, side: &str) -> Result<(), String> {
    validate_range(
        s,
        1,
        MAX_DIMENSION,
        &format!("Could not parse image {}", side),
        &format!("Image {} must be between 1 and {}", side, MAX_DIMENSION),
    )
}

fn validate_gradient(s: &str) -> Result<(), String> {
    validate_range(
        s,
        12,
        120_000,
        "Could not parse gradient size",
        "Gradient size must be between 12 and 120000",
    )?;
    match usize::from_str(s) {
        Ok(n) if n % 12 == 0 => Ok(()),
        _ => Err("Gradient size must be a multiple of 12".to_string()),
    }
}

const OUTPUT: &str = "output";
const DIRECTORY: &str = "directory";
const WIDTH: &str = "width";
const HEIGHT: &str = "height";
const LEFTLOWER: &str = "leftlower";
const RIGHTUPPER: &str = "rightupper";
const ITERATIONS: &str = "iterations";
const GRADIENT: &str = "gradient";
const THREADS: &str = "threads";
const QUIET: &str = "quiet";

fn args<'a>() -> ArgMatches<'a> {
    let max_threads = num_cpus::get();

    App::new("mandel")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Escape-time Mandelbrot renderer")
        .arg(
            Arg::with_name(OUTPUT)
                .required(false)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output file, .png or .ppm; named after the parameters if absent"),
        )
        .arg(
            Arg::with_name(DIRECTORY)
                .required(false)
                .long(DIRECTORY)
                .short("d")
                .takes_value(true)
                .default_value(".")
                .help("Directory for the parameter-named output file; ignored with --output"),
        )
        .arg(
            Arg::with_name(WIDTH)
                .required(false)
                .long(WIDTH)
                .short("w")
                .takes_value(true)
                .default_value("1200")
                .validator(|s| validate_side(&s, "width"))
                .help("Width of output image"),
        )
        .arg(
            Arg::with_name(HEIGHT)
                .required(false)
                .long(HEIGHT)
                .takes_value(true)
                .validator(|s| validate_side(&s, "height"))
                .help("Height of output image; follows the viewport's aspect ratio if absent"),
        )
        .arg(
            Arg::with_name(LEFTLOWER)
                .required(false)
                .long(LEFTLOWER)
                .short("l")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("-2.5,-1.25")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse left lower corner"))
                .help("Left lower corner of the mandelbrot space"),
        )
        .arg(
            Arg::with_name(RIGHTUPPER)
                .required(false)
                .long(RIGHTUPPER)
                .short("r")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("1,1.25")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse right upper corner"))
                .help("Right upper corner of the mandelbrot space"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .required(false)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("48")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        1_000_000,
                        "Could not parse iteration count",
                        "Iteration count must be between 1 and 1000000",
                    )
                })
                .help("Maximum number of iterations per point"),
        )
        .arg(
            Arg::with_name(GRADIENT)
                .required(false)
                .long(GRADIENT)
                .short("g")
                .takes_value(true)
                .default_value("48")
                .validator(|s| validate_gradient(&s))
                .help("Number of colors in the rainbow gradient (a multiple of 12)"),
        )
        .arg(
            Arg::with_name(THREADS)
                .required(false)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .default_value("1")
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        max_threads,
                        "Could not parse thread count",
                        &format!("Thread count must be between 1 and {}", max_threads),
                    )
                })
                .help("Number of threads to use in renderer"),
        )
        .arg(
            Arg::with_name(QUIET)
                .long(QUIET)
                .short("q")
                .help("Do not print progress dots"),
        )
        .get_matches()
}

// Clap has already run the validators, so a parse failure here is a
// mismatch between a validator and its parser.
fn value<T: FromStr>(matches: &ArgMatches, name: &str) -> Result<T, Error> {
    matches
        .value_of(name)
        .and_then(|s| T::from_str(s).ok())
        .ok_or_else(|| failure::format_err!("Could not parse {}", name))
}

fn corner(matches: &ArgMatches, name: &str) -> Result<Complex<f64>, Error> {
    matches
        .value_of(name)
        .and_then(parse_complex)
        .ok_or_else(|| failure::format_err!("Could not parse {}", name))
}

fn config(matches: &ArgMatches) -> Result<RenderConfig, Error> {
    let viewport =
        Viewport::from_corners(corner(matches, LEFTLOWER)?, corner(matches, RIGHTUPPER)?)?;
    let width = value::<usize>(matches, WIDTH)?;
    let canvas = match matches.value_of(HEIGHT) {
        Some(_) => CanvasSize::new(width, value::<usize>(matches, HEIGHT)?)?,
        None => CanvasSize::from_width(width, &viewport)?,
    };
    Ok(RenderConfig::new(
        viewport,
        canvas,
        value(matches, ITERATIONS)?,
        value(matches, GRADIENT)?,
    )?)
}

fn tick() {
    eprint!(".");
    std::io::stderr().flush().ok();
}

fn run(matches: &ArgMatches) -> Result<PathBuf, Error> {
    let config = config(matches)?;
    let renderer = FrameRenderer::new(config)?;
    let threads = value::<usize>(matches, THREADS)?;
    let quiet = matches.is_present(QUIET);
    let on_tick = || {
        if !quiet {
            tick()
        }
    };

    let cancel = CancelToken::new();
    let frame = if threads == 1 {
        let mut frame = FrameBuffer::new(config.canvas);
        renderer.render_with_progress(&mut frame, &cancel, on_tick)?;
        frame
    } else {
        renderer.render_parallel(threads, &cancel, on_tick)?
    };
    if !quiet {
        eprintln!();
    }

    let path = match matches.value_of(OUTPUT) {
        Some(output) => PathBuf::from(output),
        None => PathBuf::from(matches.value_of(DIRECTORY).unwrap_or("."))
            .join(format!("{}.png", config.file_stem())),
    };
    write_image(&path, &frame)?;
    Ok(path)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let matches = args();
    match run(&matches) {
        Err(e) => {
            eprintln!("Render failure: {}", e);
            std::process::exit(1);
        }
        Ok(path) => {
            info!("saved {}", path.display());
            println!("{}", path.display());
        }
    }
}
