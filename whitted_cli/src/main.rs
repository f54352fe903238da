use std::{
    path::Path,
    str::FromStr,
    thread,
    time::{Duration, Instant},
};

use clap::{value_t, App, Arg, ArgMatches};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn, LevelFilter};
use thiserror::Error;
use whitted::{render::height_for, CancelToken, RenderError, RenderStatus, Tracer};

use crate::description::{Description, DescriptionError};

mod description;
mod logger;

#[derive(Debug, Error)]
enum AppError {
    #[error("{0}")]
    Description(#[from] DescriptionError),

    #[error("{0}")]
    Render(#[from] RenderError),
}

fn main() {
    let matches = App::new("whitted")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Renders a JSON scene description with a recursive Whitted ray tracer")
        .arg(
            Arg::with_name("SCENE")
                .help("The scene description file")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("output")
                .long("output")
                .short("o")
                .help("The output image; the format follows the extension")
                .default_value("render.png"),
        )
        .arg(
            Arg::with_name("width")
                .long("width")
                .short("w")
                .help("Image width in pixels")
                .default_value("512"),
        )
        .arg(
            Arg::with_name("height")
                .long("height")
                .help("Image height in pixels; follows the camera's aspect ratio when omitted")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("depth")
                .long("depth")
                .short("d")
                .help("Maximum reflect/refract recursion depth")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("threshold")
                .long("threshold")
                .short("t")
                .help("Stop recursing once a ray's intensity falls to this value; 0 disables")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("time-limit")
                .long("time-limit")
                .help("Cancel the render after this many seconds and keep what is done")
                .takes_value(true)
                .validator(|value| time_limit(&value).map(|_| ())),
        )
        .arg(
            Arg::with_name("log-level")
                .long("log-level")
                .help("Logging verbosity")
                .possible_values(&["error", "warn", "info", "debug", "trace"])
                .default_value("info"),
        )
        .get_matches();

    let level = matches
        .value_of("log-level")
        .and_then(|level| LevelFilter::from_str(level).ok())
        .unwrap_or(LevelFilter::Info);
    logger::init_logger(level);

    if let Err(e) = run(&matches) {
        error!("Failed to render: {}", e);
        std::process::exit(1);
    }
}

fn run(matches: &ArgMatches) -> Result<(), AppError> {
    let now = Instant::now();

    // SCENE is required and output has a default, so clap guarantees both
    let source = Path::new(matches.value_of("SCENE").unwrap_or_default());
    let output = matches.value_of("output").unwrap_or("render.png");

    let description = Description::open(source)?;
    let mut options = description.trace_options();
    if matches.is_present("depth") {
        options.max_depth = value_t!(matches, "depth", u32).unwrap_or_else(|e| e.exit());
    }
    if matches.is_present("threshold") {
        options.intensity_threshold =
            value_t!(matches, "threshold", f64).unwrap_or_else(|e| e.exit());
    }

    let base = source.parent().unwrap_or_else(|| Path::new("."));
    let scene = description.into_scene(base)?;
    info!("Scene constructed in {:.3}s", now.elapsed().as_secs_f32());
    debug!(
        "camera at {:?} with a {} degree field of view",
        scene.camera().eye(),
        scene.camera().fov()
    );

    let width = value_t!(matches, "width", u32).unwrap_or_else(|e| e.exit());
    let height = if matches.is_present("height") {
        value_t!(matches, "height", u32).unwrap_or_else(|e| e.exit())
    } else {
        height_for(width, scene.camera().aspect_ratio())
    };

    let cancel = CancelToken::new();
    if matches.is_present("time-limit") {
        let limit = matches
            .value_of("time-limit")
            .map(time_limit)
            .unwrap_or(Ok(Duration::ZERO))
            .unwrap_or_else(|e| {
                clap::Error::with_description(&e, clap::ErrorKind::InvalidValue).exit()
            });
        let token = cancel.clone();
        thread::spawn(move || {
            thread::sleep(limit);
            debug!("time limit of {:?} reached", limit);
            token.cancel();
        });
    }

    let progress = ProgressBar::new(height as u64);
    progress.set_style(
        ProgressStyle::with_template("{elapsed_precise} [{bar:40}] {pos}/{len} rows ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let tracer = Tracer::new(&scene, options);
    let render = whitted::render(&tracer, width, height, &cancel, &progress)?;
    progress.finish_and_clear();

    if let RenderStatus::Cancelled { rows_traced } = render.status {
        warn!(
            "Render stopped early, {} of {} rows traced",
            rows_traced, height
        );
    }

    render.frame.save(output)?;
    info!(
        "Wrote {} ({}x{}) in {:.3}s",
        output,
        width,
        height,
        now.elapsed().as_secs_f32()
    );

    Ok(())
}

/// Parse a `--time-limit` value in seconds.
fn time_limit(value: &str) -> Result<Duration, String> {
    let seconds: f64 = value
        .parse()
        .map_err(|_| format!("'{}' is not a number of seconds", value))?;
    Duration::try_from_secs_f64(seconds)
        .map_err(|_| format!("'{}' is not a usable time limit", value))
}
