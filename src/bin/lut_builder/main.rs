mod band_arg;

use clap::{App, Arg, ArgMatches};

use false_color::{
    engine::SUPPORTED_CUBE_SIZES, presets::suggest_color, ExposureMode, LutEngine,
    ProfileRegistry,
};
use lib::{
    config::{ClipStrategyConfig, ConfigError, ModeConfig, SessionConfig},
    logger, preview,
};

const PREVIEW_WIDTH: usize = 72;

#[derive(thiserror::Error, Debug)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Lut(#[from] false_color::Error),

    #[error("{0}")]
    Args(String),
}

fn main() {
    let matches = app().get_matches();

    logger::init();

    if let Err(e) = run(&matches) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn app() -> App<'static, 'static> {
    App::new("LUT Builder")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Generates false-color exposure LUTs for camera log footage")
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("FILE")
                .help("Replays a saved session.  Other options override its values")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("camera")
                .long("camera")
                .value_name("NAME")
                .help("Camera profile, e.g. \"Sony S-Log3\"")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("target")
                .long("target")
                .value_name("NAME")
                .help("Target display profile, e.g. \"Rec.709\"")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("size")
                .short("s")
                .long("size")
                .value_name("N")
                .help("Cube size (17, 33, or 65 are typical)")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("band")
                .short("b")
                .long("band")
                .value_name("CENTER[:HEX[:WIDTH]]")
                .help("Adds a false-color band.  Later bands win where they overlap")
                .takes_value(true)
                .multiple(true)
                .number_of_values(1)
                .allow_hyphen_values(true),
        )
        .arg(
            Arg::with_name("ire")
                .long("ire")
                .help("Measure bands in IRE instead of stops"),
        )
        .arg(
            Arg::with_name("black_clip")
                .long("black-clip")
                .value_name("HEX")
                .help("Paints crushed blacks with this color")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("white_clip")
                .long("white-clip")
                .value_name("HEX")
                .help("Paints clipped whites with this color")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("legacy_clip")
                .long("legacy-clip")
                .help("Measure clipping in scene stops instead of log code values"),
        )
        .arg(
            Arg::with_name("mono")
                .long("mono")
                .help("Monochrome base image"),
        )
        .arg(
            Arg::with_name("legal")
                .long("legal")
                .help("Rescale output to legal (video) range"),
        )
        .arg(
            Arg::with_name("opacity")
                .long("opacity")
                .value_name("AMOUNT")
                .help("Band opacity, from 0.0 to 1.0")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .value_name("FILE")
                .help("Output .cube file")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("save_config")
                .long("save-config")
                .value_name("FILE")
                .help("Saves the session for later replay")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("list")
                .short("l")
                .long("list")
                .help("Lists the available camera and target profiles"),
        )
        .arg(
            Arg::with_name("suggest")
                .long("suggest")
                .value_name("VALUE")
                .help("Prints the suggested band color for a stop (or IRE) value")
                .takes_value(true)
                .allow_hyphen_values(true),
        )
}

fn run(matches: &ArgMatches) -> Result<(), AppError> {
    let registry = ProfileRegistry::builtin()?;

    if matches.is_present("list") {
        println!("Cameras:");
        for camera in registry.cameras() {
            println!(
                "  {:<18} {} / {}  ({:+.1} to {:+.1} stops)",
                camera.name,
                camera.gamut.name,
                camera.log_curve.name(),
                camera.black_clip_stops,
                camera.white_clip_stops,
            );
        }
        println!("Targets:");
        for target in registry.targets() {
            println!(
                "  {:<18} {} / {} ({})",
                target.name,
                target.gamut.name,
                target.transfer_function.name(),
                target.transfer_function.kind().as_str(),
            );
        }
        return Ok(());
    }

    if let Some(value) = matches.value_of("suggest") {
        let mode = if matches.is_present("ire") {
            ExposureMode::Ire
        } else {
            ExposureMode::Stops
        };
        let value: f64 = parse_arg(value, "suggest")?;
        let suggestion = suggest_color(value, mode);
        println!(
            "{} {}: {}-{}",
            value,
            mode.unit(),
            suggestion.family,
            suggestion.shade
        );
        println!("{}", suggestion.hex);
        return Ok(());
    }

    let session = build_session(matches)?;
    if let Some(path) = matches.value_of("save_config") {
        session.save(path)?;
    }

    let request = session.to_request()?;
    if !SUPPORTED_CUBE_SIZES.contains(&request.cube_size) {
        tracing::warn!(
            "Cube size {} is unusual; most software expects one of {:?}.",
            request.cube_size,
            SUPPORTED_CUBE_SIZES
        );
    }

    let camera = registry.camera(&request.camera)?;
    let bar = preview::exposure_bar(camera, &request, PREVIEW_WIDTH);
    println!(
        "{}",
        preview::render_ansi(&bar, preview::bar_range(camera, request.mode), request.mode)
    );

    let engine = LutEngine::new(&registry);
    let artifact = engine.generate(&request)?;
    println!("{}", artifact.path.display());

    Ok(())
}

/// Builds the session from `--config` (if given) and the other flags.
fn build_session(matches: &ArgMatches) -> Result<SessionConfig, AppError> {
    let mut session = match matches.value_of("config") {
        Some(path) => SessionConfig::load(path)?,
        None => {
            let camera = matches
                .value_of("camera")
                .ok_or_else(|| AppError::Args("--camera is required without --config".into()))?;
            let target = matches
                .value_of("target")
                .ok_or_else(|| AppError::Args("--target is required without --config".into()))?;
            SessionConfig::new(camera, target)
        }
    };

    if let Some(camera) = matches.value_of("camera") {
        session.profile = camera.into();
    }
    if let Some(target) = matches.value_of("target") {
        session.target = target.into();
    }
    if let Some(size) = matches.value_of("size") {
        session.cube_size = parse_arg(size, "size")?;
    }
    if matches.is_present("ire") {
        session.mode = ModeConfig::Ire;
    }

    if let Some(bands) = matches.values_of("band") {
        let mode = match session.mode {
            ModeConfig::Stops => ExposureMode::Stops,
            ModeConfig::Ire => ExposureMode::Ire,
        };
        session.bands = bands
            .map(|b| band_arg::parse(b, mode))
            .collect::<Result<_, _>>()
            .map_err(AppError::Args)?;
    }

    if let Some(hex) = matches.value_of("black_clip") {
        session.black_clip = true;
        session.black_hex = Some(hex.into());
    }
    if let Some(hex) = matches.value_of("white_clip") {
        session.white_clip = true;
        session.white_hex = Some(hex.into());
    }
    if matches.is_present("legacy_clip") {
        session.clip_strategy = ClipStrategyConfig::SceneStops;
    }
    if matches.is_present("mono") {
        session.monochrome = true;
    }
    if matches.is_present("legal") {
        session.legal_range = true;
    }
    if let Some(opacity) = matches.value_of("opacity") {
        session.band_opacity = parse_arg(opacity, "opacity")?;
    }
    if let Some(output) = matches.value_of("output") {
        session.output = Some(output.into());
    }

    Ok(session)
}

fn parse_arg<T: std::str::FromStr>(text: &str, name: &str) -> Result<T, AppError> {
    text.parse()
        .map_err(|_| AppError::Args(format!("invalid value for --{}: \"{}\"", name, text)))
}
