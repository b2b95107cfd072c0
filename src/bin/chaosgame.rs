extern crate chaosgame;
extern crate clap;
extern crate num_cpus;

use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use failure::Error;
use rand::rngs::StdRng;
use std::str::FromStr;
use tracing::info;
use tracing_subscriber::EnvFilter;

use chaosgame::params;
use chaosgame::polygon::optimal_ratio;
use chaosgame::variations::fit_unit_square;
use chaosgame::{
    AffineIfs, ChaosGame, ColorScheme, Colormap, Colors, InvalidParameter, Point, Renderer,
    RngSource, Variation, Variations, DEFAULT_DISCARD,
};

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const THREADS: &str = "threads";
const SEED: &str = "seed";
const COLORMAP: &str = "colormap";
const VARIATION: &str = "variation";
const SIDES: &str = "sides";
const RATIO: &str = "ratio";
const STEPS: &str = "steps";
const DISCARD: &str = "discard";
const COLOR: &str = "color";

const NGON: &str = "ngon";
const FERN: &str = "fern";

// Fern green, for ferns drawn without per-point colors.
const GREEN: [u8; 3] = [0, 128, 0];

fn validate_range(s: &str, low: usize, high: usize, isnotinrange_err: &str) -> Result<(), String> {
    match params::count("value", s) {
        Ok(i) if i >= low && i <= high => Ok(()),
        Ok(_) => Err(isnotinrange_err.to_string()),
        Err(e) => Err(e.to_string()),
    }
}

/// Lifts a library parser into a clap validator, so the command line
/// rejects exactly what the library would.
fn validate_with<T, E, F>(parse: F) -> impl Fn(String) -> Result<(), String>
where
    E: ToString,
    F: Fn(&str) -> Result<T, E>,
{
    move |s| parse(&s).map(|_| ()).map_err(|e| e.to_string())
}

fn validate_ratio(s: String) -> Result<(), String> {
    if s == "optimal" {
        return Ok(());
    }
    params::ratio(&s).map(|_| ()).map_err(|e| e.to_string())
}

fn validate_variation(s: String) -> Result<(), String> {
    let (name, _) = params::weighted_name(&s).map_err(|e| e.to_string())?;
    Variation::from_str(&name).map(|_| ()).map_err(|e| e.to_string())
}

fn steps_arg<'a, 'b>(default: &'a str) -> Arg<'a, 'b> {
    Arg::with_name(STEPS)
        .long(STEPS)
        .takes_value(true)
        .default_value(default)
        .validator(|s| {
            validate_range(
                &s,
                1,
                params::MAX_STEPS,
                &format!("Steps must be between 1 and {}", params::MAX_STEPS),
            )
        })
        .help("Number of iterations")
}

fn color_arg<'a, 'b>() -> Arg<'a, 'b> {
    Arg::with_name(COLOR)
        .long(COLOR)
        .takes_value(true)
        .default_value("uniform")
        .possible_values(&["uniform", "categorical", "gradient", "rgb"])
        .help("How points are colored by the corner or map that produced them")
}

/// The arguments every subcommand takes.
fn common_args<'a, 'b>() -> Vec<Arg<'a, 'b>> {
    let max_threads = num_cpus::get();

    vec![
        Arg::with_name(OUTPUT)
            .required(true)
            .long(OUTPUT)
            .short("o")
            .takes_value(true)
            .validator(validate_with(chaosgame::render::png_path))
            .help("Output file; .png is appended when there is no extension"),
        Arg::with_name(SIZE)
            .long(SIZE)
            .short("s")
            .takes_value(true)
            .default_value("800x800")
            .validator(validate_with(params::size))
            .help("Size of output image"),
        Arg::with_name(THREADS)
            .long(THREADS)
            .short("t")
            .takes_value(true)
            .default_value("1")
            .validator(move |s| {
                validate_range(
                    &s,
                    1,
                    max_threads,
                    &format!("Thread count must be between 1 and {}", max_threads),
                )
            })
            .help("Number of threads to draw with"),
        Arg::with_name(SEED)
            .long(SEED)
            .takes_value(true)
            .validator(validate_with(u64::from_str))
            .help("Seed for a reproducible picture"),
        Arg::with_name(COLORMAP)
            .long(COLORMAP)
            .short("c")
            .takes_value(true)
            .default_value("jet")
            .validator(validate_with(Colormap::from_str))
            .help("Colormap for gradient colors: jet, gray or hot"),
        Arg::with_name(VARIATION)
            .long(VARIATION)
            .takes_value(true)
            .multiple(true)
            .number_of_values(1)
            .validator(validate_variation)
            .help("Blend the points through a variation, as name or name:weight"),
    ]
}

fn args<'a>() -> ArgMatches<'a> {
    App::new("chaosgame")
        .version("0.1.0")
        .about("Chaos game, Barnsley fern and fractal flame renderer")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .subcommand(
            SubCommand::with_name(NGON)
                .about("Play the chaos game on a regular polygon")
                .args(&common_args())
                .arg(
                    Arg::with_name(SIDES)
                        .long(SIDES)
                        .short("n")
                        .takes_value(true)
                        .allow_hyphen_values(true)
                        .default_value("3")
                        .validator(validate_with(params::sides))
                        .help("Number of corners"),
                )
                .arg(
                    Arg::with_name(RATIO)
                        .long(RATIO)
                        .short("r")
                        .takes_value(true)
                        .allow_hyphen_values(true)
                        .default_value("0.5")
                        .validator(validate_ratio)
                        .help("Share of the current point kept on each jump, or 'optimal'"),
                )
                .arg(steps_arg("10000"))
                .arg(
                    Arg::with_name(DISCARD)
                        .long(DISCARD)
                        .takes_value(true)
                        .validator(validate_with(|s| params::count("discard", s)))
                        .help("Number of early points thrown away before drawing"),
                )
                .arg(color_arg()),
        )
        .subcommand(
            SubCommand::with_name(FERN)
                .about("Grow a Barnsley fern")
                .args(&common_args())
                .arg(steps_arg("50000"))
                .arg(color_arg()),
        )
        .get_matches()
}

/// Everything the subcommands share.
struct Picture {
    output: String,
    renderer: Renderer,
    seed: Option<u64>,
    variations: Vec<(Variation, f64)>,
}

impl Picture {
    fn from_matches(matches: &ArgMatches) -> Result<Picture, Error> {
        let (width, height) = params::size(matches.value_of(SIZE).unwrap_or("800x800"))?;
        let threads = params::count("threads", matches.value_of(THREADS).unwrap_or("1"))?;
        let colormap = Colormap::from_str(matches.value_of(COLORMAP).unwrap_or("jet"))?;
        let seed = match matches.value_of(SEED) {
            Some(s) => Some(u64::from_str(s)?),
            None => None,
        };
        let variations = matches
            .values_of(VARIATION)
            .map(|values| {
                values
                    .map(|v| -> Result<(Variation, f64), InvalidParameter> {
                        let (name, weight) = params::weighted_name(v)?;
                        Ok((Variation::from_str(&name)?, weight))
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .unwrap_or_else(|| Ok(vec![]))?;
        Ok(Picture {
            output: matches.value_of(OUTPUT).unwrap_or_default().to_string(),
            renderer: Renderer::new(width, height)?
                .threads(threads)
                .colormap(colormap),
            seed,
            variations,
        })
    }

    fn rng(&self) -> RngSource<StdRng> {
        match self.seed {
            Some(seed) => RngSource::seeded(seed),
            None => RngSource::from_entropy(),
        }
    }

    fn draw(self, points: Vec<Point>, colors: Colors) -> Result<(), Error> {
        let points = if self.variations.is_empty() {
            points
        } else {
            Variations::new(&fit_unit_square(&points)).blend(&self.variations)?
        };
        let path = self.renderer.save(&points, &colors, &self.output)?;
        info!(path = %path.display(), "done");
        Ok(())
    }
}

fn ngon(matches: &ArgMatches, picture: Picture) -> Result<(), Error> {
    let sides = params::sides(matches.value_of(SIDES).unwrap_or("3"))?;
    let ratio = match matches.value_of(RATIO).unwrap_or("0.5") {
        "optimal" => optimal_ratio(sides)?,
        other => params::ratio(other)?,
    };
    let steps = params::steps(matches.value_of(STEPS).unwrap_or("10000"))?;
    let discard = match matches.value_of(DISCARD) {
        Some(s) => params::count("discard", s)?,
        None => DEFAULT_DISCARD,
    };
    let scheme = ColorScheme::from_str(matches.value_of(COLOR).unwrap_or("uniform"))?;

    let game = ChaosGame::new(sides, ratio)?;
    info!(sides, ratio, steps, discard, "playing the chaos game");
    let run = game.iterate(steps, discard, &mut picture.rng())?;
    let colors = run.colors(scheme);
    picture.draw(run.points, colors)
}

fn fern(matches: &ArgMatches, mut picture: Picture) -> Result<(), Error> {
    let steps = params::steps(matches.value_of(STEPS).unwrap_or("50000"))?;
    let scheme = ColorScheme::from_str(matches.value_of(COLOR).unwrap_or("uniform"))?;

    let fern = AffineIfs::barnsley();
    info!(steps, "growing a fern");
    let run = fern.iterate(steps, &mut picture.rng())?;
    let colors = run.colors(scheme);
    picture.renderer = picture.renderer.foreground(GREEN);
    picture.draw(run.points, colors)
}

fn run(matches: &ArgMatches) -> Result<(), Error> {
    match matches.subcommand() {
        (NGON, Some(sub)) => ngon(sub, Picture::from_matches(sub)?),
        (FERN, Some(sub)) => fern(sub, Picture::from_matches(sub)?),
        _ => Err(failure::err_msg("a subcommand is required")),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("chaosgame=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = args();
    if let Err(e) = run(&matches) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
