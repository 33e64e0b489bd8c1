//! Command-line argument parsing
use itertools::Itertools;
use quick_error::quick_error;
use std::{env::args_os, ffi::OsString, path::PathBuf, str::FromStr, time::Duration};
use stipple::{app::SessionConfig, color::Palette, shape::Shape};

quick_error! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum ArgsError {
        Help {
            display("help was requested")
        }
        Unexpected(arg: String) {
            display("Found an unexpected argument '{}'", arg)
        }
        MissingValue(arg: String) {
            display("The argument '{}' requires a value", arg)
        }
        InvalidValue { arg: String, value: String, reason: String } {
            display("Invalid value '{}' for '{}': {}", value, arg, reason)
        }
    }
}

/// Renders a dithered shape over a random background.
#[derive(Debug, Clone)]
pub struct Args {
    pub shape: Shape,
    /// the side length of the shape, measured in dots
    pub side: i32,
    pub palette: Palette,
    /// the number of ticks to run
    pub frames: u32,
    /// the tick period
    pub interval: Duration,
    /// device pixels per dot
    pub scale: i32,
    /// the background seed
    pub seed: u64,
    /// draw the shape as a separate layer
    pub layered: bool,
    /// render on a background thread
    pub threaded: bool,
    /// where to save the final frame
    pub out: Option<PathBuf>,
    /// where to save the final dithered preview
    pub dithered_out: Option<PathBuf>,
}

impl Default for Args {
    fn default() -> Self {
        let session = SessionConfig::default();
        Self {
            shape: session.shape,
            side: session.side,
            palette: Palette::blue_sky(),
            frames: 30,
            interval: Duration::from_millis(100),
            scale: session.draw_scale,
            seed: session.seed,
            layered: session.layered,
            threaded: false,
            out: None,
            dithered_out: None,
        }
    }
}

impl Args {
    pub fn from_env_or_exit() -> Self {
        match Self::parse(args_os().skip(1)) {
            Ok(this) => this,
            Err(ArgsError::Help) => display_help_and_exit(),
            Err(e) => {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
    }

    /// Parse arguments, not including the program name.
    pub fn parse(args: impl IntoIterator<Item = OsString>) -> Result<Self, ArgsError> {
        let mut this = Self::default();
        let mut args = args.into_iter();

        while let Some(hdr_os) = args.next() {
            // `OsString` implements `PartialEq<str>`, so we can look for an
            // exact match without converting it to `str`
            let handler_info = HANDLER_TABLE.iter().find(|p| hdr_os == p.0);

            if let Some((hdr, handler)) = handler_info {
                handler.handle(&mut this, hdr, &mut args)?;
            } else {
                return Err(ArgsError::Unexpected(
                    hdr_os.to_string_lossy().into_owned(),
                ));
            }
        }

        Ok(this)
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            shape: self.shape,
            side: self.side,
            draw_scale: self.scale,
            seed: self.seed,
            layered: self.layered,
            ..SessionConfig::default()
        }
    }
}

type Handled = Result<(), ArgsError>;

static HANDLER_TABLE: &[(&str, &(dyn ArgHandler<Args> + Send + Sync))] = &[
    ("-h", &(handle_help as fn(&mut Args) -> Handled)),
    ("--help", &(handle_help as fn(&mut Args) -> Handled)),
    ("--shape", &(handle_shape as fn(&mut Args, &str) -> Handled)),
    ("--side", &(handle_side as fn(&mut Args, &str) -> Handled)),
    ("--palette", &(handle_palette as fn(&mut Args, &str) -> Handled)),
    ("--frames", &(handle_frames as fn(&mut Args, &str) -> Handled)),
    ("--interval-ms", &(handle_interval as fn(&mut Args, &str) -> Handled)),
    ("--scale", &(handle_scale as fn(&mut Args, &str) -> Handled)),
    ("--seed", &(handle_seed as fn(&mut Args, &str) -> Handled)),
    ("--layered", &(handle_layered as fn(&mut Args) -> Handled)),
    ("--threaded", &(handle_threaded as fn(&mut Args) -> Handled)),
    ("--out", &(handle_out as fn(&mut Args, OsString) -> Handled)),
    ("--dithered-out", &(handle_dithered_out as fn(&mut Args, OsString) -> Handled)),
];

fn display_help_and_exit() -> ! {
    println!(
        "stipple
Renders a dithered shape over a random background.

USAGE:
    stipple [OPTIONS]

FLAGS:
    -h, --help       display help information
    --layered        draw the shape as a separate layer
    --threaded       render on a background thread

OPTIONS:
    --shape <SHAPE>             {shapes} (default: triangle)
    --side <N>                  the side length of the shape in dots (default: 80)
    --palette <PALETTE>         {palettes} (default: blue-sky)
    --frames <N>                the number of ticks to run (default: 30)
    --interval-ms <N>           the tick period (default: 100)
    --scale <N>                 device pixels per dot (default: 3)
    --seed <N>                  the background seed (default: 0)
    --out <PATH>                where to save the final frame (PPM)
    --dithered-out <PATH>       where to save the dithered preview (PPM)",
        shapes = Shape::ALL.iter().join("|"),
        palettes = PALETTE_NAMES.iter().join("|"),
    );
    std::process::exit(0);
}

const PALETTE_NAMES: &[&str] = &["standard", "autumn", "blue-sky"];

trait ArgHandler<Ctx> {
    fn handle(
        &self,
        ctx: &mut Ctx,
        arg_hdr: &str,
        args_iter: &mut dyn Iterator<Item = OsString>,
    ) -> Handled;
}

impl<Ctx> ArgHandler<Ctx> for fn(&mut Ctx) -> Handled {
    fn handle(
        &self,
        ctx: &mut Ctx,
        _arg_hdr: &str,
        _args_iter: &mut dyn Iterator<Item = OsString>,
    ) -> Handled {
        self(ctx)
    }
}

impl<Ctx> ArgHandler<Ctx> for fn(&mut Ctx, OsString) -> Handled {
    fn handle(
        &self,
        ctx: &mut Ctx,
        arg_hdr: &str,
        args_iter: &mut dyn Iterator<Item = OsString>,
    ) -> Handled {
        if let Some(value) = args_iter.next() {
            self(ctx, value)
        } else {
            Err(ArgsError::MissingValue(arg_hdr.to_owned()))
        }
    }
}

impl<Ctx> ArgHandler<Ctx> for fn(&mut Ctx, &str) -> Handled {
    fn handle(
        &self,
        ctx: &mut Ctx,
        arg_hdr: &str,
        args_iter: &mut dyn Iterator<Item = OsString>,
    ) -> Handled {
        let value = args_iter
            .next()
            .ok_or_else(|| ArgsError::MissingValue(arg_hdr.to_owned()))?;
        let value = value.to_str().ok_or_else(|| ArgsError::InvalidValue {
            arg: arg_hdr.to_owned(),
            value: value.to_string_lossy().into_owned(),
            reason: "not valid UTF-8".to_owned(),
        })?;
        self(ctx, value).map_err(|e| match e {
            // Fill in the header, which the handler doesn't know
            ArgsError::InvalidValue { value, reason, .. } => ArgsError::InvalidValue {
                arg: arg_hdr.to_owned(),
                value,
                reason,
            },
            e => e,
        })
    }
}

fn invalid(value: &str, reason: impl ToString) -> ArgsError {
    ArgsError::InvalidValue {
        arg: String::new(),
        value: value.to_owned(),
        reason: reason.to_string(),
    }
}

fn parse_number<T>(value: &str) -> Result<T, ArgsError>
where
    T: FromStr,
    T::Err: ToString,
{
    value.parse().map_err(|e| invalid(value, e))
}

fn parse_positive(value: &str) -> Result<i32, ArgsError> {
    match parse_number(value)? {
        x if x > 0 => Ok(x),
        _ => Err(invalid(value, "must be positive")),
    }
}

fn handle_help<T>(_: &mut T) -> Handled {
    Err(ArgsError::Help)
}

fn handle_shape(args: &mut Args, value: &str) -> Handled {
    args.shape = value.parse().map_err(|e| invalid(value, e))?;
    Ok(())
}

fn handle_side(args: &mut Args, value: &str) -> Handled {
    args.side = parse_positive(value)?;
    Ok(())
}

fn handle_palette(args: &mut Args, value: &str) -> Handled {
    args.palette = Palette::by_name(value).ok_or_else(|| {
        invalid(
            value,
            format!("expected one of {}", PALETTE_NAMES.iter().join(", ")),
        )
    })?;
    Ok(())
}

fn handle_frames(args: &mut Args, value: &str) -> Handled {
    args.frames = parse_number(value)?;
    Ok(())
}

fn handle_interval(args: &mut Args, value: &str) -> Handled {
    args.interval = Duration::from_millis(parse_number(value)?);
    Ok(())
}

fn handle_scale(args: &mut Args, value: &str) -> Handled {
    args.scale = parse_positive(value)?;
    Ok(())
}

fn handle_seed(args: &mut Args, value: &str) -> Handled {
    args.seed = parse_number(value)?;
    Ok(())
}

fn handle_layered(args: &mut Args) -> Handled {
    args.layered = true;
    Ok(())
}

fn handle_threaded(args: &mut Args) -> Handled {
    args.threaded = true;
    Ok(())
}

fn handle_out(args: &mut Args, value: OsString) -> Handled {
    args.out = Some(value.into());
    Ok(())
}

fn handle_dithered_out(args: &mut Args, value: OsString) -> Handled {
    args.dithered_out = Some(value.into());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, ArgsError> {
        Args::parse(args.iter().map(OsString::from))
    }

    #[test]
    fn defaults() {
        let args = parse(&[]).unwrap();
        assert_eq!(args.shape, Shape::Triangle);
        assert_eq!(args.side, 80);
        assert_eq!(args.palette, Palette::blue_sky());
        assert_eq!(args.frames, 30);
        assert_eq!(args.interval, Duration::from_millis(100));
        assert_eq!(args.scale, 3);
        assert_eq!(args.out, None);
    }

    #[test]
    fn options() {
        let args = parse(&[
            "--shape", "ring", "--side", "40", "--palette", "autumn", "--frames", "5",
            "--interval-ms", "0", "--scale", "2", "--seed", "9", "--layered", "--out", "a.ppm",
        ])
        .unwrap();
        assert_eq!(args.shape, Shape::Ring);
        assert_eq!(args.side, 40);
        assert_eq!(args.palette, Palette::autumn());
        assert_eq!(args.frames, 5);
        assert_eq!(args.interval, Duration::from_millis(0));
        assert_eq!(args.out, Some(PathBuf::from("a.ppm")));

        let config = args.session_config();
        assert_eq!(config.draw_scale, 2);
        assert_eq!(config.seed, 9);
        assert!(config.layered);
    }

    #[test]
    fn errors() {
        assert_eq!(parse(&["--help"]).unwrap_err(), ArgsError::Help);
        assert_eq!(
            parse(&["--bogus"]).unwrap_err(),
            ArgsError::Unexpected("--bogus".to_owned())
        );
        assert_eq!(
            parse(&["--side"]).unwrap_err(),
            ArgsError::MissingValue("--side".to_owned())
        );
        match parse(&["--scale", "0"]).unwrap_err() {
            ArgsError::InvalidValue { arg, value, .. } => {
                assert_eq!(arg, "--scale");
                assert_eq!(value, "0");
            }
            e => panic!("{:?}", e),
        }
        assert!(parse(&["--palette", "sepia"]).is_err());
        assert!(parse(&["--shape", "hexagon"]).is_err());
    }
}
