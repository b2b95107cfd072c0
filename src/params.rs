//! Boundary parsing for the handful of numbers a generator needs.
//! The command line and the constructors go through the same checks,
//! so a value is either rejected everywhere or accepted everywhere.

use crate::error::InvalidParameter;
use std::convert::TryFrom;
use std::str::FromStr;

/// The smallest polygon we will play the chaos game on.
pub const MIN_SIDES: usize = 3;

/// The most steps a single run will take.
pub const MAX_STEPS: usize = 10_000_000;

/// The most pixels an image may have, 4096x4096 worth.
pub const MAX_PIXELS: usize = 1 << 24;

/// Checks a corner count.
pub fn check_sides(n: i64) -> Result<usize, InvalidParameter> {
    if n < MIN_SIDES as i64 {
        return Err(InvalidParameter::TooFewSides(n));
    }
    Ok(n as usize)
}

/// Checks a contraction ratio.  Both ends of the interval are open,
/// and NaN fails the comparison along with everything else.
pub fn check_ratio(r: f64) -> Result<f64, InvalidParameter> {
    if r > 0.0 && r < 1.0 {
        Ok(r)
    } else {
        Err(InvalidParameter::RatioOutOfRange(r))
    }
}

/// Checks an iteration count against the ceiling.
pub fn check_step_count(steps: usize) -> Result<usize, InvalidParameter> {
    if steps > MAX_STEPS {
        return Err(InvalidParameter::TooManySteps {
            steps,
            max: MAX_STEPS,
        });
    }
    Ok(steps)
}

/// Checks the step/burn-in relationship of a chaos game run.
pub fn check_steps(steps: usize, discard: usize) -> Result<(), InvalidParameter> {
    check_step_count(steps)?;
    if discard >= steps {
        return Err(InvalidParameter::DiscardTooLarge { steps, discard });
    }
    Ok(())
}

fn number<T: FromStr>(name: &'static str, s: &str) -> Result<T, InvalidParameter> {
    T::from_str(s.trim()).map_err(|_| InvalidParameter::NotANumber {
        name,
        value: s.to_string(),
    })
}

/// Parses and checks a corner count.  "5.6" is not a corner count.
pub fn sides(s: &str) -> Result<usize, InvalidParameter> {
    check_sides(number("n", s)?)
}

/// Parses and checks a contraction ratio.  Accepts "p/q" fractions as
/// well as decimals, since 1/3 is a ratio people actually ask for.
pub fn ratio(s: &str) -> Result<f64, InvalidParameter> {
    let r = match s.find('/') {
        Some(index) => {
            let num: f64 = number("r", &s[..index])?;
            let den: f64 = number("r", &s[index + 1..])?;
            num / den
        }
        None => number("r", s)?,
    };
    check_ratio(r)
}

/// Parses a non-negative count such as a step or discard count.
pub fn count(name: &'static str, s: &str) -> Result<usize, InvalidParameter> {
    number(name, s)
}

/// Parses a "name" or "name:weight" variation argument.  The name is
/// not resolved here; a missing weight means 1.
pub fn weighted_name(s: &str) -> Result<(String, f64), InvalidParameter> {
    match s.find(':') {
        None => Ok((s.to_string(), 1.0)),
        Some(index) => {
            let weight: f64 = number("weight", &s[index + 1..])?;
            if !weight.is_finite() || weight < 0.0 {
                return Err(InvalidParameter::BadWeight(weight));
            }
            Ok((s[..index].to_string(), weight))
        }
    }
}

/// Parses a step count and holds it to `MAX_STEPS`.
pub fn steps(s: &str) -> Result<usize, InvalidParameter> {
    check_step_count(count("steps", s)?)
}

/// Checks an image size: neither side empty, each side a `u16`, and no
/// more than `MAX_PIXELS` in all.
pub fn check_size(width: usize, height: usize) -> Result<(u16, u16), InvalidParameter> {
    if width == 0 || height == 0 {
        return Err(InvalidParameter::EmptyImage(width, height));
    }
    let too_large = |_| InvalidParameter::ImageTooLarge(width, height);
    let w = u16::try_from(width).map_err(too_large)?;
    let h = u16::try_from(height).map_err(too_large)?;
    if usize::from(w) * usize::from(h) > MAX_PIXELS {
        return Err(InvalidParameter::ImageTooLarge(width, height));
    }
    Ok((w, h))
}

/// Parses a "WIDTHxHEIGHT" image size.
pub fn size(s: &str) -> Result<(u16, u16), InvalidParameter> {
    let index = s.find('x').ok_or_else(|| InvalidParameter::NotANumber {
        name: "size",
        value: s.to_string(),
    })?;
    let width: usize = number("width", &s[..index])?;
    let height: usize = number("height", &s[index + 1..])?;
    check_size(width, height)
}
