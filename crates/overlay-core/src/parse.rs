//! Parsers for the CSS-flavoured scalar values found in overlay documents.
//!
//! Built on `winnow` 0.7. Every entry point returns `None` for input it
//! cannot read; callers treat that as "field absent".

use crate::color::Rgba;
use crate::geometry::clamp;
use winnow::ascii::space0;
use winnow::combinator::alt;
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::take_while;

/// A position or extent as written in a document: pixels or a percentage
/// of the stage extent along the same axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Length {
    Px(f64),
    Percent(f64),
}

impl Length {
    /// Resolve against the stage extent along the matching axis.
    pub fn resolve(self, extent: f64) -> f64 {
        match self {
            Length::Px(v) => v,
            Length::Percent(p) => extent * p / 100.0,
        }
    }
}

/// Parse `#rgb`, `#rrggbb`, `rgb(r, g, b)`, `rgba(r, g, b, a)` or `transparent`.
pub fn css_color(s: &str) -> Option<Rgba> {
    let lower = s.trim().to_ascii_lowercase();
    if lower == "transparent" {
        return Some(Rgba::TRANSPARENT);
    }
    let mut input = lower.as_str();
    let color = alt((parse_hex_color, parse_rgb_function))
        .parse_next(&mut input)
        .ok()?;
    input.trim().is_empty().then_some(color)
}

/// Parse `15`, `15deg`, `-7.5deg` or `rotate(15deg)` into degrees.
pub fn degrees(s: &str) -> Option<f64> {
    let lower = s.trim().to_ascii_lowercase();
    let mut input = lower.as_str();
    let value = alt((parse_rotate_function, parse_angle))
        .parse_next(&mut input)
        .ok()?;
    input.trim().is_empty().then_some(value)
}

/// Parse `24px` or `24` into pixels.
pub fn pixels(s: &str) -> Option<f64> {
    match length(s)? {
        Length::Px(v) => Some(v),
        Length::Percent(_) => None,
    }
}

/// Parse `10`, `10px` or `10%`.
pub fn length(s: &str) -> Option<Length> {
    let mut input = s.trim();
    let value = parse_number.parse_next(&mut input).ok()?;
    let unit = input.trim();
    match unit {
        "" | "px" => Some(Length::Px(value)),
        "%" => Some(Length::Percent(value)),
        _ => None,
    }
}

// ─── Low-level parsers ──────────────────────────────────────────────────

fn backtrack() -> ErrMode<ContextError> {
    ErrMode::Backtrack(ContextError::new())
}

/// Consume optional whitespace (concrete error type avoids inference issues).
fn skip_space(input: &mut &str) {
    let _: Result<&str, ErrMode<ContextError>> = space0.parse_next(input);
}

fn parse_number(input: &mut &str) -> ModalResult<f64> {
    let start = *input;
    if input.starts_with('-') || input.starts_with('+') {
        *input = &input[1..];
    }
    let int: &str = take_while(0.., |c: char| c.is_ascii_digit()).parse_next(input)?;
    let mut frac_len = 0;
    if input.starts_with('.') {
        *input = &input[1..];
        let frac: &str = take_while(0.., |c: char| c.is_ascii_digit()).parse_next(input)?;
        frac_len = frac.len();
    }
    if int.is_empty() && frac_len == 0 {
        return Err(backtrack());
    }
    let matched = &start[..start.len() - input.len()];
    matched.parse::<f64>().map_err(|_| backtrack())
}

fn parse_hex_color(input: &mut &str) -> ModalResult<Rgba> {
    let _ = '#'.parse_next(input)?;
    let digits: &str = take_while(3..=6, |c: char| c.is_ascii_hexdigit()).parse_next(input)?;
    Rgba::from_hex(digits).ok_or_else(backtrack)
}

fn parse_comma(input: &mut &str) -> ModalResult<()> {
    skip_space(input);
    let _ = ','.parse_next(input)?;
    skip_space(input);
    Ok(())
}

fn parse_channel(input: &mut &str) -> ModalResult<u8> {
    skip_space(input);
    let v = parse_number(input)?;
    Ok(clamp(v, 0.0, 255.0).round() as u8)
}

fn parse_alpha(input: &mut &str) -> ModalResult<f64> {
    let v = parse_number(input)?;
    if input.starts_with('%') {
        *input = &input[1..];
        return Ok(v / 100.0);
    }
    Ok(v)
}

fn parse_rgb_function(input: &mut &str) -> ModalResult<Rgba> {
    let _ = alt(("rgba", "rgb")).parse_next(input)?;
    skip_space(input);
    let _ = '('.parse_next(input)?;
    let r = parse_channel(input)?;
    parse_comma(input)?;
    let g = parse_channel(input)?;
    parse_comma(input)?;
    let b = parse_channel(input)?;
    skip_space(input);
    let a = if input.starts_with(',') {
        parse_comma(input)?;
        parse_alpha(input)?
    } else {
        1.0
    };
    skip_space(input);
    let _ = ')'.parse_next(input)?;
    Ok(Rgba::new(r, g, b, a))
}

fn parse_angle(input: &mut &str) -> ModalResult<f64> {
    skip_space(input);
    let v = parse_number(input)?;
    skip_space(input);
    if input.starts_with("deg") {
        *input = &input[3..];
    }
    Ok(v)
}

fn parse_rotate_function(input: &mut &str) -> ModalResult<f64> {
    let _ = "rotate".parse_next(input)?;
    skip_space(input);
    let _ = '('.parse_next(input)?;
    let v = parse_angle(input)?;
    skip_space(input);
    let _ = ')'.parse_next(input)?;
    Ok(v)
}
