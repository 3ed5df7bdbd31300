//! CSS color strings: parsing, formatting and channel blending.
//!
//! Accepted forms are `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(r, g, b)` and
//! `rgba(r, g, b, a)` with `a` in `[0, 1]`. Channels are held as
//! [`palette::Srgba<f64>`] in `[0, 1]`.

use palette::Srgba;

use crate::error::{Result, TweenError};
use crate::scalar;

/// A parsed color plus whether its source string carried an alpha channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub color: Srgba<f64>,
    pub has_alpha: bool,
}

impl Rgba {
    /// Opaque color from 8-bit channels.
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            color: Srgba::new(unit(r), unit(g), unit(b), 1.0),
            has_alpha: false,
        }
    }

    /// Color from 8-bit channels with an explicit alpha in `[0, 1]`.
    pub fn rgba(r: u8, g: u8, b: u8, alpha: f64) -> Self {
        Self {
            color: Srgba::new(unit(r), unit(g), unit(b), alpha),
            has_alpha: true,
        }
    }

    /// Red, green and blue as 8-bit channels.
    pub fn to_u8(&self) -> [u8; 3] {
        [
            byte(self.color.red),
            byte(self.color.green),
            byte(self.color.blue),
        ]
    }
}

#[inline]
fn unit(channel: u8) -> f64 {
    channel as f64 / 255.0
}

#[inline]
fn byte(channel: f64) -> u8 {
    (channel * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Whether `value` looks like a color string: it starts with `#` or `r`.
///
/// Only the leading character is inspected; the full parse happens in
/// [`parse`].
pub fn is_color_string(value: &str) -> bool {
    matches!(value.chars().next(), Some('#' | 'r'))
}

/// Parse a color string.
pub fn parse(value: &str) -> Result<Rgba> {
    parse_inner(value.trim()).ok_or_else(|| TweenError::InvalidColor(value.to_string()))
}

fn parse_inner(trimmed: &str) -> Option<Rgba> {
    if let Some(hex) = trimmed.strip_prefix('#') {
        if !hex.is_ascii() {
            return None;
        }
        let pair = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        return match hex.len() {
            3 => {
                let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|d| d * 17);
                Some(Rgba::rgb(digit(0)?, digit(1)?, digit(2)?))
            }
            6 => Some(Rgba::rgb(pair(0)?, pair(2)?, pair(4)?)),
            8 => Some(Rgba::rgba(pair(0)?, pair(2)?, pair(4)?, unit(pair(6)?))),
            _ => None,
        };
    }

    if let Some(inner) = trimmed
        .strip_prefix("rgba(")
        .and_then(|rest| rest.strip_suffix(')'))
    {
        let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return None;
        }
        let alpha = parts[3].parse::<f64>().ok()?;
        if !(0.0..=1.0).contains(&alpha) {
            return None;
        }
        return Some(Rgba::rgba(
            parts[0].parse().ok()?,
            parts[1].parse().ok()?,
            parts[2].parse().ok()?,
            alpha,
        ));
    }

    if let Some(inner) = trimmed
        .strip_prefix("rgb(")
        .and_then(|rest| rest.strip_suffix(')'))
    {
        let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
        if parts.len() != 3 {
            return None;
        }
        return Some(Rgba::rgb(
            parts[0].parse().ok()?,
            parts[1].parse().ok()?,
            parts[2].parse().ok()?,
        ));
    }

    None
}

/// Format as `#rrggbb`, dropping alpha.
pub fn format_hex(color: &Rgba) -> String {
    let [r, g, b] = color.to_u8();
    format!("#{r:02x}{g:02x}{b:02x}")
}

/// Format as `rgba(r, g, b, a)` with alpha rounded to three decimals.
pub fn format_rgba(color: &Rgba) -> String {
    let [r, g, b] = color.to_u8();
    let alpha = (color.color.alpha.clamp(0.0, 1.0) * 1000.0).round() / 1000.0;
    format!("rgba({r}, {g}, {b}, {alpha})")
}

/// Blend two parsed colors by the eased fraction `v`.
///
/// The result is `rgba(..)` when either side carries alpha, `#rrggbb`
/// otherwise.
pub fn mix(from: &Rgba, to: &Rgba, v: f64) -> String {
    let (a, b) = (from.color, to.color);
    let mixed = Rgba {
        color: Srgba::new(
            scalar::blend(a.red, b.red, v),
            scalar::blend(a.green, b.green, v),
            scalar::blend(a.blue, b.blue, v),
            scalar::blend(a.alpha, b.alpha, v),
        ),
        has_alpha: from.has_alpha || to.has_alpha,
    };

    if mixed.has_alpha {
        format_rgba(&mixed)
    } else {
        format_hex(&mixed)
    }
}

/// Parse and blend two color strings by the eased fraction `v`.
pub fn blend(from: &str, to: &str, v: f64) -> Result<String> {
    Ok(mix(&parse(from)?, &parse(to)?, v))
}
