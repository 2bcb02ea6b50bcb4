//! RGBA color with CSS-style parsing

use crate::error::{EmberError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// RGBA color, each channel in [0, 1]
///
/// Config files carry colors as strings: a CSS name (`"orangered"`), a hex
/// triple (`"#ff4500"`), `"hsl(120, 100%, 50%)"` or `"rgba(255, 69, 0, 0.5)"`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

const NAMED: &[(&str, u32)] = &[
    ("black", 0x000000),
    ("white", 0xFFFFFF),
    ("red", 0xFF0000),
    ("green", 0x008000),
    ("lime", 0x00FF00),
    ("blue", 0x0000FF),
    ("yellow", 0xFFFF00),
    ("cyan", 0x00FFFF),
    ("magenta", 0xFF00FF),
    ("orange", 0xFFA500),
    ("orangered", 0xFF4500),
    ("gold", 0xFFD700),
    ("gray", 0x808080),
    ("grey", 0x808080),
    ("hotpink", 0xFF69B4),
    ("deepskyblue", 0x00BFFF),
];

impl Color {
    pub const WHITE: Self = Self {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };
    pub const BLACK: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };
    pub const ORANGE_RED: Self = Self {
        r: 1.0,
        g: 69.0 / 255.0,
        b: 0.0,
        a: 1.0,
    };

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as f32 / 255.0,
            g: ((hex >> 8) & 0xFF) as f32 / 255.0,
            b: (hex & 0xFF) as f32 / 255.0,
            a: 1.0,
        }
    }

    /// CSS `hsl()` semantics: hue in degrees (wrapped into [0, 360)),
    /// saturation and lightness in [0, 1].
    pub fn from_hsl(hue: f32, saturation: f32, lightness: f32) -> Self {
        let h = hue.rem_euclid(360.0) / 360.0;
        let s = saturation.clamp(0.0, 1.0);
        let l = lightness.clamp(0.0, 1.0);

        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;

        Self {
            r: hue_to_channel(p, q, h + 1.0 / 3.0),
            g: hue_to_channel(p, q, h),
            b: hue_to_channel(p, q, h - 1.0 / 3.0),
            a: 1.0,
        }
    }

    pub fn with_alpha(mut self, a: f32) -> Self {
        self.a = a;
        self
    }

    pub fn named(name: &str) -> Option<Self> {
        let name = name.to_ascii_lowercase();
        NAMED
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, hex)| Self::from_hex(*hex))
    }

    pub fn to_array(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn to_rgba8(&self) -> [u8; 4] {
        [
            channel_to_u8(self.r),
            channel_to_u8(self.g),
            channel_to_u8(self.b),
            channel_to_u8(self.a),
        ]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

fn hue_to_channel(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

fn channel_to_u8(c: f32) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0).round() as u8
}

impl FromStr for Color {
    type Err = EmberError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let invalid = || EmberError::InvalidColor(s.to_string());

        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(invalid);
        }
        if let Some(args) = function_args(s, "hsl") {
            let [h, sat, l] = parse_args::<3>(&args).ok_or_else(invalid)?;
            return Ok(Self::from_hsl(h, sat, l));
        }
        if let Some(args) = function_args(s, "rgba") {
            let [r, g, b, a] = parse_args::<4>(&args).ok_or_else(invalid)?;
            return Ok(Self::new(r / 255.0, g / 255.0, b / 255.0, a));
        }
        if let Some(args) = function_args(s, "rgb") {
            let [r, g, b] = parse_args::<3>(&args).ok_or_else(invalid)?;
            return Ok(Self::new(r / 255.0, g / 255.0, b / 255.0, 1.0));
        }
        Self::named(s).ok_or_else(invalid)
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    let value = u32::from_str_radix(hex, 16).ok()?;
    match hex.len() {
        6 => Some(Color::from_hex(value)),
        3 => {
            let r = (value >> 8) & 0xF;
            let g = (value >> 4) & 0xF;
            let b = value & 0xF;
            Some(Color::from_hex((r * 17) << 16 | (g * 17) << 8 | b * 17))
        }
        _ => None,
    }
}

/// `name(a, b, c)` -> `["a", "b", "c"]`
fn function_args(s: &str, name: &str) -> Option<Vec<String>> {
    let lower = s.to_ascii_lowercase();
    let inner = lower.strip_prefix(name)?.trim_start();
    let inner = inner.strip_prefix('(')?.strip_suffix(')')?;
    Some(inner.split(',').map(|a| a.trim().to_string()).collect())
}

/// Parses `N` numeric arguments; `%` maps to [0, 1] and a `deg` suffix is dropped.
fn parse_args<const N: usize>(args: &[String]) -> Option<[f32; N]> {
    if args.len() != N {
        return None;
    }
    let mut out = [0.0; N];
    for (slot, arg) in out.iter_mut().zip(args) {
        *slot = if let Some(pct) = arg.strip_suffix('%') {
            pct.trim().parse::<f32>().ok()? / 100.0
        } else {
            arg.trim_end_matches("deg").trim().parse().ok()?
        };
    }
    Some(out)
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, _] = self.to_rgba8();
        if self.a >= 1.0 {
            write!(f, "#{r:02x}{g:02x}{b:02x}")
        } else {
            write!(f, "rgba({r}, {g}, {b}, {})", self.a)
        }
    }
}

impl TryFrom<String> for Color {
    type Error = EmberError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Color, b: Color) -> bool {
        a.to_array()
            .iter()
            .zip(b.to_array().iter())
            .all(|(x, y)| (x - y).abs() < 0.01)
    }

    #[test]
    fn test_color_from_hex() {
        let c = Color::from_hex(0xFF8844);
        assert!((c.r - 1.0).abs() < 0.01);
        assert!((c.g - 0.533).abs() < 0.01);
        assert!((c.b - 0.267).abs() < 0.01);
    }

    #[test]
    fn hsl_primaries() {
        assert!(close(Color::from_hsl(0.0, 1.0, 0.5), Color::from_hex(0xFF0000)));
        assert!(close(Color::from_hsl(120.0, 1.0, 0.5), Color::from_hex(0x00FF00)));
        assert!(close(Color::from_hsl(240.0, 1.0, 0.5), Color::from_hex(0x0000FF)));
        assert!(close(Color::from_hsl(360.0, 1.0, 0.5), Color::from_hex(0xFF0000)));
        assert!(close(Color::from_hsl(0.0, 0.0, 1.0), Color::WHITE));
    }

    #[test]
    fn parse_css_forms() {
        assert_eq!("white".parse::<Color>().unwrap(), Color::WHITE);
        assert!(close("OrangeRed".parse().unwrap(), Color::ORANGE_RED));
        assert!(close("#ff4500".parse().unwrap(), Color::ORANGE_RED));
        assert!(close("#fff".parse().unwrap(), Color::WHITE));
        assert!(close(
            "hsl(240deg, 100%, 50%)".parse().unwrap(),
            Color::from_hex(0x0000FF)
        ));
        let translucent: Color = "rgba(255, 0, 0, 0.5)".parse().unwrap();
        assert!((translucent.a - 0.5).abs() < 1e-6);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("not-a-color".parse::<Color>().is_err());
        assert!("#12345".parse::<Color>().is_err());
        assert!("hsl(1, 2)".parse::<Color>().is_err());
    }

    #[test]
    fn display_round_trips() {
        let c = Color::ORANGE_RED;
        assert_eq!(c.to_string(), "#ff4500");
        assert!(close(c.to_string().parse().unwrap(), c));

        let faded = Color::WHITE.with_alpha(0.25);
        assert!(close(faded.to_string().parse().unwrap(), faded));
    }
}
