use std::convert::TryFrom;
use std::fmt;

use iced::Color;
use serde::Deserialize;

#[derive(Clone, Debug, PartialEq)]
pub enum ColorError {
    Empty,
    UnknownFormat(String),
    BadHex(String),
    BadComponent(String),
    ComponentCount { expected: usize, found: usize },
}

impl fmt::Display for ColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty color string"),
            Self::UnknownFormat(s) => write!(f, "unrecognized color format: {}", s),
            Self::BadHex(s) => write!(f, "invalid hex color: {}", s),
            Self::BadComponent(s) => write!(f, "invalid color component: {}", s),
            Self::ComponentCount { expected, found } => {
                write!(f, "expected {} color components, found {}", expected, found)
            }
        }
    }
}

impl std::error::Error for ColorError {}

/// A color written the way a stylesheet writes it (`#0f172a`,
/// `rgba(125, 211, 252, 0.1)`), validated on deserialization.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(try_from = "String")]
pub struct CssColor(pub Color);

impl CssColor {
    pub fn parse(input: &str) -> Result<Self, ColorError> {
        let s = input.trim();
        if s.is_empty() {
            return Err(ColorError::Empty);
        }

        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex).map(CssColor);
        }

        let lower = s.to_ascii_lowercase();
        if let Some(body) = function_body(&lower, "rgba") {
            return parse_rgb(body, 4).map(CssColor);
        }
        if let Some(body) = function_body(&lower, "rgb") {
            return parse_rgb(body, 3).map(CssColor);
        }

        Err(ColorError::UnknownFormat(s.to_string()))
    }
}

impl TryFrom<String> for CssColor {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        CssColor::parse(&value)
    }
}

impl From<CssColor> for Color {
    fn from(color: CssColor) -> Self {
        color.0
    }
}

/// Scales the alpha channel, the same way a global alpha multiplies into a
/// stroke color.
pub fn with_opacity(color: Color, opacity: f32) -> Color {
    Color {
        a: color.a * opacity.max(0.0).min(1.0),
        ..color
    }
}

fn function_body<'a>(s: &'a str, name: &str) -> Option<&'a str> {
    s.strip_prefix(name)?
        .trim_start()
        .strip_prefix('(')?
        .strip_suffix(')')
}

fn parse_hex(hex: &str) -> Result<Color, ColorError> {
    let bad = || ColorError::BadHex(format!("#{}", hex));
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(bad());
    }

    let digits: Vec<u8> = match hex.len() {
        3 | 4 => hex
            .chars()
            .map(|c| {
                let v = c.to_digit(16).unwrap_or(0) as u8;
                v * 16 + v
            })
            .collect(),
        6 | 8 => (0..hex.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| bad()))
            .collect::<Result<_, _>>()?,
        _ => return Err(bad()),
    };

    let alpha = digits.get(3).map(|a| *a as f32 / 255.0).unwrap_or(1.0);
    Ok(Color::from_rgba8(digits[0], digits[1], digits[2], alpha))
}

fn parse_rgb(body: &str, expected: usize) -> Result<Color, ColorError> {
    let parts: Vec<&str> = body.split(',').map(str::trim).collect();
    if parts.len() != expected {
        return Err(ColorError::ComponentCount {
            expected,
            found: parts.len(),
        });
    }

    let channel = |part: &str| -> Result<u8, ColorError> {
        let v: f32 = part
            .parse()
            .map_err(|_| ColorError::BadComponent(part.to_string()))?;
        if !(0.0..=255.0).contains(&v) {
            return Err(ColorError::BadComponent(part.to_string()));
        }
        Ok(v.round() as u8)
    };

    let r = channel(parts[0])?;
    let g = channel(parts[1])?;
    let b = channel(parts[2])?;
    let a = match parts.get(3) {
        Some(part) => {
            let a: f32 = part
                .parse()
                .map_err(|_| ColorError::BadComponent(part.to_string()))?;
            if !(0.0..=1.0).contains(&a) {
                return Err(ColorError::BadComponent(part.to_string()));
            }
            a
        }
        None => 1.0,
    };

    Ok(Color::from_rgba8(r, g, b, a))
}
