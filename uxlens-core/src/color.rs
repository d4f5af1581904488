//! WCAG colorimetry: color parsing, relative luminance and contrast ratio.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{Result, UxLensError};

/// Minimum contrast ratio for normal text at level AA.
pub const WCAG_AA_RATIO: f64 = 4.5;
/// Minimum contrast ratio for normal text at level AAA.
pub const WCAG_AAA_RATIO: f64 = 7.0;

static FUNCTIONAL_COLOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^rgba?\(\s*(\d+)\s*,\s*(\d+)\s*,\s*(\d+)\s*(?:,[^)]*)?\)$")
        .expect("valid rgb() pattern")
});

/// A color as an sRGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Create a color from channel values.
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rgb`, `#rrggbb` (leading `#` optional), `rgb(r, g, b)` or
    /// `rgba(r, g, b, a)`.
    ///
    /// Functional channels above 255 saturate; alpha is ignored.
    pub fn parse(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        if let Some(caps) = FUNCTIONAL_COLOR.captures(trimmed) {
            // Captures are all digits, so a parse failure means overflow.
            let channel = |idx: usize| {
                caps[idx]
                    .parse::<u32>()
                    .map_or(u8::MAX, |raw| raw.min(255) as u8)
            };
            return Ok(Self::new(channel(1), channel(2), channel(3)));
        }
        parse_hex(trimmed).ok_or_else(|| UxLensError::InvalidColor(value.to_string()))
    }

    /// Canonical lowercase `#rrggbb` form.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// WCAG 2.x relative luminance in `0.0..=1.0`.
    pub fn luminance(self) -> f64 {
        let [r, g, b] = [self.r, self.g, self.b].map(linearize);
        0.2126 * r + 0.7152 * g + 0.0722 * b
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = UxLensError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

fn parse_hex(value: &str) -> Option<Rgb> {
    let hex = value.strip_prefix('#').unwrap_or(value);
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let expanded: String = match hex.len() {
        3 => hex.chars().flat_map(|c| [c, c]).collect(),
        6 => hex.to_string(),
        _ => return None,
    };
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&expanded[range], 16).ok();
    Some(Rgb::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

fn linearize(channel: u8) -> f64 {
    let s = f64::from(channel) / 255.0;
    if s <= 0.03928 {
        s / 12.92
    } else {
        ((s + 0.055) / 1.055).powf(2.4)
    }
}

/// Normalize any accepted color notation to lowercase `#rrggbb`.
///
/// Normalizing an already normalized value returns it unchanged.
pub fn normalize_color(value: &str) -> Result<String> {
    Rgb::parse(value).map(Rgb::to_hex)
}

/// Relative luminance of a color string.
pub fn luminance(color: &str) -> Result<f64> {
    Rgb::parse(color).map(Rgb::luminance)
}

/// Contrast between a foreground and background color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ContrastCheck {
    /// Foreground color as supplied.
    pub foreground: String,
    /// Background color as supplied.
    pub background: String,
    /// Contrast ratio rounded to two decimals, `1.0..=21.0`.
    pub ratio: f64,
    /// Passes AA for normal text.
    #[serde(rename = "wcagAA")]
    pub wcag_aa: bool,
    /// Passes AAA for normal text.
    #[serde(rename = "wcagAAA")]
    pub wcag_aaa: bool,
}

/// Compute the WCAG contrast ratio of two colors.
///
/// The ratio is symmetric in its arguments.
pub fn contrast(foreground: &str, background: &str) -> Result<ContrastCheck> {
    let fg = luminance(foreground)?;
    let bg = luminance(background)?;
    let (lighter, darker) = if fg >= bg { (fg, bg) } else { (bg, fg) };
    let ratio = round2((lighter + 0.05) / (darker + 0.05));

    Ok(ContrastCheck {
        foreground: foreground.to_string(),
        background: background.to_string(),
        ratio,
        wcag_aa: ratio >= WCAG_AA_RATIO,
        wcag_aaa: ratio >= WCAG_AAA_RATIO,
    })
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn black_on_white_is_maximum_contrast() {
        let check = contrast("#000000", "#ffffff").expect("contrast");
        assert_eq!(check.ratio, 21.0);
        assert!(check.wcag_aa);
        assert!(check.wcag_aaa);
    }

    #[test]
    fn same_color_is_minimum_contrast() {
        let check = contrast("#777", "#777777").expect("contrast");
        assert_eq!(check.ratio, 1.0);
        assert!(!check.wcag_aa);
    }

    #[test]
    fn contrast_is_symmetric() {
        let pairs = [
            ("#ff0000", "#ffffff"),
            ("#123456", "#abcdef"),
            ("rgb(10, 200, 30)", "#000"),
        ];
        for (a, b) in pairs {
            let ab = contrast(a, b).expect("ab");
            let ba = contrast(b, a).expect("ba");
            assert_eq!(ab.ratio, ba.ratio, "{a} vs {b}");
        }
    }

    #[test]
    fn grey_on_white_sits_just_above_aa() {
        let check = contrast("#767676", "#ffffff").expect("contrast");
        assert_eq!(check.ratio, 4.54);
        assert!(check.wcag_aa);
        assert!(!check.wcag_aaa);
    }

    #[test]
    fn luminance_of_white_is_one() {
        assert!((luminance("#fff").expect("white") - 1.0).abs() < 1e-9);
        assert_eq!(luminance("000000").expect("black"), 0.0);
    }

    #[test]
    fn parses_functional_notation() {
        assert_eq!(
            Rgb::parse("rgba(255, 0, 16, 0.5)").expect("rgba"),
            Rgb::new(255, 0, 16)
        );
        assert_eq!(Rgb::parse("RGB(300,1,2)").expect("rgb"), Rgb::new(255, 1, 2));
    }

    #[test]
    fn oversized_functional_channels_saturate() {
        assert_eq!(
            Rgb::parse("rgb(4294967296, 0, 0)").expect("saturate"),
            Rgb::new(255, 0, 0)
        );
        assert_eq!(
            Rgb::parse("rgba(1, 99999999999999999999, 2, 1)").expect("saturate"),
            Rgb::new(1, 255, 2)
        );
    }

    #[test]
    fn normalization_is_idempotent() {
        for input in ["#ABC", "rgb(1, 2, 3)", "#A1B2C3"] {
            let once = normalize_color(input).expect("first");
            let twice = normalize_color(&once).expect("second");
            assert_eq!(once, twice);
        }
        assert_eq!(normalize_color("#ABC").expect("short"), "#aabbcc");
    }

    #[test]
    fn malformed_input_is_invalid_color() {
        for input in [
            "",
            "#12",
            "#gggggg",
            "blue",
            "#12345",
            "rgb(1, 2, 3",
            "rgb(1, 2, 3) not a color",
        ] {
            let err = luminance(input).expect_err(input);
            assert!(matches!(err, UxLensError::InvalidColor(_)), "{input}");
        }
    }

    #[test]
    fn contrast_serializes_wcag_flags() {
        let check = contrast("#000", "#fff").expect("contrast");
        let json = serde_json::to_value(&check).expect("json");
        assert_eq!(json["wcagAA"], true);
        assert_eq!(json["wcagAAA"], true);
    }
}
