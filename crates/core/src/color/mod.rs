//! Colour naming as done by the lightsaber firmware before it reports a
//! colour change over serial.

use std::fmt;

use crate::protocol::COLOR_PREFIX;

const DARK_BRIGHTNESS: f32 = 0.1;
const GREY_SATURATION: f32 = 0.1;
const WHITE_BRIGHTNESS: f32 = 0.9;

/// Coarse colour names the firmware can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorName {
    Red,
    Orange,
    Yellow,
    Green,
    Cyan,
    Blue,
    Purple,
    Magenta,
    Black,
    White,
    Gray,
}

impl ColorName {
    /// Names an 8-bit RGB colour. Achromatic colours are decided by
    /// brightness and saturation before hue bands are consulted.
    pub fn classify(r: u8, g: u8, b: u8) -> Self {
        let max = r.max(g).max(b) as f32;
        let min = r.min(g).min(b) as f32;
        let saturation = (max - min) / 255.0;
        let brightness = max / 255.0;

        if brightness < DARK_BRIGHTNESS {
            return ColorName::Black;
        }
        if saturation < GREY_SATURATION && brightness > WHITE_BRIGHTNESS {
            return ColorName::White;
        }
        if saturation < GREY_SATURATION {
            return ColorName::Gray;
        }

        match hue_degrees(r, g, b) {
            h if h < 15.0 => ColorName::Red,
            h if h < 45.0 => ColorName::Orange,
            h if h < 70.0 => ColorName::Yellow,
            h if h < 150.0 => ColorName::Green,
            h if h < 190.0 => ColorName::Cyan,
            h if h < 260.0 => ColorName::Blue,
            h if h < 320.0 => ColorName::Purple,
            h if h < 345.0 => ColorName::Magenta,
            _ => ColorName::Red,
        }
    }

    /// Name exactly as the firmware spells it.
    pub fn as_str(self) -> &'static str {
        match self {
            ColorName::Red => "Red",
            ColorName::Orange => "Orange",
            ColorName::Yellow => "Yellow",
            ColorName::Green => "Green",
            ColorName::Cyan => "Cyan",
            ColorName::Blue => "Blue",
            ColorName::Purple => "Purple",
            ColorName::Magenta => "Magenta",
            ColorName::Black => "Black",
            ColorName::White => "White",
            ColorName::Gray => "Gray",
        }
    }

    /// The serial line the firmware prints for this colour.
    pub fn command_line(self) -> String {
        format!("{COLOR_PREFIX} {self}")
    }
}

impl fmt::Display for ColorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hue in `[0, 360)`, or `0.0` for achromatic input.
fn hue_degrees(r: u8, g: u8, b: u8) -> f32 {
    let r = r as f32 / 255.0;
    let g = g as f32 / 255.0;
    let b = b as f32 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;
    if delta < 0.00001 {
        return 0.0;
    }

    let hue = if max == r {
        60.0 * (((g - b) / delta) % 6.0)
    } else if max == g {
        60.0 * (((b - r) / delta) + 2.0)
    } else {
        60.0 * (((r - g) / delta) + 4.0)
    };

    if hue < 0.0 {
        hue + 360.0
    } else {
        hue
    }
}
