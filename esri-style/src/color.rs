use serde::{Deserialize, Serialize};

/// Color representation.
///
/// Serialized as a CSS `rgba(r,g,b,alpha)` string, which is the form rendering libraries accept directly.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    r: u8,
    g: u8,
    b: u8,
    a: u8,
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from_css(&value).ok_or_else(|| format!("invalid color string: {value}"))
    }
}

impl From<Color> for String {
    fn from(val: Color) -> Self {
        val.to_rgba_string()
    }
}

impl Color {
    /// Transparent color: `rgba(0,0,0,0)`
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
    /// White color: `rgba(255,255,255,1)`
    pub const WHITE: Color = Color::rgba(255, 255, 255, 255);
    /// Black color: `rgba(0,0,0,1)`
    pub const BLACK: Color = Color::rgba(0, 0, 0, 255);

    /// Constructs color from its RGBA channels.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Reads an Esri color array `[r, g, b, a?]`.
    ///
    /// All channels, including alpha, are on a `0..=255` scale. Values outside of that range are clamped and
    /// fractional values are rounded. Missing alpha means fully opaque. Returns `None` if fewer than three
    /// channels are given.
    pub fn from_esri(channels: &[f64]) -> Option<Self> {
        if channels.len() < 3 {
            return None;
        }

        let a = channels.get(3).copied().unwrap_or(255.0);
        Some(Self {
            r: clamp_channel(channels[0]),
            g: clamp_channel(channels[1]),
            b: clamp_channel(channels[2]),
            a: clamp_channel(a),
        })
    }

    /// Converts the color into CSS string `rgba(r,g,b,alpha)` with alpha normalized to `0..=1`.
    pub fn to_rgba_string(&self) -> String {
        format!("rgba({},{},{},{})", self.r, self.g, self.b, self.alpha())
    }

    /// Parses either `rgba(r,g,b,alpha)`, `rgb(r,g,b)` or a HEX6/HEX8 string.
    pub fn try_from_css(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.starts_with('#') {
            return Self::try_from_hex(value);
        }

        let (inner, has_alpha) = if let Some(inner) = value.strip_prefix("rgba(") {
            (inner.strip_suffix(')')?, true)
        } else {
            (value.strip_prefix("rgb(")?.strip_suffix(')')?, false)
        };

        let parts: Vec<&str> = inner.split(',').map(|s| s.trim()).collect();
        let expected_len = if has_alpha { 4 } else { 3 };
        if parts.len() != expected_len {
            return None;
        }

        let r = parts[0].parse::<u8>().ok()?;
        let g = parts[1].parse::<u8>().ok()?;
        let b = parts[2].parse::<u8>().ok()?;
        let a = if has_alpha {
            let alpha = parts[3].parse::<f64>().ok()?;
            (alpha.clamp(0.0, 1.0) * 255.0).round() as u8
        } else {
            255
        };

        Some(Self { r, g, b, a })
    }

    /// Parses a color from the hex string. Hex string can be either HEX6 (`#RRGGBB`) or HEX8 (`#RRGGBBAA`).
    pub fn try_from_hex(hex_string: &str) -> Option<Self> {
        if hex_string.len() != 7 && hex_string.len() != 9 || hex_string.chars().next()? != '#' {
            return None;
        }

        let r = u8::from_str_radix(hex_string.get(1..3)?, 16).ok()?;
        let g = u8::from_str_radix(hex_string.get(3..5)?, 16).ok()?;
        let b = u8::from_str_radix(hex_string.get(5..7)?, 16).ok()?;
        let a = if hex_string.len() == 9 {
            u8::from_str_radix(hex_string.get(7..9)?, 16).ok()?
        } else {
            255
        };

        Some(Self { r, g, b, a })
    }

    /// Returns a new color instance, copied from the base one but with the given alpha channel.
    pub fn with_alpha(&self, a: u8) -> Self {
        Self { a, ..*self }
    }

    /// Returns true if the color is fully transparent (`a == 0`).
    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }

    /// Red component of the color in RGBA space.
    pub fn r(&self) -> u8 {
        self.r
    }

    /// Green component of the color in RGBA space.
    pub fn g(&self) -> u8 {
        self.g
    }

    /// Blue component of the color in RGBA space.
    pub fn b(&self) -> u8 {
        self.b
    }

    /// Opacity component of the color.
    pub fn a(&self) -> u8 {
        self.a
    }

    /// Opacity of the color normalized to `0..=1`.
    pub fn alpha(&self) -> f64 {
        self.a as f64 / 255.0
    }
}

fn clamp_channel(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }

    value.clamp(0.0, 255.0).round() as u8
}
