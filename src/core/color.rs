use crate::error::{ArtError, Result};
use std::fmt;

/// An sRGB color with 8-bit channels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub fn new(r: u8, g: u8, b: u8) -> Rgb {
        Rgb { r, g, b }
    }

    /// Parse `#rgb` or `#rrggbb` (the `#` is optional)
    pub fn parse(text: &str) -> Result<Rgb> {
        let digits = text.strip_prefix('#').unwrap_or(text);
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ArtError::Config(format!("Invalid color: {text:?}")));
        }
        let channel = |s: &str| {
            u8::from_str_radix(s, 16).map_err(|e| ArtError::Config(format!("Invalid color {text:?}: {e}")))
        };
        match digits.len() {
            3 => {
                let expand = |i: usize| channel(&digits[i..i + 1].repeat(2));
                Ok(Rgb::new(expand(0)?, expand(1)?, expand(2)?))
            }
            6 => Ok(Rgb::new(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            _ => Err(ArtError::Config(format!("Invalid color: {text:?}"))),
        }
    }

    /// Uppercase `#RRGGBB`
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
