//! Color handling for ontology structures
//!
//! This module provides the [`Color`] type which wraps the `DynamicColor` type
//! from the color crate. Structure ontologies usually store colors as bare hex
//! triplets (`"FF7080"`), so parsing accepts those alongside any CSS color.

use std::{
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use color::{DynamicColor, Srgb};

/// Wrapper around the `DynamicColor` type from the color crate
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Color {
    color: DynamicColor,
}

impl Eq for Color {}

impl Hash for Color {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_hex().hash(state);
    }
}

impl Color {
    /// Create a new `Color` from a string
    /// This will parse CSS color strings such as "#ff0000", "rgb(255, 0, 0)", "red", etc.
    ///
    /// # Examples
    ///
    /// ```
    /// use roicount_core::color::Color;
    ///
    /// let red = Color::new("#ff0000").unwrap();
    /// let blue = Color::new("blue").unwrap();
    /// ```
    pub fn new(color_str: &str) -> Result<Self, String> {
        match DynamicColor::from_str(color_str) {
            Ok(color) => Ok(Self { color }),
            Err(err) => Err(format!("invalid color `{color_str}`: {err}")),
        }
    }

    /// Create a `Color` from a hex triplet, with or without a leading `#`.
    ///
    /// # Examples
    ///
    /// ```
    /// use roicount_core::color::Color;
    ///
    /// let bare = Color::from_hex_triplet("FF7080").unwrap();
    /// let prefixed = Color::from_hex_triplet("#ff7080").unwrap();
    /// assert_eq!(bare, prefixed);
    /// ```
    pub fn from_hex_triplet(hex: &str) -> Result<Self, String> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!("invalid color `{hex}`: expected six hex digits"));
        }
        Self::new(&format!("#{digits}"))
    }

    /// Returns the color as a lowercase `#rrggbb` string, dropping alpha.
    pub fn to_hex(self) -> String {
        let rgba = self.color.to_alpha_color::<Srgb>().to_rgba8();
        format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
