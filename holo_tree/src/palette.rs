//! The fixed particle colour palette.

use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ColorChoice {
    #[default]
    Green,
    Gold,
    Red,
    White,
}

impl ColorChoice {
    pub const ALL: [ColorChoice; 4] = [
        ColorChoice::Green, ColorChoice::Gold, ColorChoice::Red, ColorChoice::White,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ColorChoice::Green => "GREEN",
            ColorChoice::Gold  => "GOLD",
            ColorChoice::Red   => "RED",
            ColorChoice::White => "WHITE",
        }
    }

    pub fn hex(self) -> &'static str {
        match self {
            ColorChoice::Green => "#10B981",
            ColorChoice::Gold  => "#FBBF24",
            ColorChoice::Red   => "#EF4444",
            ColorChoice::White => "#FFFFFF",
        }
    }

    /// Packed ARGB (0xAARRGGBB, A=0xFF).
    pub const fn argb(self) -> u32 {
        match self {
            ColorChoice::Green => 0xFF10B981,
            ColorChoice::Gold  => 0xFFFBBF24,
            ColorChoice::Red   => 0xFFEF4444,
            ColorChoice::White => 0xFFFFFFFF,
        }
    }

    /// Theme handed to the wish generator.
    pub fn wish_theme(self) -> &'static str {
        match self {
            ColorChoice::Red   => "Passion and Warmth",
            ColorChoice::Gold  => "Wealth and Light",
            ColorChoice::Green => "Growth and Nature",
            ColorChoice::White => "Winter Wonder",
        }
    }

    /// 1-based palette slot, as bound to the number keys.
    pub fn from_slot(slot: usize) -> Option<ColorChoice> {
        Self::ALL.get(slot.checked_sub(1)?).copied()
    }
}

impl fmt::Display for ColorChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for ColorChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.name().eq_ignore_ascii_case(s.trim()) || c.hex().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown color '{}' (green, gold, red, white)", s))
    }
}
