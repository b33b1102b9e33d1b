// Simple color struct, created from an unsigned 32 representing RRGGBBAA,
// plus the two fixed palettes particles are spawned from

use crate::error::EngineError;
use rand::Rng;
use std::str::FromStr;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn from_u32(num: u32) -> Color {
        let r = (num >> 24) as u8;
        let g = (num >> 16) as u8;
        let b = (num >> 8) as u8;
        let a = num as u8;

        Color { r, g, b, a }
    }

    // CSS form handed to fillStyle / strokeStyle; alpha is applied separately
    // through globalAlpha so the channel is left out
    pub fn to_css(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

static DARK_COLORS: [Color; 4] = [
    Color::from_u32(0x22d3eeff),
    Color::from_u32(0x60a5faff),
    Color::from_u32(0xe879f9ff),
    Color::from_u32(0xa78bfaff),
];

static LIGHT_COLORS: [Color; 4] = [
    Color::from_u32(0x06b6d4ff),
    Color::from_u32(0x3b82f6ff),
    Color::from_u32(0xd946efff),
    Color::from_u32(0x8b5cf6ff),
];

// Fixed, non-empty set of spawn colors. Only obtainable through a Theme.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    colors: &'static [Color],
}

impl Palette {
    pub fn colors(&self) -> &'static [Color] {
        self.colors
    }

    pub fn contains(&self, color: Color) -> bool {
        self.colors.contains(&color)
    }

    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Color {
        self.colors[rng.gen_range(0, self.colors.len())]
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn palette(self) -> Palette {
        match self {
            Theme::Light => Palette {
                colors: &LIGHT_COLORS,
            },
            Theme::Dark => Palette {
                colors: &DARK_COLORS,
            },
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl FromStr for Theme {
    type Err = EngineError;

    fn from_str(name: &str) -> Result<Theme, EngineError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(EngineError::UnknownTheme(name.to_owned())),
        }
    }
}
