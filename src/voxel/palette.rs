//! 256-entry RGBA colour palette shared by every area of a scene

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};

/// Number of palette entries; voxel colour indices are `u8`
pub const PALETTE_SIZE: usize = 256;

/// Single palette colour, 8 bits per channel
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Fully transparent black
    pub const TRANSPARENT: Rgba = Rgba { r: 0, g: 0, b: 0, a: 0 };

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque colour
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// True when alpha is zero; such colours produce no edge geometry
    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }

    /// Normalized RGB, optionally converted with a 2.2 gamma curve
    pub fn to_rgb_f32(&self, gamma: bool) -> [f32; 3] {
        let f = |c: u8| {
            let v = c as f32 / 255.0;
            if gamma { v.powf(2.2) } else { v }
        };
        [f(self.r), f(self.g), f(self.b)]
    }
}

/// Fixed table of 256 colours; index 0 is conventionally empty
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    colors: Box<[Rgba; PALETTE_SIZE]>,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: Box::new([Rgba::TRANSPARENT; PALETTE_SIZE]),
        }
    }
}

impl Palette {
    /// Create a palette from a full table
    pub fn new(colors: [Rgba; PALETTE_SIZE]) -> Self {
        Self { colors: Box::new(colors) }
    }

    /// Create a palette from a slice that must hold exactly 256 colours
    pub fn from_slice(colors: &[Rgba]) -> Result<Self> {
        let table: [Rgba; PALETTE_SIZE] = colors.try_into().map_err(|_| {
            Error::Voxel(format!(
                "palette needs {} entries, got {}",
                PALETTE_SIZE,
                colors.len()
            ))
        })?;
        Ok(Self::new(table))
    }

    /// The stock MagicaVoxel palette: a 6x6x6 colour cube followed by red,
    /// green, blue and grey ramps. Index 0 is transparent.
    pub fn magica_default() -> Self {
        const CUBE: [u8; 6] = [0xff, 0xcc, 0x99, 0x66, 0x33, 0x00];
        const RAMP: [u8; 10] = [0xee, 0xdd, 0xbb, 0xaa, 0x88, 0x77, 0x55, 0x44, 0x22, 0x11];

        let mut colors = [Rgba::TRANSPARENT; PALETTE_SIZE];
        for n in 0..215 {
            colors[n + 1] = Rgba::rgb(CUBE[n / 36], CUBE[(n / 6) % 6], CUBE[n % 6]);
        }
        for (i, &v) in RAMP.iter().enumerate() {
            colors[216 + i] = Rgba::rgb(v, 0, 0);
            colors[226 + i] = Rgba::rgb(0, v, 0);
            colors[236 + i] = Rgba::rgb(0, 0, v);
            colors[246 + i] = Rgba::rgb(v, v, v);
        }
        Self::new(colors)
    }

    /// Colour at `index`
    pub fn get(&self, index: u8) -> Rgba {
        self.colors[index as usize]
    }

    /// Replace one entry
    pub fn set(&mut self, index: u8, color: Rgba) {
        self.colors[index as usize] = color;
    }

    pub fn colors(&self) -> &[Rgba; PALETTE_SIZE] {
        &self.colors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size() {
        assert_eq!(std::mem::size_of::<Rgba>(), 4);
    }

    #[test]
    fn test_magica_default_layout() {
        let p = Palette::magica_default();
        assert!(p.get(0).is_transparent());
        assert_eq!(p.get(1), Rgba::rgb(0xff, 0xff, 0xff));
        assert_eq!(p.get(2), Rgba::rgb(0xff, 0xff, 0xcc));
        assert_eq!(p.get(7), Rgba::rgb(0xff, 0xcc, 0xff));
        assert_eq!(p.get(215), Rgba::rgb(0x00, 0x00, 0x33));
        assert_eq!(p.get(216), Rgba::rgb(0xee, 0, 0));
        assert_eq!(p.get(255), Rgba::rgb(0x11, 0x11, 0x11));
        assert!(p.colors().iter().skip(1).all(|c| c.a == 255));
    }

    #[test]
    fn test_from_slice_checks_length() {
        assert!(Palette::from_slice(&[Rgba::TRANSPARENT; 10]).is_err());
        let p = Palette::from_slice(&[Rgba::rgb(1, 2, 3); PALETTE_SIZE]).unwrap();
        assert_eq!(p.get(200), Rgba::rgb(1, 2, 3));
    }

    #[test]
    fn test_gamma() {
        let c = Rgba::rgb(255, 0, 51);
        assert_eq!(c.to_rgb_f32(false), [1.0, 0.0, 0.2]);
        let g = c.to_rgb_f32(true);
        assert!((g[2] - 0.2f32.powf(2.2)).abs() < 1e-6);
    }
}
