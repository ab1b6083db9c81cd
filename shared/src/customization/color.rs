use naia_serde::{BitReader, BitWrite, Serde, SerdeErr};

use crate::world::replicated_property::PropertyValue;

/// Linear RGBA color, components in `0.0..=1.0`.
///
/// The zero value (transparent black) means "no color replicated yet".
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Rgba = Rgba::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }
}

// sent as raw bit patterns so every peer sees the identical value
impl Serde for Rgba {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.r.to_bits().ser(writer);
        self.g.to_bits().ser(writer);
        self.b.to_bits().ser(writer);
        self.a.to_bits().ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let r = f32::from_bits(u32::de(reader)?);
        let g = f32::from_bits(u32::de(reader)?);
        let b = f32::from_bits(u32::de(reader)?);
        let a = f32::from_bits(u32::de(reader)?);
        Ok(Self { r, g, b, a })
    }

    fn bit_length(&self) -> u32 {
        4 * 32
    }
}

impl PropertyValue for Rgba {}

/// The fixed set of swatches a player picks colors from. Saves store an
/// index into this list.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorPalette {
    swatches: Vec<Rgba>,
}

impl ColorPalette {
    /// Returns `None` for an empty swatch list, index 0 must always resolve
    pub fn new(swatches: Vec<Rgba>) -> Option<Self> {
        if swatches.is_empty() {
            return None;
        }
        Some(Self { swatches })
    }

    pub fn get(&self, color_index: u32) -> Option<Rgba> {
        self.swatches.get(color_index as usize).copied()
    }

    pub fn len(&self) -> usize {
        self.swatches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.swatches.is_empty()
    }

    pub fn swatches(&self) -> &[Rgba] {
        &self.swatches
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self {
            swatches: vec![
                Rgba::WHITE,
                Rgba::BLACK,
                Rgba::opaque(0.86, 0.20, 0.18),
                Rgba::opaque(0.95, 0.55, 0.15),
                Rgba::opaque(0.98, 0.85, 0.25),
                Rgba::opaque(0.30, 0.70, 0.30),
                Rgba::opaque(0.20, 0.45, 0.85),
                Rgba::opaque(0.55, 0.30, 0.75),
            ],
        }
    }
}
