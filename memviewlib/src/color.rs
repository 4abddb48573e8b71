/// RGBA color attached to ranges and highlights.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Packs the channels into one `u32` with red in the lowest byte.
    ///
    /// # Example
    /// ```
    /// use memviewlib::Color;
    ///
    /// let c = Color::new(0x11, 0x22, 0x33, 0x44);
    /// assert_eq!(c.packed(), 0x4433_2211);
    /// assert_eq!(Color::from_packed(0x4433_2211), c);
    /// ```
    #[must_use]
    pub const fn packed(self) -> u32 {
        u32::from_le_bytes([self.r, self.g, self.b, self.a])
    }

    #[must_use]
    pub const fn from_packed(packed: u32) -> Self {
        let [r, g, b, a] = packed.to_le_bytes();
        Self { r, g, b, a }
    }

    #[allow(clippy::cast_possible_truncation)]
    /// Averages the color channels with `other`. Alpha of `self` is kept.
    #[must_use]
    pub const fn blend_half(self, other: Self) -> Self {
        Self {
            r: ((self.r as u16 + other.r as u16) / 2) as u8,
            g: ((self.g as u16 + other.g as u16) / 2) as u8,
            b: ((self.b as u16 + other.b as u16) / 2) as u8,
            a: self.a,
        }
    }
}
