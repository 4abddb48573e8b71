//! Numeric type, format and byte order tags shared by the codec and the converter.

use std::fmt;
use std::str::FromStr;

/// Numeric type a run of buffer bytes can be interpreted as.
/// Defaults to `Int32`, the type previewed when a view opens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum NumericType {
    S8,
    U8,
    S16,
    U16,
    #[default]
    S32,
    U32,
    S64,
    U64,
    F16,
    F32,
    F64,
}

impl NumericType {
    /// All types in display order.
    pub const ALL: [Self; 11] = [
        Self::S8,
        Self::U8,
        Self::S16,
        Self::U16,
        Self::S32,
        Self::U32,
        Self::S64,
        Self::U64,
        Self::F16,
        Self::F32,
        Self::F64,
    ];

    /// Size of the type in bytes.
    ///
    /// # Example
    /// ```
    /// use memviewlib::NumericType;
    ///
    /// assert_eq!(NumericType::F16.width(), 2);
    /// assert_eq!(NumericType::U64.width(), 8);
    /// ```
    #[must_use]
    pub const fn width(self) -> usize {
        match self {
            Self::S8 | Self::U8 => 1,
            Self::S16 | Self::U16 | Self::F16 => 2,
            Self::S32 | Self::U32 | Self::F32 => 4,
            Self::S64 | Self::U64 | Self::F64 => 8,
        }
    }

    #[must_use]
    pub const fn is_float(self) -> bool {
        matches!(self, Self::F16 | Self::F32 | Self::F64)
    }

    /// Signed integers and all floating types are signed.
    #[must_use]
    pub const fn is_signed(self) -> bool {
        matches!(
            self,
            Self::S8 | Self::S16 | Self::S32 | Self::S64 | Self::F16 | Self::F32 | Self::F64
        )
    }

    /// Mask selecting the low `width` bytes of a 64-bit pattern.
    #[must_use]
    pub const fn mask(self) -> u64 {
        match self.width() {
            8 => u64::MAX,
            w => (1u64 << (w * 8)) - 1,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::S8 => "Int8",
            Self::U8 => "Uint8",
            Self::S16 => "Int16",
            Self::U16 => "Uint16",
            Self::S32 => "Int32",
            Self::U32 => "Uint32",
            Self::S64 => "Int64",
            Self::U64 => "Uint64",
            Self::F16 => "HalfFloat",
            Self::F32 => "Float",
            Self::F64 => "Double",
        }
    }
}

impl fmt::Display for NumericType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NumericType {
    type Err = String;

    /// Accepts both the display names (`Int32`) and the short Rust-like names (`i32`, `f16`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        let ntype = match lower.as_str() {
            "i8" | "s8" | "int8" => Self::S8,
            "u8" | "uint8" => Self::U8,
            "i16" | "s16" | "int16" => Self::S16,
            "u16" | "uint16" => Self::U16,
            "i32" | "s32" | "int32" => Self::S32,
            "u32" | "uint32" => Self::U32,
            "i64" | "s64" | "int64" => Self::S64,
            "u64" | "uint64" => Self::U64,
            "f16" | "half" | "halffloat" => Self::F16,
            "f32" | "float" => Self::F32,
            "f64" | "double" => Self::F64,
            _ => return Err(format!("Unknown numeric type: {s}")),
        };
        Ok(ntype)
    }
}

/// Textual representation of a value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum NumericFormat {
    Binary,
    Decimal,
    #[default]
    Hexadecimal,
}

impl NumericFormat {
    pub const ALL: [Self; 3] = [Self::Binary, Self::Decimal, Self::Hexadecimal];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Binary => "Bin",
            Self::Decimal => "Dec",
            Self::Hexadecimal => "Hex",
        }
    }
}

impl fmt::Display for NumericFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NumericFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bin" | "binary" => Ok(Self::Binary),
            "dec" | "decimal" => Ok(Self::Decimal),
            "hex" | "hexadecimal" => Ok(Self::Hexadecimal),
            _ => Err(format!("Unknown numeric format: {s}")),
        }
    }
}

/// Byte order used to interpret a multi-byte value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Endianness {
    #[default]
    Little,
    Big,
}

impl Endianness {
    /// Byte order of the host.
    #[must_use]
    pub const fn native() -> Self {
        if cfg!(target_endian = "big") {
            Self::Big
        } else {
            Self::Little
        }
    }
}

impl FromStr for Endianness {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "le" | "little" => Ok(Self::Little),
            "be" | "big" => Ok(Self::Big),
            _ => Err(format!("Unknown endianness: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widths_match_types() {
        // Arrange
        let expected = [1, 1, 2, 2, 4, 4, 8, 8, 2, 4, 8];

        // Act
        let widths: Vec<usize> = NumericType::ALL.iter().map(|t| t.width()).collect();

        // Assert
        assert_eq!(widths, expected);
    }

    #[test]
    fn test_mask() {
        assert_eq!(NumericType::U8.mask(), 0xFF);
        assert_eq!(NumericType::F16.mask(), 0xFFFF);
        assert_eq!(NumericType::S32.mask(), 0xFFFF_FFFF);
        assert_eq!(NumericType::F64.mask(), u64::MAX);
    }

    #[test]
    fn test_parse_type_names() {
        assert_eq!("i32".parse::<NumericType>(), Ok(NumericType::S32));
        assert_eq!("Uint16".parse::<NumericType>(), Ok(NumericType::U16));
        assert_eq!("HalfFloat".parse::<NumericType>(), Ok(NumericType::F16));
        assert!("i128".parse::<NumericType>().is_err());

        for ntype in NumericType::ALL {
            assert_eq!(ntype.name().parse::<NumericType>(), Ok(ntype));
        }
    }

    #[test]
    fn test_parse_format_and_endianness() {
        assert_eq!("hex".parse::<NumericFormat>(), Ok(NumericFormat::Hexadecimal));
        assert_eq!("Bin".parse::<NumericFormat>(), Ok(NumericFormat::Binary));
        assert_eq!("BE".parse::<Endianness>(), Ok(Endianness::Big));
        assert!("middle".parse::<Endianness>().is_err());
    }
}
