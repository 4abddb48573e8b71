//! The `converter` module keeps one working value and re-renders it while the user
//! switches between numeric types and text formats.
//!
//! Reinterpretation rules on a type change:
//! - Hexadecimal format: the raw bits are kept untouched and only viewed at the new width.
//!   The edit text is the zero-padded bit pattern for every type, floats included.
//! - Decimal / binary format: the value is converted numerically. Floats become integers
//!   by rounding to nearest (saturating), integers change width by two's complement
//!   sign-extension / truncation, and anything becoming a float is cast to the nearest float.

use crate::codec::{self, Rendered};
use crate::numeric::{NumericFormat, NumericType};
use log::debug;

/// Working state of the value converter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionState {
    /// Raw bit pattern, little-endian. The value of a type is its low `width` bytes.
    pub raw: [u8; 8],
    pub ntype: NumericType,
    pub format: NumericFormat,
    /// Text being edited by the user
    pub text: String,
}

impl Default for ConversionState {
    fn default() -> Self {
        let ntype = NumericType::U32;
        let format = NumericFormat::Hexadecimal;
        Self {
            raw: [0; 8],
            ntype,
            format,
            text: edit_text(0, ntype, format),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Converter {
    state: ConversionState,
}

impl Converter {
    /// Creates a converter holding zero as `Uint32`, edited in hexadecimal.
    ///
    /// # Example
    /// ```
    /// use memviewlib::{Converter, NumericType};
    ///
    /// let conv = Converter::new();
    /// assert_eq!(conv.numeric_type(), NumericType::U32);
    /// assert_eq!(conv.text(), "0x00000000");
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn state(&self) -> &ConversionState {
        &self.state
    }

    #[must_use]
    pub const fn numeric_type(&self) -> NumericType {
        self.state.ntype
    }

    #[must_use]
    pub const fn format(&self) -> NumericFormat {
        self.state.format
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.state.text
    }

    /// Full 64-bit raw pattern, including bytes above the current type width.
    #[must_use]
    pub const fn raw_bits(&self) -> u64 {
        u64::from_le_bytes(self.state.raw)
    }

    /// Bit pattern of the value at the current type width.
    #[must_use]
    pub const fn value_bits(&self) -> u64 {
        self.raw_bits() & self.state.ntype.mask()
    }

    /// Updates the edited text and, if it parses, the working value.
    /// Unparseable text keeps the previous value. Returns whether the text was accepted.
    ///
    /// # Example
    /// ```
    /// use memviewlib::{Converter, NumericFormat, NumericType};
    ///
    /// let mut conv = Converter::new();
    /// conv.set_format(NumericFormat::Decimal);
    /// assert!(conv.set_text("1234"));
    /// assert!(!conv.set_text("12x4"));
    ///
    /// assert_eq!(conv.value_bits(), 1234);
    /// assert_eq!(conv.text(), "12x4");
    /// ```
    pub fn set_text(&mut self, text: &str) -> bool {
        self.state.text = text.to_string();

        match codec::encode(text, self.state.ntype, self.state.format) {
            Ok(bits) => {
                self.state.raw = bits.to_le_bytes();
                true
            }
            Err(e) => {
                debug!("Converter input rejected, keeping previous value: {e}");
                false
            }
        }
    }

    /// Switches the text format. The value is untouched, the text is re-rendered.
    pub fn set_format(&mut self, format: NumericFormat) {
        if self.state.format == format {
            return;
        }
        self.state.format = format;
        self.refresh_text();
    }

    /// Switches the numeric type, reinterpreting the value according to the current format.
    pub fn set_type(&mut self, ntype: NumericType) {
        let prev = self.state.ntype;
        if prev == ntype {
            return;
        }

        if self.state.format != NumericFormat::Hexadecimal {
            let bits = convert_bits(self.value_bits(), prev, ntype);
            self.state.raw = bits.to_le_bytes();
        }

        self.state.ntype = ntype;
        self.refresh_text();
    }

    /// Renders the working value in every format.
    #[must_use]
    pub fn render(&self) -> Rendered {
        let bits = self.raw_bits();
        let ntype = self.state.ntype;
        Rendered {
            decimal: codec::format_bits(bits, ntype, NumericFormat::Decimal),
            hex: codec::format_bits(bits, ntype, NumericFormat::Hexadecimal),
            binary: codec::format_bits(bits, ntype, NumericFormat::Binary),
        }
    }

    fn refresh_text(&mut self) {
        self.state.text = edit_text(self.value_bits(), self.state.ntype, self.state.format);
    }
}

/// Text shown in the edit field. Hex is a bit view, so float types show their bits
/// rather than a hex-float literal.
fn edit_text(bits: u64, ntype: NumericType, format: NumericFormat) -> String {
    match format {
        NumericFormat::Hexadecimal => format!("0x{bits:0width$x}", width = ntype.width() * 2),
        _ => codec::format_bits(bits, ntype, format),
    }
}

#[allow(clippy::cast_precision_loss, clippy::cast_possible_wrap)]
/// Numerically converts the bit pattern of a `from` value into the bit pattern of a `to` value.
#[must_use]
pub fn convert_bits(bits: u64, from: NumericType, to: NumericType) -> u64 {
    if let Some(value) = codec::bits_to_float(bits, from) {
        // float -> anything: round to nearest
        return codec::float_to_bits(value, to);
    }

    let extended = sign_extend(bits & from.mask(), from);
    if to.is_float() {
        let value = if from.is_signed() {
            extended as i64 as f64
        } else {
            extended as f64
        };
        return codec::float_to_bits(value, to);
    }

    extended & to.mask()
}

fn sign_extend(bits: u64, ntype: NumericType) -> u64 {
    let width_bits = ntype.width() * 8;
    if !ntype.is_signed() || width_bits == 64 {
        return bits;
    }
    let sign_bit = 1u64 << (width_bits - 1);
    if bits & sign_bit == 0 {
        bits
    } else {
        bits | !ntype.mask()
    }
}
