//! The `codec` module converts raw buffer bytes into textual numeric representations
//! and parses typed text back into raw bit patterns.
//!
//! Values are always assembled from a little-endian ordered scratch buffer, so the
//! result depends on the requested [`Endianness`] only and never on the host byte order.
//! A short read (type wider than the remaining buffer) leaves the high-order bytes zero.

use crate::error::{MemViewError, MemViewErrorKind};
use crate::numeric::{Endianness, NumericFormat, NumericType};
use crate::source::ByteSource;
use half::f16;
use log::trace;
use regex::Regex;
use std::num::IntErrorKind;
use std::sync::LazyLock;

/// Widest value the codec handles, in bytes.
pub const MAX_VALUE_BYTES: usize = 8;

static HEX_FLOAT_RE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^([+-])?0[xX]([0-9a-fA-F]+)(?:\.([0-9a-fA-F]*))?[pP]([+-]?[0-9]+)$").ok()
});

static BINARY_GROUPS_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^(?:0[bB])?[01]+(?:\s+[01]+)*$").ok());

/// All three renderings of one value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rendered {
    pub decimal: String,
    pub hex: String,
    pub binary: String,
}

/// Copies `src` into the front of `dst`, converting from byte order `from` to byte order `to`.
/// Equal orders give a straight copy, different orders a reversed one.
///
/// # Example
/// ```
/// use memviewlib::Endianness;
/// use memviewlib::codec::endian_copy;
///
/// let mut dst = [0u8; 2];
/// endian_copy(&mut dst, &[0x12, 0x34], Endianness::Big, Endianness::Little);
/// assert_eq!(dst, [0x34, 0x12]);
/// ```
pub fn endian_copy(dst: &mut [u8], src: &[u8], from: Endianness, to: Endianness) {
    let dst = &mut dst[..src.len()];
    dst.copy_from_slice(src);
    if from != to {
        dst.reverse();
    }
}

/// Renders little-endian ordered bytes as groups of 8 bits, most significant byte first.
/// Every group is followed by a single space.
///
/// # Errors
/// Returns an error if more than 64 bits are requested.
///
/// # Example
/// ```
/// use memviewlib::codec::format_binary;
///
/// assert_eq!(format_binary(&[0xFF]).unwrap(), "11111111 ");
/// assert_eq!(format_binary(&[0x01, 0x80]).unwrap(), "10000000 00000001 ");
/// ```
pub fn format_binary(bytes: &[u8]) -> Result<String, MemViewError> {
    if bytes.len() > MAX_VALUE_BYTES {
        return Err(MemViewError::DecodeError(
            MemViewErrorKind::UnsupportedWidth(bytes.len() * 8),
        ));
    }

    let mut out = String::with_capacity(bytes.len() * 9);
    for byte in bytes.iter().rev() {
        for bit in (0..8).rev() {
            out.push(if byte & (1 << bit) != 0 { '1' } else { '0' });
        }
        out.push(' ');
    }
    Ok(out)
}

/// Decodes the value at `offset` of `source`.
///
/// At most `ntype.width()` bytes are read. When the type runs past the end of the buffer,
/// only the remaining bytes are used (short read).
///
/// # Errors
/// Returns an error if `offset` is not inside the buffer.
///
/// # Example
/// ```
/// use memviewlib::{Endianness, NumericFormat, NumericType, codec};
///
/// let data: &[u8] = &[0x12, 0x34];
/// let big = codec::decode(data, 0, NumericType::U16, NumericFormat::Decimal, Endianness::Big);
/// let little = codec::decode(data, 0, NumericType::U16, NumericFormat::Decimal, Endianness::Little);
///
/// assert_eq!(big.unwrap(), "4660");
/// assert_eq!(little.unwrap(), "13330");
/// ```
pub fn decode<S: ByteSource + ?Sized>(
    source: &S,
    offset: usize,
    ntype: NumericType,
    format: NumericFormat,
    endianness: Endianness,
) -> Result<String, MemViewError> {
    let bytes = read_value_bytes(source, offset, ntype)?;
    decode_bytes(&bytes, ntype, format, endianness)
}

/// Decodes the value at `offset` of `source` in all three formats.
///
/// # Errors
/// Returns an error if `offset` is not inside the buffer.
pub fn preview<S: ByteSource + ?Sized>(
    source: &S,
    offset: usize,
    ntype: NumericType,
    endianness: Endianness,
) -> Result<Rendered, MemViewError> {
    let bytes = read_value_bytes(source, offset, ntype)?;
    Ok(Rendered {
        decimal: decode_bytes(&bytes, ntype, NumericFormat::Decimal, endianness)?,
        hex: decode_bytes(&bytes, ntype, NumericFormat::Hexadecimal, endianness)?,
        binary: decode_bytes(&bytes, ntype, NumericFormat::Binary, endianness)?,
    })
}

fn read_value_bytes<S: ByteSource + ?Sized>(
    source: &S,
    offset: usize,
    ntype: NumericType,
) -> Result<Vec<u8>, MemViewError> {
    let len = source.len();
    if offset >= len {
        return Err(MemViewError::DecodeError(
            MemViewErrorKind::OffsetOutOfBounds(offset, len),
        ));
    }

    let mut buf = [0u8; MAX_VALUE_BYTES];
    let size = source.read_into(offset, &mut buf[..ntype.width()]);
    trace!("Decoding {size} bytes at 0x{offset:X} as {ntype}");

    Ok(buf[..size].to_vec())
}

/// Decodes `bytes` (stored in `endianness` order) as `ntype`.
/// Bytes beyond the type width are ignored; fewer bytes act as a short read.
///
/// # Errors
/// Returns an error if more than 8 bytes are provided.
pub fn decode_bytes(
    bytes: &[u8],
    ntype: NumericType,
    format: NumericFormat,
    endianness: Endianness,
) -> Result<String, MemViewError> {
    if bytes.len() > MAX_VALUE_BYTES {
        return Err(MemViewError::DecodeError(MemViewErrorKind::TooManyBytes(
            bytes.len(),
        )));
    }

    let size = bytes.len().min(ntype.width());
    let mut ordered = [0u8; MAX_VALUE_BYTES];
    endian_copy(&mut ordered, &bytes[..size], endianness, Endianness::Little);

    if format == NumericFormat::Binary {
        return format_binary(&ordered[..size]);
    }

    Ok(format_bits(u64::from_le_bytes(ordered), ntype, format))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
/// Renders the low `ntype.width()` bytes of `bits` as `ntype` in `format`.
///
/// # Example
/// ```
/// use memviewlib::{NumericFormat, NumericType, codec};
///
/// assert_eq!(codec::format_bits(0xFF, NumericType::S8, NumericFormat::Decimal), "-1");
/// assert_eq!(codec::format_bits(0xFF, NumericType::S16, NumericFormat::Hexadecimal), "0x00ff");
/// assert_eq!(codec::format_bits(0x4040_0000, NumericType::F32, NumericFormat::Hexadecimal), "0x1.8p+1");
/// ```
#[must_use]
pub fn format_bits(bits: u64, ntype: NumericType, format: NumericFormat) -> String {
    let bits = bits & ntype.mask();

    match format {
        NumericFormat::Binary => {
            let bytes = bits.to_le_bytes();
            let mut out = String::with_capacity(ntype.width() * 9);
            for byte in bytes[..ntype.width()].iter().rev() {
                out.push_str(&format!("{byte:08b} "));
            }
            out
        }
        NumericFormat::Decimal => match ntype {
            NumericType::S8 => (bits as u8 as i8).to_string(),
            NumericType::U8 => (bits as u8).to_string(),
            NumericType::S16 => (bits as u16 as i16).to_string(),
            NumericType::U16 => (bits as u16).to_string(),
            NumericType::S32 => (bits as u32 as i32).to_string(),
            NumericType::U32 => (bits as u32).to_string(),
            NumericType::S64 => (bits as i64).to_string(),
            NumericType::U64 => bits.to_string(),
            NumericType::F16 => format!("{:?}", f16::from_bits(bits as u16).to_f32()),
            NumericType::F32 => format!("{:?}", f32::from_bits(bits as u32)),
            NumericType::F64 => format!("{:?}", f64::from_bits(bits)),
        },
        NumericFormat::Hexadecimal => match ntype {
            NumericType::F16 => format_hex_float(f64::from(f16::from_bits(bits as u16).to_f32())),
            NumericType::F32 => format_hex_float(f64::from(f32::from_bits(bits as u32))),
            NumericType::F64 => format_hex_float(f64::from_bits(bits)),
            _ => format!("0x{bits:0width$x}", width = ntype.width() * 2),
        },
    }
}

/// Formats a float as a base-16 floating literal, e.g. `0x1.8p+1` for 3.0.
#[must_use]
pub fn format_hex_float(value: f64) -> String {
    let sign = if value.is_sign_negative() { "-" } else { "" };

    if value.is_nan() {
        return format!("{sign}nan");
    }
    if value.is_infinite() {
        return format!("{sign}inf");
    }

    let bits = value.to_bits();
    let biased_exp = (bits >> 52) & 0x7FF;
    let mantissa = bits & ((1u64 << 52) - 1);

    if biased_exp == 0 && mantissa == 0 {
        return format!("{sign}0x0p+0");
    }

    // Subnormals keep the minimum exponent and a zero leading digit
    let (lead, exp) = if biased_exp == 0 {
        (0, -1022)
    } else {
        (1, i64::try_from(biased_exp).unwrap_or(0) - 1023)
    };

    let digits = format!("{mantissa:013x}");
    let digits = digits.trim_end_matches('0');

    if digits.is_empty() {
        format!("{sign}0x{lead}p{exp:+}")
    } else {
        format!("{sign}0x{lead}.{digits}p{exp:+}")
    }
}

/// Parses a base-16 floating literal such as `0x1.8p+1`, `-0x0p+0` or `inf`.
///
/// # Errors
/// Returns an error if `text` is not a hex float literal.
pub fn parse_hex_float(text: &str) -> Result<f64, MemViewError> {
    let text = text.trim();
    let malformed = || MemViewError::EncodeError(MemViewErrorKind::MalformedInput(text.to_string()));

    if let Some(special) = parse_float_special(text) {
        return Ok(special);
    }

    let re = HEX_FLOAT_RE.as_ref().ok_or_else(malformed)?;
    let caps = re.captures(text).ok_or_else(malformed)?;

    let negative = caps.get(1).is_some_and(|m| m.as_str() == "-");
    let int_digits = caps.get(2).map_or("", |m| m.as_str());
    let frac_digits = caps.get(3).map_or("", |m| m.as_str());
    let exp: i32 = caps
        .get(4)
        .and_then(|m| m.as_str().parse().ok())
        .ok_or_else(malformed)?;

    // Significant digits must fit into 64 bits
    let mut digits: String = int_digits.trim_start_matches('0').to_string();
    let frac_trimmed = frac_digits.trim_end_matches('0');
    digits.push_str(frac_trimmed);
    let frac_len = i32::try_from(frac_trimmed.len()).map_err(|_| malformed())?;

    let magnitude = if digits.trim_start_matches('0').is_empty() {
        0.0
    } else {
        let mantissa = u64::from_str_radix(&digits, 16).map_err(|_| malformed())?;
        #[allow(clippy::cast_precision_loss)]
        let mantissa = mantissa as f64;
        scale_by_pow2(mantissa, exp.saturating_sub(frac_len.saturating_mul(4)))
    };

    Ok(if negative { -magnitude } else { magnitude })
}

fn parse_float_special(text: &str) -> Option<f64> {
    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let value = match body.to_ascii_lowercase().as_str() {
        "inf" | "infinity" => f64::INFINITY,
        "nan" => f64::NAN,
        _ => return None,
    };
    Some(if negative { -value } else { value })
}

/// `value * 2^exp` with a single rounding step.
fn scale_by_pow2(mut value: f64, mut exp: i32) -> f64 {
    const STEP: i32 = 1000;
    while exp > STEP {
        value *= pow2(STEP);
        exp -= STEP;
    }
    while exp < -STEP {
        value *= pow2(-STEP);
        exp += STEP;
    }
    value * pow2(exp)
}

#[allow(clippy::cast_sign_loss)]
/// Exact power of two for normal exponents (-1022..=1023).
fn pow2(exp: i32) -> f64 {
    f64::from_bits(((exp + 1023) as u64) << 52)
}

/// Parses `text` in `format` into the raw bit pattern of `ntype`.
/// The pattern occupies the low `ntype.width()` bytes of the result.
///
/// For floating types in hexadecimal format, text with a `p` exponent is read as a
/// hex float literal, anything else as the raw bit pattern.
///
/// # Errors
/// Returns an error if the text is malformed or the value does not fit the type.
///
/// # Example
/// ```
/// use memviewlib::{NumericFormat, NumericType, codec};
///
/// assert_eq!(codec::encode("-1", NumericType::S8, NumericFormat::Decimal), Ok(0xFF));
/// assert_eq!(codec::encode("0x1.8p+1", NumericType::F32, NumericFormat::Hexadecimal), Ok(0x4040_0000));
/// assert_eq!(codec::encode("00000001 11111111", NumericType::U16, NumericFormat::Binary), Ok(0x01FF));
/// assert!(codec::encode("12z", NumericType::U32, NumericFormat::Decimal).is_err());
/// ```
pub fn encode(text: &str, ntype: NumericType, format: NumericFormat) -> Result<u64, MemViewError> {
    let text = text.trim();
    match format {
        NumericFormat::Hexadecimal => encode_hex(text, ntype),
        NumericFormat::Decimal => encode_decimal(text, ntype),
        NumericFormat::Binary => encode_binary(text, ntype),
    }
}

fn malformed(text: &str) -> MemViewError {
    MemViewError::EncodeError(MemViewErrorKind::MalformedInput(text.to_string()))
}

fn fit_to_type(bits: u64, ntype: NumericType) -> Result<u64, MemViewError> {
    if bits & !ntype.mask() != 0 {
        return Err(MemViewError::EncodeError(
            MemViewErrorKind::ValueOutOfRange(ntype),
        ));
    }
    Ok(bits)
}

fn encode_hex(text: &str, ntype: NumericType) -> Result<u64, MemViewError> {
    let is_float_literal = text.contains(['p', 'P']) || parse_float_special(text).is_some();
    if ntype.is_float() && is_float_literal {
        let value = parse_hex_float(text)?;
        return Ok(float_to_bits(value, ntype));
    }

    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(malformed(text));
    }

    let bits = u64::from_str_radix(digits, 16).map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow => {
            MemViewError::EncodeError(MemViewErrorKind::ValueOutOfRange(ntype))
        }
        _ => malformed(text),
    })?;
    fit_to_type(bits, ntype)
}

#[allow(clippy::cast_sign_loss)]
fn encode_decimal(text: &str, ntype: NumericType) -> Result<u64, MemViewError> {
    let int_err = |e: std::num::ParseIntError| match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
            MemViewError::EncodeError(MemViewErrorKind::ValueOutOfRange(ntype))
        }
        _ => malformed(text),
    };

    let bits = match ntype {
        NumericType::S8 => u64::from(text.parse::<i8>().map_err(int_err)? as u8),
        NumericType::U8 => u64::from(text.parse::<u8>().map_err(int_err)?),
        NumericType::S16 => u64::from(text.parse::<i16>().map_err(int_err)? as u16),
        NumericType::U16 => u64::from(text.parse::<u16>().map_err(int_err)?),
        NumericType::S32 => u64::from(text.parse::<i32>().map_err(int_err)? as u32),
        NumericType::U32 => u64::from(text.parse::<u32>().map_err(int_err)?),
        NumericType::S64 => text.parse::<i64>().map_err(int_err)? as u64,
        NumericType::U64 => text.parse::<u64>().map_err(int_err)?,
        NumericType::F16 => {
            let value: f64 = text.parse().map_err(|_| malformed(text))?;
            u64::from(f16::from_f64(value).to_bits())
        }
        NumericType::F32 => {
            let value: f32 = text.parse().map_err(|_| malformed(text))?;
            u64::from(value.to_bits())
        }
        NumericType::F64 => {
            let value: f64 = text.parse().map_err(|_| malformed(text))?;
            value.to_bits()
        }
    };
    Ok(bits)
}

fn encode_binary(text: &str, ntype: NumericType) -> Result<u64, MemViewError> {
    let re = BINARY_GROUPS_RE.as_ref().ok_or_else(|| malformed(text))?;
    if !re.is_match(text) {
        return Err(malformed(text));
    }

    let body = text
        .strip_prefix("0b")
        .or_else(|| text.strip_prefix("0B"))
        .unwrap_or(text);
    let digits: String = body.chars().filter(|c| !c.is_whitespace()).collect();
    let significant = digits.trim_start_matches('0');

    if significant.len() > 64 {
        return Err(MemViewError::EncodeError(
            MemViewErrorKind::ValueOutOfRange(ntype),
        ));
    }
    if significant.is_empty() {
        return Ok(0);
    }

    let bits = u64::from_str_radix(significant, 2).map_err(|_| malformed(text))?;
    fit_to_type(bits, ntype)
}

#[allow(clippy::cast_possible_truncation)]
/// Raw bits of `value` converted (round to nearest) to the floating type `ntype`.
/// Integer types receive the value rounded and saturated to their range.
#[must_use]
pub fn float_to_bits(value: f64, ntype: NumericType) -> u64 {
    match ntype {
        NumericType::F16 => u64::from(f16::from_f64(value).to_bits()),
        NumericType::F32 => u64::from((value as f32).to_bits()),
        NumericType::F64 => value.to_bits(),
        _ => float_to_int_bits(value, ntype),
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn float_to_int_bits(value: f64, ntype: NumericType) -> u64 {
    // `as` saturates at the type bounds and maps NaN to zero
    let rounded = value.round();
    let bits = match ntype {
        NumericType::S8 => u64::from(rounded as i8 as u8),
        NumericType::U8 => u64::from(rounded as u8),
        NumericType::S16 => u64::from(rounded as i16 as u16),
        NumericType::U16 => u64::from(rounded as u16),
        NumericType::S32 => u64::from(rounded as i32 as u32),
        NumericType::U32 => u64::from(rounded as u32),
        NumericType::S64 => rounded as i64 as u64,
        NumericType::U64 => rounded as u64,
        NumericType::F16 | NumericType::F32 | NumericType::F64 => float_to_bits(value, ntype),
    };
    bits & ntype.mask()
}

#[allow(clippy::cast_possible_truncation)]
/// Numeric value of a floating bit pattern, widened to `f64`.
/// Returns `None` for integer types.
#[must_use]
pub fn bits_to_float(bits: u64, ntype: NumericType) -> Option<f64> {
    match ntype {
        NumericType::F16 => Some(f16::from_bits(bits as u16).to_f64()),
        NumericType::F32 => Some(f64::from(f32::from_bits(bits as u32))),
        NumericType::F64 => Some(f64::from_bits(bits)),
        _ => None,
    }
}
