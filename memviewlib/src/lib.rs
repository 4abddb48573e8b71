//! # `memviewlib`
//!
//! `memviewlib` is the headless core of a hex memory view. It answers the two questions a
//! view asks for every visible byte: which labeled range covers it, and what the bytes at
//! an offset look like as a typed number.
//!
//! The library provides:
//! - Classification of addresses against ordered highlight / note ranges (via [`range`]).
//! - Typed decoding and encoding of buffer bytes in binary, decimal and hex (via [`codec`]).
//! - A value converter keeping one working value across type and format changes ([`Converter`]).
//! - Grid geometry and row rendering ([`GridLayout`]).
//! - Per-cell highlight composition ([`Highlighter`]) and session state ([`MemoryEditor`]).
//! - Error handling with [`MemViewError`].
//!
//! ## Example
//!
//! ```
//! use memviewlib::{codec, Endianness, NumericFormat, NumericType};
//!
//! let data = vec![0x12u8, 0x34];
//!
//! let be = codec::decode(&data, 0, NumericType::U16, NumericFormat::Decimal, Endianness::Big);
//! let le = codec::decode(&data, 0, NumericType::U16, NumericFormat::Decimal, Endianness::Little);
//!
//! assert_eq!(be.ok().as_deref(), Some("4660"));
//! assert_eq!(le.ok().as_deref(), Some("13330"));
//! ```

#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic
)]

pub mod codec;
mod color;
mod converter;
mod editor;
mod error;
mod grid;
mod highlight;
mod numeric;
pub mod range;
mod source;

// Public APIs
pub use codec::Rendered;
pub use color::Color;
pub use converter::{ConversionState, Converter, convert_bits};
pub use editor::{
    DEFAULT_HIGHLIGHT_COLOR, DEFAULT_NOTE_COLOR, DEFAULT_NOTE_DESCRIPTION, EditorOptions,
    MemoryEditor,
};
pub use error::{MemViewError, MemViewErrorKind};
pub use grid::{GridLayout, GridPosition, display_char};
pub use highlight::{CellHighlight, Highlighter, NoteBorder};
pub use numeric::{Endianness, NumericFormat, NumericType};
pub use range::{
    ByteRange, Classification, NoteRange, RangePosition, RangeSet, SearchStrategy, Span, SpanMut,
};
pub use source::{ByteSource, FnSource};
