//! The `editor` module holds the state of one memory view session: display options,
//! highlight ranges, notes, the previewed value and the value converter.

use crate::codec::{self, Rendered};
use crate::color::Color;
use crate::converter::Converter;
use crate::error::MemViewError;
use crate::grid::{GridLayout, GridPosition};
use crate::highlight::Highlighter;
use crate::numeric::{Endianness, NumericType};
use crate::range::{ByteRange, NoteRange, RangeSet};
use crate::source::ByteSource;
use log::debug;

pub const DEFAULT_HIGHLIGHT_COLOR: Color = Color::new(255, 127, 255, 150);
pub const DEFAULT_NOTE_COLOR: Color = Color::new(255, 200, 0, 255);
pub const DEFAULT_NOTE_DESCRIPTION: &str = "Some description";

/// Display options of the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorOptions {
    /// Bytes per row, 16 by default so rows line up with paragraph-aligned addresses
    pub cols: usize,
    /// Extra spacing every N columns, 0 disables it
    pub mid_cols: usize,
    /// Address width in hex digits, 0 computes it from the buffer size
    pub addr_digits: usize,
    /// Address shown for offset 0
    pub base_display_addr: usize,
    pub upper_case_hex: bool,
    pub highlight_color: Color,
    pub default_note_color: Color,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            cols: 16,
            mid_cols: 8,
            addr_digits: 0,
            base_display_addr: 0,
            upper_case_hex: true,
            highlight_color: DEFAULT_HIGHLIGHT_COLOR,
            default_note_color: DEFAULT_NOTE_COLOR,
        }
    }
}

/// Session state of a memory view.
#[derive(Debug, Clone, Default)]
pub struct MemoryEditor {
    pub options: EditorOptions,
    /// Highlighted ranges
    pub ranges: RangeSet<ByteRange>,
    /// Annotated ranges
    pub notes: RangeSet<NoteRange>,
    pub preview_type: NumericType,
    pub preview_endianness: Endianness,
    pub converter: Converter,
    preview_addr: Option<usize>,
    /// User highlight `[min, max)`
    highlight: Option<(usize, usize)>,
    goto_addr: Option<usize>,
}

impl MemoryEditor {
    #[must_use]
    pub fn new(options: EditorOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Grid geometry derived from the options.
    #[must_use]
    pub const fn layout(&self) -> GridLayout {
        GridLayout::new(self.options.cols, self.options.mid_cols)
            .with_base_display_addr(self.options.base_display_addr)
            .with_addr_digits(self.options.addr_digits)
    }

    #[must_use]
    pub const fn preview_addr(&self) -> Option<usize> {
        self.preview_addr
    }

    #[must_use]
    pub const fn highlight_interval(&self) -> Option<(usize, usize)> {
        self.highlight
    }

    /// Previews the value at `addr`. Addresses outside a `len` byte buffer clear the preview.
    pub fn set_preview_addr(&mut self, addr: usize, len: usize) {
        self.preview_addr = (addr < len).then_some(addr);
    }

    /// Renders the previewed value, if any.
    #[must_use]
    pub fn preview<S: ByteSource + ?Sized>(&self, source: &S) -> Option<Rendered> {
        let addr = self.preview_addr?;
        codec::preview(source, addr, self.preview_type, self.preview_endianness).ok()
    }

    /// Requests a jump to `min` and highlights `[min, max)`.
    pub fn goto_and_highlight(&mut self, min: usize, max: usize) {
        self.goto_addr = Some(min);
        self.highlight = Some((min, max));
    }

    /// Parses a hex address typed by the user (as displayed, so including the base address)
    /// and requests a jump to it. Any user highlight is cleared.
    /// Returns the buffer offset, or `None` when the text is not a hex number or is outside
    /// the `len` byte buffer.
    ///
    /// # Example
    /// ```
    /// use memviewlib::{EditorOptions, MemoryEditor};
    ///
    /// let mut editor = MemoryEditor::new(EditorOptions {
    ///     base_display_addr: 0x8000,
    ///     ..EditorOptions::default()
    /// });
    ///
    /// assert_eq!(editor.parse_goto("0x8010", 0x100), Some(0x10));
    /// assert_eq!(editor.parse_goto("80ff", 0x100), Some(0xFF));
    /// assert_eq!(editor.parse_goto("8100", 0x100), None);
    /// assert_eq!(editor.parse_goto("7fff", 0x100), None);
    /// assert_eq!(editor.parse_goto("zz", 0x100), None);
    /// ```
    pub fn parse_goto(&mut self, text: &str, len: usize) -> Option<usize> {
        let text = text.trim();
        let digits = text
            .strip_prefix("0x")
            .or_else(|| text.strip_prefix("0X"))
            .unwrap_or(text);

        let Ok(display_addr) = usize::from_str_radix(digits, 16) else {
            debug!("Goto input '{text}' is not a hex address");
            return None;
        };

        let offset = display_addr
            .checked_sub(self.options.base_display_addr)
            .filter(|&off| off < len);
        let Some(offset) = offset else {
            debug!("Goto address 0x{display_addr:X} is outside of the buffer");
            return None;
        };

        self.goto_addr = Some(offset);
        self.highlight = None;
        Some(offset)
    }

    /// Consumes the pending jump. A target inside the `len` byte buffer becomes the preview
    /// address and its cell is returned so the view can scroll to it.
    pub fn take_goto(&mut self, len: usize) -> Option<GridPosition> {
        let addr = self.goto_addr.take()?;
        if addr >= len {
            return None;
        }
        self.preview_addr = Some(addr);
        Some(self.layout().position(addr))
    }

    /// Adds a highlight range.
    ///
    /// # Errors
    /// Returns an error if the range is empty or overlaps an existing one.
    pub fn add_range(&mut self, start: usize, end: usize, color: Color) -> Result<usize, MemViewError> {
        self.ranges.insert(ByteRange::new(start, end, color))
    }

    /// Adds a note with the default note color.
    ///
    /// # Errors
    /// Returns an error if the range is empty or overlaps an existing note.
    pub fn add_note(&mut self, start: usize, end: usize, description: &str) -> Result<usize, MemViewError> {
        self.notes.insert(NoteRange::new(
            start,
            end,
            self.options.default_note_color,
            description,
        ))
    }

    /// Adds the placeholder note covering the first byte.
    ///
    /// # Errors
    /// Returns an error if a note already covers the first byte.
    pub fn add_default_note(&mut self) -> Result<usize, MemViewError> {
        self.add_note(0, 1, DEFAULT_NOTE_DESCRIPTION)
    }

    /// Removes the note at `index`.
    ///
    /// # Errors
    /// Returns an error if there is no note at `index`.
    pub fn remove_note(&mut self, index: usize) -> Result<NoteRange, MemViewError> {
        self.notes.remove(index)
    }

    /// Flips the active flag of the note at `index` and returns the new state.
    ///
    /// # Errors
    /// Returns an error if there is no note at `index`.
    pub fn toggle_note(&mut self, index: usize) -> Result<bool, MemViewError> {
        let active = !self.notes.get(index).is_some_and(|n| n.active);
        self.notes.set_active(index, active)?;
        Ok(active)
    }

    /// Moves the note at `index` to `start..end` and returns its new position.
    /// A rejected move leaves the note where it was.
    ///
    /// # Errors
    /// Returns an error if there is no note at `index`, or if the new bounds are
    /// empty or overlap another note.
    pub fn set_note_bounds(&mut self, index: usize, start: usize, end: usize) -> Result<usize, MemViewError> {
        self.notes.set_bounds(index, start, end)
    }

    /// Replaces the text of the note at `index`.
    ///
    /// # Errors
    /// Returns an error if there is no note at `index`.
    pub fn set_note_description(&mut self, index: usize, description: &str) -> Result<(), MemViewError> {
        self.notes.set_description(index, description)
    }

    /// # Errors
    /// Returns an error if there is no note at `index`.
    pub fn set_note_color(&mut self, index: usize, color: Color) -> Result<(), MemViewError> {
        self.notes.set_color(index, color)
    }

    /// Renders one row of `source` as text.
    #[must_use]
    pub fn format_row<S: ByteSource + ?Sized>(&self, source: &S, row: usize) -> Option<String> {
        self.layout().format_row(source, row, self.options.upper_case_hex)
    }

    /// Builds the cell highlighter for the current state.
    #[must_use]
    pub fn highlighter<'a, S: ByteSource + ?Sized>(&'a self, source: &'a S) -> Highlighter<'a, S> {
        let mut hl = Highlighter::new(
            source,
            self.ranges.as_slice(),
            self.notes.as_slice(),
            self.layout(),
            self.options.highlight_color,
        );
        if let Some((min, max)) = self.highlight {
            hl = hl.with_user_interval(min, max);
        }
        if let Some(addr) = self.preview_addr {
            hl = hl.with_preview_span(addr, self.preview_type.width());
        }
        hl
    }
}
