//! The `highlight` module combines every highlight source into the description of a
//! single hex cell: fill color, whether the fill bridges into the next cell and the
//! edges of a note border.
//!
//! Sources, in order of precedence for the fill:
//! 1. User interval, external predicate of the [`ByteSource`] and the preview span. These
//!    use the highlight color, blended with the color of a covering range if there is one.
//! 2. Highlight ranges, using their own color.
//!
//! Notes are drawn as a border on top of whatever fill the cell has.

use crate::color::Color;
use crate::grid::GridLayout;
use crate::range::{self, ByteRange, NoteRange, RangePosition};
use crate::source::ByteSource;

/// Edges of a note border to draw around a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteBorder {
    pub color: Color,
    pub position: RangePosition,
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
}

/// Presentation of one hex cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CellHighlight {
    pub fill: Option<Color>,
    /// The fill spans the gap up to the next cell
    pub fill_continues: bool,
    pub note: Option<NoteBorder>,
}

/// Per-frame view over everything that decides how cells are highlighted.
pub struct Highlighter<'a, S: ByteSource + ?Sized> {
    source: &'a S,
    ranges: &'a [ByteRange],
    notes: &'a [NoteRange],
    layout: GridLayout,
    highlight_color: Color,
    user_interval: Option<(usize, usize)>,
    preview_span: Option<(usize, usize)>,
}

impl<'a, S: ByteSource + ?Sized> Highlighter<'a, S> {
    #[must_use]
    pub const fn new(
        source: &'a S,
        ranges: &'a [ByteRange],
        notes: &'a [NoteRange],
        layout: GridLayout,
        highlight_color: Color,
    ) -> Self {
        Self {
            source,
            ranges,
            notes,
            layout,
            highlight_color,
            user_interval: None,
            preview_span: None,
        }
    }

    /// Highlights `[min, max)`.
    #[must_use]
    pub const fn with_user_interval(mut self, min: usize, max: usize) -> Self {
        self.user_interval = Some((min, max));
        self
    }

    /// Highlights the `width` bytes of the previewed value at `addr`.
    #[must_use]
    pub const fn with_preview_span(mut self, addr: usize, width: usize) -> Self {
        self.preview_span = Some((addr, addr.saturating_add(width)));
        self
    }

    /// True when the user interval, the source predicate or the preview span covers `addr`.
    /// The ASCII column uses this alone.
    #[must_use]
    pub fn is_highlighted(&self, addr: usize) -> bool {
        let inside = |span: Option<(usize, usize)>| span.is_some_and(|(lo, hi)| lo <= addr && addr < hi);

        inside(self.user_interval) || inside(self.preview_span) || self.source.is_highlighted(addr)
    }

    /// Describes the cell showing `addr` on `visible_row`. The column is derived from the layout.
    ///
    /// # Example
    /// ```
    /// use memviewlib::{ByteRange, Color, GridLayout, Highlighter};
    ///
    /// let data = vec![0u8; 32];
    /// let green = Color::new(0, 255, 0, 255);
    /// let ranges = [ByteRange::new(4, 8, green)];
    /// let hl = Highlighter::new(&data, &ranges, &[], GridLayout::default(), Color::default());
    ///
    /// let cell = hl.cell(5, 0, 1);
    /// assert_eq!(cell.fill, Some(green));
    /// assert!(cell.fill_continues);
    /// assert!(!hl.cell(7, 0, 1).fill_continues);
    /// assert_eq!(hl.cell(8, 0, 1).fill, None);
    /// ```
    #[must_use]
    pub fn cell(
        &self,
        addr: usize,
        visible_row: usize,
        last_visible_row: usize,
    ) -> CellHighlight {
        let column = self.layout.position(addr).column;
        let in_range = range::classify(self.ranges, addr);

        let fill = if self.is_highlighted(addr) {
            Some(
                in_range
                    .color
                    .map_or(self.highlight_color, |c| self.highlight_color.blend_half(c)),
            )
        } else {
            in_range.color
        };

        let fill_continues = fill.is_some()
            && (column + 1 == self.layout.columns() || self.next_byte_continues(addr, in_range.index));

        CellHighlight {
            fill,
            fill_continues,
            note: self.note_border(addr, column, visible_row, last_visible_row),
        }
    }

    fn next_byte_continues(&self, addr: usize, range_idx: Option<usize>) -> bool {
        let next = addr + 1;
        if next >= self.source.len() {
            return false;
        }
        self.is_highlighted(next)
            || range_idx.is_some_and(|idx| range::continues_at(self.ranges, idx, addr))
    }

    fn note_border(
        &self,
        addr: usize,
        column: usize,
        visible_row: usize,
        last_visible_row: usize,
    ) -> Option<NoteBorder> {
        let note = range::classify(self.notes, addr);
        let (idx, color) = (note.index?, note.color?);

        let columns = self.layout.columns();
        let row_first = addr.saturating_sub(column);
        let row_last = addr + (columns - column - 1);

        let note_below = visible_row < last_visible_row
            && range::continues_into_next_row(self.notes, idx, row_last + 1, column);

        Some(NoteBorder {
            color,
            position: note.position,
            top: true,
            bottom: self.layout.is_mid_column_break(column) || !note_below,
            left: note.position == RangePosition::Start || addr == row_first,
            right: note.position == RangePosition::End || addr == row_last,
        })
    }
}
