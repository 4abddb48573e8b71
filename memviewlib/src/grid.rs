//! The `grid` module maps buffer offsets onto the rows and columns of the hex view.

use crate::source::ByteSource;
use std::fmt::Write;

/// Cell coordinates of an address.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GridPosition {
    pub row: usize,
    pub column: usize,
}

/// Geometry of the hex view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    columns: usize,
    mid_columns: usize,
    base_display_addr: usize,
    addr_digits: usize,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self::new(16, 8)
    }
}

impl GridLayout {
    /// Creates a layout of `columns` bytes per row, grouped every `mid_columns` bytes
    /// (0 disables grouping). Columns are clamped to at least one.
    #[must_use]
    pub const fn new(columns: usize, mid_columns: usize) -> Self {
        Self {
            columns: if columns < 1 { 1 } else { columns },
            mid_columns,
            base_display_addr: 0,
            addr_digits: 0,
        }
    }

    /// Address shown for offset 0.
    #[must_use]
    pub const fn with_base_display_addr(mut self, base: usize) -> Self {
        self.base_display_addr = base;
        self
    }

    /// Fixed address width in hex digits. 0 computes it from the buffer size.
    #[must_use]
    pub const fn with_addr_digits(mut self, digits: usize) -> Self {
        self.addr_digits = digits;
        self
    }

    #[must_use]
    pub const fn columns(&self) -> usize {
        self.columns
    }

    #[must_use]
    pub const fn mid_columns(&self) -> usize {
        self.mid_columns
    }

    #[must_use]
    pub const fn base_display_addr(&self) -> usize {
        self.base_display_addr
    }

    #[must_use]
    pub const fn position(&self, addr: usize) -> GridPosition {
        GridPosition {
            row: addr / self.columns,
            column: addr % self.columns,
        }
    }

    #[must_use]
    pub const fn address(&self, row: usize, column: usize) -> usize {
        row * self.columns + column
    }

    /// Number of rows needed to show `len` bytes.
    #[must_use]
    pub const fn row_count(&self, len: usize) -> usize {
        len.div_ceil(self.columns)
    }

    #[must_use]
    pub const fn row_first_addr(&self, row: usize) -> usize {
        row * self.columns
    }

    /// Last address of a full row, whether or not the buffer reaches it.
    #[must_use]
    pub const fn row_last_addr(&self, row: usize) -> usize {
        self.row_first_addr(row) + self.columns - 1
    }

    #[must_use]
    pub const fn next_row_first_addr(&self, addr: usize) -> usize {
        self.row_first_addr(addr / self.columns + 1)
    }

    /// True when `column` closes a mid-column group and is not the last column.
    ///
    /// # Example
    /// ```
    /// use memviewlib::GridLayout;
    ///
    /// let grid = GridLayout::new(16, 8);
    /// assert!(grid.is_mid_column_break(7));
    /// assert!(!grid.is_mid_column_break(8));
    /// assert!(!grid.is_mid_column_break(15));
    /// assert!(!GridLayout::new(16, 0).is_mid_column_break(7));
    /// ```
    #[must_use]
    pub const fn is_mid_column_break(&self, column: usize) -> bool {
        self.mid_columns > 0
            && column > 0
            && column + 1 < self.columns
            && (column + 1) % self.mid_columns == 0
    }

    /// Hex digits needed for the largest displayed address of a `len` byte buffer.
    ///
    /// # Example
    /// ```
    /// use memviewlib::GridLayout;
    ///
    /// assert_eq!(GridLayout::default().addr_digits(0x1_0000), 4);
    /// assert_eq!(GridLayout::default().addr_digits(0x1_0001), 5);
    /// assert_eq!(GridLayout::default().with_base_display_addr(0x8000_0000).addr_digits(16), 8);
    /// assert_eq!(GridLayout::default().with_addr_digits(12).addr_digits(16), 12);
    /// ```
    #[must_use]
    pub const fn addr_digits(&self, len: usize) -> usize {
        if self.addr_digits > 0 {
            return self.addr_digits;
        }

        let mut last = (self.base_display_addr + len).saturating_sub(1);
        let mut digits = 0;
        while last > 0 {
            digits += 1;
            last >>= 4;
        }
        if digits == 0 { 1 } else { digits }
    }

    /// Renders one row as `ADDR: XX XX ...  ascii`. Returns `None` past the end of the buffer.
    ///
    /// Short last rows are padded so the ASCII column stays aligned. Bytes outside the
    /// printable ASCII range are shown as `.`.
    ///
    /// # Example
    /// ```
    /// use memviewlib::GridLayout;
    ///
    /// let grid = GridLayout::new(4, 2);
    /// let data = b"AB\x00\x80C".to_vec();
    ///
    /// assert_eq!(grid.format_row(&data, 0, true).as_deref(), Some("0: 41 42  00 80  AB.."));
    /// assert_eq!(grid.format_row(&data, 1, true).as_deref(), Some("4: 43            C"));
    /// assert_eq!(grid.format_row(&data, 2, true), None);
    /// ```
    #[must_use]
    pub fn format_row<S: ByteSource + ?Sized>(
        &self,
        source: &S,
        row: usize,
        upper_case: bool,
    ) -> Option<String> {
        let len = source.len();
        let first = self.row_first_addr(row);
        if first >= len {
            return None;
        }

        let digits = self.addr_digits(len);
        let display_addr = self.base_display_addr + first;

        let mut line = String::with_capacity(digits + 2 + self.columns * 4 + 2);
        let mut ascii = String::with_capacity(self.columns);

        // Writing into a String never fails
        let _ = if upper_case {
            write!(line, "{display_addr:0digits$X}: ")
        } else {
            write!(line, "{display_addr:0digits$x}: ")
        };

        for column in 0..self.columns {
            let addr = first + column;
            if addr < len {
                let byte = source.read(addr);
                let _ = if upper_case {
                    write!(line, "{byte:02X} ")
                } else {
                    write!(line, "{byte:02x} ")
                };
                ascii.push(display_char(byte));
            } else {
                line.push_str("   ");
            }
            if self.is_mid_column_break(column) {
                line.push(' ');
            }
        }

        line.push(' ');
        line.push_str(&ascii);
        Some(line)
    }
}

/// Character shown in the ASCII column for `byte`.
#[must_use]
pub fn display_char(byte: u8) -> char {
    if byte < 32 || byte >= 128 {
        '.'
    } else {
        char::from(byte)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::FnSource;

    #[test]
    fn test_columns_clamped() {
        let grid = GridLayout::new(0, 8);
        assert_eq!(grid.columns(), 1);
        assert_eq!(grid.row_count(5), 5);
    }

    #[test]
    fn test_position_and_address_agree() {
        // Arrange
        let grid = GridLayout::new(14, 8);

        for addr in 0..200 {
            // Act
            let pos = grid.position(addr);

            // Assert
            assert!(pos.column < 14);
            assert_eq!(grid.address(pos.row, pos.column), addr);
            assert!(grid.row_first_addr(pos.row) <= addr);
            assert!(addr <= grid.row_last_addr(pos.row));
            assert_eq!(grid.next_row_first_addr(addr), grid.row_first_addr(pos.row + 1));
        }
    }

    #[test]
    fn test_row_count() {
        let grid = GridLayout::default();
        assert_eq!(grid.row_count(0), 0);
        assert_eq!(grid.row_count(1), 1);
        assert_eq!(grid.row_count(16), 1);
        assert_eq!(grid.row_count(17), 2);
    }

    #[test]
    fn test_addr_digits_of_empty_buffer() {
        assert_eq!(GridLayout::default().addr_digits(0), 1);
        assert_eq!(GridLayout::default().addr_digits(1), 1);
    }

    #[test]
    fn test_format_row_full() {
        // Arrange
        let grid = GridLayout::default().with_base_display_addr(0x1000);
        let data: Vec<u8> = (0x30..0x50).collect();

        // Act
        let row = grid.format_row(&data, 1, false);

        // Assert
        assert_eq!(
            row.as_deref(),
            Some("1010: 40 41 42 43 44 45 46 47  48 49 4a 4b 4c 4d 4e 4f  @ABCDEFGHIJKLMNO")
        );
    }

    #[test]
    fn test_format_row_through_read_fn() {
        // Arrange
        let grid = GridLayout::new(2, 0).with_addr_digits(4);
        let src = FnSource::new(3, |off| if off == 2 { 0x80 } else { b'z' });

        // Act
        let rows: Vec<String> = (0..grid.row_count(3))
            .filter_map(|row| grid.format_row(&src, row, true))
            .collect();

        // Assert
        assert_eq!(rows, vec!["0000: 7A 7A  zz", "0002: 80     ."]);
    }

    #[test]
    fn test_display_char() {
        assert_eq!(display_char(b'A'), 'A');
        assert_eq!(display_char(b' '), ' ');
        assert_eq!(display_char(0x1F), '.');
        assert_eq!(display_char(0x7F), '\x7f');
        assert_eq!(display_char(0x80), '.');
    }
}
