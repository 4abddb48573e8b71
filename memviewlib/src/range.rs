//! The `range` module classifies addresses against ordered collections of labeled ranges.
//!
//! A collection must be sorted by start address and free of overlaps. Lookups either scan
//! linearly (small collections) or binary search (from [`LINEAR_SEARCH_THRESHOLD`] ranges on).
//! Both strategies return identical results for every input. An inactive range that covers
//! the address ends the lookup with no match.

use crate::color::Color;
use crate::error::{MemViewError, MemViewErrorKind};
use log::{debug, trace, warn};
use std::cmp::Ordering;

/// Collections with at least this many ranges are binary searched.
pub const LINEAR_SEARCH_THRESHOLD: usize = 100;

/// A labeled half-open address interval.
pub trait Span {
    /// First address of the range (inclusive)
    fn start(&self) -> usize;
    /// End of the range (exclusive)
    fn end(&self) -> usize;
    fn color(&self) -> Color;
    fn is_active(&self) -> bool;

    fn contains(&self, addr: usize) -> bool {
        self.start() <= addr && addr < self.end()
    }
}

/// Highlighted range of bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: usize,
    pub end: usize,
    pub color: Color,
    pub active: bool,
}

impl ByteRange {
    #[must_use]
    pub const fn new(start: usize, end: usize, color: Color) -> Self {
        Self {
            start,
            end,
            color,
            active: true,
        }
    }
}

/// Annotated range of bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteRange {
    pub start: usize,
    pub end: usize,
    pub color: Color,
    pub description: String,
    pub active: bool,
}

impl NoteRange {
    #[must_use]
    pub fn new(start: usize, end: usize, color: Color, description: &str) -> Self {
        Self {
            start,
            end,
            color,
            description: description.to_string(),
            active: true,
        }
    }
}

/// Spans that can be edited in place.
pub trait SpanMut: Span {
    fn set_active(&mut self, active: bool);
    fn set_color(&mut self, color: Color);
    /// Moves the span. Owners keeping spans ordered must re-check their invariants.
    fn set_bounds(&mut self, start: usize, end: usize);
}

macro_rules! impl_span {
    ($t:ty) => {
        impl Span for $t {
            fn start(&self) -> usize {
                self.start
            }
            fn end(&self) -> usize {
                self.end
            }
            fn color(&self) -> Color {
                self.color
            }
            fn is_active(&self) -> bool {
                self.active
            }
        }

        impl SpanMut for $t {
            fn set_active(&mut self, active: bool) {
                self.active = active;
            }
            fn set_color(&mut self, color: Color) {
                self.color = color;
            }
            fn set_bounds(&mut self, start: usize, end: usize) {
                self.start = start;
                self.end = end;
            }
        }
    };
}

impl_span!(ByteRange);
impl_span!(NoteRange);

/// Position of an address inside the range covering it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RangePosition {
    #[default]
    NotInRange,
    Start,
    Middle,
    End,
}

/// Result of a range lookup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Classification {
    pub position: RangePosition,
    /// Color of the matched range
    pub color: Option<Color>,
    /// Index of the matched range within the collection
    pub index: Option<usize>,
}

impl Classification {
    pub const NOT_IN_RANGE: Self = Self {
        position: RangePosition::NotInRange,
        color: None,
        index: None,
    };

    #[must_use]
    pub const fn is_match(&self) -> bool {
        !matches!(self.position, RangePosition::NotInRange)
    }

    fn matched<T: Span>(range: &T, index: usize, addr: usize) -> Self {
        let position = if addr == range.start() {
            RangePosition::Start
        } else if addr == range.end() - 1 {
            RangePosition::End
        } else {
            RangePosition::Middle
        };

        Self {
            position,
            color: Some(range.color()),
            index: Some(index),
        }
    }
}

/// Lookup strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchStrategy {
    /// Linear below [`LINEAR_SEARCH_THRESHOLD`] ranges, binary from there on
    #[default]
    Auto,
    Linear,
    Binary,
}

/// Classifies `addr` against `ranges` choosing the strategy from the collection size.
///
/// # Example
/// ```
/// use memviewlib::{ByteRange, Color, RangePosition, range};
///
/// let red = Color::new(255, 0, 0, 255);
/// let ranges = [ByteRange::new(0x10, 0x14, red)];
///
/// assert_eq!(range::classify(&ranges, 0x10).position, RangePosition::Start);
/// assert_eq!(range::classify(&ranges, 0x12).position, RangePosition::Middle);
/// assert_eq!(range::classify(&ranges, 0x13).position, RangePosition::End);
/// assert_eq!(range::classify(&ranges, 0x14).position, RangePosition::NotInRange);
/// assert_eq!(range::classify(&ranges, 0x12).color, Some(red));
/// ```
#[must_use]
pub fn classify<T: Span>(ranges: &[T], addr: usize) -> Classification {
    classify_with(ranges, addr, SearchStrategy::Auto)
}

/// Classifies `addr` against `ranges` using the given strategy.
#[must_use]
pub fn classify_with<T: Span>(ranges: &[T], addr: usize, strategy: SearchStrategy) -> Classification {
    debug_assert!(
        validate(ranges).is_ok(),
        "ranges must be sorted by start and must not overlap"
    );

    let (Some(first), Some(last)) = (ranges.first(), ranges.last()) else {
        return Classification::NOT_IN_RANGE;
    };

    if addr < first.start() || addr >= last.end() {
        return Classification::NOT_IN_RANGE;
    }

    let found = match strategy {
        SearchStrategy::Linear => linear_find(ranges, addr),
        SearchStrategy::Binary => binary_find(ranges, addr),
        SearchStrategy::Auto if ranges.len() < LINEAR_SEARCH_THRESHOLD => linear_find(ranges, addr),
        SearchStrategy::Auto => binary_find(ranges, addr),
    };

    found.map_or(Classification::NOT_IN_RANGE, |idx| {
        Classification::matched(&ranges[idx], idx, addr)
    })
}

/// First range containing `addr`. An inactive one yields no match.
fn linear_find<T: Span>(ranges: &[T], addr: usize) -> Option<usize> {
    let idx = ranges.iter().position(|r| r.contains(addr))?;
    ranges[idx].is_active().then_some(idx)
}

/// Binary search with a three-way comparison. Landing on an inactive range cancels the search.
fn binary_find<T: Span>(ranges: &[T], addr: usize) -> Option<usize> {
    trace!("Binary search of 0x{addr:X} over {} ranges", ranges.len());

    let mut lo = 0;
    let mut hi = ranges.len();

    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        let range = &ranges[mid];

        let ord = if addr < range.start() {
            Ordering::Less
        } else if addr >= range.end() {
            Ordering::Greater
        } else {
            Ordering::Equal
        };

        match ord {
            Ordering::Less => hi = mid,
            Ordering::Greater => lo = mid + 1,
            Ordering::Equal if range.is_active() => return Some(mid),
            Ordering::Equal => return None,
        }
    }

    None
}

/// Checks whether `addr + 1` still lies inside the range at `index`.
#[must_use]
pub fn continues_at<T: Span>(ranges: &[T], index: usize, addr: usize) -> bool {
    ranges
        .get(index)
        .is_some_and(|r| addr.checked_add(1).is_some_and(|next| r.contains(next)))
}

/// Checks whether the cell below (`next_row_first_addr + column_offset`) is covered by the
/// range at `index` or by an active range found scanning forward from it.
/// The scan stops at the first range starting past the cell below.
///
/// # Example
/// ```
/// use memviewlib::{NoteRange, Color, range};
///
/// let c = Color::default();
/// let notes = [NoteRange::new(2, 6, c, "a"), NoteRange::new(9, 12, c, "b")];
///
/// // 4 columns per row: the cell below address 3 is 7, in neither note
/// assert!(!range::continues_into_next_row(&notes, 0, 4, 3));
/// // the cell below address 1 is 9, where note "b" starts
/// assert!(range::continues_into_next_row(&notes, 0, 8, 1));
/// ```
#[must_use]
pub fn continues_into_next_row<T: Span>(
    ranges: &[T],
    index: usize,
    next_row_first_addr: usize,
    column_offset: usize,
) -> bool {
    let Some(current) = ranges.get(index) else {
        return false;
    };
    let Some(below) = next_row_first_addr.checked_add(column_offset) else {
        return false;
    };

    if current.contains(below) {
        return true;
    }

    for range in &ranges[index + 1..] {
        if range.start() > below {
            break;
        }
        if range.contains(below) {
            return range.is_active();
        }
    }

    false
}

/// Checks that every range is non-empty, sorted by start, and free of overlaps.
///
/// # Errors
/// Returns the first violation found.
pub fn validate<T: Span>(ranges: &[T]) -> Result<(), MemViewError> {
    for (idx, range) in ranges.iter().enumerate() {
        if range.start() >= range.end() {
            return Err(MemViewError::RangeError(MemViewErrorKind::EmptyRange(
                range.start(),
                range.end(),
            )));
        }
        if idx == 0 {
            continue;
        }

        let prev = &ranges[idx - 1];
        if range.start() < prev.start() {
            warn!("Range #{idx} is out of order");
            return Err(MemViewError::RangeError(MemViewErrorKind::UnsortedRange(idx)));
        }
        if range.start() < prev.end() {
            warn!("Range #{idx} overlaps range #{}", idx - 1);
            return Err(MemViewError::RangeError(
                MemViewErrorKind::OverlappingRange(idx),
            ));
        }
    }
    Ok(())
}

/// Owned range collection that stays sorted and overlap free.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeSet<T> {
    ranges: Vec<T>,
}

impl<T> Default for RangeSet<T> {
    fn default() -> Self {
        Self { ranges: Vec::new() }
    }
}

impl<T: Span> RangeSet<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self { ranges: Vec::new() }
    }

    /// Builds a set from an already ordered collection.
    ///
    /// # Errors
    /// Returns an error if the ranges are unsorted, empty, or overlapping.
    pub fn from_sorted(ranges: Vec<T>) -> Result<Self, MemViewError> {
        validate(&ranges)?;
        Ok(Self { ranges })
    }

    /// Inserts the range at its sorted position and returns that position.
    ///
    /// # Errors
    /// Returns an error if the range is empty or overlaps an existing one.
    ///
    /// # Example
    /// ```
    /// use memviewlib::{ByteRange, Color, RangeSet};
    ///
    /// let mut set = RangeSet::new();
    /// let c = Color::default();
    /// assert_eq!(set.insert(ByteRange::new(10, 20, c)).ok(), Some(0));
    /// assert_eq!(set.insert(ByteRange::new(0, 5, c)).ok(), Some(0));
    /// assert!(set.insert(ByteRange::new(4, 11, c)).is_err());
    /// assert_eq!(set.len(), 2);
    /// ```
    pub fn insert(&mut self, range: T) -> Result<usize, MemViewError> {
        let idx = self.insert_position(&range)?;

        debug!(
            "Inserting range 0x{:X}..0x{:X} at #{idx}",
            range.start(),
            range.end()
        );
        self.ranges.insert(idx, range);
        Ok(idx)
    }

    /// Sorted position for `range`, or the reason it cannot be stored.
    fn insert_position(&self, range: &T) -> Result<usize, MemViewError> {
        if range.start() >= range.end() {
            return Err(MemViewError::RangeError(MemViewErrorKind::EmptyRange(
                range.start(),
                range.end(),
            )));
        }

        let idx = self.ranges.partition_point(|r| r.start() < range.start());

        if idx > 0 && self.ranges[idx - 1].end() > range.start() {
            return Err(MemViewError::RangeError(
                MemViewErrorKind::OverlappingRange(idx),
            ));
        }
        if let Some(next) = self.ranges.get(idx)
            && next.start() < range.end()
        {
            return Err(MemViewError::RangeError(
                MemViewErrorKind::OverlappingRange(idx),
            ));
        }
        Ok(idx)
    }

    /// Moves the range at `index` to `start..end` and returns its new position.
    /// On error the set is left unchanged.
    ///
    /// # Errors
    /// Returns an error if there is no range at `index`, or if the new bounds are
    /// empty or overlap another range.
    ///
    /// # Example
    /// ```
    /// use memviewlib::{ByteRange, Color, RangeSet};
    ///
    /// let mut set = RangeSet::new();
    /// let c = Color::default();
    /// set.insert(ByteRange::new(0, 4, c)).ok();
    /// set.insert(ByteRange::new(8, 12, c)).ok();
    ///
    /// assert_eq!(set.set_bounds(0, 16, 20).ok(), Some(1));
    /// assert!(set.set_bounds(1, 10, 18).is_err());
    /// assert_eq!(set.get(1).map(|r| (r.start, r.end)), Some((16, 20)));
    /// ```
    pub fn set_bounds(&mut self, index: usize, start: usize, end: usize) -> Result<usize, MemViewError>
    where
        T: SpanMut,
    {
        let mut range = self.remove(index)?;
        let (old_start, old_end) = (range.start(), range.end());
        range.set_bounds(start, end);

        match self.insert_position(&range) {
            Ok(idx) => {
                debug!("Moving range #{index} to 0x{start:X}..0x{end:X} at #{idx}");
                self.ranges.insert(idx, range);
                Ok(idx)
            }
            Err(e) => {
                warn!("Range #{index} not moved to 0x{start:X}..0x{end:X}: {e}");
                range.set_bounds(old_start, old_end);
                self.ranges.insert(index, range);
                Err(e)
            }
        }
    }

    /// Removes and returns the range at `index`.
    ///
    /// # Errors
    /// Returns an error if there is no range at `index`.
    pub fn remove(&mut self, index: usize) -> Result<T, MemViewError> {
        if index >= self.ranges.len() {
            return Err(MemViewError::RangeError(
                MemViewErrorKind::IndexOutOfBounds(index),
            ));
        }
        debug!("Removing range #{index}");
        Ok(self.ranges.remove(index))
    }

    /// Enables or disables the range at `index`.
    ///
    /// # Errors
    /// Returns an error if there is no range at `index`.
    pub fn set_active(&mut self, index: usize, active: bool) -> Result<(), MemViewError>
    where
        T: SpanMut,
    {
        let range = self.ranges.get_mut(index).ok_or(MemViewError::RangeError(
            MemViewErrorKind::IndexOutOfBounds(index),
        ))?;
        range.set_active(active);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.ranges.get(index)
    }

    /// Recolors the range at `index`.
    ///
    /// # Errors
    /// Returns an error if there is no range at `index`.
    pub fn set_color(&mut self, index: usize, color: Color) -> Result<(), MemViewError>
    where
        T: SpanMut,
    {
        let range = self.ranges.get_mut(index).ok_or(MemViewError::RangeError(
            MemViewErrorKind::IndexOutOfBounds(index),
        ))?;
        range.set_color(color);
        Ok(())
    }

    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.ranges
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.ranges.iter()
    }

    #[must_use]
    pub fn classify(&self, addr: usize) -> Classification {
        classify(&self.ranges, addr)
    }
}

impl RangeSet<NoteRange> {
    /// Replaces the text of the note at `index`.
    ///
    /// # Errors
    /// Returns an error if there is no note at `index`.
    pub fn set_description(&mut self, index: usize, description: &str) -> Result<(), MemViewError> {
        let note = self.ranges.get_mut(index).ok_or(MemViewError::RangeError(
            MemViewErrorKind::IndexOutOfBounds(index),
        ))?;
        note.description = description.to_string();
        Ok(())
    }
}

impl<'a, T> IntoIterator for &'a RangeSet<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;
    fn into_iter(self) -> Self::IntoIter {
        self.ranges.iter()
    }
}
