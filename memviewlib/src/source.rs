//! The `source` module abstracts access to the viewed buffer.
//!
//! A [`ByteSource`] is a flat, addressable byte sequence of known length. Plain slices
//! and vectors are sources out of the box. [`FnSource`] wraps caller closures for
//! virtualized or non-contiguous memory and for externally driven highlighting.

/// Read access to the viewed buffer.
pub trait ByteSource {
    /// Number of addressable bytes.
    fn len(&self) -> usize;

    /// Byte at `offset`. Callers guarantee `offset < len()`.
    fn read(&self, offset: usize) -> u8;

    /// Externally driven highlight state of the byte at `offset`.
    fn is_highlighted(&self, _offset: usize) -> bool {
        false
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copies up to `dst.len()` bytes starting at `offset` and returns the count copied.
    /// Reads past the end are clamped (short read), `dst` is left untouched beyond it.
    fn read_into(&self, offset: usize, dst: &mut [u8]) -> usize {
        let count = dst.len().min(self.len().saturating_sub(offset));
        for (i, byte) in dst.iter_mut().take(count).enumerate() {
            *byte = self.read(offset + i);
        }
        count
    }
}

impl ByteSource for [u8] {
    fn len(&self) -> usize {
        <[u8]>::len(self)
    }

    fn read(&self, offset: usize) -> u8 {
        self[offset]
    }

    fn read_into(&self, offset: usize, dst: &mut [u8]) -> usize {
        let Some(tail) = self.get(offset..) else {
            return 0;
        };
        let count = dst.len().min(tail.len());
        dst[..count].copy_from_slice(&tail[..count]);
        count
    }
}

impl ByteSource for Vec<u8> {
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn read(&self, offset: usize) -> u8 {
        self[offset]
    }

    fn read_into(&self, offset: usize, dst: &mut [u8]) -> usize {
        self.as_slice().read_into(offset, dst)
    }
}

/// Closure backed source with an optional highlight predicate.
pub struct FnSource<R, H = fn(usize) -> bool> {
    len: usize,
    read_fn: R,
    highlight_fn: Option<H>,
}

impl<R> FnSource<R>
where
    R: Fn(usize) -> u8,
{
    /// Creates a source of `len` bytes read through `read_fn`.
    ///
    /// # Example
    /// ```
    /// use memviewlib::{ByteSource, FnSource};
    ///
    /// let src = FnSource::new(4, |off| off as u8 * 2);
    /// assert_eq!(src.read(3), 6);
    /// assert!(!src.is_highlighted(3));
    /// ```
    pub const fn new(len: usize, read_fn: R) -> Self {
        Self {
            len,
            read_fn,
            highlight_fn: None,
        }
    }
}

impl<R, H> FnSource<R, H>
where
    R: Fn(usize) -> u8,
    H: Fn(usize) -> bool,
{
    /// Creates a source that also reports external highlight state.
    pub const fn with_highlight(len: usize, read_fn: R, highlight_fn: H) -> Self {
        Self {
            len,
            read_fn,
            highlight_fn: Some(highlight_fn),
        }
    }
}

impl<R, H> ByteSource for FnSource<R, H>
where
    R: Fn(usize) -> u8,
    H: Fn(usize) -> bool,
{
    fn len(&self) -> usize {
        self.len
    }

    fn read(&self, offset: usize) -> u8 {
        (self.read_fn)(offset)
    }

    fn is_highlighted(&self, offset: usize) -> bool {
        self.highlight_fn.as_ref().is_some_and(|f| f(offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_into_clamps_short_read() {
        // Arrange
        let data: Vec<u8> = vec![1, 2, 3];
        let mut buf = [0u8; 8];

        // Act
        let count = data.read_into(1, &mut buf);

        // Assert
        assert_eq!(count, 2);
        assert_eq!(buf, [2, 3, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_read_into_past_end() {
        let data: &[u8] = &[1, 2, 3];
        let mut buf = [0u8; 4];
        assert_eq!(data.read_into(3, &mut buf), 0);
        assert_eq!(data.read_into(10, &mut buf), 0);
        assert_eq!(buf, [0; 4]);
    }

    #[test]
    fn test_vec_read_into_far_past_end() {
        // Arrange
        let data: Vec<u8> = vec![7, 8, 9];
        let mut buf = [0xEEu8; 4];

        // Act
        let at_end = data.read_into(3, &mut buf);
        let far = data.read_into(usize::MAX, &mut buf);
        let last = data.read_into(2, &mut buf);

        // Assert
        assert_eq!(at_end, 0);
        assert_eq!(far, 0);
        assert_eq!(last, 1);
        assert_eq!(buf, [9, 0xEE, 0xEE, 0xEE]);
    }

    #[test]
    fn test_fn_source_uses_default_read_into() {
        // Arrange
        let src = FnSource::with_highlight(5, |off| 0xA0 + off as u8, |off| off % 2 == 0);
        let mut buf = [0u8; 4];

        // Act
        let count = src.read_into(3, &mut buf);

        // Assert
        assert_eq!(count, 2);
        assert_eq!(&buf[..2], &[0xA3, 0xA4]);
        assert!(src.is_highlighted(4));
        assert!(!src.is_highlighted(3));
    }
}
