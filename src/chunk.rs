//! Non-owning byte-range views into source text.
//!
//! Inline literals never copy source bytes. They store a `Chunk` and the
//! caller resolves it against whatever buffer the chunk was cut from
//! (usually a block's `string_content`).

/// Compact byte range into an externally owned buffer.
///
/// # Example
/// ```
/// use marktree::Chunk;
///
/// let content = b"Hello, World!";
/// let chunk = Chunk::new(7, 12);
/// assert_eq!(chunk.slice(content), b"World");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[repr(C)]
pub struct Chunk {
    pub start: u32,
    pub end: u32,
}

const _: () = assert!(std::mem::size_of::<Chunk>() == 8);

impl Chunk {
    /// Create a new chunk.
    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Create a chunk from usize offsets.
    ///
    /// # Panics
    /// Panics in debug mode if values exceed u32::MAX.
    #[inline]
    pub fn from_usize(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        debug_assert!(end <= u32::MAX as usize);
        Self {
            start: start as u32,
            end: end as u32,
        }
    }

    /// Chunk covering all of `bytes`.
    #[inline]
    pub fn whole(bytes: &[u8]) -> Self {
        Self::from_usize(0, bytes.len())
    }

    /// The bytes this chunk refers to.
    ///
    /// # Panics
    /// Panics if the chunk lies outside `source`.
    #[inline]
    pub fn slice<'a>(&self, source: &'a [u8]) -> &'a [u8] {
        &source[self.start as usize..self.end as usize]
    }

    /// Non-panicking variant of [`Chunk::slice`].
    #[inline]
    pub fn get<'a>(&self, source: &'a [u8]) -> Option<&'a [u8]> {
        source.get(self.start as usize..self.end as usize)
    }

    /// Length in bytes. A reversed chunk is empty.
    #[inline]
    pub const fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Shrink the chunk so it excludes leading and trailing ASCII
    /// whitespace of `source`.
    pub fn trim(&self, source: &[u8]) -> Self {
        let bytes = self.slice(source);
        let lead = bytes
            .iter()
            .position(|b| !b.is_ascii_whitespace())
            .unwrap_or(bytes.len());
        let trail = bytes[lead..]
            .iter()
            .rev()
            .position(|b| !b.is_ascii_whitespace())
            .unwrap_or(0);
        Self::new(self.start + lead as u32, self.end - trail as u32)
    }
}

impl From<std::ops::Range<usize>> for Chunk {
    #[inline]
    fn from(r: std::ops::Range<usize>) -> Self {
        Self::from_usize(r.start, r.end)
    }
}

impl From<Chunk> for std::ops::Range<usize> {
    #[inline]
    fn from(c: Chunk) -> Self {
        c.start as usize..c.end as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_slice() {
        let input = b"Hello, World!";
        assert_eq!(Chunk::new(0, 5).slice(input), b"Hello");
        assert_eq!(Chunk::whole(input).slice(input), input);
    }

    #[test]
    fn test_chunk_get_out_of_bounds() {
        assert_eq!(Chunk::new(3, 10).get(b"abc"), None);
        assert_eq!(Chunk::new(1, 3).get(b"abc"), Some(&b"bc"[..]));
    }

    #[test]
    fn test_chunk_trim() {
        let input = b"  <a@b.c>\t\n";
        let trimmed = Chunk::whole(input).trim(input);
        assert_eq!(trimmed.slice(input), b"<a@b.c>");

        let blank = b"   ";
        let t = Chunk::whole(blank).trim(blank);
        assert!(t.is_empty());
    }

    #[test]
    fn test_reversed_chunk_is_empty() {
        let c = Chunk::new(5, 2);
        assert_eq!(c.len(), 0);
        assert!(c.is_empty());
        assert_eq!(c.get(b"abcdefg"), None);
    }

    #[test]
    fn test_chunk_from_std_range() {
        let c: Chunk = (2usize..6usize).into();
        assert_eq!(c, Chunk::new(2, 6));
        assert_eq!(c.len(), 4);
        let r: std::ops::Range<usize> = c.into();
        assert_eq!(r, 2..6);
    }
}
