use alloc::{vec, vec::Vec};

/// One scratch allocation, viewed as 16-bit words or as bytes.
///
/// The memory is owned as `u16`, so the word view is always aligned; the byte view covers the
/// same memory in native byte order.
pub struct PixelBuffer {
    words: Vec<u16>,
}

impl PixelBuffer {
    pub fn new(words: usize) -> Self {
        Self {
            words: vec![0; words],
        }
    }

    /// Size in bytes
    pub fn len(&self) -> usize {
        self.words.len() * 2
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn as_words(&self) -> &[u16] {
        &self.words
    }

    pub fn as_words_mut(&mut self) -> &mut [u16] {
        &mut self.words
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice::<u16, u8>(&self.words)
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        bytemuck::cast_slice_mut::<u16, u8>(&mut self.words)
    }

    /// Splits into the first `words` words and the remaining memory as bytes.
    ///
    /// `words` is clamped to the buffer size.
    pub fn split_planes(&mut self, words: usize) -> (&mut [u16], &mut [u8]) {
        let words = words.min(self.words.len());
        let (head, tail) = self.words.split_at_mut(words);
        (head, bytemuck::cast_slice_mut::<u16, u8>(tail))
    }
}
