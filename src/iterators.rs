//! Readers over a borrowed gif byte slice.
//!
//! None of these copy the input. Every read is bounds checked; field reads fall back to a
//! caller supplied default and stream reads end with `None`.

/// Random access over fixed-offset fields of a byte slice.
#[derive(Clone, Copy)]
pub struct BitReader<'a> {
    bytes: &'a [u8],
}

impl<'a> BitReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_slice(&self) -> &'a [u8] {
        self.bytes
    }

    /// `width` bits of the byte at `offset`, starting at bit `bit` (0 = least significant).
    pub fn field(&self, offset: usize, bit: u8, width: u8, default: u8) -> u8 {
        match self.bytes.get(offset) {
            Some(&byte) => {
                let mask = ((1u16 << width.min(8)) - 1) as u8;
                byte.checked_shr(u32::from(bit)).unwrap_or(0) & mask
            }
            None => default,
        }
    }

    pub fn flag(&self, offset: usize, bit: u8) -> bool {
        self.field(offset, bit, 1, 0) == 1
    }

    pub fn byte(&self, offset: usize, default: u8) -> u8 {
        self.bytes.get(offset).copied().unwrap_or(default)
    }

    /// Little endian u16. Both bytes have to be in range, otherwise `default`.
    pub fn u16(&self, offset: usize, default: u16) -> u16 {
        match self.bytes.get(offset..offset.saturating_add(2)) {
            Some(&[lo, hi]) => u16::from_le_bytes([lo, hi]),
            _ => default,
        }
    }
}

/// Walks a chain of gif sub-blocks: `[len][len bytes of payload]...[0]`.
///
/// Once the zero length block is reached, or the slice runs out, the reader is done for good.
#[derive(Clone)]
pub struct SubBlockReader<'a> {
    bytes: &'a [u8],
    /// Offset of the current block's length byte
    block: usize,
    /// Payload bytes already taken from the current block
    offset: usize,
    end: bool,
}

impl<'a> SubBlockReader<'a> {
    pub fn new(bytes: &'a [u8], start: usize) -> Self {
        let end = !matches!(bytes.get(start), Some(len) if *len != 0);
        Self {
            bytes,
            block: start,
            offset: 0,
            end,
        }
    }

    pub fn is_done(&self) -> bool {
        self.end
    }

    /// Offset right past the terminating zero length block, once the chain has been walked.
    pub fn end_offset(&self) -> Option<usize> {
        (self.end && self.bytes.get(self.block) == Some(&0)).then_some(self.block + 1)
    }
}

impl Iterator for SubBlockReader<'_> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        if self.end {
            return None;
        }
        let value = match self.bytes.get(self.block + self.offset + 1) {
            Some(value) => *value,
            None => {
                self.end = true;
                return None;
            }
        };
        self.offset += 1;
        if self.offset == usize::from(self.bytes[self.block]) {
            self.block += self.offset + 1;
            self.offset = 0;
            if self.bytes.get(self.block).map_or(true, |len| *len == 0) {
                self.end = true;
            }
        }
        Some(value)
    }
}

/// Pulls LSB-first codes of up to 12 bits out of a sub-block chain.
#[derive(Clone)]
pub struct BitSubBlockReader<'a> {
    blocks: SubBlockReader<'a>,
    /// Unconsumed bits of the last byte, already shifted down
    current: u16,
    remaining: u8,
}

impl<'a> BitSubBlockReader<'a> {
    pub const MAX_WIDTH: u8 = 12;

    pub fn new(blocks: SubBlockReader<'a>) -> Self {
        Self {
            blocks,
            current: 0,
            remaining: 0,
        }
    }

    /// Reads the next `width` bits. A value split over a byte boundary takes its low bits from
    /// the earlier byte.
    pub fn bits(&mut self, width: u8) -> Option<u16> {
        debug_assert!((1..=Self::MAX_WIDTH).contains(&width));
        let width = width.clamp(1, Self::MAX_WIDTH);
        let mut value = 0u16;
        let mut filled = 0u8;
        while filled < width {
            if self.remaining == 0 {
                self.current = u16::from(self.blocks.next()?);
                self.remaining = 8;
            }
            let take = (width - filled).min(self.remaining);
            value |= (self.current & ((1 << take) - 1)) << filled;
            self.current >>= take;
            self.remaining -= take;
            filled += take;
        }
        Some(value)
    }
}
