//! GIF flavoured LZW decompression.
//!
//! The dictionary is one code ahead of the stream: every code read allocates a pending entry
//! whose trailing byte is only known once the following code arrives.

use alloc::boxed::Box;
use smallvec::SmallVec;

use crate::iterators::BitSubBlockReader;

/// Widest code a gif stream may use.
pub const MAX_CODE_WIDTH: u8 = 12;
/// Size of the code space at [`MAX_CODE_WIDTH`].
pub const MAX_CODES: u16 = 1 << MAX_CODE_WIDTH;
/// Entries per lazily allocated dictionary block.
pub const BLOCK_LEN: usize = 256;

const MAX_BLOCKS: usize = MAX_CODES as usize / BLOCK_LEN;

#[derive(Clone, Copy, Default)]
struct Entry {
    /// Byte appended when this code was formed
    byte: u8,
    /// Code this one extends
    prev: u16,
}

type DictBlock = [Entry; BLOCK_LEN];

/// Scratch space for one code's expansion, newest byte first.
pub(crate) type Chain = SmallVec<[u8; 256]>;

/// Code table for one LZW stream.
pub struct Dictionary {
    primary_code_count: u16,
    blocks: SmallVec<[Box<DictBlock>; MAX_BLOCKS]>,
    code_count: u16,
    pending: Option<u16>,
}

impl Dictionary {
    /// A table holding only the `2^min_code_size` literals plus the clear and end codes.
    pub fn new(min_code_size: u8) -> Self {
        let mut dict = Self {
            primary_code_count: (1 << min_code_size) + 2,
            blocks: SmallVec::new(),
            code_count: 0,
            pending: None,
        };
        dict.reset();
        dict
    }

    pub fn primary_code_count(&self) -> u16 {
        self.primary_code_count
    }

    /// Next code to be allocated.
    pub fn code_count(&self) -> u16 {
        self.code_count
    }

    /// Bits per code: the smallest width that can represent every allocated code.
    pub fn code_width(&self) -> u8 {
        (u16::BITS - (self.code_count - 1).leading_zeros()) as u8
    }

    pub fn contains(&self, code: u16) -> bool {
        code < self.code_count
    }

    pub fn is_full(&self) -> bool {
        self.code_count >= MAX_CODES
    }

    fn slot(&self, code: u16) -> Option<(usize, usize)> {
        let index = usize::from(code.checked_sub(self.primary_code_count)?);
        Some((index / BLOCK_LEN, index % BLOCK_LEN))
    }

    fn entry(&self, code: u16) -> Option<&Entry> {
        if !self.contains(code) {
            return None;
        }
        let (block, item) = self.slot(code)?;
        self.blocks.get(block).map(|block| &block[item])
    }

    /// Allocates the next code as an extension of `prev`, leaving its byte to
    /// [`complete_pending`](Self::complete_pending). Returns `None` once the code space is used up.
    pub fn add_pending(&mut self, prev: u16) -> Option<u16> {
        if self.is_full() {
            return None;
        }
        let code = self.code_count;
        let (block, item) = self.slot(code)?;
        if block >= self.blocks.len() {
            self.blocks.push(Box::new([Entry::default(); BLOCK_LEN]));
        }
        self.blocks[block][item] = Entry { byte: 0, prev };
        self.code_count += 1;
        self.pending = Some(code);
        Some(code)
    }

    /// Fills in the trailing byte of the code handed out by the last `add_pending`.
    pub fn complete_pending(&mut self, code: u16, byte: u8) {
        debug_assert_eq!(self.pending, Some(code));
        if let Some((block, item)) = self.slot(code) {
            if let Some(block) = self.blocks.get_mut(block) {
                block[item].byte = byte;
            }
        }
        if self.pending == Some(code) {
            self.pending = None;
        }
    }

    /// The literal a code's expansion starts with.
    pub fn first_byte(&self, mut code: u16) -> u8 {
        while code >= self.primary_code_count {
            match self.entry(code) {
                Some(entry) => code = entry.prev,
                None => break,
            }
        }
        code as u8
    }

    /// Writes the expansion of `code` into `chain`, newest byte first.
    pub(crate) fn expand_into(&self, mut code: u16, chain: &mut Chain) {
        chain.clear();
        if code < self.primary_code_count {
            chain.push(code as u8);
            return;
        }
        // A still pending code ends with its own first byte
        let last = if self.pending == Some(code) {
            self.first_byte(code)
        } else {
            self.entry(code).map_or(0, |entry| entry.byte)
        };
        chain.push(last);
        while code >= self.primary_code_count {
            code = match self.entry(code) {
                Some(entry) => entry.prev,
                None => return,
            };
            match self.entry(code) {
                Some(entry) if code >= self.primary_code_count => chain.push(entry.byte),
                _ => chain.push(code as u8),
            }
        }
    }

    /// Calls `sink` with every byte `code` stands for, in stream order.
    pub fn emit<F: FnMut(u8)>(&self, code: u16, mut sink: F) {
        let mut chain = Chain::new();
        self.expand_into(code, &mut chain);
        chain.iter().rev().for_each(|byte| sink(*byte));
    }

    /// Drops every code above the primaries.
    pub fn reset(&mut self) {
        self.blocks.clear();
        self.code_count = self.primary_code_count;
        self.pending = None;
    }
}

/// Streams decoded bytes out of a gif LZW code stream.
///
/// Ends on the end code, or silently when the sub-blocks run dry or a code makes no sense.
pub struct LzwDecoder<'a> {
    bits: BitSubBlockReader<'a>,
    dict: Dictionary,
    clear_code: u16,
    end_code: u16,
    prev: Option<u16>,
    /// Undelivered bytes of the current code, newest first
    chain: Chain,
    done: bool,
}

impl<'a> LzwDecoder<'a> {
    /// Smallest literal width gif allows us to handle
    pub const MIN_CODE_SIZE: u8 = 1;
    /// Largest literal width; literals have to fit a byte
    pub const MAX_CODE_SIZE: u8 = 8;

    pub fn new(bits: BitSubBlockReader<'a>, min_code_size: u8) -> Self {
        let supported = (Self::MIN_CODE_SIZE..=Self::MAX_CODE_SIZE).contains(&min_code_size);
        if !supported {
            log::warn!("lzw: unsupported minimum code size {}", min_code_size);
        }
        let min_code_size = min_code_size.clamp(Self::MIN_CODE_SIZE, Self::MAX_CODE_SIZE);
        let clear_code = 1 << min_code_size;
        Self {
            bits,
            dict: Dictionary::new(min_code_size),
            clear_code,
            end_code: clear_code + 1,
            prev: None,
            chain: Chain::new(),
            done: !supported,
        }
    }

    /// Runs the stream to completion, handing every byte to `sink`.
    pub fn decode<F: FnMut(u8)>(self, sink: F) {
        self.for_each(sink)
    }

    fn step(&mut self) {
        let code = match self.bits.bits(self.dict.code_width()) {
            Some(code) => code,
            None => {
                log::warn!("lzw: sub-blocks exhausted before the end code");
                self.done = true;
                return;
            }
        };

        if code == self.clear_code {
            log::trace!("lzw: clear after {} codes", self.dict.code_count());
            self.dict.reset();
            self.prev = None;
            return;
        }
        if code == self.end_code {
            log::debug!("lzw: end code");
            self.done = true;
            return;
        }
        if code > self.end_code && !self.dict.contains(code) {
            log::warn!("lzw: code {} is not in the dictionary", code);
            self.done = true;
            return;
        }

        if let Some(prev) = self.prev {
            let byte = self.dict.first_byte(code);
            self.dict.complete_pending(prev, byte);
        }
        self.dict.expand_into(code, &mut self.chain);
        let next = self.dict.add_pending(code);
        if next.is_none() && self.prev.is_some() {
            log::warn!("lzw: dictionary full without a clear code");
        }
        self.prev = next;
    }
}

impl Iterator for LzwDecoder<'_> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        loop {
            if let Some(byte) = self.chain.pop() {
                return Some(byte);
            }
            if self.done {
                return None;
            }
            self.step();
        }
    }
}
