// src/scanner/tables/classifier.rs
// Two-level code point -> character class lookup. The top level is indexed by
// the high-order bits of the code point and yields an offset into the flat
// block array; the low byte indexes within the block. Identical blocks are
// shared, which is what keeps the table small.

/// Low-order bits covered by one second-level block.
pub const BLOCK_BITS: u32 = 8;
pub const BLOCK_SIZE: usize = 1 << BLOCK_BITS;
/// Number of top-level entries covering U+0000..=U+10FFFF.
pub const TOP_LEN: usize = 0x11_0000 >> BLOCK_BITS;

/// Class id every unmapped or out-of-range code point resolves to.
pub const DEFAULT_CLASS: u16 = 0;

pub struct CharClassifier {
    /// Block offsets, low BLOCK_BITS bits zero: lookup is
    /// `blocks[top[cp >> 8] | (cp & 0xff)]`.
    top: Vec<u32>,
    blocks: Vec<u16>,
}

impl CharClassifier {
    /// `top` holds block indices (not offsets); the packed form stays u16
    /// even when the shared block array outgrows one.
    pub fn from_parts(top: Vec<u16>, blocks: Vec<u16>) -> Result<Self, String> {
        if top.len() != TOP_LEN {
            return Err(format!(
                "classifier top level has {} entries, expected {TOP_LEN}",
                top.len()
            ));
        }
        if blocks.is_empty() || blocks.len() % BLOCK_SIZE != 0 {
            return Err(format!(
                "classifier block array length {} is not a multiple of {BLOCK_SIZE}",
                blocks.len()
            ));
        }
        let n_blocks = blocks.len() / BLOCK_SIZE;
        let mut offsets = Vec::with_capacity(top.len());
        for &id in &top {
            if id as usize >= n_blocks {
                return Err(format!(
                    "classifier block index {id} out of range (have {n_blocks} blocks)"
                ));
            }
            offsets.push((id as u32) << BLOCK_BITS);
        }
        Ok(Self {
            top: offsets,
            blocks,
        })
    }

    /// Largest class id present in the table.
    pub fn max_class(&self) -> u16 {
        self.blocks.iter().copied().max().unwrap_or(DEFAULT_CLASS)
    }

    #[inline]
    pub fn classify(&self, cp: u32) -> u16 {
        match self.top.get((cp >> BLOCK_BITS) as usize) {
            Some(&off) => self.blocks[off as usize | (cp as usize & (BLOCK_SIZE - 1))],
            None => DEFAULT_CLASS,
        }
    }
}
