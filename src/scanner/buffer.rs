// src/scanner/buffer.rs
// Input ownership and cursor plumbing. The buffer is a `[start, end)` window
// over UTF-8 text; positions are byte offsets and always sit on code point
// boundaries. Already-yielded spans are never mutated.

/// The three positions a scan session tracks: `start` of the current match
/// attempt, `current` read head, `marked` end of the last accepting match.
/// Invariant: `start <= marked <= current <= end of buffer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursors {
    pub start: usize,
    pub current: usize,
    pub marked: usize,
}

impl Cursors {
    pub fn at(pos: usize) -> Self {
        Self {
            start: pos,
            current: pos,
            marked: pos,
        }
    }
}

pub struct Buffer<'a> {
    text: &'a str,
    end: usize,
}

impl<'a> Buffer<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            end: text.len(),
        }
    }

    /// Window over `[start, end)`. Both bounds must lie on char boundaries.
    /// The caller seeds its cursors at `start`; positions below it are never
    /// read back.
    pub fn window(text: &'a str, start: usize, end: usize) -> Self {
        assert!(start <= end && end <= text.len(), "window out of range");
        assert!(
            text.is_char_boundary(start) && text.is_char_boundary(end),
            "window bounds must be char boundaries"
        );
        Self { text, end }
    }

    /// Next code point at `pos`, or `None` once the window is exhausted.
    #[inline]
    pub fn char_at(&self, pos: usize) -> Option<char> {
        if pos >= self.end {
            return None;
        }
        self.text[pos..self.end].chars().next()
    }

    /// Walk `pos` back by `n` code points, not past `floor`. `None` when the
    /// span holds fewer than `n` code points.
    pub fn step_back(&self, mut pos: usize, floor: usize, n: usize) -> Option<usize> {
        for _ in 0..n {
            if pos <= floor {
                return None;
            }
            let (i, _) = self.text[floor..pos].char_indices().next_back()?;
            pos = floor + i;
        }
        Some(pos)
    }

    /// Advance `pos` by `n` code points, staying inside the window.
    pub fn advance_by(&self, mut pos: usize, n: usize) -> Option<usize> {
        for _ in 0..n {
            let c = self.char_at(pos)?;
            pos += c.len_utf8();
        }
        Some(pos)
    }

    /// Code points in `[from, to)`.
    pub fn count_chars(&self, from: usize, to: usize) -> usize {
        self.text[from..to].chars().count()
    }

    /// Streaming refill seam. In-memory buffers hold the whole input, so
    /// this reports EOF unconditionally once `char_at` runs dry. A
    /// growing or streaming source would re-point `text` here instead.
    pub fn refill(&mut self) -> bool {
        true
    }
}
