// src/scanner/tables/pack.rs
// Run-length coding for the shipped table streams. A packed stream is a flat
// `&[u16]` of (count, value) pairs; runs longer than u16::MAX are split. The
// decode step runs exactly once per process; nothing compressed survives
// into the scan path.

/// Maximum run length representable in one (count, value) pair.
const MAX_RUN: usize = u16::MAX as usize;

pub fn encode_rle(values: &[u16]) -> Vec<u16> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < values.len() {
        let v = values[i];
        let mut run = 1;
        while i + run < values.len() && values[i + run] == v && run < MAX_RUN {
            run += 1;
        }
        out.push(run as u16);
        out.push(v);
        i += run;
    }
    out
}

pub fn decode_rle(packed: &[u16], expected_len: usize) -> Result<Vec<u16>, String> {
    if packed.len() % 2 != 0 {
        return Err("odd-length RLE stream".into());
    }
    let mut out = Vec::with_capacity(expected_len);
    for pair in packed.chunks_exact(2) {
        let (count, value) = (pair[0] as usize, pair[1]);
        if count == 0 {
            return Err("zero-length run in RLE stream".into());
        }
        if out.len() + count > expected_len {
            return Err(format!(
                "RLE stream overruns expected length {expected_len}"
            ));
        }
        out.resize(out.len() + count, value);
    }
    if out.len() != expected_len {
        return Err(format!(
            "RLE stream decoded to {} entries, expected {expected_len}",
            out.len()
        ));
    }
    Ok(out)
}

/// u32 values as (high, low) u16 pairs, used for row offsets, which are not
/// run-friendly but can exceed u16.
pub fn encode_wide(values: &[u32]) -> Vec<u16> {
    let mut out = Vec::with_capacity(values.len() * 2);
    for &v in values {
        out.push((v >> 16) as u16);
        out.push(v as u16);
    }
    out
}

pub fn decode_wide(packed: &[u16], expected_len: usize) -> Result<Vec<u32>, String> {
    if packed.len() != expected_len * 2 {
        return Err(format!(
            "wide stream has {} u16s, expected {}",
            packed.len(),
            expected_len * 2
        ));
    }
    Ok(packed
        .chunks_exact(2)
        .map(|pair| ((pair[0] as u32) << 16) | pair[1] as u32)
        .collect())
}
