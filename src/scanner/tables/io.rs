// src/scanner/tables/io.rs
use std::{
    io::{BufWriter, Write},
    time::Instant,
};

use super::PackedScanTables;
use super::actions::{ActionSpec, ModeId, PushbackAmount, RawKind};

// -------------------- JSON (de)serialization --------------------

pub fn save_packed_json(path: &std::path::Path, t: &PackedScanTables) -> std::io::Result<()> {
    // Stream to disk to avoid giant intermediate strings.
    let f = std::fs::File::create(path)?;
    let mut w = BufWriter::new(f);
    serde_json::to_writer(&mut w, t)?;
    w.flush()
}

pub fn load_packed_json_bytes(data: &[u8]) -> Result<PackedScanTables, String> {
    serde_json::from_slice::<PackedScanTables>(data)
        .map_err(|e| format!("Failed to parse scan tables JSON: {e}"))
}

// -------------------- Compact binary (u16 packing) --------------------

const BIN_MAGIC: &[u8; 8] = b"RLXTBL01";

// Action records are fixed width: tag u16, kind u16, two u32 payload words.
const TAG_EMIT: u16 = 0;
const TAG_EMIT_PUSHBACK: u16 = 1;
const TAG_EMIT_LOOKAHEAD: u16 = 2;
const TAG_SKIP: u16 = 3;
const TAG_OPEN_QUOTED: u16 = 4;
const TAG_CLOSE_QUOTED_IF: u16 = 5;
const TAG_LEADING_NAME: u16 = 6;

/// Sentinel in the Skip payload for "push back the whole match" and
/// "stay in the current mode".
const PAYLOAD_NONE: u32 = u32::MAX;

fn encode_action(a: &ActionSpec) -> (u16, u16, u32, u32) {
    match *a {
        ActionSpec::Emit(kind) => (TAG_EMIT, kind.0, 0, 0),
        ActionSpec::EmitPushback { kind, count } => (TAG_EMIT_PUSHBACK, kind.0, count, 0),
        ActionSpec::EmitFixedLookahead { kind, length } => (TAG_EMIT_LOOKAHEAD, kind.0, length, 0),
        ActionSpec::Skip { pushback, mode } => {
            let pb = match pushback {
                PushbackAmount::Chars(n) => n,
                PushbackAmount::All => PAYLOAD_NONE,
            };
            let m = mode.map_or(PAYLOAD_NONE, |m| m.0 as u32);
            (TAG_SKIP, 0, pb, m)
        }
        ActionSpec::OpenQuoted { kind, quote, mode } => {
            (TAG_OPEN_QUOTED, kind.0, quote as u32, mode.0 as u32)
        }
        ActionSpec::CloseQuotedIf { kind, quote, mode } => {
            (TAG_CLOSE_QUOTED_IF, kind.0, quote as u32, mode.0 as u32)
        }
        ActionSpec::LeadingName { kind, mode } => (TAG_LEADING_NAME, kind.0, 0, mode.0 as u32),
    }
}

fn decode_action(tag: u16, kind: u16, a: u32, b: u32) -> Result<ActionSpec, String> {
    let quote_of = |cp: u32| {
        char::from_u32(cp).ok_or_else(|| format!("action quote {cp:#x} is not a scalar value"))
    };
    let mode_of = |raw: u32| -> Result<ModeId, String> {
        u16::try_from(raw)
            .map(ModeId)
            .map_err(|_| format!("action mode {raw} overflows u16"))
    };
    Ok(match tag {
        TAG_EMIT => ActionSpec::Emit(RawKind(kind)),
        TAG_EMIT_PUSHBACK => ActionSpec::EmitPushback {
            kind: RawKind(kind),
            count: a,
        },
        TAG_EMIT_LOOKAHEAD => ActionSpec::EmitFixedLookahead {
            kind: RawKind(kind),
            length: a,
        },
        TAG_SKIP => ActionSpec::Skip {
            pushback: if a == PAYLOAD_NONE {
                PushbackAmount::All
            } else {
                PushbackAmount::Chars(a)
            },
            mode: if b == PAYLOAD_NONE {
                None
            } else {
                Some(mode_of(b)?)
            },
        },
        TAG_OPEN_QUOTED => ActionSpec::OpenQuoted {
            kind: RawKind(kind),
            quote: quote_of(a)?,
            mode: mode_of(b)?,
        },
        TAG_CLOSE_QUOTED_IF => ActionSpec::CloseQuotedIf {
            kind: RawKind(kind),
            quote: quote_of(a)?,
            mode: mode_of(b)?,
        },
        TAG_LEADING_NAME => ActionSpec::LeadingName {
            kind: RawKind(kind),
            mode: mode_of(b)?,
        },
        other => return Err(format!("unknown action tag {other}")),
    })
}

fn write_stream(w: &mut impl Write, stream: &[u16]) -> std::io::Result<()> {
    w.write_all(&(stream.len() as u32).to_le_bytes())?;
    let mut bytes = vec![0u8; stream.len() * 2];
    for (i, &v) in stream.iter().enumerate() {
        bytes[i * 2..i * 2 + 2].copy_from_slice(&v.to_le_bytes());
    }
    w.write_all(&bytes)
}

pub fn save_packed_bin(path: &std::path::Path, t: &PackedScanTables) -> std::io::Result<()> {
    let instant = Instant::now();
    let f = std::fs::File::create(path)?;
    let mut w = BufWriter::new(f);

    // Header
    w.write_all(BIN_MAGIC)?;
    w.write_all(&t.n_states.to_le_bytes())?;
    w.write_all(&t.n_classes.to_le_bytes())?;
    w.write_all(&t.bad_kind.0.to_le_bytes())?;

    // Length-prefixed u16 streams, in a fixed order.
    write_stream(&mut w, &t.cmap_top)?;
    write_stream(&mut w, &t.cmap_blocks)?;
    write_stream(&mut w, &t.row_offset)?;
    write_stream(&mut w, &t.trans)?;
    write_stream(&mut w, &t.action)?;
    write_stream(&mut w, &t.attrs)?;
    write_stream(&mut w, &t.mode_start)?;

    // Action dispatch records.
    w.write_all(&(t.actions.len() as u32).to_le_bytes())?;
    for a in &t.actions {
        let (tag, kind, pa, pb) = encode_action(a);
        w.write_all(&tag.to_le_bytes())?;
        w.write_all(&kind.to_le_bytes())?;
        w.write_all(&pa.to_le_bytes())?;
        w.write_all(&pb.to_le_bytes())?;
    }

    let flush = w.flush();
    log::debug!(
        "saved scan tables to {} in {} ms",
        path.display(),
        instant.elapsed().as_millis()
    );
    flush
}

pub fn load_packed_bin_bytes(mut data: &[u8]) -> Result<PackedScanTables, String> {
    // Header
    if data.len() < 8 {
        return Err("bin too short".into());
    }
    let mut magic = [0u8; 8];
    magic.copy_from_slice(&data[..8]);
    if &magic != BIN_MAGIC {
        return Err("bad magic in scan tables .bin".into());
    }
    data = &data[8..];

    let read_u32 = |buf: &mut &[u8]| -> Result<u32, String> {
        if buf.len() < 4 {
            return Err("truncated u32".into());
        }
        let mut le = [0u8; 4];
        le.copy_from_slice(&buf[..4]);
        *buf = &buf[4..];
        Ok(u32::from_le_bytes(le))
    };
    let read_u16 = |buf: &mut &[u8]| -> Result<u16, String> {
        if buf.len() < 2 {
            return Err("truncated u16".into());
        }
        let mut le = [0u8; 2];
        le.copy_from_slice(&buf[..2]);
        *buf = &buf[2..];
        Ok(u16::from_le_bytes(le))
    };
    let read_stream = |buf: &mut &[u8]| -> Result<Vec<u16>, String> {
        let len = read_u32(buf)? as usize;
        if buf.len() < len * 2 {
            return Err("truncated u16 stream".into());
        }
        let mut out = Vec::with_capacity(len);
        for _ in 0..len {
            out.push(read_u16(buf)?);
        }
        Ok(out)
    };

    let n_states = read_u32(&mut data)?;
    let n_classes = read_u32(&mut data)?;
    let bad_kind = RawKind(read_u16(&mut data)?);

    let cmap_top = read_stream(&mut data)?;
    let cmap_blocks = read_stream(&mut data)?;
    let row_offset = read_stream(&mut data)?;
    let trans = read_stream(&mut data)?;
    let action = read_stream(&mut data)?;
    let attrs = read_stream(&mut data)?;
    let mode_start = read_stream(&mut data)?;

    let n_actions = read_u32(&mut data)? as usize;
    let mut actions = Vec::with_capacity(n_actions);
    for _ in 0..n_actions {
        let tag = read_u16(&mut data)?;
        let kind = read_u16(&mut data)?;
        let pa = read_u32(&mut data)?;
        let pb = read_u32(&mut data)?;
        actions.push(decode_action(tag, kind, pa, pb)?);
    }

    if !data.is_empty() {
        log::warn!("{} trailing bytes after scan tables .bin payload", data.len());
    }

    Ok(PackedScanTables {
        n_states,
        n_classes,
        cmap_top,
        cmap_blocks,
        row_offset,
        trans,
        action,
        attrs,
        mode_start,
        actions,
        bad_kind,
    })
}
