// src/bin/gen_tables.rs
// Compile the expression grammar and write its packed tables to disk.
// Usage:
//   cargo run --bin gen_tables                  # writes tables/expr_tables.json (+ .bin)
//   cargo run --bin gen_tables -- /path/out.json

use std::{env, fs, path::Path};

use anyhow::{Context, Result};
use relex::scanner::ScanTables;
use relex::scanner::tables::{save_packed_bin, save_packed_json};

fn main() -> Result<()> {
    let out = env::args()
        .nth(1)
        .unwrap_or_else(|| "tables/expr_tables.json".to_string());
    let out_path = Path::new(&out);

    if let Some(parent) = out_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    println!("[gen_tables] compiling expression grammar…");
    let packed = relex::expr::grammar::compile();

    // Prove the output passes validation before writing it.
    let unpacked = ScanTables::unpack(&packed)
        .map_err(anyhow::Error::msg)
        .context("compiled tables failed validation")?;

    println!(
        "[gen_tables] {} states, {} classes, {} actions, {} modes",
        packed.n_states,
        packed.n_classes,
        packed.actions.len(),
        packed.mode_start.len(),
    );
    let packed_u16 = packed.cmap_top.len()
        + packed.cmap_blocks.len()
        + packed.row_offset.len()
        + packed.trans.len()
        + packed.action.len()
        + packed.attrs.len()
        + packed.mode_start.len();
    println!(
        "[gen_tables] packed streams: {} u16 entries (~{} KiB); {} states unpacked",
        packed_u16,
        (packed_u16 * 2) / 1024,
        unpacked.n_states(),
    );

    save_packed_json(out_path, &packed)
        .with_context(|| format!("failed to write {}", out_path.display()))?;
    println!("[gen_tables] wrote {}", out_path.display());

    let bin_path = out_path.with_extension("bin");
    save_packed_bin(&bin_path, &packed)
        .with_context(|| format!("failed to write {}", bin_path.display()))?;
    println!("[gen_tables] wrote {}", bin_path.display());

    Ok(())
}
