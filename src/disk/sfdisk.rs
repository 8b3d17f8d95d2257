//! sfdisk script rendering.
//!
//! Turns an allocated table into the input `sfdisk` reads on stdin, with all
//! offsets in sectors.

use std::fmt::Write;

use super::PartitionTable;

/// Render `table` as an sfdisk script.
///
/// The table must have been allocated: partitions are written with their
/// assigned start and size.
pub fn script(table: &PartitionTable) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "label: {}", table.table_type);
    if !table.uuid.is_empty() {
        let _ = writeln!(out, "label-id: {}", table.uuid);
    }
    let _ = writeln!(out, "unit: sectors");
    let _ = writeln!(out, "sector-size: {}", table.sector_size());
    out.push('\n');

    for part in &table.partitions {
        let mut fields = vec![
            format!("start={}", table.bytes_to_sectors(part.start)),
            format!("size={}", table.bytes_to_sectors(part.size)),
        ];
        if !part.part_type.is_empty() {
            fields.push(format!("type={}", part.part_type));
        }
        if table.is_gpt() && !part.uuid.is_empty() {
            fields.push(format!("uuid={}", part.uuid));
        }
        if part.bootable {
            fields.push("bootable".to_string());
        }
        let _ = writeln!(out, "{}", fields.join(", "));
    }

    out
}
