//! fstab generation from the mountable entities of a table.

use std::fmt;
use std::ops::ControlFlow;

use serde::Serialize;

use super::PartitionTable;
use crate::error::{LayoutError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FstabEntry {
    /// Device spec, `UUID=...` or `LABEL=...`.
    pub spec: String,
    pub mountpoint: String,
    pub fs_type: String,
    pub options: String,
    pub freq: u64,
    pub passno: u64,
}

impl fmt::Display for FstabEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {}",
            self.spec, self.mountpoint, self.fs_type, self.options, self.freq, self.passno
        )
    }
}

/// One entry per mounted filesystem, parents before children.
///
/// Fails if a mounted filesystem has neither a UUID nor a label; run
/// [`PartitionTable::generate_uuids`] first.
pub fn entries(table: &PartitionTable) -> Result<Vec<FstabEntry>> {
    let mut entries = Vec::new();
    table.for_each_mountable(|mnt, _path| -> Result<ControlFlow<()>> {
        let mountpoint = mnt.mountpoint();
        if mountpoint.is_empty() {
            return Ok(ControlFlow::Continue(()));
        }
        let spec = mnt
            .fs_spec()
            .ok_or_else(|| LayoutError::Unidentified(mountpoint.to_string()))?;
        let options = mnt.fstab_options();
        entries.push(FstabEntry {
            spec,
            mountpoint: mountpoint.to_string(),
            fs_type: mnt.fs_type().to_string(),
            options: options.options.to_string(),
            freq: options.freq,
            passno: options.passno,
        });
        Ok(ControlFlow::Continue(()))
    })?;

    entries.sort_by_key(|entry| mount_depth(&entry.mountpoint));
    Ok(entries)
}

fn mount_depth(mountpoint: &str) -> usize {
    mountpoint.split('/').filter(|part| !part.is_empty()).count()
}

/// fstab file content for `table`.
pub fn render(table: &PartitionTable) -> Result<String> {
    Ok(entries(table)?
        .iter()
        .map(|entry| format!("{entry}\n"))
        .collect())
}
