//! Partition placement.

use tracing::{debug, trace};

use super::entity::Entity;
use super::{entity_path, PartitionTable, GPT_PARTITION_ENTRY_SIZE, MAX_GPT_PARTITIONS};
use crate::error::{LayoutError, Result};

impl PartitionTable {
    /// Assign a start offset to every partition and settle the disk size.
    ///
    /// Partitions keep their order, except that the partition holding `/` is
    /// placed after all others. Non-root partitions are rounded up to the
    /// grain. The table grows to `size` (aligned) or to whatever the
    /// partitions need, whichever is larger, and never shrinks. The root
    /// partition then takes all remaining space up to the GPT footer and
    /// `extra_padding`.
    ///
    /// Returns the start offset of the root partition, or
    /// [`LayoutError::SizeOverflow`] if the sizes do not fit in a `u64` disk.
    /// The table is left untouched in that case.
    ///
    /// # Panics
    ///
    /// Panics if no partition contains a filesystem mounted at `/`. Callers
    /// build tables from templates that always carry a root filesystem.
    pub fn update_partition_start_point_offsets(&mut self, size: u64) -> Result<u64> {
        // one sector for the protective MBR / primary GPT header
        let mut header = self.sectors_to_bytes(1);
        let mut footer = 0;

        if self.is_gpt() {
            let entries = self.partitions.len().max(MAX_GPT_PARTITIONS) as u64;
            header += entries * GPT_PARTITION_ENTRY_SIZE;
            // backup header and entry array at the end of the disk
            footer = header;
        }

        let mut start = self.align_up(header)?;
        let mut size = self.align_up(size)?;

        // offsets are computed before anything is written back
        let mut root_idx = None;
        let mut placed = Vec::with_capacity(self.partitions.len());
        for (idx, partition) in self.partitions.iter().enumerate() {
            if entity_path(Entity::Partition(partition), "/").is_some() {
                root_idx = Some(idx);
                continue;
            }
            let aligned = self.align_up(partition.size)?;
            placed.push((idx, start, aligned));
            start = start
                .checked_add(aligned)
                .ok_or(LayoutError::SizeOverflow(aligned))?;
        }

        let Some(root_idx) = root_idx else {
            panic!("no root filesystem found; this is a programming error");
        };

        footer = footer
            .checked_add(self.extra_padding)
            .ok_or(LayoutError::SizeOverflow(self.extra_padding))?;

        let root_size = self.partitions[root_idx].size;
        let needed = start
            .checked_add(footer)
            .and_then(|offset| offset.checked_add(root_size))
            .ok_or(LayoutError::SizeOverflow(root_size))?;
        let end = self.align_up(needed)?;
        if end > size {
            size = end;
        }

        for (idx, start, aligned) in placed {
            let partition = &mut self.partitions[idx];
            partition.start = start;
            partition.size = aligned;
            trace!(idx, start, size = aligned, "placed partition");
        }

        if size > self.size {
            self.size = size;
        }

        let table_size = self.size;
        let root = &mut self.partitions[root_idx];
        root.start = start;
        root.size = table_size - start - footer;

        debug!(
            table_size,
            root_idx,
            root_start = start,
            root_size = root.size,
            footer,
            "partition layout updated"
        );

        Ok(start)
    }
}
