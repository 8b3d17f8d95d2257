use std::convert::Infallible;
use std::fmt;
use std::ops::ControlFlow;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::entity::{Container, Entity};
use super::{
    types, Filesystem, Partition, DEFAULT_GRAIN_BYTES, DEFAULT_SECTOR_SIZE, MAX_GPT_PARTITIONS,
    MAX_MBR_PARTITIONS,
};
use crate::error::{LayoutError, Result};

/// On-disk partitioning scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartitionTableType {
    #[default]
    Gpt,
    /// MBR, named after the sfdisk label.
    Dos,
}

impl PartitionTableType {
    /// Highest number of partitions the scheme can hold.
    pub fn max_partitions(self) -> usize {
        match self {
            PartitionTableType::Gpt => MAX_GPT_PARTITIONS,
            PartitionTableType::Dos => MAX_MBR_PARTITIONS,
        }
    }
}

impl fmt::Display for PartitionTableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PartitionTableType::Gpt => write!(f, "gpt"),
            PartitionTableType::Dos => write!(f, "dos"),
        }
    }
}

/// Root of the layout tree.
///
/// Partition order is the on-disk order for everything except the root
/// partition, which the allocator always places last.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartitionTable {
    /// Size of the disk in bytes.
    #[serde(default)]
    pub size: u64,
    /// Disk identifier. GPT only.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub uuid: String,
    #[serde(rename = "type")]
    pub table_type: PartitionTableType,
    #[serde(default)]
    pub partitions: Vec<Partition>,
    /// Bytes per sector. Zero means [`DEFAULT_SECTOR_SIZE`].
    #[serde(default, skip_serializing_if = "is_zero")]
    pub sector_size: u64,
    /// Bytes reserved at the end of the disk after the GPT footer.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub extra_padding: u64,
}

fn is_zero(value: &u64) -> bool {
    *value == 0
}

impl PartitionTable {
    pub fn new(table_type: PartitionTableType) -> Self {
        Self {
            table_type,
            ..Default::default()
        }
    }

    pub fn is_gpt(&self) -> bool {
        self.table_type == PartitionTableType::Gpt
    }

    /// Sector size in effect for this table.
    pub fn sector_size(&self) -> u64 {
        if self.sector_size == 0 {
            DEFAULT_SECTOR_SIZE
        } else {
            self.sector_size
        }
    }

    /// Round `size` up to the next grain boundary. Aligned values are
    /// returned unchanged.
    ///
    /// Fails with [`LayoutError::SizeOverflow`] when the boundary is past
    /// `u64::MAX`.
    pub fn align_up(&self, size: u64) -> Result<u64> {
        let grain = DEFAULT_GRAIN_BYTES;
        if size % grain == 0 {
            return Ok(size);
        }
        (size / grain)
            .checked_add(1)
            .and_then(|grains| grains.checked_mul(grain))
            .ok_or(LayoutError::SizeOverflow(size))
    }

    pub fn bytes_to_sectors(&self, size: u64) -> u64 {
        size / self.sector_size()
    }

    pub fn sectors_to_bytes(&self, sectors: u64) -> u64 {
        sectors * self.sector_size()
    }

    /// Partition whose payload is mounted at `mountpoint`.
    pub fn find_partition_for_mountpoint(&self, mountpoint: &str) -> Option<&Partition> {
        self.partitions
            .iter()
            .find(|part| part.mountpoint() == Some(mountpoint))
    }

    pub fn find_partition_for_mountpoint_mut(
        &mut self,
        mountpoint: &str,
    ) -> Option<&mut Partition> {
        self.partitions
            .iter_mut()
            .find(|part| part.mountpoint() == Some(mountpoint))
    }

    /// Partition holding the `/` filesystem.
    pub fn root_partition(&self) -> Option<&Partition> {
        self.find_partition_for_mountpoint("/")
    }

    /// Partition holding a separate `/boot` filesystem.
    pub fn boot_partition(&self) -> Option<&Partition> {
        self.find_partition_for_mountpoint("/boot")
    }

    /// Index of the partition the bootloader reads the kernel from: `/boot`
    /// when it exists anywhere in the table, otherwise `/`. `None` when
    /// neither is present.
    pub fn boot_partition_index(&self) -> Option<usize> {
        let mut root_idx = None;
        for (idx, part) in self.partitions.iter().enumerate() {
            match part.mountpoint() {
                Some("/boot") => return Some(idx),
                Some("/") => root_idx = Some(idx),
                _ => {}
            }
        }
        root_idx
    }

    pub fn find_filesystem_for_mountpoint(&self, mountpoint: &str) -> Option<&Filesystem> {
        let mut found = None;
        let _ = self.for_each_filesystem(|fs| {
            if fs.mountpoint == mountpoint {
                found = Some(fs);
                return Ok::<_, Infallible>(ControlFlow::Break(()));
            }
            Ok(ControlFlow::Continue(()))
        });
        found
    }

    pub fn contains_mountpoint(&self, mountpoint: &str) -> bool {
        self.find_filesystem_for_mountpoint(mountpoint).is_some()
    }

    pub fn root_filesystem(&self) -> Option<&Filesystem> {
        self.find_filesystem_for_mountpoint("/")
    }

    /// The `/boot` filesystem if it lives on its own partition.
    pub fn boot_filesystem(&self) -> Option<&Filesystem> {
        self.find_filesystem_for_mountpoint("/boot")
    }

    /// Append an xfs filesystem mounted at `mountpoint` on a new partition of
    /// `size` bytes.
    pub fn create_filesystem(&mut self, mountpoint: &str, size: u64) -> Result<()> {
        let max = self.table_type.max_partitions();
        if self.partitions.len() >= max {
            return Err(LayoutError::TooManyPartitions { max });
        }

        let part_type = if self.is_gpt() {
            types::FILESYSTEM_DATA_GUID
        } else {
            ""
        };
        let filesystem = Filesystem::new("xfs", mountpoint);
        let partition = Partition::with_payload(size, part_type, filesystem);

        debug!(
            mountpoint,
            size,
            index = self.partitions.len(),
            "adding partition"
        );
        self.partitions.push(partition);
        Ok(())
    }
}

impl Container for PartitionTable {
    fn item_count(&self) -> usize {
        self.partitions.len()
    }

    fn child(&self, idx: usize) -> Entity<'_> {
        Entity::Partition(&self.partitions[idx])
    }

    fn size(&self) -> u64 {
        self.size
    }

    fn ensure_size(&mut self, size: u64) -> bool {
        if size > self.size {
            self.size = size;
            return true;
        }
        false
    }
}
