use serde::{Deserialize, Serialize};

use super::entity::{Container, Entity};
use super::Filesystem;

/// One entry of a partition table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Partition {
    /// Byte offset from the start of the disk. Assigned by the allocator.
    #[serde(default)]
    pub start: u64,
    /// Size in bytes. Requested by the caller, then adjusted by the allocator.
    pub size: u64,
    /// GPT partition type GUID or MBR type byte (hex, e.g. `83`).
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub part_type: String,
    /// MBR active flag. Ignored for GPT.
    #[serde(default, skip_serializing_if = "is_false")]
    pub bootable: bool,
    /// Partition UUID. GPT only.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub uuid: String,
    /// `None` for unformatted partitions such as BIOS boot or PReP.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Filesystem>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl Partition {
    /// An unformatted partition.
    pub fn raw(size: u64, part_type: &str) -> Self {
        Self {
            size,
            part_type: part_type.to_string(),
            ..Default::default()
        }
    }

    pub fn with_payload(size: u64, part_type: &str, payload: Filesystem) -> Self {
        Self {
            payload: Some(payload),
            ..Self::raw(size, part_type)
        }
    }

    pub fn bootable(mut self) -> Self {
        self.bootable = true;
        self
    }

    /// Mountpoint of the payload filesystem, if any.
    pub fn mountpoint(&self) -> Option<&str> {
        self.payload.as_ref().map(|fs| fs.mountpoint.as_str())
    }

    /// First byte past the end of the partition.
    pub fn end(&self) -> u64 {
        self.start + self.size
    }
}

impl Container for Partition {
    fn item_count(&self) -> usize {
        usize::from(self.payload.is_some())
    }

    fn child(&self, idx: usize) -> Entity<'_> {
        match (&self.payload, idx) {
            (Some(fs), 0) => Entity::Filesystem(fs),
            _ => panic!(
                "partition child index {} out of range ({} children)",
                idx,
                self.item_count()
            ),
        }
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
