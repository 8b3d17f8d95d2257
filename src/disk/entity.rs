//! Entity model shared by every node of the layout tree.
//!
//! Nodes are a closed set of variants. Capabilities are exposed through the
//! [`Container`] and [`Mountable`] traits so traversal code only needs the
//! operations it actually uses.

use super::{Filesystem, Partition, PartitionTable};

/// Borrowed view of one node in the layout tree.
#[derive(Debug, Clone, Copy)]
pub enum Entity<'a> {
    Table(&'a PartitionTable),
    Partition(&'a Partition),
    Filesystem(&'a Filesystem),
}

impl<'a> Entity<'a> {
    /// Short name of the variant, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Entity::Table(_) => "partition_table",
            Entity::Partition(_) => "partition",
            Entity::Filesystem(_) => "filesystem",
        }
    }

    pub fn is_container(&self) -> bool {
        self.as_container().is_some()
    }

    pub fn as_container(&self) -> Option<&'a dyn Container> {
        match *self {
            Entity::Table(table) => Some(table as &dyn Container),
            Entity::Partition(part) => Some(part as &dyn Container),
            Entity::Filesystem(_) => None,
        }
    }

    pub fn as_mountable(&self) -> Option<&'a dyn Mountable> {
        match *self {
            Entity::Filesystem(fs) => Some(fs as &dyn Mountable),
            Entity::Table(_) | Entity::Partition(_) => None,
        }
    }

    /// Size in bytes for sized entities. Filesystems take the size of
    /// their partition and report `None`.
    pub fn size(&self) -> Option<u64> {
        self.as_container().map(|c| c.size())
    }

    /// Identifier of the entity, if one has been assigned.
    pub fn uuid(&self) -> Option<&'a str> {
        let uuid = match *self {
            Entity::Table(table) => table.uuid.as_str(),
            Entity::Partition(part) => part.uuid.as_str(),
            Entity::Filesystem(fs) => fs.uuid.as_str(),
        };
        (!uuid.is_empty()).then_some(uuid)
    }
}

/// An entity with ordered children.
///
/// Children are addressed by a contiguous 0-based index. `child` panics when
/// `idx >= item_count()`.
pub trait Container {
    fn item_count(&self) -> usize;

    fn child(&self, idx: usize) -> Entity<'_>;

    fn size(&self) -> u64;

    /// Grow to at least `size` bytes. Returns whether the size changed.
    fn ensure_size(&mut self, size: u64) -> bool;
}

/// Mount metadata for fstab generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FstabOptions<'a> {
    pub options: &'a str,
    pub freq: u64,
    pub passno: u64,
}

/// An entity that can be mounted.
pub trait Mountable {
    /// Absolute mountpoint, or an empty string when not mounted.
    fn mountpoint(&self) -> &str;

    fn fs_type(&self) -> &str;

    /// fstab device spec, e.g. `UUID=...`. `None` until an identity exists.
    fn fs_spec(&self) -> Option<String>;

    fn fstab_options(&self) -> FstabOptions<'_>;
}
