//! Disk layout model and allocation.
//!
//! A disk layout is a small tree:
//!
//! ```text
//! PartitionTable            (Container)
//!     ├── Partition         (Container, at most one child)
//!     │     └── Filesystem  (Mountable)
//!     └── Partition
//!           └── Filesystem
//! ```
//!
//! Callers build a [`PartitionTable`] from an architecture template plus
//! mountpoint requests, run the allocator to assign offsets and grow the root
//! partition, generate UUIDs, and then read the result back through the
//! traversal helpers to emit partitioning, formatting and fstab instructions.

pub mod create;
pub mod entity;
pub mod filesystem;
pub mod fstab;
pub mod layout;
pub mod partition;
pub mod partition_table;
pub mod sfdisk;
pub mod traverse;
pub mod types;
pub mod uuids;

pub use entity::{Container, Entity, FstabOptions, Mountable};
pub use filesystem::Filesystem;
pub use partition::Partition;
pub use partition_table::{PartitionTable, PartitionTableType};
pub use traverse::entity_path;

/// Sector size used when a table does not specify one.
pub const DEFAULT_SECTOR_SIZE: u64 = 512;

/// Alignment granularity for partition offsets and sizes (1 MiB).
pub const DEFAULT_GRAIN_BYTES: u64 = 1024 * 1024;

/// Size of a single GPT partition entry in bytes.
pub const GPT_PARTITION_ENTRY_SIZE: u64 = 128;

/// GPT reserves room for at least this many entries.
pub const MAX_GPT_PARTITIONS: usize = 128;

/// MBR only has four primary slots.
pub const MAX_MBR_PARTITIONS: usize = 4;

pub const KIB: u64 = 1024;
pub const MIB: u64 = 1024 * KIB;
pub const GIB: u64 = 1024 * MIB;
