//! Partition table layout engine for distro disk image builds.
//!
//! Image builders describe a disk as an architecture template plus the
//! user's mountpoint requests. This crate turns that into a concrete
//! partition table with byte offsets, sizes and UUIDs, and renders the
//! sfdisk script and fstab that the image pipeline consumes.
//!
//! - **Disk model** - [`PartitionTable`] → [`Partition`] → [`Filesystem`],
//!   with [`Container`] and [`Mountable`] capabilities and depth-first walkers
//! - **Allocation** - grain-aligned placement with GPT header/footer
//!   reservation; the root partition is placed last and grows to fill the disk
//! - **Identity** - seeded UUID generation for reproducible images
//! - **Templates** - built-in and TOML-defined base tables per architecture
//! - **Customizations** - mountpoint allow-list and size parsing
//!
//! # Architecture
//!
//! ```text
//! template + requests ──► new_from_template
//!                             │
//!                             ├── create_filesystem      (merge requests)
//!                             ├── update_partition_start_point_offsets
//!                             └── generate_uuids
//!                             ▼
//!                     allocated PartitionTable
//!                             │
//!                             ├── sfdisk::script
//!                             └── fstab::render
//! ```
//!
//! # Example
//!
//! ```rust
//! use disk_layout::{BasePartitionTables, MountpointRequest, GIB};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let templates = BasePartitionTables::builtin();
//! let requests = [MountpointRequest { mountpoint: "/var".into(), min_size: 4 * GIB }];
//! let mut rng = StdRng::seed_from_u64(0);
//!
//! let table = templates.partition_table("x86_64", &requests, 10 * GIB, &mut rng)?;
//! let root = table.root_partition().expect("templates always mount /");
//! assert_eq!(root.end(), table.size - 16896);
//! # Ok::<(), disk_layout::LayoutError>(())
//! ```

pub mod customizations;
pub mod disk;
pub mod error;
pub mod template;

pub use customizations::MountpointRequest;
pub use disk::{
    Container, Entity, Filesystem, Mountable, Partition, PartitionTable, PartitionTableType, GIB,
    MIB,
};
pub use error::LayoutError;
pub use template::BasePartitionTables;
