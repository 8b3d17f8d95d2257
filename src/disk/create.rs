//! Building a concrete table from an architecture template.

use rand::RngCore;
use tracing::debug;

use super::entity::{Container, Entity};
use super::{entity_path, PartitionTable};
use crate::customizations::{clamp_filesystem_size, MountpointRequest};
use crate::error::Result;

impl PartitionTable {
    /// Clone `base`, merge the mountpoint requests into it, lay it out for
    /// an image of at least `image_size` bytes and fill in UUIDs.
    ///
    /// A request for a mountpoint the template already has grows that
    /// partition, never shrinks it. Other requests add an xfs partition.
    /// Sizes that cannot be laid out on a `u64` disk fail with
    /// [`LayoutError::SizeOverflow`](crate::LayoutError::SizeOverflow).
    ///
    /// # Panics
    ///
    /// Panics if `base` has no filesystem mounted at `/` and none is
    /// requested.
    pub fn new_from_template<R: RngCore + ?Sized>(
        base: &PartitionTable,
        requests: &[MountpointRequest],
        image_size: u64,
        rng: &mut R,
    ) -> Result<PartitionTable> {
        let mut table = base.clone();

        for request in requests {
            let size = table.align_up(clamp_filesystem_size(
                &request.mountpoint,
                request.min_size,
            ))?;
            if !table.resize_mountpoint_branch(&request.mountpoint, size) {
                table.create_filesystem(&request.mountpoint, size)?;
            }
        }

        table.update_partition_start_point_offsets(image_size)?;
        table.generate_uuids(rng);
        Ok(table)
    }

    /// Grow the partition owning `mountpoint` and then the table to at least
    /// `size`. Returns `false` when no partition owns `mountpoint`.
    fn resize_mountpoint_branch(&mut self, mountpoint: &str, size: u64) -> bool {
        let Some(idx) = self
            .partitions
            .iter()
            .position(|part| entity_path(Entity::Partition(part), mountpoint).is_some())
        else {
            return false;
        };

        if self.partitions[idx].ensure_size(size) {
            debug!(mountpoint, size, idx, "grew existing partition");
            self.ensure_size(size);
        }
        true
    }
}
