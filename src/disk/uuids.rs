//! UUID assignment.
//!
//! All identifiers are drawn from a caller-supplied generator so that a
//! fixed seed yields byte-identical tables.

use std::convert::Infallible;
use std::ops::ControlFlow;

use rand::RngCore;
use tracing::trace;
use uuid::{Builder, Uuid};

use super::PartitionTable;

/// Random (version 4) UUID built from `rng`.
pub fn random_uuid<R: RngCore + ?Sized>(rng: &mut R) -> Uuid {
    let mut bytes = [0u8; 16];
    rng.fill_bytes(&mut bytes);
    Builder::from_random_bytes(bytes).into_uuid()
}

/// FAT volume serial in `XXXX-XXXX` form, as accepted by `mkfs.vfat -i`
/// once the dash is removed and by fstab `UUID=`.
pub fn random_vfat_serial<R: RngCore + ?Sized>(rng: &mut R) -> String {
    let serial = rng.next_u32();
    format!("{:04X}-{:04X}", serial >> 16, serial & 0xffff)
}

impl PartitionTable {
    /// Fill in every missing UUID.
    ///
    /// Filesystems always receive one. Partitions and the table itself only
    /// receive one on GPT. Existing values are never replaced.
    pub fn generate_uuids<R: RngCore + ?Sized>(&mut self, rng: &mut R) {
        let _ = self.for_each_filesystem_mut(|fs| {
            if fs.uuid.is_empty() {
                fs.uuid = if fs.is_vfat() {
                    random_vfat_serial(&mut *rng)
                } else {
                    random_uuid(&mut *rng).to_string()
                };
                trace!(mountpoint = %fs.mountpoint, uuid = %fs.uuid, "generated filesystem uuid");
            }
            Ok::<_, Infallible>(ControlFlow::Continue(()))
        });

        // MBR partitions have no UUIDs
        if !self.is_gpt() {
            return;
        }

        for (idx, part) in self.partitions.iter_mut().enumerate() {
            if part.uuid.is_empty() {
                part.uuid = random_uuid(&mut *rng).to_string();
                trace!(idx, uuid = %part.uuid, "generated partition uuid");
            }
        }

        if self.uuid.is_empty() {
            self.uuid = random_uuid(&mut *rng).to_string();
            trace!(uuid = %self.uuid, "generated table uuid");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disk::{types, Filesystem, Partition, PartitionTableType, GIB, MIB};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn table(table_type: PartitionTableType) -> PartitionTable {
        let mut pt = PartitionTable::new(table_type);
        pt.partitions.push(Partition::with_payload(
            200 * MIB,
            types::EFI_SYSTEM_PARTITION_GUID,
            Filesystem::new("vfat", "/boot/efi"),
        ));
        pt.create_filesystem("/", 2 * GIB).unwrap();
        pt.create_filesystem("/var", GIB).unwrap();
        pt
    }

    #[test]
    fn random_uuid_is_version_4() {
        let mut rng = StdRng::seed_from_u64(1);
        let id = random_uuid(&mut rng);
        assert_eq!(id.get_version_num(), 4);
        assert_eq!(id.get_variant(), uuid::Variant::RFC4122);
    }

    #[test]
    fn vfat_serial_format() {
        let mut rng = StdRng::seed_from_u64(1);
        let serial = random_vfat_serial(&mut rng);
        assert_eq!(serial.len(), 9);
        assert_eq!(&serial[4..5], "-");
        assert!(serial
            .chars()
            .filter(|c| *c != '-')
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase()));
    }

    #[test]
    fn gpt_assigns_everything() {
        let mut pt = table(PartitionTableType::Gpt);
        pt.generate_uuids(&mut StdRng::seed_from_u64(0));

        assert!(Uuid::parse_str(&pt.uuid).is_ok());
        for part in &pt.partitions {
            assert!(Uuid::parse_str(&part.uuid).is_ok());
        }
        assert_eq!(pt.partitions[0].payload.as_ref().unwrap().uuid.len(), 9);
        assert!(Uuid::parse_str(&pt.root_filesystem().unwrap().uuid).is_ok());
    }

    #[test]
    fn mbr_partitions_get_no_uuid() {
        let mut pt = table(PartitionTableType::Dos);
        pt.generate_uuids(&mut StdRng::seed_from_u64(0));

        assert!(pt.uuid.is_empty());
        assert!(pt.partitions.iter().all(|p| p.uuid.is_empty()));
        assert!(!pt.root_filesystem().unwrap().uuid.is_empty());
    }

    #[test]
    fn generation_is_idempotent() {
        let mut pt = table(PartitionTableType::Gpt);
        let mut rng = StdRng::seed_from_u64(42);
        pt.generate_uuids(&mut rng);
        let first = pt.clone();

        pt.generate_uuids(&mut rng);
        assert_eq!(pt, first);
    }

    #[test]
    fn existing_uuids_are_kept() {
        let mut pt = table(PartitionTableType::Gpt);
        pt.uuid = "D209C89E-EA5E-4FBD-B161-B461CCE297E0".to_string();
        pt.partitions[1].uuid = "6264D520-3FB9-423F-8AB8-7A0A8E3D3562".to_string();

        pt.generate_uuids(&mut StdRng::seed_from_u64(3));
        assert_eq!(pt.uuid, "D209C89E-EA5E-4FBD-B161-B461CCE297E0");
        assert_eq!(pt.partitions[1].uuid, "6264D520-3FB9-423F-8AB8-7A0A8E3D3562");
        assert!(!pt.partitions[2].uuid.is_empty());
    }

    #[test]
    fn same_seed_same_table() {
        let mut a = table(PartitionTableType::Gpt);
        let mut b = table(PartitionTableType::Gpt);
        a.generate_uuids(&mut StdRng::seed_from_u64(7));
        b.generate_uuids(&mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);

        let mut c = table(PartitionTableType::Gpt);
        c.generate_uuids(&mut StdRng::seed_from_u64(8));
        assert_ne!(a, c);
    }
}
