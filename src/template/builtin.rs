use std::collections::BTreeMap;

use crate::disk::types::{
    BIOS_BOOT_PARTITION_GUID, DOS_LINUX_TYPE, DOS_PREP_TYPE, EFI_SYSTEM_PARTITION_GUID,
    FILESYSTEM_DATA_GUID, XBOOTLDR_PARTITION_GUID,
};
use crate::disk::{Filesystem, Partition, PartitionTable, PartitionTableType, GIB, MIB};

const DISK_UUID: &str = "D209C89E-EA5E-4FBD-B161-B461CCE297E0";
const EFI_VOLUME_ID: &str = "7B77-95E7";
const EFI_FSTAB_OPTIONS: &str = "defaults,uid=0,gid=0,umask=077,shortname=winnt";

const EFI_SIZE: u64 = 200 * MIB;
const BOOT_SIZE: u64 = 500 * MIB;
const ROOT_SIZE: u64 = 2 * GIB;

pub(super) fn tables() -> BTreeMap<String, PartitionTable> {
    BTreeMap::from([
        ("x86_64".to_string(), x86_64()),
        ("aarch64".to_string(), aarch64()),
        ("ppc64le".to_string(), ppc64le()),
        ("s390x".to_string(), s390x()),
    ])
}

fn efi_partition() -> Partition {
    let mut fs = Filesystem::new("vfat", "/boot/efi")
        .with_label("EFI-SYSTEM")
        .with_fstab(EFI_FSTAB_OPTIONS, 0, 2);
    fs.uuid = EFI_VOLUME_ID.to_string();
    Partition::with_payload(EFI_SIZE, EFI_SYSTEM_PARTITION_GUID, fs)
}

fn xfs(mountpoint: &str, label: &str) -> Filesystem {
    Filesystem::new("xfs", mountpoint).with_label(label)
}

fn gpt(partitions: Vec<Partition>) -> PartitionTable {
    PartitionTable {
        uuid: DISK_UUID.to_string(),
        partitions,
        ..PartitionTable::new(PartitionTableType::Gpt)
    }
}

fn x86_64() -> PartitionTable {
    gpt(vec![
        Partition::raw(MIB, BIOS_BOOT_PARTITION_GUID),
        efi_partition(),
        Partition::with_payload(BOOT_SIZE, XBOOTLDR_PARTITION_GUID, xfs("/boot", "boot")),
        Partition::with_payload(ROOT_SIZE, FILESYSTEM_DATA_GUID, xfs("/", "root")),
    ])
}

fn aarch64() -> PartitionTable {
    gpt(vec![
        efi_partition(),
        Partition::with_payload(BOOT_SIZE, XBOOTLDR_PARTITION_GUID, xfs("/boot", "boot")),
        Partition::with_payload(ROOT_SIZE, FILESYSTEM_DATA_GUID, xfs("/", "root")),
    ])
}

fn ppc64le() -> PartitionTable {
    PartitionTable {
        uuid: "0x14fc63d2".to_string(),
        partitions: vec![
            Partition::raw(4 * MIB, DOS_PREP_TYPE).bootable(),
            Partition::with_payload(BOOT_SIZE, DOS_LINUX_TYPE, xfs("/boot", "boot")),
            Partition::with_payload(ROOT_SIZE, DOS_LINUX_TYPE, xfs("/", "root")),
        ],
        ..PartitionTable::new(PartitionTableType::Dos)
    }
}

fn s390x() -> PartitionTable {
    PartitionTable {
        uuid: "0x14fc63d2".to_string(),
        partitions: vec![
            Partition::with_payload(BOOT_SIZE, DOS_LINUX_TYPE, xfs("/boot", "boot")).bootable(),
            Partition::with_payload(ROOT_SIZE, DOS_LINUX_TYPE, xfs("/", "root")),
        ],
        ..PartitionTable::new(PartitionTableType::Dos)
    }
}
