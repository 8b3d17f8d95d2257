//! Partition type identifiers.
//!
//! GPT types are GUIDs from the UEFI specification and the discoverable
//! partitions specification. MBR types are the one-byte system IDs written
//! as hex, which is what sfdisk expects.

/// BIOS boot partition used by GRUB on GPT disks.
pub const BIOS_BOOT_PARTITION_GUID: &str = "21686148-6449-6E6F-744E-656564454649";

/// EFI system partition.
pub const EFI_SYSTEM_PARTITION_GUID: &str = "C12A7328-F81F-11D2-BA4B-00A0C93EC93B";

/// Generic Linux filesystem data.
pub const FILESYSTEM_DATA_GUID: &str = "0FC63DAF-8483-4772-8E79-3D69D8477DE4";

/// Extended boot loader partition (`/boot`).
pub const XBOOTLDR_PARTITION_GUID: &str = "BC13C2FF-59E6-4262-A352-B275FD6F7172";

/// Linux swap.
pub const LINUX_SWAP_PARTITION_GUID: &str = "0657FD6D-A4AB-43C4-84E5-0933C84B4F4F";

/// Native Linux filesystem.
pub const DOS_LINUX_TYPE: &str = "83";

/// PowerPC PReP boot partition.
pub const DOS_PREP_TYPE: &str = "41";

/// FAT32 with LBA addressing.
pub const DOS_FAT32_LBA_TYPE: &str = "0c";
