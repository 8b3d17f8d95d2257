use serde::{Deserialize, Serialize};

use super::entity::{FstabOptions, Mountable};

/// A formatted filesystem: the leaf of the layout tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Filesystem {
    /// Filesystem kind as understood by mkfs, e.g. `xfs`, `ext4`, `vfat`.
    #[serde(rename = "type")]
    pub fs_type: String,
    /// Filesystem UUID, or the volume serial for vfat. Empty until generated.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub uuid: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub label: String,
    #[serde(default)]
    pub mountpoint: String,
    #[serde(default = "default_fstab_options")]
    pub fstab_options: String,
    #[serde(default)]
    pub fstab_freq: u64,
    #[serde(default)]
    pub fstab_passno: u64,
}

fn default_fstab_options() -> String {
    "defaults".to_string()
}

impl Filesystem {
    /// Filesystem with `defaults` mount options and no dump/fsck ordering.
    pub fn new(fs_type: &str, mountpoint: &str) -> Self {
        Self {
            fs_type: fs_type.to_string(),
            mountpoint: mountpoint.to_string(),
            fstab_options: default_fstab_options(),
            ..Default::default()
        }
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = label.to_string();
        self
    }

    pub fn with_fstab(mut self, options: &str, freq: u64, passno: u64) -> Self {
        self.fstab_options = options.to_string();
        self.fstab_freq = freq;
        self.fstab_passno = passno;
        self
    }

    pub fn is_vfat(&self) -> bool {
        self.fs_type.eq_ignore_ascii_case("vfat")
    }
}

impl Mountable for Filesystem {
    fn mountpoint(&self) -> &str {
        &self.mountpoint
    }

    fn fs_type(&self) -> &str {
        &self.fs_type
    }

    fn fs_spec(&self) -> Option<String> {
        if !self.uuid.is_empty() {
            Some(format!("UUID={}", self.uuid))
        } else if !self.label.is_empty() {
            Some(format!("LABEL={}", self.label))
        } else {
            None
        }
    }

    fn fstab_options(&self) -> FstabOptions<'_> {
        FstabOptions {
            options: &self.fstab_options,
            freq: self.fstab_freq,
            passno: self.fstab_passno,
        }
    }
}
