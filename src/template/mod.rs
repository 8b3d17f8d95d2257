//! Base partition tables per architecture.
//!
//! Image types start from one of these templates and merge the user's
//! mountpoint requests into a clone of it. Templates are either the built-in
//! set or loaded from a TOML file:
//!
//! ```toml
//! [arch.x86_64]
//! type = "gpt"
//! size = 4294967296
//!
//! [[arch.x86_64.partitions]]
//! size = 1048576
//! type = "21686148-6449-6E6F-744E-656564454649"
//!
//! [[arch.x86_64.partitions]]
//! size = 2147483648
//! type = "0FC63DAF-8483-4772-8E79-3D69D8477DE4"
//! [arch.x86_64.partitions.payload]
//! type = "xfs"
//! mountpoint = "/"
//! ```

mod builtin;

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context};
use rand::RngCore;
use serde::Deserialize;

use crate::customizations::MountpointRequest;
use crate::disk::PartitionTable;
use crate::error::{LayoutError, Result};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TemplatesToml {
    arch: BTreeMap<String, PartitionTable>,
}

/// Template tables keyed by architecture name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BasePartitionTables {
    tables: BTreeMap<String, PartitionTable>,
}

impl BasePartitionTables {
    /// Default layouts for the supported architectures.
    pub fn builtin() -> Self {
        Self {
            tables: builtin::tables(),
        }
    }

    /// Load templates from a TOML file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading partition templates '{}'", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("parsing partition templates '{}'", path.display()))
    }

    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let parsed: TemplatesToml = toml::from_str(content)?;
        if parsed.arch.is_empty() {
            bail!("no [arch.*] tables defined");
        }

        for (arch, table) in &parsed.arch {
            let max = table.table_type.max_partitions();
            if table.partitions.len() > max {
                bail!(
                    "template '{}' has {} partitions; a {} table holds at most {}",
                    arch,
                    table.partitions.len(),
                    table.table_type,
                    max
                );
            }
            if table.root_filesystem().is_none() {
                bail!("template '{}' has no filesystem mounted at '/'", arch);
            }
        }

        Ok(Self {
            tables: parsed.arch,
        })
    }

    pub fn arches(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn get(&self, arch: &str) -> Option<&PartitionTable> {
        self.tables.get(arch)
    }

    pub fn insert(&mut self, arch: &str, table: PartitionTable) {
        self.tables.insert(arch.to_string(), table);
    }

    /// Build the final table for `arch` from its template.
    pub fn partition_table<R: RngCore + ?Sized>(
        &self,
        arch: &str,
        requests: &[MountpointRequest],
        image_size: u64,
        rng: &mut R,
    ) -> Result<PartitionTable> {
        let base = self
            .get(arch)
            .ok_or_else(|| LayoutError::UnknownArch(arch.to_string()))?;
        PartitionTable::new_from_template(base, requests, image_size, rng)
    }
}
