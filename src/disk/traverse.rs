//! Depth-first walkers over a [`PartitionTable`].
//!
//! Callbacks return `Result<ControlFlow<()>, E>`. `ControlFlow::Break(())`
//! stops the walk and the walker returns `Ok(())`; an `Err` stops the walk
//! and is handed back to the caller unchanged.

use std::ops::ControlFlow;

use super::entity::{Container, Entity, Mountable};
use super::{Filesystem, PartitionTable};

impl PartitionTable {
    /// Visit every entity in pre-order, starting with the table itself.
    ///
    /// `path` lists the ancestors from the root down to and including the
    /// visited entity, so the table is called with `[table]`.
    pub fn for_each_entity<'a, E, F>(&'a self, mut cb: F) -> Result<(), E>
    where
        F: FnMut(Entity<'a>, &[Entity<'a>]) -> Result<ControlFlow<()>, E>,
    {
        walk_entities(Entity::Table(self), &[], &mut cb).map(|_| ())
    }

    /// Visit the payload of every direct partition, skipping raw partitions.
    pub fn for_each_filesystem<'a, E, F>(&'a self, mut cb: F) -> Result<(), E>
    where
        F: FnMut(&'a Filesystem) -> Result<ControlFlow<()>, E>,
    {
        for fs in self.partitions.iter().filter_map(|part| part.payload.as_ref()) {
            if cb(fs)?.is_break() {
                break;
            }
        }
        Ok(())
    }

    /// Mutable counterpart of [`PartitionTable::for_each_filesystem`].
    pub fn for_each_filesystem_mut<E, F>(&mut self, mut cb: F) -> Result<(), E>
    where
        F: FnMut(&mut Filesystem) -> Result<ControlFlow<()>, E>,
    {
        for fs in self
            .partitions
            .iter_mut()
            .filter_map(|part| part.payload.as_mut())
        {
            if cb(fs)?.is_break() {
                break;
            }
        }
        Ok(())
    }

    /// Visit every mountable entity below the table, descending through
    /// containers at any depth. `path` starts at the table and ends with the
    /// mountable entity.
    pub fn for_each_mountable<'a, E, F>(&'a self, mut cb: F) -> Result<(), E>
    where
        F: FnMut(&'a dyn Mountable, &[Entity<'a>]) -> Result<ControlFlow<()>, E>,
    {
        walk_mountables(self, &[Entity::Table(self)], &mut cb).map(|_| ())
    }
}

fn walk_entities<'a, E, F>(
    ent: Entity<'a>,
    path: &[Entity<'a>],
    cb: &mut F,
) -> Result<ControlFlow<()>, E>
where
    F: FnMut(Entity<'a>, &[Entity<'a>]) -> Result<ControlFlow<()>, E>,
{
    let mut child_path = path.to_vec();
    child_path.push(ent);

    if cb(ent, &child_path)?.is_break() {
        return Ok(ControlFlow::Break(()));
    }

    if let Some(container) = ent.as_container() {
        for idx in 0..container.item_count() {
            if walk_entities(container.child(idx), &child_path, cb)?.is_break() {
                return Ok(ControlFlow::Break(()));
            }
        }
    }

    Ok(ControlFlow::Continue(()))
}

fn walk_mountables<'a, E, F>(
    container: &'a dyn Container,
    path: &[Entity<'a>],
    cb: &mut F,
) -> Result<ControlFlow<()>, E>
where
    F: FnMut(&'a dyn Mountable, &[Entity<'a>]) -> Result<ControlFlow<()>, E>,
{
    for idx in 0..container.item_count() {
        let child = container.child(idx);
        let mut child_path = path.to_vec();
        child_path.push(child);

        // A mountable container is reported, not descended into.
        let flow = if let Some(mnt) = child.as_mountable() {
            cb(mnt, &child_path)?
        } else if let Some(inner) = child.as_container() {
            walk_mountables(inner, &child_path, cb)?
        } else {
            ControlFlow::Continue(())
        };

        if flow.is_break() {
            return Ok(ControlFlow::Break(()));
        }
    }

    Ok(ControlFlow::Continue(()))
}

/// Search `ent` and its descendants for the entity mounted at `target`.
///
/// The returned path is in reverse order: the mountable entity first and
/// `ent` last. `None` when nothing below `ent` is mounted at `target`.
pub fn entity_path<'a>(ent: Entity<'a>, target: &str) -> Option<Vec<Entity<'a>>> {
    if let Some(mnt) = ent.as_mountable() {
        return (mnt.mountpoint() == target).then(|| vec![ent]);
    }

    let container = ent.as_container()?;
    for idx in 0..container.item_count() {
        if let Some(mut path) = entity_path(container.child(idx), target) {
            path.push(ent);
            return Some(path);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disk::{types, Partition, PartitionTableType, GIB, MIB};
    use std::convert::Infallible;

    fn sample_table() -> PartitionTable {
        let mut pt = PartitionTable::new(PartitionTableType::Gpt);
        pt.partitions.push(Partition::raw(MIB, types::BIOS_BOOT_PARTITION_GUID));
        pt.create_filesystem("/boot", 512 * MIB).unwrap();
        pt.create_filesystem("/", 2 * GIB).unwrap();
        pt.create_filesystem("/home", GIB).unwrap();
        pt
    }

    fn keep_going() -> Result<ControlFlow<()>, Infallible> {
        Ok(ControlFlow::Continue(()))
    }

    #[test]
    fn for_each_entity_visits_in_preorder() {
        let pt = sample_table();
        let mut seen = Vec::new();
        pt.for_each_entity(|ent, path| {
            let label = match ent {
                Entity::Filesystem(fs) => format!("fs:{}", fs.mountpoint),
                other => other.kind().to_string(),
            };
            seen.push((label, path.len()));
            keep_going()
        })
        .unwrap();

        let expected = [
            ("partition_table", 1),
            ("partition", 2),
            ("partition", 2),
            ("fs:/boot", 3),
            ("partition", 2),
            ("fs:/", 3),
            ("partition", 2),
            ("fs:/home", 3),
        ];
        let expected: Vec<_> = expected
            .iter()
            .map(|(label, depth)| (label.to_string(), *depth))
            .collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn for_each_entity_path_ends_with_current() {
        let pt = sample_table();
        pt.for_each_entity(|ent, path| {
            assert!(matches!(path[0], Entity::Table(_)));
            assert_eq!(path.last().unwrap().kind(), ent.kind());
            if let Entity::Filesystem(_) = ent {
                assert!(matches!(path[path.len() - 2], Entity::Partition(_)));
            }
            keep_going()
        })
        .unwrap();
    }

    #[test]
    fn for_each_entity_stops_early() {
        let pt = sample_table();
        let mut calls = 0;
        let result: Result<(), Infallible> = pt.for_each_entity(|_, _| {
            calls += 1;
            if calls == 2 {
                return Ok(ControlFlow::Break(()));
            }
            Ok(ControlFlow::Continue(()))
        });
        assert!(result.is_ok());
        assert_eq!(calls, 2);
    }

    #[test]
    fn for_each_entity_propagates_errors() {
        let pt = sample_table();
        let mut calls = 0;
        let result = pt.for_each_entity(|ent, _| {
            calls += 1;
            match ent {
                Entity::Filesystem(fs) => Err(format!("refusing {}", fs.mountpoint)),
                _ => Ok(ControlFlow::Continue(())),
            }
        });
        assert_eq!(result, Err("refusing /boot".to_string()));
        assert_eq!(calls, 4);
    }

    #[test]
    fn for_each_filesystem_skips_raw_partitions() {
        let pt = sample_table();
        let mut mounts = Vec::new();
        pt.for_each_filesystem(|fs| {
            mounts.push(fs.mountpoint.clone());
            keep_going()
        })
        .unwrap();
        assert_eq!(mounts, ["/boot", "/", "/home"]);
    }

    #[test]
    fn for_each_filesystem_stops_early() {
        let pt = sample_table();
        let mut calls = 0;
        pt.for_each_filesystem(|_| {
            calls += 1;
            if calls == 2 {
                return Ok::<_, Infallible>(ControlFlow::Break(()));
            }
            Ok(ControlFlow::Continue(()))
        })
        .unwrap();
        assert_eq!(calls, 2);
    }

    #[test]
    fn for_each_filesystem_mut_edits_in_place() {
        let mut pt = sample_table();
        pt.for_each_filesystem_mut(|fs| {
            fs.fs_type = "ext4".to_string();
            keep_going()
        })
        .unwrap();
        assert!(pt
            .partitions
            .iter()
            .filter_map(|p| p.payload.as_ref())
            .all(|fs| fs.fs_type == "ext4"));
    }

    #[test]
    fn for_each_filesystem_propagates_errors() {
        let pt = sample_table();
        let mut calls = 0;
        let result = pt.for_each_filesystem(|fs| {
            calls += 1;
            if fs.mountpoint == "/" {
                return Err(format!("refusing {}", fs.mountpoint));
            }
            Ok(ControlFlow::Continue(()))
        });
        assert_eq!(result, Err("refusing /".to_string()));
        assert_eq!(calls, 2);
    }

    #[test]
    fn for_each_filesystem_mut_propagates_errors() {
        let mut pt = sample_table();
        let result = pt.for_each_filesystem_mut(|fs| {
            if fs.mountpoint == "/" {
                return Err(format!("refusing {}", fs.mountpoint));
            }
            fs.fs_type = "ext4".to_string();
            Ok(ControlFlow::Continue(()))
        });
        assert_eq!(result, Err("refusing /".to_string()));

        // edits made before the error stay, later filesystems are untouched
        let types: Vec<_> = pt
            .partitions
            .iter()
            .filter_map(|p| p.payload.as_ref())
            .map(|fs| fs.fs_type.as_str())
            .collect();
        assert_eq!(types[0], "ext4");
        assert_ne!(types[1], "ext4");
        assert_ne!(types[2], "ext4");
    }

    #[test]
    fn for_each_mountable_reports_paths() {
        let pt = sample_table();
        let mut seen = Vec::new();
        pt.for_each_mountable(|mnt, path| {
            assert_eq!(path.len(), 3);
            assert!(matches!(path[0], Entity::Table(_)));
            assert!(matches!(path[1], Entity::Partition(_)));
            assert!(matches!(path[2], Entity::Filesystem(_)));
            seen.push(mnt.mountpoint().to_string());
            keep_going()
        })
        .unwrap();
        assert_eq!(seen, ["/boot", "/", "/home"]);
    }

    #[test]
    fn for_each_mountable_stops_early() {
        let pt = sample_table();
        let mut calls = 0;
        pt.for_each_mountable(|_, _| {
            calls += 1;
            if calls == 2 {
                return Ok::<_, Infallible>(ControlFlow::Break(()));
            }
            Ok(ControlFlow::Continue(()))
        })
        .unwrap();
        assert_eq!(calls, 2);
    }

    #[test]
    fn entity_path_is_reversed() {
        let pt = sample_table();
        let path = entity_path(Entity::Table(&pt), "/").unwrap();
        assert_eq!(path.len(), 3);
        assert!(matches!(path[0], Entity::Filesystem(fs) if fs.mountpoint == "/"));
        assert!(matches!(path[1], Entity::Partition(p) if p.size == 2 * GIB));
        assert!(matches!(path[2], Entity::Table(_)));

        assert!(entity_path(Entity::Table(&pt), "/srv").is_none());
        assert!(entity_path(Entity::Partition(&pt.partitions[0]), "/").is_none());
    }
}
