//! User filesystem customizations.
//!
//! Requests arrive as `(mountpoint, minimum size)` pairs. They are checked
//! against an allow-list before being merged into a template.

use serde::{Deserialize, Serialize};

use crate::disk::{GIB, KIB, MIB};
use crate::error::{LayoutError, Result};

/// Mountpoints (and their sub-paths) users may request.
pub const MOUNTPOINT_ALLOW_LIST: &[&str] =
    &["/", "/var", "/opt", "/srv", "/usr", "/app", "/data", "/home"];

/// Minimum size of a separate `/usr` filesystem.
pub const USR_MIN_SIZE: u64 = 2 * GIB;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MountpointRequest {
    pub mountpoint: String,
    /// Minimum size in bytes.
    pub min_size: u64,
}

impl MountpointRequest {
    /// Parse `MOUNTPOINT=SIZE`, e.g. `/var=4GiB`.
    pub fn parse(raw: &str) -> Result<Self> {
        let (mountpoint, size) = raw
            .split_once('=')
            .ok_or_else(|| LayoutError::InvalidSize(raw.to_string()))?;
        Ok(Self {
            mountpoint: mountpoint.trim().to_string(),
            min_size: parse_size(size)?,
        })
    }
}

pub fn is_mountpoint_allowed(mountpoint: &str) -> bool {
    if mountpoint.contains("//") {
        return false;
    }
    MOUNTPOINT_ALLOW_LIST.iter().any(|allowed| {
        if mountpoint == *allowed {
            return true;
        }
        // sub-paths of "/" alone would allow everything
        *allowed != "/"
            && mountpoint
                .strip_prefix(allowed)
                .is_some_and(|rest| rest.starts_with('/') && is_clean_subpath(rest))
    })
}

fn is_clean_subpath(rest: &str) -> bool {
    rest.split('/')
        .skip(1)
        .all(|part| !part.is_empty() && part != "." && part != "..")
}

/// Reject every request whose mountpoint is not allowed, naming all of them.
pub fn check_mountpoints(requests: &[MountpointRequest]) -> Result<()> {
    let invalid: Vec<String> = requests
        .iter()
        .filter(|req| !is_mountpoint_allowed(&req.mountpoint))
        .map(|req| req.mountpoint.clone())
        .collect();

    if !invalid.is_empty() {
        return Err(LayoutError::InvalidMountpoints(invalid));
    }
    Ok(())
}

/// Raise requested sizes that are too small for the mountpoint.
pub fn clamp_filesystem_size(mountpoint: &str, size: u64) -> u64 {
    if mountpoint == "/usr" && size < USR_MIN_SIZE {
        return USR_MIN_SIZE;
    }
    size
}

/// Parse a byte count with an optional unit: `1048576`, `512MiB`, `4 GB`.
pub fn parse_size(raw: &str) -> Result<u64> {
    let trimmed = raw.trim();
    let split = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    let (digits, unit) = trimmed.split_at(split);

    let value: u64 = digits
        .parse()
        .map_err(|_| LayoutError::InvalidSize(raw.to_string()))?;

    let multiplier = match unit.trim() {
        "" | "B" => 1,
        "KiB" => KIB,
        "MiB" => MIB,
        "GiB" => GIB,
        "TiB" => 1024 * GIB,
        "kB" | "KB" => 1000,
        "MB" => 1000 * 1000,
        "GB" => 1000 * 1000 * 1000,
        "TB" => 1000 * 1000 * 1000 * 1000,
        _ => return Err(LayoutError::InvalidSize(raw.to_string())),
    };

    value
        .checked_mul(multiplier)
        .ok_or_else(|| LayoutError::InvalidSize(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allow_list_accepts_known_paths() {
        for path in ["/", "/var", "/var/log", "/home/user/cache", "/data", "/usr"] {
            assert!(is_mountpoint_allowed(path), "{path} should be allowed");
        }
    }

    #[test]
    fn allow_list_rejects_unknown_paths() {
        for path in [
            "/etc",
            "/boot",
            "/variable",
            "/var//log",
            "/var/",
            "/var/../etc",
            "/usr/./lib",
            "var",
            "",
        ] {
            assert!(!is_mountpoint_allowed(path), "{path} should be rejected");
        }
    }

    #[test]
    fn check_mountpoints_lists_all_invalid() {
        let requests: Vec<_> = ["/var", "/etc", "/boot"]
            .iter()
            .map(|mp| MountpointRequest {
                mountpoint: mp.to_string(),
                min_size: GIB,
            })
            .collect();
        assert_eq!(
            check_mountpoints(&requests),
            Err(LayoutError::InvalidMountpoints(vec![
                "/etc".to_string(),
                "/boot".to_string()
            ]))
        );
        assert!(check_mountpoints(&requests[..1]).is_ok());
    }

    #[test]
    fn usr_size_clamp() {
        assert_eq!(clamp_filesystem_size("/usr", GIB), USR_MIN_SIZE);
        assert_eq!(clamp_filesystem_size("/usr", 3 * GIB), 3 * GIB);
        assert_eq!(clamp_filesystem_size("/var", GIB), GIB);
    }

    #[test]
    fn parse_size_units() {
        assert_eq!(parse_size("4096").unwrap(), 4096);
        assert_eq!(parse_size("512MiB").unwrap(), 512 * MIB);
        assert_eq!(parse_size(" 2 GiB ").unwrap(), 2 * GIB);
        assert_eq!(parse_size("1GB").unwrap(), 1_000_000_000);
        assert!(parse_size("GiB").is_err());
        assert!(parse_size("12 parsecs").is_err());
        assert!(parse_size("99999999999TiB").is_err());
    }

    #[test]
    fn parse_request() {
        let req = MountpointRequest::parse("/var=4GiB").unwrap();
        assert_eq!(req.mountpoint, "/var");
        assert_eq!(req.min_size, 4 * GIB);
        assert!(MountpointRequest::parse("/var").is_err());
    }
}
