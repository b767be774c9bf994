use std::path::{Path, PathBuf};

use crate::backup::resolver::{parent_dir, relative_to};
use crate::error::BackupError;

/// Root under which macOS mounts removable volumes.
pub const VOLUMES_ROOT: &str = "/Volumes";

/// Filesystem bookkeeping that macOS keeps at the root of every volume.
pub const VOLUME_ROOT_ARTIFACTS: &[&str] = &[
    ".DocumentRevisions-V100",
    ".fseventsd",
    ".Spotlight-V100",
    ".TemporaryItems",
    ".Trashes",
    ".VolumeIcon.icns",
];

/// Rewrites absolute exclusion paths relative to `source`, keeping their order.
pub fn translate(exclusions: &[PathBuf], source: &Path) -> Result<Vec<String>, BackupError> {
    exclusions
        .iter()
        .map(|excluded| {
            relative_to(excluded, source).map(|rel| rel.to_string_lossy().into_owned())
        })
        .collect()
}

/// True when running on a host that mounts volumes under [`VOLUMES_ROOT`].
pub const HOST_IS_MACOS: bool = cfg!(target_os = "macos");

/// Extra exclusions applied when backing up a whole macOS volume.
pub fn platform_defaults(source: &Path, is_macos: bool) -> Vec<String> {
    if is_macos && parent_dir(source) == Path::new(VOLUMES_ROOT) {
        VOLUME_ROOT_ARTIFACTS.iter().map(|s| s.to_string()).collect()
    } else {
        Vec::new()
    }
}
