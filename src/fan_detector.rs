use log::{debug, info};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A hwmon directory and the contents of its `name` attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HwmonEntry {
    pub path: PathBuf,
    pub name: String,
}

/// Finds the hwmon directory of the PWM fan
pub struct HwmonLocator {
    root: PathBuf,
    device_name: String,
}

impl HwmonLocator {
    /// Create a locator scanning `root` for a device whose name contains `device_name`
    pub fn new(root: impl Into<PathBuf>, device_name: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            device_name: device_name.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Find the first matching hwmon entry.
    ///
    /// Entries are probed in path order so the result only depends on the
    /// directory contents. Entries without a readable `name` are skipped.
    pub fn locate(&self) -> Option<HwmonEntry> {
        let mut candidates = match self.candidates() {
            Ok(candidates) => candidates,
            Err(e) => {
                debug!("Cannot enumerate {}: {}", self.root.display(), e);
                return None;
            }
        };
        candidates.sort();

        for path in candidates {
            let name = match fs::read_to_string(path.join("name")) {
                Ok(content) => content.trim().to_string(),
                Err(e) => {
                    debug!("Skipping {}: unreadable name ({})", path.display(), e);
                    continue;
                }
            };
            debug!("Checking hwmon device: {} -> '{}'", path.display(), name);

            if name.contains(&self.device_name) {
                info!("Found PWM fan '{}' at: {}", name, path.display());
                return Some(HwmonEntry { path, name });
            }
        }

        None
    }

    fn candidates(&self) -> io::Result<Vec<PathBuf>> {
        let mut paths = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = match entry {
                Ok(entry) => entry.path(),
                Err(_) => continue,
            };
            // hwmon entries are symlinks to device directories
            if path.is_dir() {
                paths.push(path);
            }
        }
        Ok(paths)
    }
}

/// Sorted file names inside a hwmon directory, for diagnostics
pub fn list_device_files(hwmon_path: &Path) -> io::Result<Vec<String>> {
    let mut names = fs::read_dir(hwmon_path)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect::<Vec<_>>();
    names.sort();
    Ok(names)
}
