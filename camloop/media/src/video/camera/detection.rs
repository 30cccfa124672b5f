//! Video device discovery.
//!
//! On Linux the `/dev/video*` nodes are cross-checked against
//! `/sys/class/video4linux` to skip metadata nodes and to tell real cameras
//! apart from v4l2loopback virtual devices.

use crate::error::{DeviceFailure, MediaError, Result};
use logging::Logger;
use std::path::Path;

/// A discovered video device node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Node path, e.g. `/dev/video0`
    pub path: String,
    /// Numeric suffix of the node
    pub index: u32,
    /// Friendly name reported by the driver
    pub name: String,
    /// Whether this is a v4l2loopback (virtual) device
    pub is_loopback: bool,
}

/// Video device detection and enumeration
pub struct DeviceDetection;

impl DeviceDetection {
    /// Lists every primary video node on the system, sorted by index.
    pub fn list_devices(logger: &Logger) -> Vec<DeviceInfo> {
        let devices = Self::scan_system();
        logger.debug(&format!("Found {} video device node(s)", devices.len()));
        for device in &devices {
            logger.debug(&format!(
                "{}: {}{}",
                device.path,
                device.name,
                if device.is_loopback { " (loopback)" } else { "" }
            ));
        }
        devices
    }

    /// Real cameras, leaving out loopback devices and `exclude`.
    pub fn capture_devices(exclude: Option<&str>, logger: &Logger) -> Vec<DeviceInfo> {
        Self::list_devices(logger)
            .into_iter()
            .filter(|d| !d.is_loopback && Some(d.path.as_str()) != exclude)
            .collect()
    }

    /// First real camera that is not `exclude`.
    pub fn default_capture_device(exclude: Option<&str>, logger: &Logger) -> Result<String> {
        Self::capture_devices(exclude, logger)
            .into_iter()
            .next()
            .map(|d| d.path)
            .ok_or_else(|| {
                MediaError::device_unavailable(
                    "camera",
                    DeviceFailure::NotFound,
                    "No camera available. Please connect a camera and try again.",
                )
            })
    }

    /// First v4l2loopback device.
    pub fn default_output_device(logger: &Logger) -> Result<String> {
        Self::list_devices(logger)
            .into_iter()
            .find(|d| d.is_loopback)
            .map(|d| d.path)
            .ok_or_else(|| {
                MediaError::device_unavailable(
                    "virtual output",
                    DeviceFailure::NotFound,
                    "No v4l2loopback device found (is the v4l2loopback module loaded?)",
                )
            })
    }

    #[cfg(target_os = "linux")]
    fn scan_system() -> Vec<DeviceInfo> {
        Self::scan(Path::new("/dev"), Path::new("/sys/class/video4linux"))
    }

    /// Other platforms have no node listing; offer the common indexes.
    #[cfg(not(target_os = "linux"))]
    fn scan_system() -> Vec<DeviceInfo> {
        (0..4)
            .map(|index| DeviceInfo {
                path: index.to_string(),
                index,
                name: format!("Camera {}", index),
                is_loopback: false,
            })
            .collect()
    }

    /// Scans `dev_dir` for `video<N>` nodes, reading metadata from `sys_dir`.
    pub(crate) fn scan(dev_dir: &Path, sys_dir: &Path) -> Vec<DeviceInfo> {
        let Ok(entries) = std::fs::read_dir(dev_dir) else {
            return Vec::new();
        };

        let mut devices: Vec<DeviceInfo> = entries
            .flatten()
            .filter_map(|entry| {
                let file_name = entry.file_name();
                let index: u32 = file_name.to_str()?.strip_prefix("video")?.parse().ok()?;
                let node = format!("video{}", index);
                let sys_node = sys_dir.join(&node);

                // Metadata nodes report a non-zero index
                if let Some(node_index) = read_trimmed(&sys_node.join("index"))
                    && node_index != "0"
                {
                    return None;
                }

                let name = read_trimmed(&sys_node.join("name"))
                    .unwrap_or_else(|| format!("Video device {}", index));
                let is_loopback = is_loopback_name(&name);

                Some(DeviceInfo {
                    path: dev_dir.join(&node).display().to_string(),
                    index,
                    name,
                    is_loopback,
                })
            })
            .collect();

        devices.sort_unstable_by_key(|d| d.index);
        devices
    }
}

fn read_trimmed(path: &Path) -> Option<String> {
    std::fs::read_to_string(path)
        .ok()
        .map(|s| s.trim().to_string())
}

/// v4l2loopback names its devices "Dummy video device (0x0000)" unless a
/// `card_label` is given, in which case "loopback" usually appears in it.
fn is_loopback_name(name: &str) -> bool {
    name.starts_with("Dummy video device") || name.to_lowercase().contains("loopback")
}
