use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{GpioError, Result};

/// Default location of the kernel GPIO class directory.
pub const DEFAULT_SYSFS_ROOT: &str = "/sys/class/gpio";

/// Paths and control-file writes under a GPIO sysfs root.
#[derive(Debug, Clone)]
pub struct Sysfs {
    root: PathBuf,
}

impl Sysfs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `<root>/gpio<N>/<file>`
    pub fn pin_file(&self, pin: u32, file: &str) -> PathBuf {
        self.root.join(format!("gpio{pin}")).join(file)
    }

    /// Whether the pin's control files are present.
    pub fn is_exported(&self, pin: u32) -> bool {
        self.pin_file(pin, "direction").exists()
    }

    pub fn export(&self, pin: u32) -> Result<()> {
        debug!(pin, "exporting gpio");
        write_file(&self.root.join("export"), &pin.to_string())
    }

    pub fn unexport(&self, pin: u32) -> Result<()> {
        debug!(pin, "unexporting gpio");
        write_file(&self.root.join("unexport"), &pin.to_string())
    }
}

/// Write `value` to an existing control file with a single write call.
pub(crate) fn write_file(path: &Path, value: &str) -> Result<()> {
    let unavailable = |source: std::io::Error| {
        warn!(?path, value, %source, "sysfs write failed");
        GpioError::Unavailable {
            path: path.to_path_buf(),
            source,
        }
    };

    let mut file = OpenOptions::new()
        .write(true)
        .open(path)
        .map_err(unavailable)?;

    let written = loop {
        match file.write(value.as_bytes()) {
            Ok(n) => break n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(unavailable(err)),
        }
    };

    if written != value.len() {
        return Err(unavailable(std::io::Error::new(
            ErrorKind::WriteZero,
            format!("wrote {written} of {} bytes", value.len()),
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeSysfs;

    #[test]
    fn pin_paths() {
        let sysfs = Sysfs::new("/sys/class/gpio");
        assert_eq!(
            sysfs.pin_file(17, "value"),
            PathBuf::from("/sys/class/gpio/gpio17/value")
        );
    }

    #[test]
    fn export_writes_pin_number() {
        let fake = FakeSysfs::new("sysfs-export");
        let sysfs = fake.sysfs();

        assert!(!sysfs.is_exported(22));
        sysfs.export(22).unwrap();
        assert_eq!(fake.read("export"), "22");
    }

    #[test]
    fn missing_control_file_is_unavailable() {
        let fake = FakeSysfs::bare("sysfs-missing");
        let sysfs = fake.sysfs();

        let err = sysfs.unexport(3).unwrap_err();
        assert!(matches!(
            err,
            GpioError::Unavailable { ref source, .. } if source.kind() == ErrorKind::NotFound
        ));
        assert!(!err.is_fatal());
        // Writes never create control files.
        assert!(!fake.path("unexport").exists());
    }
}
