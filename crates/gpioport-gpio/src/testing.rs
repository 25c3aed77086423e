use std::path::{Path, PathBuf};

use crate::pin::Gpio;
use crate::sysfs::Sysfs;

/// A throwaway sysfs root under the temp dir, removed on drop.
pub(crate) struct FakeSysfs {
    root: PathBuf,
}

impl FakeSysfs {
    /// A root with `export` and `unexport` control files.
    pub(crate) fn new(tag: &str) -> Self {
        let fake = Self::bare(tag);
        fake.write("export", "");
        fake.write("unexport", "");
        fake
    }

    /// A root with no control files at all.
    pub(crate) fn bare(tag: &str) -> Self {
        let root = std::env::temp_dir().join(format!("gpioport-gpio-{tag}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&root);
        std::fs::create_dir_all(&root).unwrap();
        Self { root }
    }

    /// Pre-export `pin` with an empty direction and edge and the given level.
    pub(crate) fn with_pin(self, pin: u32, level: &str) -> Self {
        std::fs::create_dir_all(self.path(format!("gpio{pin}"))).unwrap();
        self.write(format!("gpio{pin}/direction"), "");
        self.write(format!("gpio{pin}/edge"), "");
        self.write(format!("gpio{pin}/value"), level);
        self
    }

    pub(crate) fn sysfs(&self) -> Sysfs {
        Sysfs::new(&self.root)
    }

    pub(crate) fn gpio(&self) -> Gpio {
        Gpio::new(self.sysfs())
    }

    pub(crate) fn path(&self, rel: impl AsRef<Path>) -> PathBuf {
        self.root.join(rel)
    }

    pub(crate) fn read(&self, rel: impl AsRef<Path>) -> String {
        std::fs::read_to_string(self.path(rel)).unwrap()
    }

    fn write(&self, rel: impl AsRef<Path>, contents: &str) {
        std::fs::write(self.path(rel), contents).unwrap();
    }
}

impl Drop for FakeSysfs {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.root);
    }
}
