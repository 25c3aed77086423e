use std::path::PathBuf;

use gpioport_gpio::{Gpio, Sysfs};

/// A throwaway sysfs tree: `export`, `unexport` and pre-exported pins.
pub(crate) struct FakeSysfs {
    root: PathBuf,
}

impl FakeSysfs {
    pub(crate) fn new(tag: &str) -> Self {
        let root = std::env::temp_dir().join(format!("gpioport-port-{tag}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&root);
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(root.join("export"), b"").unwrap();
        std::fs::write(root.join("unexport"), b"").unwrap();
        Self { root }
    }

    pub(crate) fn with_pin(self, pin: u32, level: &str) -> Self {
        let dir = self.root.join(format!("gpio{pin}"));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("direction"), b"").unwrap();
        std::fs::write(dir.join("edge"), b"").unwrap();
        std::fs::write(dir.join("value"), level).unwrap();
        self
    }

    pub(crate) fn gpio(&self) -> Gpio {
        Gpio::new(Sysfs::new(&self.root))
    }

    pub(crate) fn read(&self, rel: &str) -> String {
        std::fs::read_to_string(self.root.join(rel)).unwrap()
    }
}

impl Drop for FakeSysfs {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.root);
    }
}
