use std::fmt;
use std::fs::{File, OpenOptions};
use std::os::fd::{AsRawFd, RawFd};
use std::os::unix::fs::FileExt;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::{debug, info, warn};

use crate::error::{GpioError, Result};
use crate::sysfs::{write_file, Sysfs};

/// Pin resource state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinState {
    Closed,
    Output,
    Input,
    InputWithInterrupts,
}

impl fmt::Display for PinState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Closed => "closed",
            Self::Output => "output",
            Self::Input => "input",
            Self::InputWithInterrupts => "input with interrupts",
        })
    }
}

/// Configured pin direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output,
}

impl Direction {
    /// The string the sysfs `direction` file expects.
    pub fn sysfs_value(self) -> &'static str {
        match self {
            Self::Input => "in",
            Self::Output => "out",
        }
    }
}

impl FromStr for Direction {
    type Err = GpioError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "input" => Ok(Self::Input),
            "output" => Ok(Self::Output),
            other => Err(GpioError::InvalidArgument(format!(
                "direction must be input or output, got {other:?}"
            ))),
        }
    }
}

/// Interrupt edge mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    None,
    Rising,
    Falling,
    Both,
}

impl Edge {
    /// The string the sysfs `edge` file expects.
    pub fn sysfs_value(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Rising => "rising",
            Self::Falling => "falling",
            Self::Both => "both",
        }
    }
}

impl FromStr for Edge {
    type Err = GpioError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "none" => Ok(Self::None),
            "rising" => Ok(Self::Rising),
            "falling" => Ok(Self::Falling),
            "both" => Ok(Self::Both),
            other => Err(GpioError::InvalidArgument(format!(
                "edge must be rising, falling, both or none, got {other:?}"
            ))),
        }
    }
}

#[derive(Debug)]
struct OpenPin {
    number: u32,
    state: PinState,
    value: File,
    value_path: PathBuf,
}

/// The process's single GPIO pin slot.
///
/// There is no way to get a second handle to the slot: opening a new pin
/// releases the current one first. Dropping the slot releases the pin.
#[derive(Debug)]
pub struct Gpio {
    sysfs: Sysfs,
    pin: Option<OpenPin>,
}

impl Gpio {
    /// Create a closed slot rooted at a sysfs GPIO directory.
    pub fn new(sysfs: Sysfs) -> Self {
        Self { sysfs, pin: None }
    }

    pub fn state(&self) -> PinState {
        self.pin.as_ref().map_or(PinState::Closed, |pin| pin.state)
    }

    pub fn pin_number(&self) -> Option<u32> {
        self.pin.as_ref().map(|pin| pin.number)
    }

    /// Descriptor of the value file, present only while interrupts are armed.
    pub fn interrupt_fd(&self) -> Option<RawFd> {
        self.pin
            .as_ref()
            .filter(|pin| pin.state == PinState::InputWithInterrupts)
            .map(|pin| pin.value.as_raw_fd())
    }

    /// Export and configure `number`, replacing whatever pin was open.
    ///
    /// Arguments are validated before the current pin is touched.
    pub fn open(&mut self, number: u32, direction: &str) -> Result<()> {
        let direction: Direction = direction.parse()?;

        self.release();

        if !self.sysfs.is_exported(number) {
            self.sysfs.export(number)?;
        }

        write_file(
            &self.sysfs.pin_file(number, "direction"),
            direction.sysfs_value(),
        )?;

        let value_path = self.sysfs.pin_file(number, "value");
        let value = OpenOptions::new()
            .read(true)
            .write(direction == Direction::Output)
            .open(&value_path)
            .map_err(|source| {
                warn!(path = ?value_path, %source, "failed to open gpio value file");
                GpioError::Unavailable {
                    path: value_path.clone(),
                    source,
                }
            })?;

        let state = match direction {
            Direction::Output => PinState::Output,
            Direction::Input => PinState::Input,
        };
        info!(pin = number, %state, "gpio opened");

        self.pin = Some(OpenPin {
            number,
            state,
            value,
            value_path,
        });
        Ok(())
    }

    /// Close the value file and unexport the pin. Does nothing when closed.
    pub fn release(&mut self) {
        let Some(pin) = self.pin.take() else {
            return;
        };

        drop(pin.value);
        // Unexport failures leave the pin exported but the slot is free either way.
        let _ = self.sysfs.unexport(pin.number);
        info!(pin = pin.number, "gpio released");
    }

    /// Drive an output pin. Any non-zero bit writes `'1'`.
    pub fn write(&mut self, bit: bool) -> Result<()> {
        let pin = self.pin_in("write", &[PinState::Output])?;

        let byte = if bit { b'1' } else { b'0' };
        let written = pin.value.write_at(&[byte], 0).map_err(|source| GpioError::Io {
            path: pin.value_path.clone(),
            source,
        })?;
        if written != 1 {
            return Err(GpioError::ShortTransfer {
                operation: "write",
                path: pin.value_path.clone(),
            });
        }

        debug!(pin = pin.number, bit, "gpio written");
        Ok(())
    }

    /// Sample the pin level.
    pub fn read(&self) -> Result<bool> {
        let pin = self.pin_in(
            "read",
            &[
                PinState::Output,
                PinState::Input,
                PinState::InputWithInterrupts,
            ],
        )?;

        let mut byte = [0u8; 1];
        let read = pin.value.read_at(&mut byte, 0).map_err(|source| GpioError::Io {
            path: pin.value_path.clone(),
            source,
        })?;
        if read != 1 {
            return Err(GpioError::ShortTransfer {
                operation: "read",
                path: pin.value_path.clone(),
            });
        }

        Ok(byte[0] == b'1')
    }

    /// Configure the interrupt edge of an input pin.
    ///
    /// `none` disarms interrupts and returns the pin to plain `Input`.
    pub fn set_interrupt(&mut self, mode: &str) -> Result<()> {
        let pin = self.pin_in(
            "set_interrupt",
            &[PinState::Input, PinState::InputWithInterrupts],
        )?;
        let edge: Edge = mode.parse()?;
        let number = pin.number;

        write_file(&self.sysfs.pin_file(number, "edge"), edge.sysfs_value())?;

        let state = if edge == Edge::None {
            PinState::Input
        } else {
            PinState::InputWithInterrupts
        };
        if let Some(pin) = self.pin.as_mut() {
            pin.state = state;
        }
        debug!(pin = number, edge = edge.sysfs_value(), "gpio interrupt configured");
        Ok(())
    }

    fn pin_in(&self, operation: &'static str, allowed: &[PinState]) -> Result<&OpenPin> {
        match &self.pin {
            Some(pin) if allowed.contains(&pin.state) => Ok(pin),
            _ => Err(GpioError::InvalidState {
                operation,
                state: self.state(),
            }),
        }
    }
}

impl Drop for Gpio {
    fn drop(&mut self) {
        self.release();
    }
}
