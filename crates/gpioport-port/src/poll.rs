use std::io;
use std::os::fd::RawFd;

use tracing::trace;

use crate::error::{PortError, Result};

const INPUT_EVENTS: libc::c_short = libc::POLLIN | libc::POLLHUP;
const INTERRUPT_EVENTS: libc::c_short = libc::POLLPRI;

/// Which watched sources became ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Readiness {
    pub input: bool,
    pub interrupt: bool,
}

/// The descriptors one multiplexer iteration blocks on.
///
/// Rebuilt from the pin state at the top of every iteration: the command
/// stream is always watched, the value file only while interrupts are armed.
pub struct WaitSet {
    fds: [libc::pollfd; 2],
    len: usize,
}

impl WaitSet {
    pub fn new(input: RawFd, interrupt: Option<RawFd>) -> Self {
        let mut fds = [pollfd(input, INPUT_EVENTS), pollfd(-1, 0)];
        let len = match interrupt {
            Some(fd) => {
                fds[1] = pollfd(fd, INTERRUPT_EVENTS);
                2
            }
            None => 1,
        };
        Self { fds, len }
    }

    /// Number of watched descriptors.
    pub fn watched(&self) -> usize {
        self.len
    }

    /// The watched interrupt descriptor, if any.
    pub fn interrupt_fd(&self) -> Option<RawFd> {
        (self.len == 2).then_some(self.fds[1].fd)
    }

    /// Block until a watched source is ready. No timeout.
    ///
    /// Interrupted waits are retried. Readiness outside the accounted
    /// events is a fatal [`PortError::UnexpectedReadiness`].
    pub fn wait(&mut self) -> Result<Readiness> {
        for fd in &mut self.fds {
            fd.revents = 0;
        }

        let ready = loop {
            // SAFETY: `fds` is a valid array of at least `len` initialized pollfd
            // structs that lives across the call.
            let rc = unsafe { libc::poll(self.fds.as_mut_ptr(), self.len as libc::nfds_t, -1) };
            if rc >= 0 {
                break rc;
            }
            let err = io::Error::last_os_error();
            if err.kind() != io::ErrorKind::Interrupted {
                return Err(PortError::Poll(err));
            }
        };

        self.account(ready)
    }

    fn account(&self, ready: i32) -> Result<Readiness> {
        let input_events = self.fds[0].revents;
        let interrupt_events = if self.len == 2 { self.fds[1].revents } else { 0 };
        trace!(ready, input_events, interrupt_events, "poll returned");

        let mut remaining = ready;
        let mut readiness = Readiness::default();
        if input_events & INPUT_EVENTS != 0 {
            readiness.input = true;
            remaining -= 1;
        }
        if interrupt_events & INTERRUPT_EVENTS != 0 {
            readiness.interrupt = true;
            remaining -= 1;
        }

        if remaining != 0 {
            return Err(PortError::UnexpectedReadiness {
                ready,
                input: input_events,
                interrupt: interrupt_events,
            });
        }
        Ok(readiness)
    }
}

fn pollfd(fd: RawFd, events: libc::c_short) -> libc::pollfd {
    libc::pollfd {
        fd,
        events,
        revents: 0,
    }
}
