use std::io::{Read, Write};
use std::os::fd::AsRawFd;

use gpioport_frame::{FrameBuffer, FrameWriter};
use gpioport_gpio::Gpio;
use tracing::{debug, info};

use crate::dispatch::dispatch;
use crate::error::Result;
use crate::notify::notify;
use crate::poll::{Readiness, WaitSet};
use crate::reply;

/// The port event loop: one command stream, one reply stream, one pin.
pub struct Port<R, W> {
    input: R,
    output: FrameWriter<W>,
    frames: FrameBuffer,
    gpio: Gpio,
}

impl<R: Read + AsRawFd, W: Write> Port<R, W> {
    pub fn new(input: R, output: W, gpio: Gpio) -> Self {
        Self {
            input,
            output: FrameWriter::new(output),
            frames: FrameBuffer::new(),
            gpio,
        }
    }

    /// Serve until the parent closes the command stream.
    ///
    /// `Ok(())` means a clean end of stream. Any `Err` is fatal and the
    /// process should exit non-zero. The pin is released either way.
    pub fn run(mut self) -> Result<()> {
        info!("gpio port started");
        loop {
            let ready = self.wait_set().wait()?;
            if !self.handle(ready)? {
                info!("command stream closed");
                return Ok(());
            }
        }
    }

    /// Route one wakeup. Returns `false` once the command stream is closed.
    fn handle(&mut self, ready: Readiness) -> Result<bool> {
        if ready.input && !self.process_input()? {
            return Ok(false);
        }

        // Input handling may have released or reconfigured the pin.
        if ready.interrupt && self.gpio.interrupt_fd().is_some() {
            notify(&self.gpio, &mut self.output)?;
        }
        Ok(true)
    }

    fn wait_set(&self) -> WaitSet {
        WaitSet::new(self.input.as_raw_fd(), self.gpio.interrupt_fd())
    }

    /// Read once and dispatch every complete frame. Returns `false` on EOF.
    fn process_input(&mut self) -> Result<bool> {
        if self.frames.fill(&mut self.input)? == 0 {
            return Ok(false);
        }

        while let Some(payload) = self.frames.next_frame()? {
            if let Some(term) = dispatch(&payload, &mut self.gpio)? {
                reply::send(&mut self.output, &term)?;
            }
        }
        debug!(pending = self.frames.len(), "input drained");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::os::unix::net::UnixStream;

    use bytes::BytesMut;
    use gpioport_frame::{encode_frame, FrameError};
    use gpioport_gpio::PinState;
    use gpioport_term::{encode, Reference, Term};

    use super::*;
    use crate::error::PortError;
    use crate::testing::FakeSysfs;

    fn frame(term: Term) -> Vec<u8> {
        let mut buf = BytesMut::new();
        encode_frame(&encode(&term).unwrap(), &mut buf).unwrap();
        buf.to_vec()
    }

    fn init(pin: i64, direction: &str) -> Vec<u8> {
        frame(Term::tuple([
            Term::atom("init"),
            Term::Integer(pin),
            Term::atom(direction),
        ]))
    }

    fn call(id: u32, function: &str, arg: Term) -> Vec<u8> {
        frame(Term::tuple([
            Term::atom("call"),
            Reference::new("parent@host", 1, &[id]).into(),
            Term::tuple([Term::atom(function), arg]),
        ]))
    }

    fn replies(wire: &[u8]) -> Vec<String> {
        let mut frames = FrameBuffer::new();
        let mut terms = Vec::new();
        for chunk in wire.chunks(512) {
            frames.push(chunk).unwrap();
            while let Some(payload) = frames.next_frame().unwrap() {
                terms.push(gpioport_term::decode(&payload).unwrap().to_string());
            }
        }
        terms
    }

    /// Feed `input` to a port, close the stream and collect what it wrote.
    fn run_port(fake: &FakeSysfs, input: &[u8]) -> (Result<()>, Vec<u8>) {
        let (mut parent, child) = UnixStream::pair().unwrap();
        parent.write_all(input).unwrap();
        drop(parent);

        let mut output = Vec::new();
        let result = Port::new(child, &mut output, fake.gpio()).run();
        (result, output)
    }

    #[test]
    fn serves_commands_until_end_of_stream() {
        let fake = FakeSysfs::new("port-serve").with_pin(4, "0\n");
        let mut input = init(4, "output");
        input.extend(call(1, "write", Term::Integer(1)));
        input.extend(call(2, "read", Term::atom("undefined")));
        input.extend(frame(Term::tuple([Term::atom("cast"), Term::atom("release")])));

        let (result, output) = run_port(&fake, &input);
        result.unwrap();

        let replies = replies(&output);
        assert_eq!(replies.len(), 3);
        assert_eq!(replies[0], "ok");
        assert!(replies[1].starts_with("{port_reply,#Ref<"));
        assert!(replies[1].ends_with(",ok}"));
        assert!(replies[2].ends_with(",1}"));
        assert_eq!(fake.read("gpio4/value"), "1\n");
        assert_eq!(fake.read("unexport"), "4");
    }

    #[test]
    fn oversized_frame_is_fatal_without_reply() {
        let fake = FakeSysfs::new("port-oversized");

        let (result, output) = run_port(&fake, &[0x07, 0xD0]);

        assert!(matches!(
            result,
            Err(PortError::Frame(FrameError::FrameTooLong { .. }))
        ));
        assert!(output.is_empty());
    }

    #[test]
    fn frames_split_across_reads_are_reassembled() {
        let fake = FakeSysfs::new("port-split").with_pin(4, "0");
        let (mut parent, child) = UnixStream::pair().unwrap();
        let mut output = Vec::new();
        let mut port = Port::new(child, &mut output, fake.gpio());

        let command = init(4, "input");
        parent.write_all(&command[..1]).unwrap();
        assert!(port.process_input().unwrap());
        parent.write_all(&command[1..2]).unwrap();
        assert!(port.process_input().unwrap());
        assert_eq!(port.gpio.state(), PinState::Closed);

        parent.write_all(&command[2..]).unwrap();
        assert!(port.process_input().unwrap());
        assert_eq!(port.gpio.state(), PinState::Input);

        drop(parent);
        assert!(!port.process_input().unwrap());
        drop(port);
        assert_eq!(replies(&output), ["ok"]);
    }

    const INTERRUPT: Readiness = Readiness {
        input: false,
        interrupt: true,
    };

    #[test]
    fn interrupt_readiness_sends_notification() {
        let fake = FakeSysfs::new("port-notify").with_pin(4, "1");
        let (_parent, child) = UnixStream::pair().unwrap();
        let mut output = Vec::new();
        let mut port = Port::new(child, &mut output, fake.gpio());
        port.gpio.open(4, "input").unwrap();
        port.gpio.set_interrupt("both").unwrap();

        assert!(port.handle(INTERRUPT).unwrap());
        drop(port);

        assert_eq!(replies(&output), ["{gpio_interrupt,rising}"]);
    }

    #[test]
    fn stale_interrupt_readiness_is_dropped() {
        let fake = FakeSysfs::new("port-stale").with_pin(4, "0");
        let (mut parent, child) = UnixStream::pair().unwrap();
        let mut output = Vec::new();
        let mut port = Port::new(child, &mut output, fake.gpio());

        // Armed, but disarmed by a release that arrives in the same wakeup.
        port.gpio.open(4, "input").unwrap();
        port.gpio.set_interrupt("falling").unwrap();
        parent
            .write_all(&frame(Term::tuple([Term::atom("cast"), Term::atom("release")])))
            .unwrap();
        let both = Readiness {
            input: true,
            interrupt: true,
        };
        assert!(port.handle(both).unwrap());
        assert_eq!(port.gpio.state(), PinState::Closed);

        // Open without interrupts.
        port.gpio.open(4, "input").unwrap();
        assert!(port.handle(INTERRUPT).unwrap());

        drop(port);
        assert!(output.is_empty());
    }

    #[test]
    fn end_of_stream_skips_interrupt() {
        let fake = FakeSysfs::new("port-eof").with_pin(4, "1");
        let (parent, child) = UnixStream::pair().unwrap();
        let mut output = Vec::new();
        let mut port = Port::new(child, &mut output, fake.gpio());
        port.gpio.open(4, "input").unwrap();
        port.gpio.set_interrupt("rising").unwrap();
        drop(parent);

        let both = Readiness {
            input: true,
            interrupt: true,
        };
        assert!(!port.handle(both).unwrap());
        drop(port);
        assert!(output.is_empty());
    }

    #[test]
    fn wait_set_follows_pin_state() {
        let fake = FakeSysfs::new("port-wait-set").with_pin(4, "0");
        let (_parent, child) = UnixStream::pair().unwrap();
        let mut port = Port::new(child, Vec::new(), fake.gpio());

        assert_eq!(port.wait_set().watched(), 1);

        port.gpio.open(4, "input").unwrap();
        assert_eq!(port.wait_set().watched(), 1);

        port.gpio.set_interrupt("rising").unwrap();
        let set = port.wait_set();
        assert_eq!(set.watched(), 2);
        assert_eq!(set.interrupt_fd(), port.gpio.interrupt_fd());

        port.gpio.release();
        assert_eq!(port.wait_set().watched(), 1);

        port.gpio.open(4, "output").unwrap();
        assert_eq!(port.wait_set().watched(), 1);
    }

    #[test]
    fn clean_exit_releases_armed_pin() {
        let fake = FakeSysfs::new("port-armed").with_pin(7, "0");
        let mut input = init(7, "input");
        input.extend(call(1, "set_int", Term::atom("both")));

        let (result, output) = run_port(&fake, &input);
        result.unwrap();

        let replies = replies(&output);
        assert_eq!(replies.len(), 2);
        assert!(replies[1].ends_with(",ok}"));
        assert_eq!(fake.read("gpio7/edge"), "both");
        assert_eq!(fake.read("unexport"), "7");
    }

    #[test]
    fn malformed_command_stops_processing() {
        let fake = FakeSysfs::new("port-malformed").with_pin(4, "0");
        let mut input = init(4, "output");
        input.extend(frame(Term::tuple([Term::atom("cast"), Term::atom("reboot")])));
        input.extend(call(1, "write", Term::Integer(1)));

        let (result, output) = run_port(&fake, &input);

        assert!(matches!(result, Err(PortError::Protocol(_))));
        assert_eq!(replies(&output), ["ok"]);
        assert_eq!(fake.read("gpio4/value"), "0");
    }
}
