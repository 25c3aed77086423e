use std::io::Write;

use gpioport_frame::FrameWriter;
use gpioport_gpio::Gpio;
use tracing::debug;

use crate::error::Result;
use crate::reply;

/// Report an interrupt: sample the pin and send an uncorrelated
/// `{gpio_interrupt, rising | falling}` frame.
pub fn notify<W: Write>(gpio: &Gpio, writer: &mut FrameWriter<W>) -> Result<()> {
    let level = gpio.read()?;
    debug!(pin = ?gpio.pin_number(), level, "gpio interrupt");
    reply::send(writer, &reply::interrupt(level))
}
