//! Standard NES controllers
//!
//! Each pad is a parallel-in serial-out shift register. Writing 1 then 0 to
//! $4016 latches the buttons of both pads, then every read of $4016/$4017
//! shifts out one button: A, B, Select, Start, Up, Down, Left, Right.
//!
//! Hosts feed button state with [`Controller::set_buttons`] or through a
//! crossbeam channel connected with [`Controller::connect`]. The channel is
//! drained when the pad latches, never in between.

use bitflags::bitflags;
use crossbeam_channel::{Receiver, TryRecvError};
use log::{trace, warn};

use crate::interfaces::Memory;
use crate::utils;

/// Upper bits of a controller read come from open bus, usually $40
const OPEN_BUS_BITS: u8 = 0x40;

bitflags! {
    /// Buttons in shift-out order, A is the first bit read
    #[derive(Default)]
    pub struct Buttons: u8 {
        const A = 0b1000_0000;
        const B = 0b0100_0000;
        const SELECT = 0b0010_0000;
        const START = 0b0001_0000;
        const UP = 0b0000_1000;
        const DOWN = 0b0000_0100;
        const LEFT = 0b0000_0010;
        const RIGHT = 0b0000_0001;
    }
}

#[derive(Default)]
pub struct Controller {
    buttons: Buttons,
    feed: Option<Receiver<Buttons>>,
    strobe: bool,
    shift_register: u8,
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_buttons(&mut self, buttons: Buttons) {
        self.buttons = buttons;
    }

    pub fn buttons(&self) -> Buttons {
        self.buttons
    }

    /// Receive button state from a host input thread or event loop
    pub fn connect(&mut self, feed: Receiver<Buttons>) {
        self.feed = Some(feed);
    }

    /// Strobe line. Buttons are latched on the falling edge
    pub fn strobe(&mut self, high: bool) {
        if self.strobe && !high {
            self.latch();
        }
        self.strobe = high;
    }

    pub fn read_bit(&mut self) -> u8 {
        if self.strobe {
            // continuously reloading, always reports A
            self.poll();
            return utils::bv(self.buttons.bits(), 7);
        }

        let bit = utils::bv(self.shift_register, 7);
        // official pads shift in 1s after the 8 buttons
        self.shift_register = (self.shift_register << 1) | 1;
        bit
    }

    fn latch(&mut self) {
        self.poll();
        self.shift_register = self.buttons.bits();
        trace!("Controller latched: {:0>8b}", self.shift_register);
    }

    // keep the most recent state sent by the host
    fn poll(&mut self) {
        let Some(feed) = self.feed.as_ref() else {
            return;
        };

        loop {
            match feed.try_recv() {
                Ok(buttons) => self.buttons = buttons,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    warn!("Controller input channel disconnected");
                    self.feed = None;
                    break;
                }
            }
        }
    }
}

/// Both controller ports, attached at $4016-$4017
#[derive(Default)]
pub struct ControllerPorts {
    pub one: Controller,
    pub two: Controller,
}

impl ControllerPorts {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Memory for ControllerPorts {
    fn read(&mut self, address: u16) -> u8 {
        let bit = match address & 1 {
            0 => self.one.read_bit(),
            _ => self.two.read_bit(),
        };
        OPEN_BUS_BITS | bit
    }

    fn write(&mut self, address: u16, data: u8) {
        if address & 1 == 0 {
            let high = utils::bv(data, 0) == 1;
            self.one.strobe(high);
            self.two.strobe(high);
        } else {
            // $4017 writes belong to the APU frame counter
            trace!("APU frame counter write ignored: {data:0>2X}");
        }
    }

    fn size(&self) -> usize {
        2
    }
}

#[cfg(test)]
mod tests {
    use crossbeam_channel::unbounded;

    use super::*;

    fn read_all(ports: &mut ControllerPorts, address: u16, count: usize) -> Vec<u8> {
        (0..count).map(|_| ports.read(address) & 1).collect()
    }

    #[test]
    fn test_serial_order() {
        let mut ports = ControllerPorts::new();
        ports.one.set_buttons(Buttons::A | Buttons::START | Buttons::LEFT);

        ports.write(0, 1);
        ports.write(0, 0);
        assert_eq!(read_all(&mut ports, 0, 8), vec![1, 0, 0, 1, 0, 0, 1, 0]);
        // after the 8 buttons, 1s
        assert_eq!(read_all(&mut ports, 0, 3), vec![1, 1, 1]);
    }

    #[test]
    fn test_reads_carry_open_bus_bits() {
        let mut ports = ControllerPorts::new();
        ports.write(0, 1);
        ports.write(0, 0);
        assert_eq!(ports.read(1), 0x40);
    }

    #[test]
    fn test_strobe_high_reports_a() {
        let mut ports = ControllerPorts::new();
        ports.one.set_buttons(Buttons::A);
        ports.write(0, 1);
        assert_eq!(read_all(&mut ports, 0, 4), vec![1, 1, 1, 1]);
    }

    #[test]
    fn test_latch_happens_on_falling_edge() {
        let mut ports = ControllerPorts::new();
        ports.write(0, 1);
        ports.write(0, 0);
        // changes after latching aren't seen until the next strobe
        ports.two.set_buttons(Buttons::B);
        assert_eq!(read_all(&mut ports, 1, 2), vec![0, 0]);

        ports.write(0, 1);
        ports.write(0, 0);
        assert_eq!(read_all(&mut ports, 1, 2), vec![0, 1]);
    }

    #[test]
    fn test_frame_counter_write_is_ignored() {
        let mut ports = ControllerPorts::new();
        ports.one.set_buttons(Buttons::RIGHT);
        ports.write(0, 1);
        ports.write(0, 0);
        ports.write(1, 1);
        ports.write(1, 0);
        let bits = read_all(&mut ports, 0, 8);
        assert_eq!(bits[7], 1);
    }

    #[test]
    fn test_channel_feed() {
        let (sender, receiver) = unbounded();
        let mut controller = Controller::new();
        controller.connect(receiver);

        sender.send(Buttons::UP).unwrap();
        sender.send(Buttons::DOWN | Buttons::SELECT).unwrap();
        controller.strobe(true);
        controller.strobe(false);
        assert_eq!(controller.buttons(), Buttons::DOWN | Buttons::SELECT);

        drop(sender);
        controller.strobe(true);
        controller.strobe(false);
        assert_eq!(controller.buttons(), Buttons::DOWN | Buttons::SELECT);
    }
}
