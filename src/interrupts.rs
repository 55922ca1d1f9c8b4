//! Interrupt signals between the devices and the CPU
//!
//! The scheduler owns an [`InterruptLines`] and hands it to the CPU on every
//! step. Devices never poke the CPU directly.

/// NMI is edge triggered: a raise stays pending until the CPU takes it. IRQ is
/// a level, serviced for as long as it's asserted and the CPU allows it
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InterruptLines {
    nmi: bool,
    irq: bool,
}

impl InterruptLines {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise_nmi(&mut self) {
        self.nmi = true;
    }

    pub fn nmi_pending(&self) -> bool {
        self.nmi
    }

    /// Acknowledge a pending NMI. Returns whether there was one
    pub fn take_nmi(&mut self) -> bool {
        std::mem::take(&mut self.nmi)
    }

    pub fn set_irq(&mut self, asserted: bool) {
        self.irq = asserted;
    }

    pub fn irq_asserted(&self) -> bool {
        self.irq
    }
}
