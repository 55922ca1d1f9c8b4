use log::trace;

use crate::errors::BusError;
use crate::interfaces::{AddressRange, Bus, Memory};
use crate::types::SharedMemory;

pub type DeviceId = &'static str;

/// How a bus address becomes a device address
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddressFold {
    /// Device sees `address - start`
    Offset,

    /// Device sees `(address - start) % size`. Used for devices physically
    /// smaller than their window
    Mirror { size: u16 },
}

impl AddressFold {
    fn apply(&self, relative: u16) -> u16 {
        match self {
            AddressFold::Offset => relative,
            AddressFold::Mirror { size } => relative % size,
        }
    }
}

struct Device {
    id: DeviceId,
    device: SharedMemory,
    range: AddressRange,
    fold: AddressFold,
}

/// Collects devices for a [`MainBus`]. Attach rejects overlaps, build rejects
/// gaps, so a built bus always has exactly one owner per address.
pub struct MainBusBuilder {
    id: &'static str,
    devices: Vec<Device>,
}

impl MainBusBuilder {
    pub fn new(id: &'static str) -> Self {
        Self {
            id,
            devices: Vec::new(),
        }
    }

    pub fn attach(
        mut self,
        id: DeviceId,
        device: SharedMemory,
        range: AddressRange,
        fold: AddressFold,
    ) -> Result<Self, BusError> {
        if range.start > range.end || matches!(fold, AddressFold::Mirror { size: 0 }) {
            return Err(BusError::InvalidRange {
                bus_id: self.id,
                device_id: id,
                start: range.start,
                end: range.end,
            });
        }

        if self.devices.iter().any(|registered| registered.id == id) {
            return Err(BusError::AlreadyAttached {
                bus_id: self.id,
                device_id: id,
            });
        }

        if let Some(registered) = self
            .devices
            .iter()
            .find(|registered| registered.range.overlaps(&range))
        {
            return Err(BusError::Overlap {
                bus_id: self.id,
                device_id: id,
                other_id: registered.id,
                start: range.start,
                end: range.end,
            });
        }

        trace!("Bus ({0}) attach '{id}' at {range:?}", self.id);
        self.devices.push(Device {
            id,
            device,
            range,
            fold,
        });
        Ok(self)
    }

    pub fn build(mut self) -> Result<MainBus, BusError> {
        self.devices.sort_by_key(|device| device.range.start);

        let mut next: u32 = 0;
        for device in self.devices.iter() {
            let start = device.range.start as u32;
            if start > next {
                return Err(BusError::Gap {
                    bus_id: self.id,
                    start: next as u16,
                    end: (start - 1) as u16,
                });
            }
            next = device.range.end as u32 + 1;
        }
        if next <= 0xFFFF {
            return Err(BusError::Gap {
                bus_id: self.id,
                start: next as u16,
                end: 0xFFFF,
            });
        }

        Ok(MainBus {
            id: self.id,
            devices: self.devices,
        })
    }
}

/// CPU address router. Holds nothing but the ownership table, sorted by start
/// address and covering $0000-$FFFF without holes.
pub struct MainBus {
    id: &'static str,
    devices: Vec<Device>,
}

impl MainBus {
    pub fn id(&self) -> &'static str {
        self.id
    }

    /// Name of the device owning `address`
    pub fn owner(&self, address: u16) -> DeviceId {
        self.devices[self.find(address)].id
    }

    fn find(&self, address: u16) -> usize {
        // the table is exhaustive, the last device starting at or before
        // `address` owns it
        self.devices
            .partition_point(|device| device.range.start <= address)
            .saturating_sub(1)
    }

    fn resolve(&self, address: u16) -> (&Device, u16) {
        let device = &self.devices[self.find(address)];
        let virtual_address = device.fold.apply(address - device.range.start);
        (device, virtual_address)
    }
}

impl Bus for MainBus {
    fn read(&mut self, address: u16) -> u8 {
        let (device, virtual_address) = self.resolve(address);
        let data = device.device.borrow_mut().read(virtual_address);
        trace!(
            "Bus ({0}) read from: {address:0>4X} <- {data:0>2X} ({1})",
            self.id,
            device.id
        );
        data
    }

    fn write(&mut self, address: u16, data: u8) {
        let (device, virtual_address) = self.resolve(address);
        trace!(
            "Bus ({0}) write to: {address:0>4X} <- {data:0>2X} ({1})",
            self.id,
            device.id
        );
        device.device.borrow_mut().write(virtual_address, data);
    }
}
