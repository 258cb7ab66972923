// This file is part of vectra.
// Copyright (c) 2020-2024 vectra contributors. All rights reserved.
// Licensed under the GPLv3. See LICENSE file in the project root for full license text.

// Memory map:
//   0000-7fff  cartridge ROM (PB6 selects the upper bank on 64K images)
//   8000-c7ff  unmapped, reads return 0
//   c800-cfff  1K RAM, mirrored within the window
//   d000-d7ff  VIA registers, low nibble selects the register
//   d800-dfff  write-only "both" region: RAM and VIA take the write
//   e000-ffff  system ROM; the vectors live at its top

use crate::device::Cartridge;
use crate::factory::{Addressable, Chip};
use crate::io::Via6522;
use crate::util::{Ram, Rom, Shared};

pub struct Memory {
    cartridge: Shared<Cartridge>,
    ram: Shared<Ram>,
    sysrom: Shared<Rom>,
    via: Shared<Via6522>,
}

impl Memory {
    pub fn new(
        cartridge: Shared<Cartridge>,
        ram: Shared<Ram>,
        sysrom: Shared<Rom>,
        via: Shared<Via6522>,
    ) -> Self {
        Self {
            cartridge,
            ram,
            sysrom,
            via,
        }
    }
}

impl Addressable for Memory {
    fn read(&self, address: u16) -> u8 {
        if address < 0x8000 {
            let pb6 = self.via.borrow().port_b_bus() & 0x40 != 0;
            self.cartridge.borrow().read(address, pb6)
        } else if address >= 0xe000 {
            self.sysrom.borrow().read(address)
        } else if address >= 0xc800 {
            if address < 0xd000 {
                self.ram.borrow().read(address & 0x03ff)
            } else if address < 0xd800 {
                self.via.borrow_mut().read((address & 0x0f) as u8)
            } else {
                // d800-dfff is write-only
                0x00
            }
        } else {
            0x00
        }
    }

    fn write(&mut self, address: u16, value: u8) {
        if address < 0x8000 || address >= 0xe000 {
            // ROM, writes are dropped
        } else if address >= 0xc800 {
            if address & 0x0800 != 0 {
                self.ram.borrow_mut().write(address & 0x03ff, value);
            }
            if address & 0x1000 != 0 {
                self.via.borrow_mut().write((address & 0x0f) as u8, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::via6522::reg;
    use crate::util::{new_shared, IoPort, IrqLine};

    fn setup_memory() -> Memory {
        let cartridge = new_shared(Cartridge::new());
        cartridge.borrow_mut().load(&[0xde; 0x100]);
        let ram = new_shared(Ram::new(0x400));
        let sysrom = new_shared(Rom::new(0x2000, 0xe000, 0x12));
        let port_a = new_shared(IoPort::new(0x00, 0x00));
        let port_b = new_shared(IoPort::new(0x00, 0x00));
        let irq_line = new_shared(IrqLine::new("irq"));
        let via = new_shared(Via6522::new(port_a, port_b, irq_line));
        Memory::new(cartridge, ram, sysrom, via)
    }

    #[test]
    fn read_cartridge() {
        let mem = setup_memory();
        assert_eq!(0xde, mem.read(0x0000));
        assert_eq!(0xde, mem.read(0x00ff));
    }

    #[test]
    fn read_unmapped_returns_zero() {
        let mem = setup_memory();
        assert_eq!(0x00, mem.read(0x8000));
        assert_eq!(0x00, mem.read(0xc7ff));
    }

    #[test]
    fn ram_mirrors_within_window() {
        let mut mem = setup_memory();
        mem.write(0xc800, 0x55);
        assert_eq!(0x55, mem.read(0xc800));
        assert_eq!(0x55, mem.read(0xcc00));
    }

    #[test]
    fn via_window_selects_low_nibble() {
        let mut mem = setup_memory();
        mem.write(0xd000 | reg::DDRA as u16, 0xf0);
        assert_eq!(0xf0, mem.read(0xd000 | reg::DDRA as u16));
        assert_eq!(0xf0, mem.read(0xd010 | reg::DDRA as u16));
    }

    #[test]
    fn write_both_region_hits_ram_and_via() {
        let mut mem = setup_memory();
        mem.write(0xd800 | reg::DDRB as u16, 0x3c);
        assert_eq!(0x3c, mem.read(0xd000 | reg::DDRB as u16));
        assert_eq!(0x3c, mem.read(0xc800 | (reg::DDRB as u16 & 0x03ff)));
        // and reads from the region return nothing
        assert_eq!(0x00, mem.read(0xd800));
    }

    #[test]
    fn rom_writes_are_dropped() {
        let mut mem = setup_memory();
        mem.write(0x0000, 0x99);
        assert_eq!(0xde, mem.read(0x0000));
        mem.write(0xe000, 0x99);
        assert_eq!(0x12, mem.read(0xe000));
    }

    #[test]
    fn sysrom_holds_vectors() {
        let mem = setup_memory();
        assert_eq!(0x12, mem.read(0xfffe));
        assert_eq!(0x12, mem.read(0xffff));
    }
}
