// This file is part of vectra.
// Copyright (c) 2020-2024 vectra contributors. All rights reserved.
// Licensed under the GPLv3. See LICENSE file in the project root for full license text.

// Spec: MOS 6522 VERSATILE INTERFACE ADAPTER Datasheet
// Spec: http://archive.6502.org/datasheets/mos_6522.pdf
// Design:
//   The VIA owns the two I/O ports, two timers, the shift register and the
//   four control lines. The CPU sees sixteen registers through read/write;
//   everything else in the machine (DAC, PSG, vector generator) samples
//   the port output states and the CA2/CB2 line states once per cycle.
//   The interrupt flag register mirrors onto a shared IRQ line after every
//   mutation, so IFR bit 7 always equals (IFR & IER & 0x7f) != 0.

use crate::factory::Chip;
use crate::util::{DelayQueue, IoPort, IrqLine, Shared};

pub mod reg {
    pub const ORB: u8 = 0x00;
    pub const ORA: u8 = 0x01;
    pub const DDRB: u8 = 0x02;
    pub const DDRA: u8 = 0x03;
    pub const T1CL: u8 = 0x04;
    pub const T1CH: u8 = 0x05;
    pub const T1LL: u8 = 0x06;
    pub const T1LH: u8 = 0x07;
    pub const T2CL: u8 = 0x08;
    pub const T2CH: u8 = 0x09;
    pub const SR: u8 = 0x0a;
    pub const ACR: u8 = 0x0b;
    pub const PCR: u8 = 0x0c;
    pub const IFR: u8 = 0x0d;
    pub const IER: u8 = 0x0e;
    pub const ORA_NO_HANDSHAKE: u8 = 0x0f;
}

/// Interrupt flag bits, in IFR order.
pub mod int {
    pub const CA2: u8 = 0x01;
    pub const CA1: u8 = 0x02;
    pub const SR: u8 = 0x04;
    pub const CB2: u8 = 0x08;
    pub const CB1: u8 = 0x10;
    pub const TIMER2: u8 = 0x20;
    pub const TIMER1: u8 = 0x40;
    pub const IRQ: u8 = 0x80;
}

mod acr {
    pub const PA_LATCH: u8 = 0x01;
    pub const PB_LATCH: u8 = 0x02;
    pub const SR_MASK: u8 = 0x1c;
    pub const SR_DISABLED: u8 = 0x00;
    pub const SR_IN_T2: u8 = 0x04;
    pub const SR_IN_O2: u8 = 0x08;
    pub const SR_IN_EXT: u8 = 0x0c;
    pub const SR_OUT_T2_FREE: u8 = 0x10;
    pub const SR_OUT_T2: u8 = 0x14;
    pub const SR_OUT_O2: u8 = 0x18;
    pub const SR_OUT_EXT: u8 = 0x1c;
    // bit 4 is the shift direction, bits 3-2 the clock source
    pub const SR_OUT: u8 = 0x10;
    pub const T2_PULSE_PB6: u8 = 0x20;
    pub const T1_CONTINUOUS: u8 = 0x40;
    pub const T1_PB7: u8 = 0x80;
}

mod pcr {
    pub const CA1_POS: u8 = 0x01;
    pub const CA2_MASK: u8 = 0x0e;
    pub const CA2_OUTPUT: u8 = 0x08;
    pub const CA2_IN_POS: u8 = 0x04;
    pub const CA2_OUT_HANDSHAKE: u8 = 0x08;
    pub const CA2_OUT_PULSE: u8 = 0x0a;
    pub const CA2_OUT_LOW: u8 = 0x0c;
    pub const CB1_POS: u8 = 0x10;
    pub const CB2_MASK: u8 = 0xe0;
    pub const CB2_OUTPUT: u8 = 0x80;
    pub const CB2_IN_POS: u8 = 0x40;
    pub const CB2_OUT_HANDSHAKE: u8 = 0x80;
    pub const CB2_OUT_PULSE: u8 = 0xa0;
    pub const CB2_OUT_LOW: u8 = 0xc0;
}

struct Timer {
    counter: u16,
    enabled: bool,
    one_shot_fired: bool,
}

impl Timer {
    fn new() -> Self {
        Self {
            counter: 0,
            enabled: false,
            one_shot_fired: false,
        }
    }

    fn reset(&mut self) {
        self.counter = 0;
        self.enabled = false;
        self.one_shot_fired = false;
    }
}

struct ShiftRegister {
    bits_shifted: u8,
    sub_counter: u8,
    enabled: bool,
}

impl ShiftRegister {
    fn new() -> Self {
        Self {
            bits_shifted: 0,
            sub_counter: 0,
            enabled: false,
        }
    }

    fn reset(&mut self) {
        self.bits_shifted = 0;
        self.sub_counter = 0;
        self.enabled = false;
    }
}

#[derive(Copy, Clone)]
enum Signal {
    Ca2High,
    Cb2High,
}

/// Read-only view for the debugger.
#[derive(Copy, Clone, Debug)]
pub struct ViaState {
    pub ora: u8,
    pub orb: u8,
    pub ddra: u8,
    pub ddrb: u8,
    pub t1_counter: u16,
    pub t1_latch: u16,
    pub t2_counter: u16,
    pub sr: u8,
    pub acr: u8,
    pub pcr: u8,
    pub ifr: u8,
    pub ier: u8,
    pub ca1: bool,
    pub ca2: bool,
    pub cb1: bool,
    pub cb2: bool,
}

pub struct Via6522 {
    // latches and mode registers
    t1ll: u8,
    t1lh: u8,
    t2cl: u8,
    t2ch: u8,
    sr: u8,
    acr: u8,
    pcr: u8,
    ifr: u8,
    ier: u8,
    // Functional Units
    timer1: Timer,
    timer2: Timer,
    shifter: ShiftRegister,
    pb7: u8,
    ira_latch: u8,
    irb_latch: u8,
    // control lines; cb1/cb2 carry a pin state and a shift-register state
    ca1: bool,
    ca2: bool,
    cb1: bool,
    cb2: bool,
    cb1_sr: bool,
    cb2_sr: bool,
    // Runtime State
    clk: u64,
    delayed: DelayQueue<Signal>,
    // I/O
    port_a: Shared<IoPort>,
    port_b: Shared<IoPort>,
    irq_line: Shared<IrqLine>,
}

impl Via6522 {
    pub fn new(
        port_a: Shared<IoPort>,
        port_b: Shared<IoPort>,
        irq_line: Shared<IrqLine>,
    ) -> Self {
        Self {
            t1ll: 0,
            t1lh: 0,
            t2cl: 0,
            t2ch: 0,
            sr: 0,
            acr: 0,
            pcr: 0,
            ifr: 0,
            ier: 0,
            timer1: Timer::new(),
            timer2: Timer::new(),
            shifter: ShiftRegister::new(),
            pb7: 0x80,
            ira_latch: 0,
            irb_latch: 0,
            ca1: false,
            ca2: true,
            cb1: false,
            cb2: true,
            cb1_sr: false,
            cb2_sr: false,
            clk: 0,
            delayed: DelayQueue::new(),
            port_a,
            port_b,
            irq_line,
        }
    }

    // -- Interrupt logic

    fn update_ifr(&mut self) {
        if self.ifr & self.ier & 0x7f != 0 {
            self.ifr |= int::IRQ;
        } else {
            self.ifr &= !int::IRQ;
        }
        self.irq_line
            .borrow_mut()
            .set_low(0, self.ifr & int::IRQ != 0);
    }

    fn set_ifr(&mut self, bits: u8, state: bool) {
        if state {
            self.ifr |= bits & !int::IRQ;
        } else {
            self.ifr &= !(bits & !int::IRQ);
        }
        self.update_ifr();
    }

    /// The IRQ line the CPU samples.
    pub fn get_irq(&self) -> bool {
        self.ifr & int::IRQ != 0
    }

    // -- Port states seen by the rest of the machine (output registers,
    // with the timer PB7 override; the data bus does not go through DDR)

    pub fn port_a_bus(&self) -> u8 {
        self.port_a.borrow().get_output()
    }

    pub fn port_b_bus(&self) -> u8 {
        let orb = self.port_b.borrow().get_output();
        if self.acr & acr::T1_PB7 != 0 {
            (orb & 0x7f) | self.pb7
        } else {
            orb
        }
    }

    pub fn ca2_out(&self) -> bool {
        self.ca2
    }

    /// CB1 collapses to the shift-register driven state unless the shift
    /// clock is external.
    pub fn cb1_out(&self) -> bool {
        if self.acr & acr::SR_MASK == acr::SR_IN_EXT
            || self.acr & acr::SR_MASK == acr::SR_OUT_EXT
        {
            self.cb1
        } else {
            self.cb1_sr
        }
    }

    /// CB2 collapses to the shift-register output when shifting out.
    pub fn cb2_out(&self) -> bool {
        if self.acr & acr::SR_OUT != 0 {
            self.cb2_sr
        } else {
            self.cb2
        }
    }

    // -- External control-line inputs

    pub fn set_ca1(&mut self, state: bool) {
        let active = if self.pcr & pcr::CA1_POS != 0 {
            !self.ca1 && state
        } else {
            self.ca1 && !state
        };
        if active {
            self.set_ifr(int::CA1, true);
            if self.acr & acr::PA_LATCH != 0 {
                self.ira_latch = self.port_a.borrow().get_input();
            }
        }
        self.ca1 = state;
    }

    pub fn set_cb1(&mut self, state: bool) {
        let active = if self.pcr & pcr::CB1_POS != 0 {
            !self.cb1 && state
        } else {
            self.cb1 && !state
        };
        if active {
            self.set_ifr(int::CB1, true);
            if self.acr & acr::PB_LATCH != 0 {
                self.irb_latch = self.port_b.borrow().get_input();
            }
        }
        self.cb1 = state;
    }

    pub fn set_ca2(&mut self, state: bool) {
        if self.pcr & pcr::CA2_OUTPUT == 0 {
            let active = if self.pcr & pcr::CA2_IN_POS != 0 {
                !self.ca2 && state
            } else {
                self.ca2 && !state
            };
            if active {
                self.set_ifr(int::CA2, true);
            }
            self.ca2 = state;
        }
    }

    pub fn set_cb2(&mut self, state: bool) {
        if self.pcr & pcr::CB2_OUTPUT == 0 {
            let active = if self.pcr & pcr::CB2_IN_POS != 0 {
                !self.cb2 && state
            } else {
                self.cb2 && !state
            };
            if active {
                self.set_ifr(int::CB2, true);
            }
            self.cb2 = state;
        }
    }

    // -- CPU-visible port reads

    fn read_port_a(&self) -> u8 {
        let port = self.port_a.borrow();
        let output = port.get_output() & port.get_direction();
        let input = if self.acr & acr::PA_LATCH != 0 {
            self.ira_latch
        } else {
            port.get_input()
        };
        output | (input & !port.get_direction())
    }

    fn read_port_b(&self) -> u8 {
        let port = self.port_b.borrow();
        let mut output = port.get_output();
        if self.acr & acr::T1_PB7 != 0 {
            output = (output & 0x7f) | self.pb7;
        }
        output &= port.get_direction();
        let input = if self.acr & acr::PB_LATCH != 0 {
            self.irb_latch
        } else {
            port.get_input()
        };
        output | (input & !port.get_direction())
    }

    fn ca2_is_handshake(&self) -> bool {
        let mode = self.pcr & pcr::CA2_MASK;
        mode == pcr::CA2_OUT_HANDSHAKE || mode == pcr::CA2_OUT_PULSE
    }

    fn cb2_is_handshake(&self) -> bool {
        let mode = self.pcr & pcr::CB2_MASK;
        mode == pcr::CB2_OUT_HANDSHAKE || mode == pcr::CB2_OUT_PULSE
    }

    // -- Shift register

    fn shift(&mut self, edge: bool) {
        if self.shifter.enabled {
            if !self.cb1_sr && edge {
                if self.acr & acr::SR_MASK != acr::SR_OUT_T2_FREE {
                    self.shifter.bits_shifted += 1;
                }
                if self.acr & acr::SR_OUT != 0 {
                    // the bit rotated out becomes the internal CB2 state
                    self.cb2_sr = self.sr & 0x80 != 0;
                    self.sr = self.sr.rotate_left(1);
                } else {
                    // shift in CB2, or 0 when CB2 is driven by the VIA
                    let bit = if self.pcr & pcr::CB2_OUTPUT != 0 {
                        false
                    } else {
                        self.cb2
                    };
                    self.sr = (self.sr << 1) | bit as u8;
                }
                if self.shifter.bits_shifted == 8 {
                    self.set_ifr(int::SR, true);
                    self.shifter.enabled = false;
                }
            }
            self.cb1_sr = edge;
        }
    }

    pub fn state(&self) -> ViaState {
        ViaState {
            ora: self.port_a.borrow().get_output(),
            orb: self.port_b.borrow().get_output(),
            ddra: self.port_a.borrow().get_direction(),
            ddrb: self.port_b.borrow().get_direction(),
            t1_counter: self.timer1.counter,
            t1_latch: ((self.t1lh as u16) << 8) | self.t1ll as u16,
            t2_counter: self.timer2.counter,
            sr: self.sr,
            acr: self.acr,
            pcr: self.pcr,
            ifr: self.ifr,
            ier: self.ier,
            ca1: self.ca1,
            ca2: self.ca2_out(),
            cb1: self.cb1_out(),
            cb2: self.cb2_out(),
        }
    }
}

impl Chip for Via6522 {
    fn clock(&mut self) {
        // delayed line restores take effect first
        for signal in self.delayed.tick(self.clk) {
            match signal {
                Signal::Ca2High => self.ca2 = true,
                Signal::Cb2High => self.cb2 = true,
            }
        }

        // Timer 1 free-runs; the interrupt fires on every underflow in
        // continuous mode and once in one-shot mode
        if self.timer1.enabled {
            self.timer1.counter = self.timer1.counter.wrapping_sub(1);
            if self.timer1.counter == 0xffff {
                if self.acr & acr::T1_CONTINUOUS != 0 {
                    self.set_ifr(int::TIMER1, true);
                    if self.acr & acr::T1_PB7 != 0 {
                        self.pb7 ^= 0x80;
                    }
                    self.timer1.counter = ((self.t1lh as u16) << 8) | self.t1ll as u16;
                } else if !self.timer1.one_shot_fired {
                    self.set_ifr(int::TIMER1, true);
                    if self.acr & acr::T1_PB7 != 0 {
                        // restore PB7, it went low when T1C-H was written
                        self.pb7 = 0x80;
                    }
                    self.timer1.one_shot_fired = true;
                }
            }
        }

        // Timer 2 counts in timed mode only; PB6 pulse counting is not
        // wired on this machine
        if self.timer2.enabled && self.acr & acr::T2_PULSE_PB6 == 0 {
            self.timer2.counter = self.timer2.counter.wrapping_sub(1);
            if self.timer2.counter == 0xffff && !self.timer2.one_shot_fired {
                self.set_ifr(int::TIMER2, true);
                self.timer2.one_shot_fired = true;
            }
        }

        // Shift register clocking
        match self.acr & acr::SR_MASK {
            acr::SR_DISABLED | acr::SR_IN_EXT | acr::SR_OUT_EXT => {
                // CB1 is an external input in these modes
            }
            acr::SR_IN_T2 | acr::SR_OUT_T2 | acr::SR_OUT_T2_FREE => {
                if self.shifter.sub_counter == 0 {
                    let edge = !self.cb1_sr;
                    self.shift(edge);
                }
            }
            acr::SR_IN_O2 | acr::SR_OUT_O2 => {
                let edge = !self.cb1_sr;
                self.shift(edge);
            }
            _ => {}
        }
        self.shifter.sub_counter = self.shifter.sub_counter.wrapping_sub(1);
        if self.shifter.sub_counter == 0xff {
            self.shifter.sub_counter = self.t2cl;
        }

        // pulse-mode handshakes restore their line on the next cycle
        if self.pcr & pcr::CA2_MASK == pcr::CA2_OUT_PULSE {
            self.delayed.enqueue(self.clk + 1, Signal::Ca2High);
        }
        if self.pcr & pcr::CB2_MASK == pcr::CB2_OUT_PULSE {
            self.delayed.enqueue(self.clk + 1, Signal::Cb2High);
        }

        self.clk += 1;
    }

    fn clock_delta(&mut self, delta: u32) {
        for _ in 0..delta {
            self.clock();
        }
    }

    fn reset(&mut self) {
        self.t1ll = 0;
        self.t1lh = 0;
        self.t2cl = 0;
        self.t2ch = 0;
        self.sr = 0;
        self.acr = 0;
        self.pcr = 0;
        self.ifr = 0;
        self.ier = 0;
        self.timer1.reset();
        self.timer2.reset();
        self.shifter.reset();
        self.pb7 = 0x80;
        self.ira_latch = 0;
        self.irb_latch = 0;
        self.ca1 = false;
        self.ca2 = true;
        self.cb1 = false;
        self.cb2 = true;
        self.cb1_sr = false;
        self.cb2_sr = false;
        self.clk = 0;
        self.delayed.clear();
        self.port_a.borrow_mut().reset();
        self.port_b.borrow_mut().reset();
        self.irq_line.borrow_mut().set_low(0, false);
    }

    // I/O

    fn read(&mut self, reg: u8) -> u8 {
        let value = match reg & 0x0f {
            reg::ORB => self.read_port_b(),
            reg::ORA => {
                // "data taken" handshake
                if self.ca2_is_handshake() {
                    self.ca2 = false;
                }
                self.read_port_a()
            }
            reg::ORA_NO_HANDSHAKE => self.read_port_a(),
            reg::T1CL => {
                self.timer1.enabled = false;
                if self.acr & acr::T1_PB7 != 0 {
                    self.pb7 = 0x80;
                }
                self.set_ifr(int::TIMER1, false);
                self.timer1.counter as u8
            }
            reg::T1CH => (self.timer1.counter >> 8) as u8,
            reg::T1LL => self.t1ll,
            reg::T1LH => self.t1lh,
            reg::T2CL => {
                self.timer2.enabled = false;
                self.set_ifr(int::TIMER2, false);
                self.timer2.counter as u8
            }
            reg::T2CH => (self.timer2.counter >> 8) as u8,
            reg::SR => {
                self.set_ifr(int::SR, false);
                self.shifter.bits_shifted = 0;
                self.shifter.enabled = true;
                self.sr
            }
            reg::DDRB => self.port_b.borrow().get_direction(),
            reg::DDRA => self.port_a.borrow().get_direction(),
            reg::ACR => self.acr,
            reg::PCR => self.pcr,
            reg::IFR => self.ifr,
            reg::IER => self.ier | int::IRQ,
            _ => 0,
        };
        if log_enabled!(log::Level::Trace) {
            trace!(target: "via::reg", "Read 0x{:02x} = 0x{:02x}", reg, value);
        }
        value
    }

    fn write(&mut self, reg: u8, value: u8) {
        if log_enabled!(log::Level::Trace) {
            trace!(target: "via::reg", "Write 0x{:02x} = 0x{:02x}", reg, value);
        }
        match reg & 0x0f {
            reg::ORB => {
                // CB1/CB2 handshake on a write operation only
                if self.cb2_is_handshake() {
                    self.cb2 = false;
                }
                self.port_b.borrow_mut().set_value(value);
            }
            reg::ORA => {
                if self.ca2_is_handshake() {
                    self.ca2 = true;
                }
                self.port_a.borrow_mut().set_value(value);
            }
            reg::ORA_NO_HANDSHAKE => {
                self.port_a.borrow_mut().set_value(value);
            }
            reg::DDRB => {
                self.port_b.borrow_mut().set_direction(value);
            }
            reg::DDRA => {
                self.port_a.borrow_mut().set_direction(value);
            }
            reg::T1CL | reg::T1LL => {
                self.t1ll = value;
            }
            reg::T1CH => {
                self.t1lh = value;
                self.timer1.counter = ((self.t1lh as u16) << 8) | self.t1ll as u16;
                self.timer1.enabled = true;
                self.timer1.one_shot_fired = false;
                if self.acr & acr::T1_PB7 != 0 {
                    self.pb7 = 0;
                }
                self.set_ifr(int::TIMER1, false);
            }
            reg::T1LH => {
                self.t1lh = value;
            }
            reg::T2CL => {
                self.t2cl = value;
            }
            reg::T2CH => {
                self.t2ch = value;
                self.timer2.counter = ((self.t2ch as u16) << 8) | self.t2cl as u16;
                self.timer2.enabled = true;
                self.timer2.one_shot_fired = false;
                self.set_ifr(int::TIMER2, false);
            }
            reg::SR => {
                self.set_ifr(int::SR, false);
                self.shifter.bits_shifted = 0;
                self.sr = value;
                self.shifter.enabled = true;
            }
            reg::ACR => {
                self.acr = value;
            }
            reg::PCR => {
                self.pcr = value;
                // fixed output levels; every output mode but OUT_LOW is high
                self.ca2 = self.pcr & pcr::CA2_MASK != pcr::CA2_OUT_LOW;
                self.cb2 = self.pcr & pcr::CB2_MASK != pcr::CB2_OUT_LOW;
            }
            reg::IFR => {
                // writing 1s clears the corresponding flags
                self.set_ifr(value, false);
            }
            reg::IER => {
                if value & int::IRQ != 0 {
                    self.ier |= value & !int::IRQ;
                } else {
                    self.ier &= !(value & !int::IRQ);
                }
                self.update_ifr();
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::new_shared;

    fn setup_via() -> Via6522 {
        let port_a = new_shared(IoPort::new(0x00, 0x00));
        let port_b = new_shared(IoPort::new(0x00, 0x00));
        let irq_line = new_shared(IrqLine::new("irq"));
        let mut via = Via6522::new(port_a, port_b, irq_line);
        via.reset();
        via
    }

    #[test]
    fn read_regs_after_reset() {
        let mut via = setup_via();
        assert_eq!(0x00, via.read(reg::ORB));
        assert_eq!(0x00, via.read(reg::ORA));
        assert_eq!(0x00, via.read(reg::DDRA));
        assert_eq!(0x00, via.read(reg::DDRB));
        assert_eq!(0x00, via.read(reg::ACR));
        assert_eq!(0x00, via.read(reg::PCR));
        assert_eq!(0x00, via.read(reg::IFR));
        assert_eq!(0x80, via.read(reg::IER));
    }

    #[test]
    fn port_b_read_merges_by_direction() {
        let mut via = setup_via();
        via.write(reg::DDRB, 0xf0);
        via.write(reg::ORB, 0xaf);
        via.port_b.borrow_mut().set_input(0x05);
        assert_eq!(0xa5, via.read(reg::ORB));
    }

    #[test]
    fn timer1_one_shot_fires_once() {
        let mut via = setup_via();
        via.write(reg::T1CL, 0x02);
        via.write(reg::T1CH, 0x00);
        via.clock();
        via.clock();
        assert_eq!(0, via.read(reg::IFR) & int::TIMER1);
        via.clock();
        assert_eq!(int::TIMER1, via.read(reg::IFR) & int::TIMER1);
        assert!(!via.get_irq());
        // enable the interrupt, the line asserts
        via.write(reg::IER, 0x80 | int::TIMER1);
        assert!(via.get_irq());
        assert!(via.irq_line.borrow().is_low());
        // free-runs without firing again
        via.write(reg::IFR, int::TIMER1);
        via.clock_delta(0x20000);
        assert_eq!(0, via.read(reg::IFR) & int::TIMER1);
    }

    #[test]
    fn timer1_continuous_reloads_and_toggles_pb7() {
        let mut via = setup_via();
        via.write(reg::ACR, 0xc0);
        via.write(reg::T1CL, 0x02);
        via.write(reg::T1CH, 0x00);
        assert_eq!(0x00, via.port_b_bus() & 0x80);
        via.clock();
        via.clock();
        via.clock();
        assert_eq!(int::TIMER1, via.read(reg::IFR) & int::TIMER1);
        assert_eq!(0x80, via.port_b_bus() & 0x80);
        // counter reloaded from the latches
        assert_eq!(0x0002, via.timer1.counter);
        via.write(reg::IFR, int::TIMER1);
        via.clock();
        via.clock();
        via.clock();
        assert_eq!(int::TIMER1, via.read(reg::IFR) & int::TIMER1);
        assert_eq!(0x00, via.port_b_bus() & 0x80);
    }

    #[test]
    fn timer1_read_low_stops_and_clears() {
        let mut via = setup_via();
        via.write(reg::T1CL, 0x10);
        via.write(reg::T1CH, 0x00);
        via.clock_delta(0x20);
        assert_eq!(int::TIMER1, via.ifr & int::TIMER1);
        via.read(reg::T1CL);
        assert_eq!(0, via.ifr & int::TIMER1);
        assert!(!via.timer1.enabled);
    }

    #[test]
    fn timer2_fires_once_in_timed_mode() {
        let mut via = setup_via();
        via.write(reg::T2CL, 0x02);
        via.write(reg::T2CH, 0x00);
        via.clock();
        via.clock();
        assert_eq!(0, via.ifr & int::TIMER2);
        via.clock();
        assert_eq!(int::TIMER2, via.ifr & int::TIMER2);
        via.write(reg::IFR, int::TIMER2);
        via.clock_delta(0x20000);
        assert_eq!(0, via.ifr & int::TIMER2);
    }

    #[test]
    fn timer2_counter_loads_both_bytes() {
        let mut via = setup_via();
        via.write(reg::T2CL, 0x34);
        via.write(reg::T2CH, 0x12);
        assert_eq!(0x1234, via.timer2.counter);
    }

    #[test]
    fn shift_register_interrupts_after_eight_bits() {
        let mut via = setup_via();
        via.write(reg::ACR, 0x18); // shift out under the system clock
        via.write(reg::SR, 0xaa);
        // one bit every second clock, starting on the first
        for _ in 0..14 {
            via.clock();
        }
        assert_eq!(0, via.ifr & int::SR);
        via.clock();
        assert_eq!(int::SR, via.ifr & int::SR);
        assert!(!via.shifter.enabled);
        // rotation preserved the byte
        via.write(reg::IFR, int::SR);
        assert_eq!(0xaa, via.read(reg::SR));
    }

    #[test]
    fn shift_out_drives_cb2() {
        let mut via = setup_via();
        via.write(reg::ACR, 0x18);
        via.write(reg::SR, 0x80);
        via.clock();
        assert_eq!(true, via.cb2_out());
        via.write(reg::SR, 0x00);
        via.clock();
        via.clock();
        assert_eq!(false, via.cb2_out());
    }

    #[test]
    fn ifr_write_clears_flags() {
        let mut via = setup_via();
        via.write(reg::T2CL, 0x01);
        via.write(reg::T2CH, 0x00);
        via.clock();
        via.clock();
        assert_eq!(int::TIMER2, via.ifr & int::TIMER2);
        via.write(reg::IFR, int::TIMER2);
        assert_eq!(0, via.ifr & int::TIMER2);
    }

    #[test]
    fn ier_set_and_clear() {
        let mut via = setup_via();
        via.write(reg::IER, 0x80 | int::TIMER1 | int::TIMER2);
        assert_eq!(int::TIMER1 | int::TIMER2, via.ier);
        via.write(reg::IER, int::TIMER2);
        assert_eq!(int::TIMER1, via.ier);
        assert_eq!(0x80 | int::TIMER1, via.read(reg::IER));
    }

    #[test]
    fn irq_follows_ifr_and_ier() {
        let mut via = setup_via();
        via.write(reg::IER, 0x80 | int::TIMER1);
        via.write(reg::T1CL, 0x01);
        via.write(reg::T1CH, 0x00);
        via.clock();
        via.clock();
        assert!(via.get_irq());
        assert_eq!(int::IRQ, via.read(reg::IFR) & int::IRQ);
        // reading T1C-L clears it
        via.read(reg::T1CL);
        assert!(!via.get_irq());
        assert!(!via.irq_line.borrow().is_low());
    }

    #[test]
    fn ora_handshake_drops_ca2_until_next_cycle_in_pulse_mode() {
        let mut via = setup_via();
        via.write(reg::PCR, 0x0a); // CA2 pulse output
        assert!(via.ca2_out());
        via.read(reg::ORA);
        assert!(!via.ca2_out());
        via.clock();
        via.clock();
        assert!(via.ca2_out());
    }

    #[test]
    fn ora_no_handshake_leaves_ca2_alone() {
        let mut via = setup_via();
        via.write(reg::PCR, 0x0a);
        via.read(reg::ORA_NO_HANDSHAKE);
        assert!(via.ca2_out());
    }

    #[test]
    fn pcr_fixed_output_levels() {
        let mut via = setup_via();
        via.write(reg::PCR, 0xcc); // CA2 low, CB2 low
        assert!(!via.ca2_out());
        assert!(!via.cb2_out());
        via.write(reg::PCR, 0xee); // CA2 high, CB2 high
        assert!(via.ca2_out());
        assert!(via.cb2_out());
    }

    #[test]
    fn ca1_edge_latches_port_a_input() {
        let mut via = setup_via();
        via.write(reg::ACR, 0x01); // PA latch enable
        via.write(reg::PCR, 0x01); // CA1 positive edge
        via.port_a.borrow_mut().set_input(0x5a);
        via.set_ca1(true);
        assert_eq!(int::CA1, via.ifr & int::CA1);
        via.port_a.borrow_mut().set_input(0xff);
        assert_eq!(0x5a, via.read(reg::ORA_NO_HANDSHAKE));
    }
}
