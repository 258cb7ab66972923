// This file is part of vectra.
// Copyright (c) 2020-2024 vectra contributors. All rights reserved.
// Licensed under the GPLv3. See LICENSE file in the project root for full license text.

// Spec: GI AY-3-8910 PROGRAMMABLE SOUND GENERATOR Datasheet
// Design:
//   The register file is driven through the chip's bus protocol: BDIR/BC2/
//   BC1 select an action on the shared data bus each cycle. On the Vectrex
//   the data bus is the VIA's port A, BC1 and BDIR come from port B bits 3
//   and 4, and BC2 is strapped high. A register read (DTS) drives the
//   value back onto the bus latch the VIA's port A input sees. Sample
//   generation is independent of the bus and pulls samples out of the
//   channel/noise/envelope state at the host rate.

use crate::util::SharedCell;

use super::envelope::Envelope;
use super::noise::Noise;
use super::tone::ToneChannel;

pub mod reg {
    pub const A_FINE: u8 = 0x00;
    pub const A_COARSE: u8 = 0x01;
    pub const B_FINE: u8 = 0x02;
    pub const B_COARSE: u8 = 0x03;
    pub const C_FINE: u8 = 0x04;
    pub const C_COARSE: u8 = 0x05;
    pub const NOISE: u8 = 0x06;
    pub const MIXER: u8 = 0x07;
    pub const A_AMPL: u8 = 0x08;
    pub const B_AMPL: u8 = 0x09;
    pub const C_AMPL: u8 = 0x0a;
    pub const ENV_FINE: u8 = 0x0b;
    pub const ENV_COARSE: u8 = 0x0c;
    pub const ENV_CTRL: u8 = 0x0d;
    pub const PORTA: u8 = 0x0e;
    pub const PORTB: u8 = 0x0f;
}

// Bus control states, (BDIR << 2) | (BC2 << 1) | BC1. Addresses are octal
// in the documentation.
mod bus {
    pub const NACT: u8 = 0;
    pub const LATCH_ADDR: u8 = 1;
    pub const IAB: u8 = 2;
    pub const DTS: u8 = 3;
    pub const LATCH_BAR: u8 = 4;
    pub const DW: u8 = 5;
    pub const DWS: u8 = 6;
    pub const LATCH_INTAK: u8 = 7;
}

pub struct Ay38910 {
    regs: [u8; 16],
    addr: u8,
    channel_a: ToneChannel,
    channel_b: ToneChannel,
    channel_c: ToneChannel,
    noise: Noise,
    envelope: Envelope,
    // I/O
    io_input: SharedCell<u8>,
    bus_latch: SharedCell<u8>,
    // debug mutes
    pub channel_a_on: bool,
    pub channel_b_on: bool,
    pub channel_c_on: bool,
}

impl Ay38910 {
    pub fn new(sample_rate: u32, io_input: SharedCell<u8>, bus_latch: SharedCell<u8>) -> Self {
        Self {
            regs: [0; 16],
            addr: 0,
            channel_a: ToneChannel::new(sample_rate),
            channel_b: ToneChannel::new(sample_rate),
            channel_c: ToneChannel::new(sample_rate),
            noise: Noise::new(sample_rate),
            envelope: Envelope::new(sample_rate),
            io_input,
            bus_latch,
            channel_a_on: true,
            channel_b_on: true,
            channel_c_on: true,
        }
    }

    /// One bus transaction, called once per CPU cycle.
    pub fn bus_step(&mut self, data: u8, bc1: bool, bc2: bool, bdir: bool) {
        let state = (bdir as u8) << 2 | (bc2 as u8) << 1 | bc1 as u8;
        match state {
            bus::NACT | bus::IAB | bus::DW => {}
            bus::LATCH_ADDR | bus::LATCH_BAR | bus::LATCH_INTAK => {
                self.addr = data & 0x0f;
            }
            bus::DWS => {
                self.write(self.addr, data);
            }
            bus::DTS => {
                let value = if self.addr == reg::PORTA {
                    self.io_input.get()
                } else {
                    self.regs[self.addr as usize]
                };
                self.bus_latch.set(value);
            }
            _ => {}
        }
    }

    pub fn write(&mut self, register: u8, value: u8) {
        if log_enabled!(log::Level::Trace) {
            trace!(target: "psg::reg", "Write 0x{:02x} = 0x{:02x}", register, value);
        }
        self.regs[(register & 0x0f) as usize] = value;
        match register & 0x0f {
            reg::A_FINE | reg::A_COARSE => {
                self.channel_a
                    .set_period(self.regs[reg::A_COARSE as usize], self.regs[reg::A_FINE as usize]);
            }
            reg::B_FINE | reg::B_COARSE => {
                self.channel_b
                    .set_period(self.regs[reg::B_COARSE as usize], self.regs[reg::B_FINE as usize]);
            }
            reg::C_FINE | reg::C_COARSE => {
                self.channel_c
                    .set_period(self.regs[reg::C_COARSE as usize], self.regs[reg::C_FINE as usize]);
            }
            reg::NOISE => {
                self.noise.set_period(value & 0x1f);
            }
            reg::MIXER => {
                self.channel_a.enabled = value & 0x01 == 0;
                self.channel_b.enabled = value & 0x02 == 0;
                self.channel_c.enabled = value & 0x04 == 0;
                self.channel_a.noise_enabled = value & 0x08 == 0;
                self.channel_b.noise_enabled = value & 0x10 == 0;
                self.channel_c.noise_enabled = value & 0x20 == 0;
            }
            reg::A_AMPL => {
                self.channel_a.amplitude_mode = value & 0x10 != 0;
                self.channel_a.amplitude_fixed = value & 0x0f;
            }
            reg::B_AMPL => {
                self.channel_b.amplitude_mode = value & 0x10 != 0;
                self.channel_b.amplitude_fixed = value & 0x0f;
            }
            reg::C_AMPL => {
                self.channel_c.amplitude_mode = value & 0x10 != 0;
                self.channel_c.amplitude_fixed = value & 0x0f;
            }
            reg::ENV_FINE | reg::ENV_COARSE => {
                self.envelope.set_period(
                    self.regs[reg::ENV_COARSE as usize],
                    self.regs[reg::ENV_FINE as usize],
                );
            }
            reg::ENV_CTRL => {
                self.envelope.set_control(value & 0x0f);
            }
            _ => {}
        }
    }

    pub fn read_register(&self, register: u8) -> u8 {
        self.regs[(register & 0x0f) as usize]
    }

    /// Generate unsigned 8-bit mono samples; the three channels are
    /// averaged and the high byte of the mix is taken.
    pub fn fill_buffer(&mut self, buffer: &mut [u8]) {
        for sample in buffer.iter_mut() {
            let noise = self.noise.step();
            let envelope = self.envelope.step();
            let a = self.channel_a.step(noise, envelope);
            let b = self.channel_b.step(noise, envelope);
            let c = self.channel_c.step(noise, envelope);
            let mix = (if self.channel_a_on { a as i32 } else { 0 })
                + (if self.channel_b_on { b as i32 } else { 0 })
                + (if self.channel_c_on { c as i32 } else { 0 });
            *sample = ((mix / 3) as u16 >> 8) as u8;
        }
    }

    pub fn reset(&mut self) {
        self.regs = [0; 16];
        self.addr = 0;
        self.channel_a.reset();
        self.channel_b.reset();
        self.channel_c.reset();
        self.noise.reset();
        self.envelope.reset();
        self.bus_latch.set(0);
    }
}
