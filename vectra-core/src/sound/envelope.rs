// This file is part of vectra.
// Copyright (c) 2020-2024 vectra contributors. All rights reserved.
// Licensed under the GPLv3. See LICENSE file in the project root for full license text.

use super::PSG_CLOCK;

/// The shared envelope generator: a sixteen-step counter with shape bits
/// continue/attack/alternate/hold. Sixteen sub-cycles make one envelope
/// cycle (the hardware divider is 256, the counter runs at 16x).
pub struct Envelope {
    period: u16,
    velocity: f64,
    ticks: f64,
    counter: u8,
    sub_cycle: u8,
    hold: bool,
    attack: bool,
    alternate: bool,
    cont: bool,
    direction: bool,
    holding: bool,
    sample_rate: f64,
}

impl Envelope {
    pub fn new(sample_rate: u32) -> Self {
        let mut envelope = Self {
            period: 1,
            velocity: 0.0,
            ticks: 0.0,
            counter: 0,
            sub_cycle: 0,
            hold: false,
            attack: false,
            alternate: false,
            cont: false,
            direction: false,
            holding: false,
            sample_rate: sample_rate as f64,
        };
        envelope.set_period(0, 0);
        envelope
    }

    pub fn set_period(&mut self, coarse: u8, fine: u8) {
        self.period = (((coarse as u16) << 8) | fine as u16).max(1);
        let frequency = PSG_CLOCK / (self.period as f64 * 16.0);
        self.velocity = frequency / self.sample_rate;
    }

    /// Shape change restarts the envelope: the direction starts out equal
    /// to the attack bit and holding is cleared.
    pub fn set_control(&mut self, value: u8) {
        self.hold = value & 0x01 != 0;
        self.attack = value & 0x02 != 0;
        self.alternate = value & 0x04 != 0;
        self.cont = value & 0x08 != 0;
        self.direction = self.attack;
        self.holding = false;
    }

    fn step_cycle(&mut self) {
        self.sub_cycle = self.sub_cycle.wrapping_add(1);
        if self.sub_cycle & 0x0f == 0 {
            if self.alternate {
                self.direction = !self.direction;
            }
            if !self.cont {
                self.counter = 0;
            }
            self.holding = self.hold;
        }
    }

    pub fn step(&mut self) -> u8 {
        while self.ticks > 1.0 {
            self.step_cycle();
            if !self.holding {
                if !self.direction && self.counter > 0 {
                    self.counter -= 1;
                } else if self.direction && self.counter < 0x0f {
                    self.counter += 1;
                }
            }
            self.ticks -= 1.0;
        }
        self.ticks += self.velocity;
        self.counter & 0x0f
    }

    pub fn reset(&mut self) {
        self.counter = 0;
        self.sub_cycle = 0;
        self.ticks = 0.0;
        self.set_control(0);
        self.set_period(0, 0);
    }
}
