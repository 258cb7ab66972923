// This file is part of vectra.
// Copyright (c) 2020-2024 vectra contributors. All rights reserved.
// Licensed under the GPLv3. See LICENSE file in the project root for full license text.

// Design:
//   The vector generator consumes the VIA's outputs once per CPU cycle:
//   port A is the DAC value, port B carries the sample/hold switch, the
//   multiplexer select and RAMP, CA2 is ZERO and CB2 is BLANK. The X/Y
//   integrators accumulate the rate while RAMP is active; BLANK edges and
//   rate changes delimit vectors, which land in a log and are rasterized
//   with per-vector intensity decay when a frame is produced. RAMP, ZERO
//   and the integration rates take effect 12 cycles after the VIA changes
//   them, modeled through the delayed-signal queue.

use crate::util::DelayQueue;

use super::frame_buffer::FrameBuffer;

pub const VECTOR_WIDTH: i32 = 33_000;
pub const VECTOR_HEIGHT: i32 = 41_000;

const INTEGRATOR_UPDATE_DELAY: u64 = 12;
/// A full-intensity vector fades out in ~400 000 cycles.
const FADE_PER_CYCLE: f32 = 1.0 / 400_000.0;

#[derive(Copy, Clone, Debug)]
pub struct BeamState {
    pub x: i32,
    pub y: i32,
    pub rate_x: i32,
    pub rate_y: i32,
    pub enabled: bool,
    // sample-and-hold values
    pub x_axis: i32,
    pub y_axis: i32,
    pub offset: i32,
    pub z_axis: i32,
}

#[derive(Copy, Clone, Debug)]
pub struct Vector {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
    pub rate_x: i32,
    pub rate_y: i32,
    pub intensity: f32,
    pub start_cycle: u64,
    pub end_cycle: u64,
}

#[derive(Copy, Clone)]
enum Update {
    RateX(i32),
    RateY(i32),
    Ramp(bool),
    Zero(bool),
}

pub struct VectorGenerator {
    beam: BeamState,
    current: Vector,
    vectors: Vec<Vector>,
    framebuffer: FrameBuffer,
    updates: DelayQueue<Update>,
    ramp: bool,
    zero: bool,
    cycles: u64,
}

impl VectorGenerator {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            beam: BeamState {
                x: VECTOR_WIDTH / 2,
                y: VECTOR_HEIGHT / 2,
                rate_x: 0,
                rate_y: 0,
                enabled: false,
                x_axis: 0,
                y_axis: 0,
                offset: 0,
                z_axis: 0,
            },
            current: Vector {
                x0: 0,
                y0: 0,
                x1: 0,
                y1: 0,
                rate_x: 0,
                rate_y: 0,
                intensity: 0.0,
                start_cycle: 0,
                end_cycle: 0,
            },
            vectors: Vec::new(),
            framebuffer: FrameBuffer::new(width, height),
            updates: DelayQueue::new(),
            ramp: false,
            zero: false,
            cycles: 0,
        }
    }

    /// Consume the VIA outputs for one cycle. `zero` and `blank` are the
    /// CA2 and CB2 line states; RAMP is port B bit 7, active low like the
    /// sample/hold switch on bit 0.
    pub fn step(&mut self, porta: u8, portb: u8, zero: bool, blank: bool) {
        let switch = portb & 0x01 == 0;
        let select = (portb >> 1) & 0x03;

        self.updates.enqueue(
            self.cycles + INTEGRATOR_UPDATE_DELAY,
            Update::Ramp(portb & 0x80 == 0),
        );
        self.updates
            .enqueue(self.cycles + INTEGRATOR_UPDATE_DELAY, Update::Zero(!zero));

        // the X axis sample-and-hold has no enable, PORTA always feeds it
        self.beam.x_axis = (porta ^ 0x80) as i32;
        if switch {
            match select {
                0 => self.beam.y_axis = (porta ^ 0x80) as i32,
                1 => self.beam.offset = (porta ^ 0x80) as i32,
                2 => self.beam.z_axis = if porta > 128 { 0 } else { porta as i32 },
                _ => {}
            }
        }

        self.updates.enqueue(
            self.cycles + INTEGRATOR_UPDATE_DELAY,
            Update::RateX(self.beam.x_axis - self.beam.offset),
        );
        self.updates.enqueue(
            self.cycles + INTEGRATOR_UPDATE_DELAY,
            Update::RateY(self.beam.offset - self.beam.y_axis),
        );

        for update in self.updates.tick(self.cycles) {
            match update {
                Update::RateX(rate) => self.beam.rate_x = rate,
                Update::RateY(rate) => self.beam.rate_y = rate,
                Update::Ramp(active) => self.ramp = active,
                Update::Zero(active) => self.zero = active,
            }
        }

        if !self.beam.enabled {
            if blank {
                self.beam.enabled = true;
                self.start_vector();
            }
        } else if !blank {
            // beam turned off, the vector is finished
            self.beam.enabled = false;
            self.close_vector();
        } else if self.current.rate_x != self.beam.rate_x
            || self.current.rate_y != self.beam.rate_y
        {
            // the rates changed mid-vector, split it
            self.close_vector();
            self.start_vector();
        }

        if self.ramp {
            self.beam.x += self.beam.rate_x;
            self.beam.y += self.beam.rate_y;
            self.current.x1 = self.beam.x;
            self.current.y1 = self.beam.y;
        }
        if self.zero {
            self.center_beam();
        }

        self.cycles += 1;
    }

    fn start_vector(&mut self) {
        self.current = Vector {
            x0: self.beam.x,
            y0: self.beam.y,
            x1: self.beam.x,
            y1: self.beam.y,
            rate_x: self.beam.rate_x,
            rate_y: self.beam.rate_y,
            intensity: self.beam.z_axis as f32 / 128.0,
            start_cycle: self.cycles,
            end_cycle: self.cycles,
        };
    }

    fn close_vector(&mut self) {
        self.current.x1 = self.beam.x;
        self.current.y1 = self.beam.y;
        self.current.end_cycle = self.cycles;
        if self.current.end_cycle > self.current.start_cycle {
            self.vectors.push(self.current);
        }
    }

    fn center_beam(&mut self) {
        self.beam.x = VECTOR_WIDTH / 2;
        self.beam.y = VECTOR_HEIGHT / 2;
    }

    /// Rasterize the vector log into the framebuffer, decaying each
    /// vector's intensity and dropping the ones that have faded out.
    pub fn produce_frame(&mut self) {
        let (width, height) = self.framebuffer.get_dimension();
        self.framebuffer.clear();
        let now = self.cycles;
        for vector in &mut self.vectors {
            let fade = (now - vector.end_cycle) as f32 * FADE_PER_CYCLE;
            vector.intensity -= fade;
            if vector.intensity > 0.0 {
                let x0 = vector.x0 as f32 / VECTOR_WIDTH as f32 * width as f32;
                let x1 = vector.x1 as f32 / VECTOR_WIDTH as f32 * width as f32;
                let y0 = vector.y0 as f32 / VECTOR_HEIGHT as f32 * height as f32;
                let y1 = vector.y1 as f32 / VECTOR_HEIGHT as f32 * height as f32;
                draw_line(
                    &mut self.framebuffer,
                    x0 as i32,
                    y0 as i32,
                    x1 as i32,
                    y1 as i32,
                    vector.intensity,
                );
            }
        }
        self.vectors.retain(|vector| vector.intensity > 0.0);
    }

    pub fn framebuffer(&self) -> &FrameBuffer {
        &self.framebuffer
    }

    pub fn state(&self) -> BeamState {
        self.beam
    }

    pub fn vectors(&self) -> &[Vector] {
        &self.vectors
    }

    pub fn reset(&mut self) {
        self.beam.enabled = false;
        self.beam.rate_x = 0;
        self.beam.rate_y = 0;
        self.beam.x_axis = 0;
        self.beam.y_axis = 0;
        self.beam.offset = 0;
        self.beam.z_axis = 0;
        self.center_beam();
        self.vectors.clear();
        self.updates.clear();
        self.framebuffer.clear();
        self.ramp = false;
        self.zero = false;
        self.cycles = 0;
    }
}

/// Bresenham with additive blending.
fn draw_line(fb: &mut FrameBuffer, x0: i32, y0: i32, x1: i32, y1: i32, intensity: f32) {
    let dx = (x1 - x0).abs();
    let dy = (y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx - dy;
    let mut x = x0;
    let mut y = y0;
    loop {
        fb.blend(x, y, intensity);
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x += sx;
        }
        if e2 < dx {
            err += dx;
            y += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_beam() -> VectorGenerator {
        VectorGenerator::new(330, 410)
    }

    /// port B image: sample/hold active, select channel, ramp on/off.
    fn portb(switch: bool, select: u8, ramp: bool) -> u8 {
        let mut value = (select & 0x03) << 1;
        if !switch {
            value |= 0x01;
        }
        if !ramp {
            value |= 0x80;
        }
        value
    }

    #[test]
    fn zero_centers_beam_after_delay() {
        let mut beam = setup_beam();
        // push the beam away from center first
        beam.step(0x00, portb(true, 1, false), true, false); // offset = 0x80
        for _ in 0..20 {
            beam.step(0xff, portb(false, 0, true), true, false);
        }
        assert_ne!(VECTOR_WIDTH / 2, beam.state().x);
        // assert ZERO; it lands 12 cycles later
        for _ in 0..11 {
            beam.step(0xff, portb(false, 0, false), false, false);
        }
        assert_ne!(VECTOR_WIDTH / 2, beam.state().x);
        for _ in 0..2 {
            beam.step(0xff, portb(false, 0, false), false, false);
        }
        assert_eq!(VECTOR_WIDTH / 2, beam.state().x);
        assert_eq!(VECTOR_HEIGHT / 2, beam.state().y);
    }

    #[test]
    fn blank_edge_captures_vector() {
        let mut beam = setup_beam();
        // brightness sample
        beam.step(0x40, portb(true, 2, false), true, false);
        // drive x rate, wait for it to land
        for _ in 0..14 {
            beam.step(0xa0, portb(false, 0, true), true, false);
        }
        // beam on, draw for a while, beam off
        for _ in 0..10 {
            beam.step(0xa0, portb(false, 0, true), true, true);
        }
        beam.step(0xa0, portb(false, 0, true), true, false);
        assert_eq!(1, beam.vectors().len());
        let vector = beam.vectors()[0];
        assert!(vector.end_cycle > vector.start_cycle);
        assert!((vector.intensity - 0x40 as f32 / 128.0).abs() < 1e-6);
        assert!(vector.x1 > vector.x0);
    }

    #[test]
    fn rate_change_splits_vector() {
        let mut beam = setup_beam();
        beam.step(0x40, portb(true, 2, false), true, false);
        for _ in 0..14 {
            beam.step(0xa0, portb(false, 0, true), true, false);
        }
        for _ in 0..10 {
            beam.step(0xa0, portb(false, 0, true), true, true);
        }
        // new dac value changes the x rate mid-vector
        for _ in 0..14 {
            beam.step(0x60, portb(false, 0, true), true, true);
        }
        beam.step(0x60, portb(false, 0, true), true, false);
        assert!(beam.vectors().len() >= 2);
    }

    #[test]
    fn produce_frame_draws_and_decays() {
        let mut beam = setup_beam();
        beam.step(0x7f, portb(true, 2, false), true, false); // full brightness
        for _ in 0..14 {
            beam.step(0xff, portb(false, 0, true), true, false);
        }
        for _ in 0..40 {
            beam.step(0xff, portb(false, 0, true), true, true);
        }
        beam.step(0xff, portb(false, 0, true), true, false);
        assert_eq!(1, beam.vectors().len());
        beam.produce_frame();
        assert!(beam.framebuffer().pixels().iter().any(|&p| p > 0.0));
        // run the clock far enough that the vector fades out entirely
        for _ in 0..500_000 {
            beam.step(0x80, portb(false, 0, false), true, false);
        }
        beam.produce_frame();
        assert_eq!(0, beam.vectors().len());
        assert!(beam.framebuffer().pixels().iter().all(|&p| p == 0.0));
    }

    #[test]
    fn vectors_satisfy_cycle_ordering() {
        let mut beam = setup_beam();
        beam.step(0x40, portb(true, 2, false), true, false);
        for _ in 0..30 {
            beam.step(0x90, portb(false, 0, true), true, true);
        }
        beam.step(0x90, portb(false, 0, true), true, false);
        for vector in beam.vectors() {
            assert!(vector.start_cycle <= vector.end_cycle);
        }
    }
}
