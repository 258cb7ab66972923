// This file is part of vectra.
// Copyright (c) 2020-2024 vectra contributors. All rights reserved.
// Licensed under the GPLv3. See LICENSE file in the project root for full license text.

// Design:
//   Vectrex represents the machine itself and all of its components.
//   Connections between components are managed as component dependencies:
//   the memory bus and the VIA share the cartridge/RAM/ROM banks, the VIA
//   raises a shared IRQ line the CPU samples, and the PSG drives its read
//   data onto a shared bus latch that feeds the VIA's port A input. The
//   run loop executes one instruction, then clocks the VIA, vector
//   generator, joystick comparator and PSG once per consumed cycle.

use std::cell::Ref;
use std::cmp;
use std::rc::Rc;

use vectra_core::cpu::Cpu6809;
use vectra_core::device::{Cartridge, Joystick};
use vectra_core::factory::{Chip, Cpu, CpuRegisters, Fault, Interrupt, Register};
use vectra_core::io::{Via6522, ViaState};
use vectra_core::mem::Memory;
use vectra_core::sound::Ay38910;
use vectra_core::util::{
    new_shared, new_shared_cell, Clock, IoPort, IrqLine, Ram, Rom, Shared, SharedCell,
};
use vectra_core::video::{BeamState, FrameBuffer, VectorGenerator};

use super::Config;

pub struct Vectrex {
    // Dependencies
    config: Rc<Config>,
    // Chipset
    cpu: Box<dyn Cpu>,
    via: Shared<Via6522>,
    psg: Shared<Ay38910>,
    beam: Shared<VectorGenerator>,
    // Memory
    cartridge: Shared<Cartridge>,
    mem: Shared<Memory>,
    // Peripherals
    joystick_1: Joystick,
    joystick_2: Joystick,
    // I/O
    irq_line: Shared<IrqLine>,
    via_port_a: Shared<IoPort>,
    via_port_b: Shared<IoPort>,
    psg_bus: SharedCell<u8>,
    psg_io: SharedCell<u8>,
    // Runtime State
    clock: Rc<Clock>,
    last_fault: Option<Fault>,
}

impl Vectrex {
    pub fn new() -> Vectrex {
        Vectrex::build(Rc::new(Config::new()))
    }

    pub fn build(config: Rc<Config>) -> Vectrex {
        info!(target: "vectrex", "Initializing system");
        let clock = Rc::new(Clock::new());

        // I/O Lines
        let irq_line = new_shared(IrqLine::new("irq"));
        let via_port_a = new_shared(IoPort::new(0x00, 0x00));
        let via_port_b = new_shared(IoPort::new(0x00, 0x00));
        let psg_bus = new_shared_cell(0u8);
        let psg_io = new_shared_cell(0xffu8);

        // Memory
        let ram = new_shared(Ram::new(config.model.memory_size));
        let sysrom = new_shared(Rom::new_with_data(config.roms.system.as_slice(), 0xe000));
        let cartridge = new_shared(Cartridge::new());

        // Chipset
        let via = new_shared(Via6522::new(
            via_port_a.clone(),
            via_port_b.clone(),
            irq_line.clone(),
        ));
        let psg = new_shared(Ay38910::new(
            config.sound.sample_rate,
            psg_io.clone(),
            psg_bus.clone(),
        ));
        let beam = new_shared(VectorGenerator::new(
            config.model.frame_width,
            config.model.frame_height,
        ));

        // Memory Controller and Processor
        let mem = new_shared(Memory::new(
            cartridge.clone(),
            ram.clone(),
            sysrom.clone(),
            via.clone(),
        ));
        let cpu = Box::new(Cpu6809::new(mem.clone()));

        Vectrex {
            config,
            cpu,
            via,
            psg,
            beam,
            cartridge,
            mem,
            joystick_1: Joystick::new(),
            joystick_2: Joystick::new(),
            irq_line,
            via_port_a,
            via_port_b,
            psg_bus,
            psg_io,
            clock,
            last_fault: None,
        }
    }

    pub fn get_config(&self) -> &Config {
        &self.config
    }

    pub fn get_cycles(&self) -> u64 {
        self.clock.get()
    }

    pub fn last_fault(&self) -> Option<Fault> {
        self.last_fault
    }

    pub fn reset(&mut self) {
        info!(target: "vectrex", "Resetting system");
        self.clock.reset();
        self.irq_line.borrow_mut().reset();
        self.via.borrow_mut().reset();
        self.psg.borrow_mut().reset();
        self.beam.borrow_mut().reset();
        self.joystick_1.reset();
        self.joystick_2.reset();
        self.psg_bus.set(0);
        self.psg_io.set(0xff);
        // the cpu comes up last so the reset vector read goes through the
        // freshly reset bus
        self.cpu.reset();
        self.last_fault = None;
    }

    /// Run at least `cycles` cycles; the instruction crossing the boundary
    /// always retires completely. Returns the cycles actually run.
    pub fn run(&mut self, cycles: u64) -> u64 {
        let mut cycles_run = 0;
        while cycles_run < cycles {
            let irq = if self.irq_line.borrow().is_low() {
                Interrupt::Irq
            } else {
                Interrupt::None
            };
            let step = self.cpu.step(irq);
            if let Some(fault) = step.fault {
                self.last_fault = Some(fault);
                match fault {
                    Fault::IllegalIndexedMode(post) => {
                        warn!(
                            target: "vectrex",
                            "Illegal indexed mode 0x{:02x} near 0x{:04x}, halting",
                            post,
                            self.cpu.get_pc()
                        );
                        break;
                    }
                    Fault::UnknownOpcode(opcode)
                    | Fault::UnknownOpcodePage1(opcode)
                    | Fault::UnknownOpcodePage2(opcode) => {
                        warn!(
                            target: "vectrex",
                            "Unknown opcode 0x{:02x} near 0x{:04x}",
                            opcode,
                            self.cpu.get_pc()
                        );
                    }
                }
            }
            // a waiting cpu consumes no cycles; the chipset still has to
            // run or the timers could never wake it
            let batch = cmp::max(step.cycles, 1);
            for _ in 0..batch {
                self.step_chipset();
            }
            cycles_run += batch as u64;
        }
        cycles_run
    }

    fn step_chipset(&mut self) {
        self.via.borrow_mut().clock();
        let (porta, portb, zero, blank) = {
            let via = self.via.borrow();
            (
                via.port_a_bus(),
                via.port_b_bus(),
                via.ca2_out(),
                via.cb2_out(),
            )
        };
        self.beam.borrow_mut().step(porta, portb, zero, blank);
        self.update_joystick(porta, portb);
        self.psg.borrow_mut().bus_step(
            porta,
            portb & 0x08 != 0,
            true,
            portb & 0x10 != 0,
        );
        // whatever the PSG drove onto the bus is what port A reads back
        self.via_port_a.borrow_mut().set_input(self.psg_bus.get());
        self.clock.tick();
    }

    /// The selected pot is compared against the DAC value; the result
    /// drives PB5 in the VIA's port B input image.
    fn update_joystick(&mut self, porta: u8, portb: u8) {
        let select = (portb >> 1) & 0x03;
        let pot = match select {
            0 => self.joystick_1.pot_x(),
            1 => self.joystick_1.pot_y(),
            2 => self.joystick_2.pot_x(),
            _ => self.joystick_2.pot_y(),
        };
        let compare = pot > (porta ^ 0x80);
        self.via_port_b
            .borrow_mut()
            .set_input((compare as u8) << 5);
    }

    // -- Peripherals Ops

    pub fn load_cartridge(&mut self, data: &[u8]) -> bool {
        self.cartridge.borrow_mut().load(data)
    }

    pub fn unload_cartridge(&mut self) {
        self.cartridge.borrow_mut().unload();
    }

    pub fn is_cartridge_loaded(&self) -> bool {
        self.cartridge.borrow().is_loaded()
    }

    pub fn set_player(&mut self, port: u8, x: u8, y: u8, b1: bool, b2: bool, b3: bool, b4: bool) {
        match port {
            1 => self.joystick_1.set_state(x, y, b1, b2, b3, b4),
            2 => self.joystick_2.set_state(x, y, b1, b2, b3, b4),
            _ => warn!(target: "vectrex", "Invalid player port {}", port),
        }
        let buttons = (self.joystick_2.buttons() << 4) | self.joystick_1.buttons();
        self.psg_io.set(buttons);
    }

    // -- Host Outputs

    /// Rasterize the vector log and hand out the framebuffer.
    pub fn framebuffer(&mut self) -> Ref<'_, FrameBuffer> {
        self.beam.borrow_mut().produce_frame();
        Ref::map(self.beam.borrow(), |beam| beam.framebuffer())
    }

    pub fn audio_fill(&mut self, buffer: &mut [u8]) {
        self.psg.borrow_mut().fill_buffer(buffer);
    }

    // -- Debugger Views (read-only)

    pub fn cpu_registers(&self) -> CpuRegisters {
        CpuRegisters {
            a: self.cpu.get_register(Register::A) as u8,
            b: self.cpu.get_register(Register::B) as u8,
            x: self.cpu.get_register(Register::X),
            y: self.cpu.get_register(Register::Y),
            usp: self.cpu.get_register(Register::USP),
            sp: self.cpu.get_register(Register::SP),
            pc: self.cpu.get_pc(),
            dp: self.cpu.get_register(Register::DP) as u8,
            cc: self.cpu.get_register(Register::CC) as u8,
        }
    }

    pub fn read_memory(&self, address: u16) -> u8 {
        self.cpu.read(address)
    }

    pub fn via_state(&self) -> ViaState {
        self.via.borrow().state()
    }

    pub fn beam_state(&self) -> BeamState {
        self.beam.borrow().state()
    }

    /// The memory bus, for consumers that only need the read half (the
    /// disassembler).
    pub fn bus(&self) -> Shared<Memory> {
        self.mem.clone()
    }
}

impl Default for Vectrex {
    fn default() -> Self {
        Self::new()
    }
}
