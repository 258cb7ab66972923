// This file is part of vectra.
// Copyright (c) 2020-2024 vectra contributors. All rights reserved.
// Licensed under the GPLv3. See LICENSE file in the project root for full license text.

use std::rc::Rc;

use vectra_core::factory::Fault;
use vectra_system::{Config, Vectrex};

/// Build a machine whose system ROM starts with `code` and whose reset
/// vector points at the ROM base.
fn setup(code: &[u8]) -> Vectrex {
    let mut rom = vec![0x00u8; 0x2000];
    rom[..code.len()].copy_from_slice(code);
    rom[0x1ffe] = 0xe0;
    rom[0x1fff] = 0x00;
    let mut vectrex = Vectrex::build(Rc::new(Config::new_with_rom(&rom)));
    vectrex.reset();
    vectrex
}

#[test]
fn reset_loads_pc_from_vector() {
    let vectrex = setup(&[0x12]);
    let regs = vectrex.cpu_registers();
    assert_eq!(0xe000, regs.pc);
    assert_eq!(0x50, regs.cc); // I|F
}

#[test]
fn cartridge_load_bounds() {
    let mut vectrex = setup(&[0x12]);
    assert!(vectrex.load_cartridge(&[0xde; 0x8000]));
    assert!(vectrex.is_cartridge_loaded());
    assert_eq!(0xde, vectrex.read_memory(0x0000));

    assert!(!vectrex.load_cartridge(&vec![0xad; 0x10001]));
    assert!(!vectrex.is_cartridge_loaded());
    assert_eq!(0x00, vectrex.read_memory(0x0000));
}

#[test]
fn run_retires_whole_instructions() {
    // lda #$01 (2 cycles), then bra * (3 cycles each)
    let mut vectrex = setup(&[0x86, 0x01, 0x20, 0xfe]);
    let ran = vectrex.run(10);
    assert_eq!(11, ran);
    assert_eq!(11, vectrex.get_cycles());
    assert_eq!(0x01, vectrex.cpu_registers().a);
}

#[test]
fn via_timer1_interrupt_reaches_the_cpu() {
    let code = [
        0x1c, 0xef, // andcc #$ef - unmask irq
        0x86, 0xc0, // lda #$c0
        0xb7, 0xd0, 0x0e, // sta $d00e - enable timer 1 interrupt
        0x86, 0x20, // lda #$20
        0xb7, 0xd0, 0x04, // sta $d004 - t1 latch low
        0x86, 0x00, // lda #$00
        0xb7, 0xd0, 0x05, // sta $d005 - start timer 1, counter $0020
        0x20, 0xfe, // bra *
    ];
    let mut rom = vec![0x00u8; 0x2000];
    rom[..code.len()].copy_from_slice(&code);
    // irq handler at $e100 stores a marker into ram
    let handler = [0x86, 0x42, 0xb7, 0xc8, 0x00, 0x20, 0xfe];
    rom[0x100..0x100 + handler.len()].copy_from_slice(&handler);
    rom[0x1ff8] = 0xe1;
    rom[0x1ff9] = 0x00;
    rom[0x1ffe] = 0xe0;
    rom[0x1fff] = 0x00;
    let mut vectrex = Vectrex::build(Rc::new(Config::new_with_rom(&rom)));
    vectrex.reset();

    vectrex.run(200);
    assert_eq!(0x42, vectrex.read_memory(0xc800));
    // the timer 1 flag is still pending, the handler never acked it
    assert_ne!(0, vectrex.via_state().ifr & 0x40);
}

#[test]
fn unknown_opcode_is_recoverable() {
    let mut vectrex = setup(&[0x05, 0x86, 0x01, 0x20, 0xfe]);
    vectrex.run(3);
    assert_eq!(Some(Fault::UnknownOpcode(0x05)), vectrex.last_fault());
    assert_eq!(0x01, vectrex.cpu_registers().a);
}

#[test]
fn illegal_indexed_mode_halts_the_run_loop() {
    let mut vectrex = setup(&[0xa6, 0x87]);
    let ran = vectrex.run(1000);
    assert!(ran < 1000);
    assert_eq!(Some(Fault::IllegalIndexedMode(0x87)), vectrex.last_fault());
    assert!(vectrex.last_fault().unwrap().is_fatal());
}

#[test]
fn framebuffer_has_frame_geometry() {
    let mut vectrex = setup(&[0x20, 0xfe]);
    vectrex.run(30_000);
    let fb = vectrex.framebuffer();
    assert_eq!((330, 410), fb.get_dimension());
}

#[test]
fn audio_fill_generates_a_frame_of_samples() {
    let mut vectrex = setup(&[0x20, 0xfe]);
    vectrex.run(30_000);
    let mut buffer = [0u8; 882];
    vectrex.audio_fill(&mut buffer);
}

#[test]
fn beam_starts_centered() {
    let vectrex = setup(&[0x12]);
    let beam = vectrex.beam_state();
    assert_eq!(33_000 / 2, beam.x);
    assert_eq!(41_000 / 2, beam.y);
    assert!(!beam.enabled);
}

#[test]
fn set_player_state_feeds_the_comparator() {
    let mut vectrex = setup(&[0x20, 0xfe]);
    vectrex.set_player(1, 0xff, 0x00, true, false, false, false);
    vectrex.set_player(2, 0x80, 0x80, false, false, false, false);
    vectrex.run(100);
    // pot 0xff against dac 0 drives the compare bit high
    assert_ne!(0, vectrex.read_memory(0xd000) & 0x20);
}

#[test]
fn determinism_across_identical_runs() {
    let image: Vec<u8> = (0..64u16).map(|v| v as u8).collect();
    let run_one = || {
        let mut vectrex = setup(&[0x86, 0x55, 0xb7, 0xc8, 0x10, 0x20, 0xfe]);
        vectrex.load_cartridge(&image);
        vectrex.run(5_000);
        (
            vectrex.get_cycles(),
            vectrex.cpu_registers(),
            vectrex.read_memory(0xc810),
        )
    };
    assert_eq!(run_one(), run_one());
}
