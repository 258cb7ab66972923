// This file is part of vectra.
// Copyright (c) 2020-2024 vectra contributors. All rights reserved.
// Licensed under the GPLv3. See LICENSE file in the project root for full license text.

use std::rc::Rc;

use vectra_debug::Debugger;
use vectra_system::{Config, Vectrex};

#[test]
fn disassembles_through_the_machine_bus() {
    let mut rom = vec![0x00u8; 0x2000];
    let code = [0x86, 0x01, 0xb7, 0xc8, 0x00, 0x20, 0xf9];
    rom[..code.len()].copy_from_slice(&code);
    rom[0x1ffe] = 0xe0;
    rom[0x1fff] = 0x00;
    let mut vectrex = Vectrex::build(Rc::new(Config::new_with_rom(&rom)));
    vectrex.reset();

    let debugger = Debugger::new(vectrex.bus());
    let (text, next) = debugger.disassemble_at(0xe000);
    assert_eq!("lda #$01", text);
    assert_eq!(0xe002, next);
    let lines = debugger.disassemble_range(0xe000, 3);
    assert_eq!(
        vec![
            (0xe000, "lda #$01".to_string()),
            (0xe002, "sta $c800".to_string()),
            (0xe005, "bra $e000".to_string()),
        ],
        lines
    );
}
