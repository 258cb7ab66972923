// This file is part of vectra.
// Copyright (c) 2020-2024 vectra contributors. All rights reserved.
// Licensed under the GPLv3. See LICENSE file in the project root for full license text.

use std::fmt::Write;

use vectra_core::factory::Addressable;
use vectra_core::util::Shared;

use super::Disassembler;

/// Read-only inspection over the machine's bus, for a frontend debugger
/// to render. No write access.
pub struct Debugger {
    mem: Shared<dyn Addressable>,
    disassembler: Disassembler,
}

impl Debugger {
    pub fn new(mem: Shared<dyn Addressable>) -> Self {
        Self {
            disassembler: Disassembler::new(mem.clone()),
            mem,
        }
    }

    pub fn disassemble_at(&self, address: u16) -> (String, u16) {
        self.disassembler.disassemble(address)
    }

    /// Disassemble `count` consecutive instructions starting at `start`.
    pub fn disassemble_range(&self, start: u16, count: usize) -> Vec<(u16, String)> {
        let mut lines = Vec::with_capacity(count);
        let mut address = start;
        for _ in 0..count {
            let (text, next) = self.disassembler.disassemble(address);
            lines.push((address, text));
            address = next;
        }
        lines
    }

    /// Hex dump, sixteen bytes per row.
    pub fn dump(&self, start: u16, length: u16) -> String {
        let mut out = String::new();
        let mut address = start;
        let end = start.wrapping_add(length);
        while address != end {
            if (address.wrapping_sub(start)) % 16 == 0 {
                if !out.is_empty() {
                    out.push('\n');
                }
                let _ = write!(out, "{:04x}:", address);
            }
            let _ = write!(out, " {:02x}", self.mem.borrow().read(address));
            address = address.wrapping_add(1);
        }
        out
    }
}
