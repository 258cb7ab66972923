// This file is part of vectra.
// Copyright (c) 2020-2024 vectra contributors. All rights reserved.
// Licensed under the GPLv3. See LICENSE file in the project root for full license text.

// Spec: MC6809 datasheet, appendix "Instruction Set Tables"
// Design:
//   Every opcode is a plain data record: the operation kernel, the
//   addressing mode and the documented base cycle count. A single execute
//   loop in Cpu6809 resolves the mode, runs the kernel and adds the
//   postbyte / push-list / taken-branch cycle adjustments on top of the
//   base count. The disassembler reuses the same tables.

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum AddrMode {
    Inherent,
    Immediate8,
    Immediate16,
    Direct,
    Extended,
    Indexed,
    Relative8,
    Relative16,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Op {
    Abx,
    Adca,
    Adcb,
    Adda,
    Addb,
    Addd,
    Anda,
    Andb,
    Andcc,
    Asr,
    Asra,
    Asrb,
    Bcc,
    Bcs,
    Beq,
    Bge,
    Bgt,
    Bhi,
    Bita,
    Bitb,
    Ble,
    Bls,
    Blt,
    Bmi,
    Bne,
    Bpl,
    Bra,
    Brn,
    Bsr,
    Bvc,
    Bvs,
    Clr,
    Clra,
    Clrb,
    Cmpa,
    Cmpb,
    Cmpd,
    Cmps,
    Cmpu,
    Cmpx,
    Cmpy,
    Com,
    Coma,
    Comb,
    Cwai,
    Daa,
    Dec,
    Deca,
    Decb,
    Eora,
    Eorb,
    Exg,
    Inc,
    Inca,
    Incb,
    Jmp,
    Jsr,
    Lda,
    Ldb,
    Ldd,
    Lds,
    Ldu,
    Ldx,
    Ldy,
    Leas,
    Leau,
    Leax,
    Leay,
    Lsl,
    Lsla,
    Lslb,
    Lsr,
    Lsra,
    Lsrb,
    Mul,
    Neg,
    Nega,
    Negb,
    Nop,
    Ora,
    Orb,
    Orcc,
    Pshs,
    Pshu,
    Puls,
    Pulu,
    Rol,
    Rola,
    Rolb,
    Ror,
    Rora,
    Rorb,
    Rti,
    Rts,
    Sbca,
    Sbcb,
    Sex,
    Sta,
    Stb,
    Std,
    Sts,
    Stu,
    Stx,
    Sty,
    Suba,
    Subb,
    Subd,
    Swi,
    Swi2,
    Swi3,
    Sync,
    Tfr,
    Tst,
    Tsta,
    Tstb,
}

#[derive(Copy, Clone, Debug)]
pub struct OpcodeDef {
    pub op: Op,
    pub mode: AddrMode,
    pub cycles: u8,
    pub mnemonic: &'static str,
}

fn def(op: Op, mode: AddrMode, cycles: u8, mnemonic: &'static str) -> Option<OpcodeDef> {
    Some(OpcodeDef {
        op,
        mode,
        cycles,
        mnemonic,
    })
}

/// Base page decode.
pub fn decode(opcode: u8) -> Option<OpcodeDef> {
    use self::AddrMode::*;
    use self::Op::*;
    match opcode {
        0x00 => def(Neg, Direct, 6, "neg"),
        0x03 => def(Com, Direct, 6, "com"),
        0x04 => def(Lsr, Direct, 6, "lsr"),
        0x06 => def(Ror, Direct, 6, "ror"),
        0x07 => def(Asr, Direct, 6, "asr"),
        0x08 => def(Lsl, Direct, 6, "lsl"),
        0x09 => def(Rol, Direct, 6, "rol"),
        0x0a => def(Dec, Direct, 6, "dec"),
        0x0c => def(Inc, Direct, 6, "inc"),
        0x0d => def(Tst, Direct, 6, "tst"),
        0x0e => def(Jmp, Direct, 3, "jmp"),
        0x0f => def(Clr, Direct, 6, "clr"),
        0x12 => def(Nop, Inherent, 2, "nop"),
        0x13 => def(Sync, Inherent, 4, "sync"),
        0x16 => def(Bra, Relative16, 5, "lbra"),
        0x17 => def(Bsr, Relative16, 9, "lbsr"),
        0x19 => def(Daa, Inherent, 2, "daa"),
        0x1a => def(Orcc, Immediate8, 3, "orcc"),
        0x1c => def(Andcc, Immediate8, 3, "andcc"),
        0x1d => def(Sex, Inherent, 2, "sex"),
        0x1e => def(Exg, Immediate8, 8, "exg"),
        0x1f => def(Tfr, Immediate8, 6, "tfr"),
        0x20 => def(Bra, Relative8, 3, "bra"),
        0x21 => def(Brn, Relative8, 3, "brn"),
        0x22 => def(Bhi, Relative8, 3, "bhi"),
        0x23 => def(Bls, Relative8, 3, "bls"),
        0x24 => def(Bcc, Relative8, 3, "bcc"),
        0x25 => def(Bcs, Relative8, 3, "bcs"),
        0x26 => def(Bne, Relative8, 3, "bne"),
        0x27 => def(Beq, Relative8, 3, "beq"),
        0x28 => def(Bvc, Relative8, 3, "bvc"),
        0x29 => def(Bvs, Relative8, 3, "bvs"),
        0x2a => def(Bpl, Relative8, 3, "bpl"),
        0x2b => def(Bmi, Relative8, 3, "bmi"),
        0x2c => def(Bge, Relative8, 3, "bge"),
        0x2d => def(Blt, Relative8, 3, "blt"),
        0x2e => def(Bgt, Relative8, 3, "bgt"),
        0x2f => def(Ble, Relative8, 3, "ble"),
        0x30 => def(Leax, Indexed, 4, "leax"),
        0x31 => def(Leay, Indexed, 4, "leay"),
        0x32 => def(Leas, Indexed, 4, "leas"),
        0x33 => def(Leau, Indexed, 4, "leau"),
        0x34 => def(Pshs, Immediate8, 5, "pshs"),
        0x35 => def(Puls, Immediate8, 5, "puls"),
        0x36 => def(Pshu, Immediate8, 5, "pshu"),
        0x37 => def(Pulu, Immediate8, 5, "pulu"),
        0x39 => def(Rts, Inherent, 5, "rts"),
        0x3a => def(Abx, Inherent, 3, "abx"),
        0x3b => def(Rti, Inherent, 3, "rti"),
        0x3c => def(Cwai, Immediate8, 8, "cwai"),
        0x3d => def(Mul, Inherent, 11, "mul"),
        0x3f => def(Swi, Inherent, 7, "swi"),
        0x40 => def(Nega, Inherent, 2, "nega"),
        0x43 => def(Coma, Inherent, 2, "coma"),
        0x44 => def(Lsra, Inherent, 2, "lsra"),
        0x46 => def(Rora, Inherent, 2, "rora"),
        0x47 => def(Asra, Inherent, 2, "asra"),
        0x48 => def(Lsla, Inherent, 2, "lsla"),
        0x49 => def(Rola, Inherent, 2, "rola"),
        0x4a => def(Deca, Inherent, 2, "deca"),
        0x4c => def(Inca, Inherent, 2, "inca"),
        0x4d => def(Tsta, Inherent, 2, "tsta"),
        0x4f => def(Clra, Inherent, 2, "clra"),
        0x50 => def(Negb, Inherent, 2, "negb"),
        0x53 => def(Comb, Inherent, 2, "comb"),
        0x54 => def(Lsrb, Inherent, 2, "lsrb"),
        0x56 => def(Rorb, Inherent, 2, "rorb"),
        0x57 => def(Asrb, Inherent, 2, "asrb"),
        0x58 => def(Lslb, Inherent, 2, "lslb"),
        0x59 => def(Rolb, Inherent, 2, "rolb"),
        0x5a => def(Decb, Inherent, 2, "decb"),
        0x5c => def(Incb, Inherent, 2, "incb"),
        0x5d => def(Tstb, Inherent, 2, "tstb"),
        0x5f => def(Clrb, Inherent, 2, "clrb"),
        0x60 => def(Neg, Indexed, 6, "neg"),
        0x63 => def(Com, Indexed, 6, "com"),
        0x64 => def(Lsr, Indexed, 6, "lsr"),
        0x66 => def(Ror, Indexed, 6, "ror"),
        0x67 => def(Asr, Indexed, 6, "asr"),
        0x68 => def(Lsl, Indexed, 6, "lsl"),
        0x69 => def(Rol, Indexed, 6, "rol"),
        0x6a => def(Dec, Indexed, 6, "dec"),
        0x6c => def(Inc, Indexed, 6, "inc"),
        0x6d => def(Tst, Indexed, 6, "tst"),
        0x6e => def(Jmp, Indexed, 3, "jmp"),
        0x6f => def(Clr, Indexed, 6, "clr"),
        0x70 => def(Neg, Extended, 7, "neg"),
        0x73 => def(Com, Extended, 7, "com"),
        0x74 => def(Lsr, Extended, 7, "lsr"),
        0x76 => def(Ror, Extended, 7, "ror"),
        0x77 => def(Asr, Extended, 7, "asr"),
        0x78 => def(Lsl, Extended, 7, "lsl"),
        0x79 => def(Rol, Extended, 7, "rol"),
        0x7a => def(Dec, Extended, 7, "dec"),
        0x7c => def(Inc, Extended, 7, "inc"),
        0x7d => def(Tst, Extended, 7, "tst"),
        0x7e => def(Jmp, Extended, 4, "jmp"),
        0x7f => def(Clr, Extended, 7, "clr"),
        0x80 => def(Suba, Immediate8, 2, "suba"),
        0x81 => def(Cmpa, Immediate8, 2, "cmpa"),
        0x82 => def(Sbca, Immediate8, 2, "sbca"),
        0x83 => def(Subd, Immediate16, 4, "subd"),
        0x84 => def(Anda, Immediate8, 2, "anda"),
        0x85 => def(Bita, Immediate8, 2, "bita"),
        0x86 => def(Lda, Immediate8, 2, "lda"),
        0x88 => def(Eora, Immediate8, 2, "eora"),
        0x89 => def(Adca, Immediate8, 2, "adca"),
        0x8a => def(Ora, Immediate8, 2, "ora"),
        0x8b => def(Adda, Immediate8, 2, "adda"),
        0x8c => def(Cmpx, Immediate16, 4, "cmpx"),
        0x8d => def(Bsr, Relative8, 7, "bsr"),
        0x8e => def(Ldx, Immediate16, 3, "ldx"),
        0x90 => def(Suba, Direct, 4, "suba"),
        0x91 => def(Cmpa, Direct, 4, "cmpa"),
        0x92 => def(Sbca, Direct, 4, "sbca"),
        0x93 => def(Subd, Direct, 6, "subd"),
        0x94 => def(Anda, Direct, 4, "anda"),
        0x95 => def(Bita, Direct, 4, "bita"),
        0x96 => def(Lda, Direct, 4, "lda"),
        0x97 => def(Sta, Direct, 4, "sta"),
        0x98 => def(Eora, Direct, 4, "eora"),
        0x99 => def(Adca, Direct, 4, "adca"),
        0x9a => def(Ora, Direct, 4, "ora"),
        0x9b => def(Adda, Direct, 4, "adda"),
        0x9c => def(Cmpx, Direct, 6, "cmpx"),
        0x9d => def(Jsr, Direct, 7, "jsr"),
        0x9e => def(Ldx, Direct, 5, "ldx"),
        0x9f => def(Stx, Direct, 5, "stx"),
        0xa0 => def(Suba, Indexed, 4, "suba"),
        0xa1 => def(Cmpa, Indexed, 4, "cmpa"),
        0xa2 => def(Sbca, Indexed, 4, "sbca"),
        0xa3 => def(Subd, Indexed, 6, "subd"),
        0xa4 => def(Anda, Indexed, 4, "anda"),
        0xa5 => def(Bita, Indexed, 4, "bita"),
        0xa6 => def(Lda, Indexed, 4, "lda"),
        0xa7 => def(Sta, Indexed, 4, "sta"),
        0xa8 => def(Eora, Indexed, 4, "eora"),
        0xa9 => def(Adca, Indexed, 4, "adca"),
        0xaa => def(Ora, Indexed, 4, "ora"),
        0xab => def(Adda, Indexed, 4, "adda"),
        0xac => def(Cmpx, Indexed, 6, "cmpx"),
        0xad => def(Jsr, Indexed, 7, "jsr"),
        0xae => def(Ldx, Indexed, 5, "ldx"),
        0xaf => def(Stx, Indexed, 5, "stx"),
        0xb0 => def(Suba, Extended, 5, "suba"),
        0xb1 => def(Cmpa, Extended, 5, "cmpa"),
        0xb2 => def(Sbca, Extended, 5, "sbca"),
        0xb3 => def(Subd, Extended, 7, "subd"),
        0xb4 => def(Anda, Extended, 5, "anda"),
        0xb5 => def(Bita, Extended, 5, "bita"),
        0xb6 => def(Lda, Extended, 5, "lda"),
        0xb7 => def(Sta, Extended, 5, "sta"),
        0xb8 => def(Eora, Extended, 5, "eora"),
        0xb9 => def(Adca, Extended, 5, "adca"),
        0xba => def(Ora, Extended, 5, "ora"),
        0xbb => def(Adda, Extended, 5, "adda"),
        0xbc => def(Cmpx, Extended, 7, "cmpx"),
        0xbd => def(Jsr, Extended, 8, "jsr"),
        0xbe => def(Ldx, Extended, 6, "ldx"),
        0xbf => def(Stx, Extended, 6, "stx"),
        0xc0 => def(Subb, Immediate8, 2, "subb"),
        0xc1 => def(Cmpb, Immediate8, 2, "cmpb"),
        0xc2 => def(Sbcb, Immediate8, 2, "sbcb"),
        0xc3 => def(Addd, Immediate16, 4, "addd"),
        0xc4 => def(Andb, Immediate8, 2, "andb"),
        0xc5 => def(Bitb, Immediate8, 2, "bitb"),
        0xc6 => def(Ldb, Immediate8, 2, "ldb"),
        0xc8 => def(Eorb, Immediate8, 2, "eorb"),
        0xc9 => def(Adcb, Immediate8, 2, "adcb"),
        0xca => def(Orb, Immediate8, 2, "orb"),
        0xcb => def(Addb, Immediate8, 2, "addb"),
        0xcc => def(Ldd, Immediate16, 3, "ldd"),
        0xce => def(Ldu, Immediate16, 3, "ldu"),
        0xd0 => def(Subb, Direct, 4, "subb"),
        0xd1 => def(Cmpb, Direct, 4, "cmpb"),
        0xd2 => def(Sbcb, Direct, 4, "sbcb"),
        0xd3 => def(Addd, Direct, 6, "addd"),
        0xd4 => def(Andb, Direct, 4, "andb"),
        0xd5 => def(Bitb, Direct, 4, "bitb"),
        0xd6 => def(Ldb, Direct, 4, "ldb"),
        0xd7 => def(Stb, Direct, 4, "stb"),
        0xd8 => def(Eorb, Direct, 4, "eorb"),
        0xd9 => def(Adcb, Direct, 4, "adcb"),
        0xda => def(Orb, Direct, 4, "orb"),
        0xdb => def(Addb, Direct, 4, "addb"),
        0xdc => def(Ldd, Direct, 5, "ldd"),
        0xdd => def(Std, Direct, 5, "std"),
        0xde => def(Ldu, Direct, 5, "ldu"),
        0xdf => def(Stu, Direct, 5, "stu"),
        0xe0 => def(Subb, Indexed, 4, "subb"),
        0xe1 => def(Cmpb, Indexed, 4, "cmpb"),
        0xe2 => def(Sbcb, Indexed, 4, "sbcb"),
        0xe3 => def(Addd, Indexed, 6, "addd"),
        0xe4 => def(Andb, Indexed, 4, "andb"),
        0xe5 => def(Bitb, Indexed, 4, "bitb"),
        0xe6 => def(Ldb, Indexed, 4, "ldb"),
        0xe7 => def(Stb, Indexed, 4, "stb"),
        0xe8 => def(Eorb, Indexed, 4, "eorb"),
        0xe9 => def(Adcb, Indexed, 4, "adcb"),
        0xea => def(Orb, Indexed, 4, "orb"),
        0xeb => def(Addb, Indexed, 4, "addb"),
        0xec => def(Ldd, Indexed, 5, "ldd"),
        0xed => def(Std, Indexed, 5, "std"),
        0xee => def(Ldu, Indexed, 5, "ldu"),
        0xef => def(Stu, Indexed, 5, "stu"),
        0xf0 => def(Subb, Extended, 5, "subb"),
        0xf1 => def(Cmpb, Extended, 5, "cmpb"),
        0xf2 => def(Sbcb, Extended, 5, "sbcb"),
        0xf3 => def(Addd, Extended, 7, "addd"),
        0xf4 => def(Andb, Extended, 5, "andb"),
        0xf5 => def(Bitb, Extended, 5, "bitb"),
        0xf6 => def(Ldb, Extended, 5, "ldb"),
        0xf7 => def(Stb, Extended, 5, "stb"),
        0xf8 => def(Eorb, Extended, 5, "eorb"),
        0xf9 => def(Adcb, Extended, 5, "adcb"),
        0xfa => def(Orb, Extended, 5, "orb"),
        0xfb => def(Addb, Extended, 5, "addb"),
        0xfc => def(Ldd, Extended, 6, "ldd"),
        0xfd => def(Std, Extended, 6, "std"),
        0xfe => def(Ldu, Extended, 6, "ldu"),
        0xff => def(Stu, Extended, 6, "stu"),
        _ => None,
    }
}

/// Page 1 ($10 prefix) decode.
pub fn decode_page1(opcode: u8) -> Option<OpcodeDef> {
    use self::AddrMode::*;
    use self::Op::*;
    match opcode {
        0x21 => def(Brn, Relative16, 5, "lbrn"),
        0x22 => def(Bhi, Relative16, 5, "lbhi"),
        0x23 => def(Bls, Relative16, 5, "lbls"),
        0x24 => def(Bcc, Relative16, 5, "lbcc"),
        0x25 => def(Bcs, Relative16, 5, "lbcs"),
        0x26 => def(Bne, Relative16, 5, "lbne"),
        0x27 => def(Beq, Relative16, 5, "lbeq"),
        0x28 => def(Bvc, Relative16, 5, "lbvc"),
        0x29 => def(Bvs, Relative16, 5, "lbvs"),
        0x2a => def(Bpl, Relative16, 5, "lbpl"),
        0x2b => def(Bmi, Relative16, 5, "lbmi"),
        0x2c => def(Bge, Relative16, 5, "lbge"),
        0x2d => def(Blt, Relative16, 5, "lblt"),
        0x2e => def(Bgt, Relative16, 5, "lbgt"),
        0x2f => def(Ble, Relative16, 5, "lble"),
        0x3f => def(Swi2, Inherent, 8, "swi2"),
        0x83 => def(Cmpd, Immediate16, 5, "cmpd"),
        0x8c => def(Cmpy, Immediate16, 5, "cmpy"),
        0x8e => def(Ldy, Immediate16, 4, "ldy"),
        0x93 => def(Cmpd, Direct, 7, "cmpd"),
        0x9c => def(Cmpy, Direct, 7, "cmpy"),
        0x9e => def(Ldy, Direct, 6, "ldy"),
        0x9f => def(Sty, Direct, 6, "sty"),
        0xa3 => def(Cmpd, Indexed, 7, "cmpd"),
        0xac => def(Cmpy, Indexed, 7, "cmpy"),
        0xae => def(Ldy, Indexed, 6, "ldy"),
        0xaf => def(Sty, Indexed, 6, "sty"),
        0xb3 => def(Cmpd, Extended, 8, "cmpd"),
        0xbc => def(Cmpy, Extended, 8, "cmpy"),
        0xbe => def(Ldy, Extended, 7, "ldy"),
        0xbf => def(Sty, Extended, 7, "sty"),
        0xce => def(Lds, Immediate16, 4, "lds"),
        0xde => def(Lds, Direct, 6, "lds"),
        0xdf => def(Sts, Direct, 6, "sts"),
        0xee => def(Lds, Indexed, 6, "lds"),
        0xef => def(Sts, Indexed, 6, "sts"),
        0xfe => def(Lds, Extended, 7, "lds"),
        0xff => def(Sts, Extended, 7, "sts"),
        _ => None,
    }
}

/// Page 2 ($11 prefix) decode.
pub fn decode_page2(opcode: u8) -> Option<OpcodeDef> {
    use self::AddrMode::*;
    use self::Op::*;
    match opcode {
        0x3f => def(Swi3, Inherent, 8, "swi3"),
        0x83 => def(Cmpu, Immediate16, 5, "cmpu"),
        0x8c => def(Cmps, Immediate16, 5, "cmps"),
        0x93 => def(Cmpu, Direct, 7, "cmpu"),
        0x9c => def(Cmps, Direct, 7, "cmps"),
        0xa3 => def(Cmpu, Indexed, 7, "cmpu"),
        0xac => def(Cmps, Indexed, 7, "cmps"),
        0xb3 => def(Cmpu, Extended, 8, "cmpu"),
        0xbc => def(Cmps, Extended, 8, "cmps"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_page_documented_entries() {
        let abx = decode(0x3a).unwrap();
        assert_eq!(Op::Abx, abx.op);
        assert_eq!(3, abx.cycles);
        let adda = decode(0x8b).unwrap();
        assert_eq!(Op::Adda, adda.op);
        assert_eq!(AddrMode::Immediate8, adda.mode);
        assert_eq!(2, adda.cycles);
    }

    #[test]
    fn undefined_opcodes_decode_to_none() {
        assert!(decode(0x01).is_none());
        assert!(decode(0x05).is_none());
        assert!(decode(0x3e).is_none());
        assert!(decode_page1(0x00).is_none());
        assert!(decode_page2(0x84).is_none());
    }

    #[test]
    fn page1_long_branches() {
        let lbeq = decode_page1(0x27).unwrap();
        assert_eq!(Op::Beq, lbeq.op);
        assert_eq!(AddrMode::Relative16, lbeq.mode);
        assert_eq!("lbeq", lbeq.mnemonic);
    }
}
