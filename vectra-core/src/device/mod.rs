// This file is part of vectra.
// Copyright (c) 2020-2024 vectra contributors. All rights reserved.
// Licensed under the GPLv3. See LICENSE file in the project root for full license text.

mod cartridge;
mod joystick;

pub use self::cartridge::{Cartridge, MAX_ROM_SIZE};
pub use self::joystick::Joystick;
