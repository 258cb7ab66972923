// This file is part of vectra.
// Copyright (c) 2020-2024 vectra contributors. All rights reserved.
// Licensed under the GPLv3. See LICENSE file in the project root for full license text.

pub const SYSTEM_ROM_SIZE: usize = 0x2000;

pub struct Config {
    pub model: SystemModel,
    pub sound: SoundConfig,
    pub roms: RomData,
}

impl Config {
    pub fn new() -> Config {
        Config {
            model: SystemModel::default(),
            sound: SoundConfig::default(),
            roms: RomData::default(),
        }
    }

    pub fn new_with_rom(system: &[u8]) -> Config {
        Config {
            model: SystemModel::default(),
            sound: SoundConfig::default(),
            roms: RomData::new(system),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

pub struct SystemModel {
    pub cpu_freq: u32,
    pub refresh_rate: u32,
    pub cycles_per_frame: u32,
    pub frame_width: usize,
    pub frame_height: usize,
    pub memory_size: usize,
}

impl Default for SystemModel {
    fn default() -> SystemModel {
        SystemModel {
            cpu_freq: 1_500_000,
            refresh_rate: 50,
            cycles_per_frame: 30_000,
            frame_width: 330,
            frame_height: 410,
            memory_size: 0x400,
        }
    }
}

pub struct SoundConfig {
    pub sample_rate: u32,
    pub samples_per_frame: usize,
    pub buffer_size: usize,
}

impl Default for SoundConfig {
    fn default() -> SoundConfig {
        SoundConfig {
            sample_rate: 44_100,
            samples_per_frame: 882,
            buffer_size: 4096,
        }
    }
}

pub struct RomData {
    pub system: Vec<u8>,
}

impl RomData {
    /// The system ROM window is 8 KiB; shorter images are padded with
    /// zeros so the vectors at its top always exist.
    pub fn new(system: &[u8]) -> Self {
        let mut data = vec![0x00; SYSTEM_ROM_SIZE];
        let len = system.len().min(SYSTEM_ROM_SIZE);
        data[..len].copy_from_slice(&system[..len]);
        RomData { system: data }
    }
}

impl Default for RomData {
    fn default() -> Self {
        RomData {
            system: vec![0x00; SYSTEM_ROM_SIZE],
        }
    }
}
