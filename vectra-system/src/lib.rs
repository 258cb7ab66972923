// This file is part of vectra.
// Copyright (c) 2020-2024 vectra contributors. All rights reserved.
// Licensed under the GPLv3. See LICENSE file in the project root for full license text.

#[macro_use]
extern crate log;

pub mod config;
pub mod vectrex;

pub use self::config::Config;
pub use self::vectrex::Vectrex;
