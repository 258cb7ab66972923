// This file is part of vectra.
// Copyright (c) 2020-2024 vectra contributors. All rights reserved.
// Licensed under the GPLv3. See LICENSE file in the project root for full license text.

pub mod via6522;

pub use self::via6522::{Via6522, ViaState};
