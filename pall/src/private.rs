// Copyright 2026 The pall Authors
// SPDX-License-Identifier: MIT OR Apache-2.0

pub trait Sealed {}
