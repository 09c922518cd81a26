// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module — the owned pixel buffer and the decoder/normalizer that
// produces it.

pub mod buffer;
pub mod loader;

pub use buffer::PixelBuffer;
pub use loader::{decode, open};
