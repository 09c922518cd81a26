// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Service layer — bridges the command line to the tablecrop backend crates.
//
// Each service takes an upload (bytes, original name, declared type) and
// returns the JSON descriptor the caller prints.

pub mod app_services;
pub mod data_dir;
