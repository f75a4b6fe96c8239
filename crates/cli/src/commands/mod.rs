// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod harvest;
pub mod records;
pub mod repo;
pub mod status;
pub mod status_codes;
pub mod watch;
