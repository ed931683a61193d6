// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod get;
pub mod serve;
pub mod set;
pub mod watch;
