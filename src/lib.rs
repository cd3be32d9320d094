// Copyright (c) 2025 Paycycle Developers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod cli;
pub mod commands;
pub mod cycle;
pub mod db;
pub mod engine;
pub mod errors;
pub mod goals;
pub mod ledger;
pub mod models;
pub mod recurrence;
pub mod snapshot;
pub mod utils;
