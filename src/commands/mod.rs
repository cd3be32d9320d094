// Copyright (c) 2025 Paycycle Developers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod accounts;
pub mod charges;
pub mod cycles;
pub mod doctor;
pub mod goals;
pub mod salary;
pub mod snapshots;
pub mod transactions;
pub mod users;
