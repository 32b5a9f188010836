// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod directory;
pub mod error;
pub mod ledger;
pub mod models;
pub mod recurrence;
pub mod schedule;
pub mod scope;
pub mod store;
pub mod summary;
pub mod tips;
pub mod transfer;
pub mod utils;
