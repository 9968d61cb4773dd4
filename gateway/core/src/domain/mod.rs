// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod gateway_config;
pub mod operation;
pub mod outcome;
pub mod path_guard;
pub mod request;
pub mod storage;
