// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

pub mod check;
pub mod init;
pub mod serve;

pub use check::check_command;
pub use init::init_command;
pub use serve::{ServeArgs, serve_command};
