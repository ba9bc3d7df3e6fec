// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

pub mod check;
pub mod generate;
pub mod render;
pub mod validate;
pub mod verify;

pub use check::{CheckOutcome, check_command};
pub use generate::generate_command;
pub use render::render_command;
pub use validate::validate_content_command;
pub use verify::{VerifyTarget, verify_command};
