// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Command implementations
//!
//! Thin execute functions per subcommand, wiring sources -> analysis ->
//! report. All filesystem writes and user-facing printing happen here.

pub mod cohorts;
pub mod hierarchy;
pub mod mechanism;
pub mod migration;
pub mod pre_trend;
pub mod report;

use std::io;
use std::path::Path;

use crossterm::{
    style::{Color, ResetColor, SetForegroundColor},
    ExecutableCommand,
};

use crate::error::Result;

/// Print a green check line for a written artifact.
pub(crate) fn print_saved(what: &str, path: &Path) -> Result<()> {
    let mut stdout = io::stdout();
    stdout.execute(SetForegroundColor(Color::Green))?;
    print!("✓ ");
    stdout.execute(ResetColor)?;
    println!("{} saved to {}", what, path.display());
    Ok(())
}

/// Print a yellow warning line.
pub(crate) fn print_warning(message: &str) -> Result<()> {
    let mut stdout = io::stdout();
    stdout.execute(SetForegroundColor(Color::Yellow))?;
    print!("! ");
    stdout.execute(ResetColor)?;
    println!("{}", message);
    Ok(())
}
