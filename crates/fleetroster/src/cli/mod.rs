//! Command-line interface for fleetroster.
//!
//! This module provides the CLI structure for the `fleetctl` binary, which
//! is the presentation layer over [`crate::FleetStore`].

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AddCommand, AvailabilityArg, ConfigCommand, DeleteCommand, ListCommand, StatusCommand,
    ToggleCommand, UpdateDriverCommand,
};

/// fleetctl - Manage a local vehicle roster
///
/// Add vehicles, filter them by category and availability, reassign drivers,
/// and remove vehicles. The roster is kept in a local database.
#[derive(Debug, Parser)]
#[command(name = "fleetctl")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for info, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add a vehicle to the roster
    Add(AddCommand),

    /// List vehicles, optionally filtered
    List(ListCommand),

    /// Assign a new driver to a vehicle
    UpdateDriver(UpdateDriverCommand),

    /// Flip a vehicle between available and unavailable
    Toggle(ToggleCommand),

    /// Remove a vehicle from the roster
    Delete(DeleteCommand),

    /// Show roster statistics
    Status(StatusCommand),

    /// View configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}
