//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::filter::{Filter, WILDCARD};
use crate::vehicle::Availability;

/// Add command arguments.
#[derive(Debug, Args)]
pub struct AddCommand {
    /// Registration number
    #[arg(short, long = "reg", value_name = "REG_NO")]
    pub reg_no: String,

    /// Vehicle category (one of the configured categories)
    #[arg(short = 't', long)]
    pub category: String,

    /// Driver name
    #[arg(short, long = "driver", value_name = "NAME")]
    pub driver_name: String,

    /// Register the vehicle as unavailable
    #[arg(short, long)]
    pub unavailable: bool,
}

impl AddCommand {
    /// The availability requested for the new vehicle.
    #[must_use]
    pub fn availability(&self) -> Availability {
        if self.unavailable {
            Availability::Unavailable
        } else {
            Availability::Available
        }
    }
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Only show this category ("All" for every category)
    #[arg(short = 't', long, default_value = WILDCARD)]
    pub category: String,

    /// Only show vehicles with this availability
    #[arg(short, long, value_enum, default_value = "all")]
    pub availability: AvailabilityArg,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

impl ListCommand {
    /// The category filter described by the arguments.
    #[must_use]
    pub fn category_filter(&self) -> Filter<String> {
        // Parsing a category filter cannot fail; any text is a category.
        self.category.parse().unwrap_or_default()
    }
}

/// Update-driver command arguments.
#[derive(Debug, Args)]
pub struct UpdateDriverCommand {
    /// Vehicle id
    pub id: String,

    /// New driver name
    pub name: String,
}

/// Toggle command arguments.
#[derive(Debug, Args)]
pub struct ToggleCommand {
    /// Vehicle id
    pub id: String,
}

/// Delete command arguments.
#[derive(Debug, Args)]
pub struct DeleteCommand {
    /// Vehicle id
    pub id: String,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Availability argument for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum AvailabilityArg {
    /// Any availability
    #[default]
    All,
    /// Available vehicles only
    Available,
    /// Unavailable vehicles only
    Unavailable,
}

impl From<AvailabilityArg> for Filter<Availability> {
    fn from(arg: AvailabilityArg) -> Self {
        match arg {
            AvailabilityArg::All => Self::All,
            AvailabilityArg::Available => Self::Only(Availability::Available),
            AvailabilityArg::Unavailable => Self::Only(Availability::Unavailable),
        }
    }
}
