//mapty-cli/src/cli.rs
use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use mapty_lib::Coords;

#[derive(Parser, Debug)]
#[command(author, version, about = "Log running and cycling workouts on a map", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
    /// Print lists as CSV instead of a table
    #[arg(long, global = true)]
    pub export_csv: bool,
    /// More log output (repeat for more)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
    /// Less log output
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub quiet: u8,
}

#[derive(Subcommand, Debug)]
pub enum WorkoutCommand {
    /// Log a run
    Running {
        /// Latitude of the workout location
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        /// Longitude of the workout location
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        /// Distance in km
        #[arg(short, long, allow_hyphen_values = true)]
        distance: String,
        /// Duration in minutes
        #[arg(short = 't', long, allow_hyphen_values = true)]
        duration: String,
        /// Steps per minute
        #[arg(short, long, allow_hyphen_values = true)]
        cadence: String,
    },
    /// Log a ride
    Cycling {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        /// Distance in km
        #[arg(short, long, allow_hyphen_values = true)]
        distance: String,
        /// Duration in minutes
        #[arg(short = 't', long, allow_hyphen_values = true)]
        duration: String,
        /// Elevation gain in meters (may be negative)
        #[arg(short, long, default_value = "", allow_hyphen_values = true)]
        elevation: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a new workout at a point on the map
    Add {
        #[command(subcommand)]
        workout: WorkoutCommand,
    },
    /// List workouts, newest first
    List {
        /// Show only the last N entries
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Show one workout and centre the map on it
    Show {
        /// ID of the workout
        id: String,
    },
    /// Set the position used when no other location is available ("lat,lng")
    SetHome {
        #[arg(allow_hyphen_values = true)]
        location: Coords,
    },
    /// Set the zoom level used when the map opens or moves to a workout
    SetZoom { level: u8 },
    /// Show the path to the config file
    ConfigPath,
    /// Show the path to the database file
    DbPath,
    GenerateCompletion {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

// Function to parse CLI arguments
pub fn parse_args() -> Cli {
    Cli::parse()
}

pub fn build_cli_command() -> clap::Command {
    Cli::command()
}
