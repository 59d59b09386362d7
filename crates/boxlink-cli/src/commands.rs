//! Top-level subcommands.

use boxlink_core::BoxCommand;
use clap::Subcommand;

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print every status snapshot and liveness change until interrupted
    ///
    /// While watching, type `p` + Enter to power the box down, `w` to stop
    /// its wifi and `q` to quit.
    Watch {
        /// Print snapshots as JSON lines
        #[arg(long)]
        json: bool,
    },
    /// Ask the box to power down
    Powerdown,
    /// Ask the box to switch off its wifi
    StopWifi,
}

impl Commands {
    /// The box command a one-shot subcommand sends, if any.
    pub const fn box_command(&self) -> Option<BoxCommand> {
        match self {
            Self::Watch { .. } => None,
            Self::Powerdown => Some(BoxCommand::PowerDown),
            Self::StopWifi => Some(BoxCommand::StopWifi),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_command_mapping() {
        assert_eq!(Commands::Powerdown.box_command(), Some(BoxCommand::PowerDown));
        assert_eq!(Commands::StopWifi.box_command(), Some(BoxCommand::StopWifi));
        assert_eq!(Commands::Watch { json: true }.box_command(), None);
    }
}
