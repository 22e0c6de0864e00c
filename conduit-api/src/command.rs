use std::fmt;

/// Control message a driver sends to whoever owns its pipeline.
///
/// Drivers receive a [`CommandSender`] at construction time and use it to ask the owner to
/// stop, pause or resume a pipeline, e.g. after the broker dropped the subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Stop { pipeline: String },
    Pause { pipeline: String },
    Resume { pipeline: String },
}

impl Command {
    /// Name of the pipeline the command targets.
    pub fn pipeline(&self) -> &str {
        match self {
            Command::Stop { pipeline } | Command::Pause { pipeline } | Command::Resume { pipeline } => {
                pipeline
            }
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Stop { pipeline } => write!(f, "stop {}", pipeline),
            Command::Pause { pipeline } => write!(f, "pause {}", pipeline),
            Command::Resume { pipeline } => write!(f, "resume {}", pipeline),
        }
    }
}

/// Sending half of the command channel handed to every driver.
pub type CommandSender = flume::Sender<Command>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_pipeline_and_display() {
        let cmd = Command::Pause { pipeline: "emails".to_string() };
        assert_eq!(cmd.pipeline(), "emails");
        assert_eq!(cmd.to_string(), "pause emails");
    }
}
