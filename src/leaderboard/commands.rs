use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::backend::ContestBackend;
use crate::models::LeaderboardError;

/// Admin actions against the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminCommand {
    GenerateResults { contest: String },
    ResetUsers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutcomeStatus {
    Success,
    Error,
}

/// What the presentation layer shows after a command ran.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandOutcome {
    pub status: OutcomeStatus,
    pub title: String,
    pub description: String,
}

impl CommandOutcome {
    pub fn success(title: &str, description: &str) -> Self {
        Self {
            status: OutcomeStatus::Success,
            title: title.to_string(),
            description: description.to_string(),
        }
    }

    pub fn failure(description: &str) -> Self {
        Self {
            status: OutcomeStatus::Error,
            title: "Error".to_string(),
            description: description.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == OutcomeStatus::Success
    }
}

pub async fn execute(backend: &dyn ContestBackend, command: &AdminCommand) -> CommandOutcome {
    match command {
        AdminCommand::GenerateResults { contest } => match backend.generate_results(contest).await {
            Ok(()) => {
                info!("Result generated for {}", contest);
                CommandOutcome::success("Result Generated", "Result generated successfully")
            }
            // A reply that is not 200 and a request that never got a reply
            // are reported differently.
            Err(e @ LeaderboardError::UnexpectedStatus { .. }) => {
                error!("Backend refused to generate result for {}: {}", contest, e);
                CommandOutcome::failure("Failed to generate result")
            }
            Err(e) => {
                error!("Failed to generate result for {}: {}", contest, e);
                CommandOutcome::failure("Error generating result")
            }
        },
        AdminCommand::ResetUsers => match backend.reset_users().await {
            Ok(()) => CommandOutcome::success("Users Reset", "Users reset successfully"),
            Err(e) => {
                error!("Failed to reset users: {}", e);
                CommandOutcome::failure("Error resetting users")
            }
        },
    }
}
