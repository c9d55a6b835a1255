//! Server run state published by the lifecycle supervisor

use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ServerRunState {
    #[default]
    Stopped,
    Running {
        address: Option<String>,
    },
}

impl ServerRunState {
    pub fn is_running(&self) -> bool {
        matches!(self, ServerRunState::Running { .. })
    }

    pub fn address(&self) -> Option<&str> {
        match self {
            ServerRunState::Running { address } => address.as_deref(),
            ServerRunState::Stopped => None,
        }
    }
}
