//! Scripted in-memory shell for tests

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::shell::{ShellError, ShellResult, ShellSession, ShellState};

type Effect = Arc<dyn Fn(&str) -> ShellResult<String> + Send + Sync>;

enum Reply {
    Output(String),
    Fail(String),
    Effect(Effect),
}

struct Rule {
    prefix: String,
    reply: Reply,
}

/// Records every command and answers by first matching command prefix.
///
/// Commands with no matching rule succeed with empty output.
pub struct FakeShell {
    commands: Mutex<Vec<String>>,
    rules: Vec<Rule>,
    state: ShellState,
}

impl Default for FakeShell {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeShell {
    pub fn new() -> Self {
        Self { commands: Mutex::new(Vec::new()), rules: Vec::new(), state: ShellState::Ready }
    }

    pub fn respond(mut self, prefix: impl Into<String>, output: impl Into<String>) -> Self {
        self.rules.push(Rule { prefix: prefix.into(), reply: Reply::Output(output.into()) });
        self
    }

    pub fn fail(mut self, prefix: impl Into<String>, message: impl Into<String>) -> Self {
        self.rules.push(Rule { prefix: prefix.into(), reply: Reply::Fail(message.into()) });
        self
    }

    pub fn with_effect<F>(mut self, prefix: impl Into<String>, effect: F) -> Self
    where
        F: Fn(&str) -> ShellResult<String> + Send + Sync + 'static,
    {
        self.rules.push(Rule { prefix: prefix.into(), reply: Reply::Effect(Arc::new(effect)) });
        self
    }

    pub fn with_state(mut self, state: ShellState) -> Self {
        self.state = state;
        self
    }

    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn count_matching(&self, prefix: &str) -> usize {
        self.commands().iter().filter(|c| c.starts_with(prefix)).count()
    }
}

#[async_trait]
impl ShellSession for FakeShell {
    async fn execute(&self, command: &str) -> ShellResult<String> {
        if let Ok(mut commands) = self.commands.lock() {
            commands.push(command.to_string());
        }
        match self.rules.iter().find(|r| command.starts_with(&r.prefix)) {
            Some(Rule { reply: Reply::Output(out), .. }) => Ok(out.clone()),
            Some(Rule { reply: Reply::Fail(msg), .. }) => Err(ShellError::Command(msg.clone())),
            Some(Rule { reply: Reply::Effect(effect), .. }) => effect(command),
            None => Ok(String::new()),
        }
    }

    fn state(&self) -> ShellState {
        self.state.clone()
    }
}
