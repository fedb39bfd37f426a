use crate::core::error::Result;
use crate::core::{CommandOutcome, CommandRunner, Invocation};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Clone)]
pub enum Behavior {
    Exit(i32),
    /// Write the named files into `dist/` under the invocation's cwd, then exit 0.
    Produce(Vec<&'static str>),
}

/// A `CommandRunner` that records every invocation instead of spawning it.
/// Programs without a registered behavior exit 0 without side effects.
#[derive(Default)]
pub struct RecordingRunner {
    behaviors: HashMap<String, Behavior>,
    calls: Mutex<Vec<String>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, program: &str, behavior: Behavior) -> Self {
        self.behaviors.insert(program.to_string(), behavior);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandRunner for RecordingRunner {
    async fn run(&self, invocation: &Invocation) -> Result<CommandOutcome> {
        self.calls.lock().unwrap().push(invocation.to_string());

        let exit_code = match self.behaviors.get(&invocation.program) {
            Some(Behavior::Exit(code)) => *code,
            Some(Behavior::Produce(files)) => {
                let dist = invocation.cwd.join("dist");
                tokio::fs::create_dir_all(&dist).await?;
                for file in files {
                    tokio::fs::write(dist.join(file), file.as_bytes()).await?;
                }
                0
            }
            None => 0,
        };

        Ok(CommandOutcome {
            exit_code,
            stderr: String::new(),
        })
    }
}
