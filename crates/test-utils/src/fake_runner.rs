use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use podcreep_dev::errors::Result;
use podcreep_dev::exec::{CommandOutput, CommandRunner, CommandSpec};

/// Scripted outcome for every invocation of a given program.
#[derive(Debug, Clone)]
pub struct FakeBehaviour {
    pub exit_code: i32,
    pub stdout: String,
    /// How long the fake "process" runs before exiting.
    pub delay: Duration,
}

impl Default for FakeBehaviour {
    fn default() -> Self {
        Self {
            exit_code: 0,
            stdout: String::new(),
            delay: Duration::ZERO,
        }
    }
}

impl FakeBehaviour {
    pub fn exit_code(code: i32) -> Self {
        Self {
            exit_code: code,
            ..Self::default()
        }
    }

    pub fn stdout(out: &str) -> Self {
        Self {
            stdout: out.to_string(),
            ..Self::default()
        }
    }

    pub fn running_for(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }
}

/// A fake command runner that:
/// - records every `CommandSpec` it is asked to run,
/// - answers with the scripted behaviour for the spec's program
///   (instant success by default).
///
/// Clones share the invocation log.
#[derive(Debug, Clone, Default)]
pub struct FakeRunner {
    invocations: Arc<Mutex<Vec<CommandSpec>>>,
    behaviours: HashMap<String, FakeBehaviour>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_behaviour(mut self, program: &str, behaviour: FakeBehaviour) -> Self {
        self.behaviours.insert(program.to_string(), behaviour);
        self
    }

    /// Every spec run so far, in launch order.
    pub fn invocations(&self) -> Vec<CommandSpec> {
        self.invocations.lock().unwrap().clone()
    }

    /// Just the program names, in launch order.
    pub fn programs(&self) -> Vec<String> {
        self.invocations().into_iter().map(|s| s.program).collect()
    }

    /// How many times a given program was launched.
    pub fn launches_of(&self, program: &str) -> usize {
        self.invocations()
            .iter()
            .filter(|s| s.program == program)
            .count()
    }
}

impl CommandRunner for FakeRunner {
    fn run(
        &self,
        spec: CommandSpec,
    ) -> Pin<Box<dyn Future<Output = Result<CommandOutput>> + Send + '_>> {
        let behaviour = self
            .behaviours
            .get(&spec.program)
            .cloned()
            .unwrap_or_default();
        let invocations = Arc::clone(&self.invocations);

        Box::pin(async move {
            invocations.lock().unwrap().push(spec);

            if !behaviour.delay.is_zero() {
                tokio::time::sleep(behaviour.delay).await;
            }

            Ok(CommandOutput {
                exit_code: behaviour.exit_code,
                stdout: behaviour.stdout,
            })
        })
    }
}
