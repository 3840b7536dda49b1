//! Crew implementation - runs tasks against a provider

use crate::{Agent, Task, TaskOutput};
use coursecraft_error::{Error, Result};
use coursecraft_llm::{ChatMessage, CompletionRequest, LlmProvider, UsageTracker};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// How a crew schedules its tasks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Process {
    /// One task at a time, in declaration order
    #[default]
    Sequential,
}

/// A group of agents and the tasks they carry out
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Crew {
    pub agents: Vec<Agent>,
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub process: Process,
}

/// Result of a kickoff
#[derive(Debug, Clone)]
pub struct CrewOutput {
    /// Output of the last task
    pub raw: String,
    pub tasks_output: Vec<TaskOutput>,
    pub usage: UsageTracker,
}

impl Crew {
    pub fn new(agents: Vec<Agent>, tasks: Vec<Task>, process: Process) -> Self {
        Self {
            agents,
            tasks,
            process,
        }
    }

    fn agent(&self, role: &str) -> Option<&Agent> {
        self.agents.iter().find(|a| a.role == role)
    }

    /// Check the crew can run before anything is sent to the model
    pub fn validate(&self) -> Result<()> {
        if self.agents.is_empty() {
            return Err(Error::config_invalid("crew has no agents").with_operation("crew::validate"));
        }
        if self.tasks.is_empty() {
            return Err(Error::config_invalid("crew has no tasks").with_operation("crew::validate"));
        }
        for (i, task) in self.tasks.iter().enumerate() {
            if self.agent(&task.agent).is_none() {
                return Err(Error::config_invalid(format!(
                    "task {} is assigned to '{}', who is not in the crew",
                    i + 1,
                    task.agent
                ))
                .with_operation("crew::validate")
                .with_context("agent", task.agent.clone()));
            }
        }
        Ok(())
    }

    /// Run every task and return the final output
    pub async fn kickoff<P: LlmProvider>(&self, provider: &P) -> Result<CrewOutput> {
        self.validate()?;

        let mut tasks_output: Vec<TaskOutput> = Vec::with_capacity(self.tasks.len());
        let mut usage = UsageTracker::new();

        match self.process {
            Process::Sequential => {
                for (i, task) in self.tasks.iter().enumerate() {
                    let Some(agent) = self.agent(&task.agent) else {
                        return Err(Error::unexpected("task agent vanished after validation"));
                    };
                    let output = self
                        .execute_task(provider, agent, task, &tasks_output, &mut usage)
                        .await
                        .map_err(|e| {
                            e.with_operation("crew::kickoff")
                                .with_context("task", (i + 1).to_string())
                                .with_context("agent", agent.role.clone())
                        })?;
                    tasks_output.push(output);
                }
            }
        }

        let raw = tasks_output
            .last()
            .map(|o| o.raw.clone())
            .unwrap_or_default();

        Ok(CrewOutput {
            raw,
            tasks_output,
            usage,
        })
    }

    async fn execute_task<P: LlmProvider>(
        &self,
        provider: &P,
        agent: &Agent,
        task: &Task,
        context: &[TaskOutput],
        usage: &mut UsageTracker,
    ) -> Result<TaskOutput> {
        let coworkers: Vec<&str> = self
            .agents
            .iter()
            .filter(|a| a.role != agent.role)
            .map(|a| a.role.as_str())
            .collect();

        let mut request = CompletionRequest::new(vec![
            ChatMessage::system(agent.system_prompt(&coworkers)),
            ChatMessage::user(task.prompt(context)),
        ]);
        if let Some(model) = &agent.llm.model {
            request = request.with_model(model.clone());
        }
        if let Some(temperature) = agent.llm.temperature {
            request = request.with_temperature(temperature);
        }
        if let Some(max_tokens) = agent.llm.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }

        if agent.verbose {
            info!(agent = %agent.role, "working on task");
        } else {
            debug!(agent = %agent.role, "working on task");
        }

        let response = provider.complete(request).await?;
        usage.track(&response.model, &response.usage);

        let raw = response
            .content
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| {
                Error::inference_failed("model returned an empty answer")
                    .with_context("model", response.model.clone())
            })?;

        if agent.verbose {
            info!(agent = %agent.role, chars = raw.len(), "task finished");
        }

        Ok(TaskOutput {
            description: task.description.clone(),
            agent: agent.role.clone(),
            raw,
        })
    }
}
