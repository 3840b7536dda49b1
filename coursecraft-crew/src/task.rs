//! Task definition and per-task output

use serde::{Deserialize, Serialize};

/// A unit of work handed to one agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub description: String,
    pub expected_output: String,
    /// Role of the agent that runs this task
    pub agent: String,
}

impl Task {
    pub fn new(
        description: impl Into<String>,
        expected_output: impl Into<String>,
        agent: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            expected_output: expected_output.into(),
            agent: agent.into(),
        }
    }

    /// The user message sent for this task.
    ///
    /// `context` holds the outputs of the tasks that ran before it.
    pub(crate) fn prompt(&self, context: &[TaskOutput]) -> String {
        let mut prompt = format!(
            "Current Task: {}\n\nThis is the expected criteria for your final answer: {}",
            self.description.trim(),
            self.expected_output
        );

        if !context.is_empty() {
            prompt.push_str("\n\nThis is the context you're working with:\n");
            let previous: Vec<&str> = context.iter().map(|o| o.raw.as_str()).collect();
            prompt.push_str(&previous.join("\n\n----------\n\n"));
        }

        prompt.push_str("\n\nBegin! Give your complete final answer.");
        prompt
    }
}

/// What one task produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskOutput {
    pub description: String,
    pub agent: String,
    /// The model's free-text answer, unparsed
    pub raw: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_without_context() {
        let task = Task::new("\n  Select three courses.\n", "A list", "director");
        let prompt = task.prompt(&[]);

        assert!(prompt.starts_with("Current Task: Select three courses."));
        assert!(prompt.contains("final answer: A list"));
        assert!(!prompt.contains("context you're working with"));
    }

    #[test]
    fn test_prompt_carries_previous_outputs() {
        let task = Task::new("Summarize", "A summary", "writer");
        let earlier = TaskOutput {
            description: "Profile".into(),
            agent: "profiler".into(),
            raw: "Likes hiking".into(),
        };

        let prompt = task.prompt(&[earlier]);
        assert!(prompt.contains("context you're working with:\nLikes hiking"));
    }
}
