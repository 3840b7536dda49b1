//! Agent definition - a role the model is asked to play

use serde::{Deserialize, Serialize};

/// Sampling parameters an agent sends with every request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LlmSettings {
    /// Model name; `None` uses the provider's default
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<usize>,
}

/// A named role with a goal and backstory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub role: String,
    pub goal: String,
    pub backstory: String,
    /// Whether the agent may hand work to other crew members
    #[serde(default)]
    pub allow_delegation: bool,
    /// Log each task this agent runs at info level
    #[serde(default)]
    pub verbose: bool,
    #[serde(default)]
    pub llm: LlmSettings,
}

impl Agent {
    pub fn new(
        role: impl Into<String>,
        goal: impl Into<String>,
        backstory: impl Into<String>,
    ) -> Self {
        Self {
            role: role.into(),
            goal: goal.into(),
            backstory: backstory.into(),
            allow_delegation: false,
            verbose: false,
            llm: LlmSettings::default(),
        }
    }

    pub fn with_llm(mut self, llm: LlmSettings) -> Self {
        self.llm = llm;
        self
    }

    pub fn with_delegation(mut self, allow: bool) -> Self {
        self.allow_delegation = allow;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// The system prompt that puts the model in this agent's role.
    ///
    /// `coworkers` lists the other roles in the crew; they are only
    /// mentioned when delegation is allowed.
    pub fn system_prompt(&self, coworkers: &[&str]) -> String {
        let mut prompt = format!(
            "You are {}. {}\nYour personal goal is: {}",
            self.role, self.backstory, self.goal
        );

        if self.allow_delegation && !coworkers.is_empty() {
            prompt.push_str("\nYou may ask these coworkers for help: ");
            prompt.push_str(&coworkers.join(", "));
        }

        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_prompt_embeds_role_goal_backstory() {
        let agent = Agent::new(
            "course specialist",
            "Match the suitable course to the students",
            "You have exceptional knowledge of courses.",
        );

        let prompt = agent.system_prompt(&["student_profiler"]);
        assert!(prompt.starts_with("You are course specialist."));
        assert!(prompt.contains("exceptional knowledge of courses"));
        assert!(prompt.contains("Your personal goal is: Match the suitable course"));
        assert!(!prompt.contains("student_profiler"));
    }

    #[test]
    fn test_delegation_lists_coworkers() {
        let agent = Agent::new("lead", "coordinate", "Seasoned.").with_delegation(true);
        let prompt = agent.system_prompt(&["analyst", "writer"]);
        assert!(prompt.ends_with("analyst, writer"));
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let agent: Agent = serde_json::from_str(
            r#"{"role": "r", "goal": "g", "backstory": "b", "llm": {"temperature": 0.1}}"#,
        )
        .unwrap();

        assert!(!agent.allow_delegation);
        assert_eq!(agent.llm.temperature, Some(0.1));
        assert!(agent.llm.model.is_none());
    }
}
