//! Batch driver - one crew per student, strictly in roster order.
//!
//! There is never more than one model call in flight, and nothing is
//! retried: the first failure ends the batch and no partial table is
//! returned.

use crate::prompt::{describe, recommendation_crew};
use crate::{CourseCatalog, Recommendation, ResultsTable, Settings, StudentProfile};
use coursecraft_crew::LlmSettings;
use coursecraft_error::Result;
use coursecraft_llm::{LlmProvider, OpenAIProvider, UsageTracker};
use tracing::{info, warn};

/// Results of a completed batch
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub table: ResultsTable,
    pub usage: UsageTracker,
}

pub struct Recommender<P> {
    provider: P,
    llm: LlmSettings,
    verbose: bool,
}

impl Recommender<OpenAIProvider> {
    /// An OpenAI-backed recommender. Fails with `CredentialMissing` before
    /// any client exists when the key is unset.
    pub fn openai(settings: &Settings) -> Result<Self> {
        let config = settings.provider_config()?;
        let provider = OpenAIProvider::new(config)?;
        Ok(Self::new(provider, settings.llm_settings()))
    }
}

impl<P: LlmProvider> Recommender<P> {
    pub fn new(provider: P, llm: LlmSettings) -> Self {
        Self {
            provider,
            llm,
            verbose: false,
        }
    }

    /// Have the agents log their work at info level
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Pick three courses for one student
    pub async fn recommend(
        &self,
        profile: &StudentProfile,
        catalog: &CourseCatalog,
    ) -> Result<(Recommendation, UsageTracker)> {
        let description = describe(profile);
        let crew = recommendation_crew(&description, catalog, &self.llm, self.verbose);
        let output = crew.kickoff(&self.provider).await?;

        Ok((
            Recommendation {
                description,
                courses: output.raw.trim().to_string(),
            },
            output.usage,
        ))
    }

    pub async fn run(
        &self,
        profiles: &[StudentProfile],
        catalog: &CourseCatalog,
    ) -> Result<BatchOutcome> {
        self.run_with_progress(profiles, catalog, |_, _| {}).await
    }

    /// Run the batch, calling `progress(done, total)` after each student
    pub async fn run_with_progress<F>(
        &self,
        profiles: &[StudentProfile],
        catalog: &CourseCatalog,
        mut progress: F,
    ) -> Result<BatchOutcome>
    where
        F: FnMut(usize, usize),
    {
        let total = profiles.len();
        info!(
            students = total,
            courses = catalog.line_count(),
            provider = self.provider.name(),
            "starting recommendation batch"
        );

        let mut table = ResultsTable::new();
        let mut usage = UsageTracker::new();

        for (i, profile) in profiles.iter().enumerate() {
            let row = i + 1;
            let (recommendation, row_usage) =
                self.recommend(profile, catalog).await.map_err(|e| {
                    warn!(row, error = %e, "recommendation failed, aborting batch");
                    e.with_operation("batch::run")
                        .with_context("row", row.to_string())
                })?;

            table.push(recommendation);
            usage.merge(&row_usage);
            progress(row, total);
        }

        info!(
            students = table.len(),
            calls = usage.total_calls,
            tokens = usage.total_tokens(),
            "recommendation batch finished"
        );
        Ok(BatchOutcome { table, usage })
    }
}
