//! Prompt building and the recommendation crew.

use crate::{CourseCatalog, StudentProfile};
use coursecraft_crew::{Agent, Crew, LlmSettings, Process, Task};

pub const STUDENT_PROFILER: &str = "student_profiler";
pub const COURSE_SPECIALIST: &str = "course specialist";
pub const RECOMMENDATION_DIRECTOR: &str = "Chief Recommendation Director";

const EXPECTED_OUTPUT: &str = "A finalized marketing campaign";

/// Describe a student in the form handed to the model.
///
/// Every value is copied verbatim from the roster row.
pub fn describe(profile: &StudentProfile) -> String {
    format!(
        "Academic goals: {}\n\
         Major: {}\n\
         Hobbies: {}\n\
         Computer skills: {}\n\
         Language interest: {}\n\
         GPA: {}",
        profile.academic_goals,
        profile.major,
        profile.hobbies,
        profile.computer_skills,
        profile.language_interest,
        profile.gpa,
    )
}

/// The task text: the student, the catalog, and the three-course instruction.
pub fn campaign_task(description: &str, catalog: &CourseCatalog) -> String {
    format!(
        "You're creating a targeted marketing campaign based on the student's profile.\n\
         This is all we know from the student customer: {}.\n\
         These are the courses available: {}.\n\
         Your task: select exactly 3 courses best suited for this customer.",
        description,
        catalog.as_str(),
    )
}

/// The three agents every recommendation crew is made of
pub fn agents(llm: &LlmSettings, verbose: bool) -> Vec<Agent> {
    vec![
        Agent::new(
            STUDENT_PROFILER,
            "From limited data, you logically deduct conclusions about students.",
            "You are an expert psychologist with decades of experience.",
        ),
        Agent::new(
            COURSE_SPECIALIST,
            "Match the suitable course to the students",
            "You have exceptional knowledge of courses.",
        ),
        Agent::new(
            RECOMMENDATION_DIRECTOR,
            "Oversee and align work with campaign goals",
            "Chief Promotion Officer of a large EdTech company.",
        ),
    ]
    .into_iter()
    .map(|agent| agent.with_llm(llm.clone()).with_delegation(false).with_verbose(verbose))
    .collect()
}

/// A crew that picks three courses for one student
pub fn recommendation_crew(
    description: &str,
    catalog: &CourseCatalog,
    llm: &LlmSettings,
    verbose: bool,
) -> Crew {
    let task = Task::new(
        campaign_task(description, catalog),
        EXPECTED_OUTPUT,
        RECOMMENDATION_DIRECTOR,
    );
    Crew::new(agents(llm, verbose), vec![task], Process::Sequential)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parse_roster, SAMPLE_COURSES, SAMPLE_STUDENTS};

    fn first_student() -> StudentProfile {
        parse_roster(SAMPLE_STUDENTS).unwrap().remove(0)
    }

    #[test]
    fn test_description_is_verbatim() {
        let description = describe(&first_student());

        assert!(description.contains("Academic goals: To become a software engineer"));
        assert!(description.contains("Major: Computer Science"));
        assert!(description.contains("Hobbies: Gaming"));
        assert!(description.contains("Computer skills: Advanced"));
        assert!(description.contains("Language interest: Spanish"));
        assert!(description.contains("GPA: 3.7"));
    }

    #[test]
    fn test_gpa_text_is_not_reformatted() {
        let mut profile = first_student();
        profile.gpa = "3.70".into();
        assert!(describe(&profile).ends_with("GPA: 3.70"));
    }

    #[test]
    fn test_campaign_task_embeds_student_and_catalog() {
        let catalog = CourseCatalog::new(SAMPLE_COURSES).unwrap();
        let description = describe(&first_student());
        let task = campaign_task(&description, &catalog);

        assert!(task.contains(&description));
        assert!(task.contains("\"Biology: Life on Earth\" - Coursera"));
        // the catalog goes in byte for byte, trailing newline included
        assert!(task.contains(&format!("These are the courses available: {}.\n", SAMPLE_COURSES)));
        assert!(task.contains("select exactly 3 courses"));
    }

    #[test]
    fn test_catalog_whitespace_is_kept() {
        let catalog = CourseCatalog::new("  Art History - Coursera  \n\n").unwrap();
        let task = campaign_task("Major: Art", &catalog);
        assert!(task.contains("available:   Art History - Coursera  \n\n."));
    }

    #[test]
    fn test_crew_assigns_task_to_director() {
        let catalog = CourseCatalog::new(SAMPLE_COURSES).unwrap();
        let llm = LlmSettings {
            model: Some("gpt-3.5-turbo-16k".into()),
            temperature: Some(0.1),
            max_tokens: Some(8000),
        };
        let crew = recommendation_crew("Major: Art", &catalog, &llm, false);

        assert_eq!(crew.agents.len(), 3);
        assert_eq!(crew.tasks.len(), 1);
        assert_eq!(crew.tasks[0].agent, RECOMMENDATION_DIRECTOR);
        assert_eq!(crew.tasks[0].expected_output, "A finalized marketing campaign");
        assert!(crew.agents.iter().all(|a| !a.allow_delegation && a.llm == llm));
        assert!(crew.validate().is_ok());
    }
}
