//! # coursecraft-campaign
//!
//! Turns a roster of students and a course list into three course picks per
//! student:
//! - **roster**: CSV text -> `StudentProfile`s
//! - **catalog**: the opaque course list
//! - **prompt**: student description, campaign task, and the three agents
//! - **batch**: one crew per student, strictly in order
//! - **export**: the results table, its CSV form and terminal rendering
//! - **settings**: model settings and the API credential

pub mod batch;
pub mod catalog;
pub mod export;
pub mod prompt;
pub mod roster;
pub mod settings;

pub use batch::{BatchOutcome, Recommender};
pub use catalog::CourseCatalog;
pub use export::{Recommendation, ResultsTable, DEFAULT_EXPORT_FILE};
pub use roster::{parse_roster, StudentProfile, ROSTER_COLUMNS};
pub use settings::Settings;

/// The student data shown in the original form, two rows.
pub const SAMPLE_STUDENTS: &str = "\
Academic Goals, Major, Hobbies, Computer Skills, Interest in Languages, GPA
To become a software engineer, Computer Science, Gaming, Advanced, Spanish, 3.7
To study environmental science, Environmental Science, Hiking, Intermediate, French, 3.5
";

/// The course list shown in the original form.
pub const SAMPLE_COURSES: &str = "\
\"Introduction to Computer Science\" - Harvard University on edX
\"Biology: Life on Earth\" - Coursera
\"Introduction to Psychology\" - Yale University on Coursera
\"Environmental Science\" - University of Leeds on FutureLearn
";
