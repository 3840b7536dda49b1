//! The course list, kept as the user typed it.

use coursecraft_error::{Error, Result};
use std::fmt;

/// An unstructured block of course titles and providers.
///
/// Never parsed: the text goes into every prompt verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseCatalog(String);

impl CourseCatalog {
    /// Wrap catalog text, rejecting a blank list
    pub fn new(text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(Error::invalid_argument("course list is empty")
                .with_operation("catalog::new"));
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of non-blank lines, for logging only
    pub fn line_count(&self) -> usize {
        self.0.lines().filter(|l| !l.trim().is_empty()).count()
    }
}

impl fmt::Display for CourseCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SAMPLE_COURSES;
    use coursecraft_error::ErrorKind;

    #[test]
    fn test_catalog_is_verbatim() {
        let catalog = CourseCatalog::new(SAMPLE_COURSES).unwrap();
        assert_eq!(catalog.as_str(), SAMPLE_COURSES);
        assert_eq!(catalog.line_count(), 4);
    }

    #[test]
    fn test_blank_catalog_rejected() {
        let err = CourseCatalog::new(" \n ").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }
}
