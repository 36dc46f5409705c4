use serde::Serialize;
use strum::{Display, EnumIter, IntoStaticStr};

/// Severity tier of an [`Issue`]. Orders with the most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, IntoStaticStr, EnumIter, Serialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

/// One actionable finding.
///
/// The detail always embeds the measured value that triggered the finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    priority: Priority,
    title: String,
    detail: String,
    recommendation: String,
}

impl Issue {
    #[must_use]
    pub fn new(priority: Priority, title: impl Into<String>, detail: impl Into<String>, recommendation: impl Into<String>) -> Self {
        Self {
            priority,
            title: title.into(),
            detail: detail.into(),
            recommendation: recommendation.into(),
        }
    }

    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn detail(&self) -> &str {
        &self.detail
    }

    #[must_use]
    pub fn recommendation(&self) -> &str {
        &self.recommendation
    }

    /// The same finding, attributed to `subject` (e.g. "Mobile").
    #[must_use]
    pub fn for_subject(self, subject: &str) -> Self {
        Self {
            title: format!("{subject} {}", self.title),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_order() {
        assert!(Priority::High < Priority::Medium);
        assert!(Priority::Medium < Priority::Low);
    }

    #[test]
    fn test_priority_serializes_capitalized() {
        assert_eq!(serde_json::to_value(Priority::Medium).unwrap(), "Medium");
        assert_eq!(Priority::Low.to_string(), "Low");
    }

    #[test]
    fn test_for_subject_prefixes_title_only() {
        let issue = Issue::new(Priority::High, "LCP exceeds good threshold", "LCP is 3200.0ms", "Fix it.").for_subject("Mobile");
        assert_eq!(issue.title(), "Mobile LCP exceeds good threshold");
        assert_eq!(issue.detail(), "LCP is 3200.0ms");
        assert_eq!(issue.priority(), Priority::High);
    }

    #[test]
    fn test_serialized_shape() {
        let issue = Issue::new(Priority::Low, "t", "d", "r");
        let value = serde_json::to_value(&issue).unwrap();
        assert_eq!(value, serde_json::json!({"priority": "Low", "title": "t", "detail": "d", "recommendation": "r"}));
    }
}
