use super::Issue;

/// What a rule does when a value it needs is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Absence {
    /// An absent value can never trigger the rule.
    NoFinding,

    /// An absent value counts as zero.
    TreatAsZero,
}

impl Absence {
    /// Apply this policy to a possibly absent value.
    #[must_use]
    pub fn resolve<T: Default>(self, value: Option<T>) -> Option<T> {
        match self {
            Self::NoFinding => value,
            Self::TreatAsZero => Some(value.unwrap_or_default()),
        }
    }
}

/// A pure threshold predicate with its issue template.
#[derive(Debug)]
pub struct Rule<S: ?Sized> {
    pub name: &'static str,
    pub absence: Absence,
    pub check: fn(&S, Absence) -> Option<Issue>,
}

macro_rules! rule {
    ($name:expr, $absence:ident, $check:expr) => {
        $crate::rules::Rule {
            name: $name,
            absence: $crate::rules::Absence::$absence,
            check: $check,
        }
    };
}

pub(crate) use rule;

/// Evaluate `rules` in order against `subject`.
///
/// Issues come out in rule order; nothing is re-sorted.
pub fn evaluate<S: ?Sized>(rules: &[Rule<S>], subject: &S) -> Vec<Issue> {
    rules.iter().filter_map(|rule| (rule.check)(subject, rule.absence)).collect()
}

/// Format a number the way measured values appear in issue details: always with a fractional
/// part (`3200.0`, `0.05`).
#[must_use]
pub fn decimal(value: f64) -> String {
    format!("{value:?}")
}
