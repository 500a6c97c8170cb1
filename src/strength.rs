//! Heuristic password strength scoring.
//!
//! A password is checked against five independent criteria and the score is
//! the number of criteria it meets. The score maps onto a fixed five-step
//! [`StrengthLevel`] scale.

use tracing::trace;

pub const MIN_LENGTH: usize = 8;

pub const SPECIAL_CHARACTERS: &str = "!@#$%^&*(),.?\":{}|<>";

pub const MAX_SCORE: u8 = 5;

/// Outcome of each individual check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Criteria {
    pub length: bool,
    pub uppercase: bool,
    pub lowercase: bool,
    pub digit: bool,
    pub special: bool,
}

impl Criteria {
    pub fn check(password: &str) -> Self {
        Self {
            length: password.chars().count() >= MIN_LENGTH,
            uppercase: password.chars().any(|c| c.is_ascii_uppercase()),
            lowercase: password.chars().any(|c| c.is_ascii_lowercase()),
            digit: password.chars().any(|c| c.is_ascii_digit()),
            special: password.chars().any(|c| SPECIAL_CHARACTERS.contains(c)),
        }
    }

    /// Criteria in display order, paired with their descriptions.
    pub fn items(&self) -> [(String, bool); 5] {
        [
            (format!("Length (Minimum {} characters)", MIN_LENGTH), self.length),
            ("Uppercase Letters".to_string(), self.uppercase),
            ("Lowercase Letters".to_string(), self.lowercase),
            ("Numbers".to_string(), self.digit),
            ("Special Characters".to_string(), self.special),
        ]
    }

    pub fn count(&self) -> u8 {
        [
            self.length,
            self.uppercase,
            self.lowercase,
            self.digit,
            self.special,
        ]
        .iter()
        .filter(|met| **met)
        .count() as u8
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Evaluation {
    pub score: u8,
    pub criteria: Criteria,
}

impl Evaluation {
    pub fn level(&self) -> StrengthLevel {
        StrengthLevel::from_score(self.score)
    }
}

pub fn evaluate(password: &str) -> Evaluation {
    let criteria = Criteria::check(password);
    let score = criteria.count();

    trace!(score, "evaluated password");

    Evaluation { score, criteria }
}

/// Absent input scores like the empty string.
pub fn evaluate_optional(password: Option<&str>) -> Evaluation {
    evaluate(password.unwrap_or_default())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum StrengthLevel {
    VeryWeak,
    Weak,
    Medium,
    Strong,
    VeryStrong,
}

impl StrengthLevel {
    const STEPS: u64 = 5;

    /// Scores past the top of the scale land on [`StrengthLevel::VeryStrong`].
    pub fn from_score(score: u8) -> Self {
        match score {
            0 => StrengthLevel::VeryWeak,
            1 => StrengthLevel::Weak,
            2 => StrengthLevel::Medium,
            3 => StrengthLevel::Strong,
            _ => StrengthLevel::VeryStrong,
        }
    }

    pub fn index(self) -> usize {
        match self {
            StrengthLevel::VeryWeak => 0,
            StrengthLevel::Weak => 1,
            StrengthLevel::Medium => 2,
            StrengthLevel::Strong => 3,
            StrengthLevel::VeryStrong => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StrengthLevel::VeryWeak => "Very Weak",
            StrengthLevel::Weak => "Weak",
            StrengthLevel::Medium => "Medium",
            StrengthLevel::Strong => "Strong",
            StrengthLevel::VeryStrong => "Very Strong",
        }
    }

    pub fn sentiment(self) -> &'static str {
        match self {
            StrengthLevel::VeryWeak => "😟",
            StrengthLevel::Weak => "😕",
            StrengthLevel::Medium => "😐",
            StrengthLevel::Strong => "😊",
            StrengthLevel::VeryStrong => "😎",
        }
    }

    pub fn feedback(self) -> (Severity, &'static str) {
        match self {
            StrengthLevel::VeryWeak => (
                Severity::Error,
                "Your password is very weak. Consider using a longer password with a mix of characters.",
            ),
            StrengthLevel::Weak => (
                Severity::Warning,
                "Your password is weak. Add more complexity (e.g., uppercase letters, numbers, or special characters).",
            ),
            StrengthLevel::Medium => (
                Severity::Warning,
                "Your password is medium. Consider adding more complexity to make it stronger.",
            ),
            StrengthLevel::Strong => (Severity::Success, "Your password is strong. Good job!"),
            StrengthLevel::VeryStrong => {
                (Severity::Success, "Your password is very strong. Excellent!")
            }
        }
    }

    /// Fill ratio of the strength bar, in `(0, 1]`.
    pub fn fraction(self) -> f64 {
        (self.index() + 1) as f64 / Self::STEPS as f64
    }

    pub fn steps() -> u64 {
        Self::STEPS
    }
}

impl std::fmt::Display for StrengthLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Success,
}
