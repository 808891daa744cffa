//! Live password strength meter for the signup form.

use std::rc::Rc;

/// Minimum length, in characters, for the length requirement.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// One of the five password rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Requirement {
    Length,
    Uppercase,
    Lowercase,
    Number,
    Special,
}

impl Requirement {
    /// All rules, in display order.
    pub const ALL: [Self; 5] = [
        Self::Length,
        Self::Uppercase,
        Self::Lowercase,
        Self::Number,
        Self::Special,
    ];

    /// Class of the rule's list item.
    #[must_use]
    pub const fn class_name(self) -> &'static str {
        match self {
            Self::Length => "req-length",
            Self::Uppercase => "req-uppercase",
            Self::Lowercase => "req-lowercase",
            Self::Number => "req-number",
            Self::Special => "req-special",
        }
    }

    /// Text of the rule's list item.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Length => "At least 8 characters",
            Self::Uppercase => "One uppercase letter",
            Self::Lowercase => "One lowercase letter",
            Self::Number => "One number",
            Self::Special => "One special character",
        }
    }

    /// Whether `password` satisfies the rule.
    #[must_use]
    pub fn is_met(self, password: &str) -> bool {
        match self {
            Self::Length => password.chars().count() >= MIN_PASSWORD_LENGTH,
            Self::Uppercase => password.chars().any(|c| c.is_ascii_uppercase()),
            Self::Lowercase => password.chars().any(|c| c.is_ascii_lowercase()),
            Self::Number => password.chars().any(|c| c.is_ascii_digit()),
            Self::Special => password.chars().any(|c| !c.is_ascii_alphanumeric()),
        }
    }
}

/// Strength bucket derived from how many rules are met.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrengthTier {
    Weak,
    Medium,
    Strong,
}

impl StrengthTier {
    /// 0-2 rules is weak, 3-4 medium, all 5 strong.
    #[must_use]
    pub const fn from_met_count(met: usize) -> Self {
        match met {
            0..=2 => Self::Weak,
            3 | 4 => Self::Medium,
            _ => Self::Strong,
        }
    }

    /// Class added to the fill bar and the text.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Weak => "weak",
            Self::Medium => "medium",
            Self::Strong => "strong",
        }
    }

    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Weak => "Weak password",
            Self::Medium => "Medium password",
            Self::Strong => "Strong password",
        }
    }
}

/// Evaluation of one password value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordReport {
    met: [bool; 5],
    tier: StrengthTier,
    empty: bool,
}

impl PasswordReport {
    /// Evaluate `password` from scratch.
    #[must_use]
    pub fn evaluate(password: &str) -> Self {
        let met = Requirement::ALL.map(|req| req.is_met(password));
        let count = met.iter().filter(|m| **m).count();
        Self {
            met,
            tier: StrengthTier::from_met_count(count),
            empty: password.is_empty(),
        }
    }

    #[must_use]
    pub fn is_met(&self, requirement: Requirement) -> bool {
        self.requirements()
            .find(|(r, _)| *r == requirement)
            .is_some_and(|(_, met)| met)
    }

    /// Number of rules met.
    #[must_use]
    pub fn met_count(&self) -> usize {
        self.met.iter().filter(|m| **m).count()
    }

    #[must_use]
    pub const fn tier(&self) -> StrengthTier {
        self.tier
    }

    /// Strength text; empty for an empty password.
    #[must_use]
    pub const fn text(&self) -> &'static str {
        if self.empty { "" } else { self.tier.message() }
    }

    /// Each rule with its state, in display order.
    pub fn requirements(&self) -> impl Iterator<Item = (Requirement, bool)> + '_ {
        Requirement::ALL.into_iter().zip(self.met)
    }
}

/// The meter's rendered parts.
pub trait PasswordMeterView {
    /// Mark a rule's item `valid` or `invalid`.
    fn set_requirement(&self, requirement: Requirement, met: bool);
    /// Set the fill bar and text classes to `tier`, and the text to `text`.
    fn set_strength(&self, tier: StrengthTier, text: &str);
}

/// Re-renders the meter on every input event.
pub struct PasswordMeter {
    view: Rc<dyn PasswordMeterView>,
}

impl PasswordMeter {
    #[must_use]
    pub fn new(view: Rc<dyn PasswordMeterView>) -> Self {
        Self { view }
    }

    /// Render the meter for the field's current value.
    pub fn update(&self, password: &str) -> PasswordReport {
        let report = PasswordReport::evaluate(password);
        for (requirement, met) in report.requirements() {
            self.view.set_requirement(requirement, met);
        }
        self.view.set_strength(report.tier(), report.text());
        report
    }
}
