//! Name-based classification of placeholder variables.
//!
//! Rules are evaluated top to bottom and the first match wins. Every name
//! falls through to [`DEFAULT_VALUE`], so classification never fails.

use rand::distributions::Alphanumeric;
use rand::rngs::OsRng;
use rand::Rng;

/// Value used when no rule matches.
pub const DEFAULT_VALUE: &str = "changeme";

/// Length of generated placeholder secrets.
pub const SECRET_LENGTH: usize = 24;

/// How a placeholder value is produced for a matching name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueGenerator {
    /// Random alphanumeric string drawn from the operating system CSPRNG.
    Secret { length: usize },
    /// `<target>_<suffix>`, with the target sanitized to `[a-z0-9_]`.
    TargetDerived { suffix: &'static str },
    /// A fixed value.
    Literal(&'static str),
}

impl ValueGenerator {
    pub fn generate(&self, target: &str) -> String {
        match self {
            ValueGenerator::Secret { length } => generate_secret(*length),
            ValueGenerator::TargetDerived { suffix } => {
                format!("{}_{}", sanitize_target(target), suffix)
            }
            ValueGenerator::Literal(value) => (*value).to_string(),
        }
    }

    pub fn is_random(&self) -> bool {
        matches!(self, ValueGenerator::Secret { .. })
    }
}

/// One row of the classification table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassificationRule {
    /// Uppercase substrings; any one matching selects this rule.
    pub patterns: &'static [&'static str],
    pub generator: ValueGenerator,
}

impl ClassificationRule {
    pub fn matches(&self, name: &str) -> bool {
        let upper = name.to_uppercase();
        self.patterns.iter().any(|p| upper.contains(p))
    }
}

/// Ordered classification table.
///
/// HOST and PORT sit above DATABASE so `DB_HOST`/`DB_PORT` get connection
/// defaults rather than a database name.
pub static RULES: &[ClassificationRule] = &[
    ClassificationRule {
        patterns: &["PASSWORD", "PASS", "SECRET", "TOKEN"],
        generator: ValueGenerator::Secret {
            length: SECRET_LENGTH,
        },
    },
    ClassificationRule {
        patterns: &["HOST", "HOSTNAME"],
        generator: ValueGenerator::Literal("localhost"),
    },
    ClassificationRule {
        patterns: &["PORT"],
        generator: ValueGenerator::Literal("8080"),
    },
    ClassificationRule {
        patterns: &["USER", "USERNAME"],
        generator: ValueGenerator::TargetDerived { suffix: "user" },
    },
    ClassificationRule {
        patterns: &["DATABASE", "DB"],
        generator: ValueGenerator::TargetDerived { suffix: "database" },
    },
    ClassificationRule {
        patterns: &["EMAIL", "MAIL"],
        generator: ValueGenerator::Literal("admin@example.com"),
    },
    ClassificationRule {
        patterns: &["DOMAIN", "URL"],
        generator: ValueGenerator::Literal("https://example.com"),
    },
];

/// Classifies variable names for a single target.
#[derive(Debug, Clone)]
pub struct Classifier<'a> {
    target: String,
    rules: &'a [ClassificationRule],
}

impl Classifier<'static> {
    pub fn new(target: impl Into<String>) -> Self {
        Self::with_rules(target, RULES)
    }
}

impl<'a> Classifier<'a> {
    pub fn with_rules(target: impl Into<String>, rules: &'a [ClassificationRule]) -> Self {
        Self {
            target: target.into(),
            rules,
        }
    }

    /// The first rule matching `name`, if any.
    pub fn rule_for(&self, name: &str) -> Option<&ClassificationRule> {
        self.rules.iter().find(|rule| rule.matches(name))
    }

    /// Placeholder value for `name`.
    pub fn classify(&self, name: &str) -> String {
        match self.rule_for(name) {
            Some(rule) => rule.generator.generate(&self.target),
            None => DEFAULT_VALUE.to_string(),
        }
    }
}

/// Random alphanumeric secret from the OS random source.
pub fn generate_secret(length: usize) -> String {
    OsRng
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

fn sanitize_target(target: &str) -> String {
    target
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
