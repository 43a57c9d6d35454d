//! Closed policy enumerations and their string forms.

use crate::error::PolicyError;
use serde::{Deserialize, Serialize};

/// How many logical instances of a component are shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LifestylePolicy {
    /// A new instance per request.
    Transient,
    /// One instance per thread.
    Thread,
    /// One shared instance.
    Singleton,
}

impl LifestylePolicy {
    /// Parses a lifestyle name, case-insensitively.
    ///
    /// | Accepted | Policy |
    /// |----------|--------|
    /// | `transient`, `request` | [`Transient`](Self::Transient) |
    /// | `thread`, `per-thread` | [`Thread`](Self::Thread) |
    /// | `singleton`, `shared` | [`Singleton`](Self::Singleton) |
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError`] for any other value.
    pub fn parse(value: &str) -> Result<Self, PolicyError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "transient" | "request" => Ok(Self::Transient),
            "thread" | "per-thread" => Ok(Self::Thread),
            "singleton" | "shared" => Ok(Self::Singleton),
            _ => Err(PolicyError {
                kind: "lifestyle policy",
                value: value.to_string(),
            }),
        }
    }

    /// Returns the canonical name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Transient => "transient",
            Self::Thread => "thread",
            Self::Singleton => "singleton",
        }
    }
}

/// Retention strength applied to idle instances.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollectionPolicy {
    /// Collected as soon as unreferenced.
    Weak,
    /// Collected under memory pressure.
    Soft,
    /// Never collected while the container runs.
    Hard,
    /// Container default.
    #[default]
    System,
}

impl CollectionPolicy {
    /// Parses a collection policy name, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError`] if the value is not `weak`, `soft`, `hard`,
    /// or `system`.
    pub fn parse(value: &str) -> Result<Self, PolicyError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "weak" => Ok(Self::Weak),
            "soft" => Ok(Self::Soft),
            "hard" => Ok(Self::Hard),
            "system" => Ok(Self::System),
            _ => Err(PolicyError {
                kind: "collection policy",
                value: value.to_string(),
            }),
        }
    }

    /// Returns the canonical name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Weak => "weak",
            Self::Soft => "soft",
            Self::Hard => "hard",
            Self::System => "system",
        }
    }
}

/// When a component is instantiated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivationPolicy {
    /// At container startup.
    Startup,
    /// On first use.
    Demand,
    /// Container default.
    #[default]
    System,
}

impl ActivationPolicy {
    /// Parses an activation policy name, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError`] if the value is not `startup`, `demand`, or
    /// `system`.
    pub fn parse(value: &str) -> Result<Self, PolicyError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "startup" => Ok(Self::Startup),
            "demand" => Ok(Self::Demand),
            "system" => Ok(Self::System),
            _ => Err(PolicyError {
                kind: "activation policy",
                value: value.to_string(),
            }),
        }
    }

    /// Returns the canonical name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Startup => "startup",
            Self::Demand => "demand",
            Self::System => "system",
        }
    }
}

/// Logging priority of a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    /// Debug output.
    Debug,
    /// Informational output.
    Info,
    /// Warnings.
    Warn,
    /// Errors.
    Error,
}

impl Priority {
    /// Parses a priority name, case-insensitively. `warning` is accepted for
    /// [`Warn`](Self::Warn).
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError`] for unknown names.
    pub fn parse(value: &str) -> Result<Self, PolicyError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(PolicyError {
                kind: "logging priority",
                value: value.to_string(),
            }),
        }
    }

    /// Returns the canonical name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

macro_rules! policy_text {
    ($($policy:ty),*) => {$(
        impl core::fmt::Display for $policy {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl core::str::FromStr for $policy {
            type Err = PolicyError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                Self::parse(value)
            }
        }
    )*};
}

policy_text!(LifestylePolicy, CollectionPolicy, ActivationPolicy, Priority);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifestyle_synonyms() {
        assert_eq!(LifestylePolicy::parse("request").unwrap(), LifestylePolicy::Transient);
        assert_eq!(LifestylePolicy::parse("TRANSIENT").unwrap(), LifestylePolicy::Transient);
        assert_eq!(LifestylePolicy::parse("thread").unwrap(), LifestylePolicy::Thread);
        assert_eq!(LifestylePolicy::parse("shared").unwrap(), LifestylePolicy::Singleton);
        assert_eq!(LifestylePolicy::parse("Singleton").unwrap(), LifestylePolicy::Singleton);
    }

    #[test]
    fn lifestyle_rejects_unknown() {
        let error = LifestylePolicy::parse("pooled").unwrap_err();
        assert_eq!(error.to_string(), "Unrecognized lifestyle policy argument [pooled]");
    }

    #[test]
    fn collection_round_trips_through_text() {
        for policy in [
            CollectionPolicy::Weak,
            CollectionPolicy::Soft,
            CollectionPolicy::Hard,
            CollectionPolicy::System,
        ] {
            assert_eq!(policy.to_string().parse::<CollectionPolicy>().unwrap(), policy);
        }
        assert!(CollectionPolicy::parse("strong").is_err());
    }

    #[test]
    fn defaults() {
        assert_eq!(CollectionPolicy::default(), CollectionPolicy::System);
        assert_eq!(ActivationPolicy::default(), ActivationPolicy::System);
    }

    #[test]
    fn priority_accepts_warning() {
        assert_eq!(Priority::parse("WARNING").unwrap(), Priority::Warn);
        assert!(Priority::parse("trace").is_err());
    }
}
