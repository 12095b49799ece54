//! Program configuration.

use bp_model::ProgramError;
use serde::{Deserialize, Serialize};

/// Static configuration for a [`Program`](crate::Program).
///
/// ```
/// use bp_program::ProgramConfig;
///
/// let config = ProgramConfig::from_json_str(
///     r#"{ "public_events": ["click"], "restricted_events": ["reset"] }"#,
/// )
/// .unwrap();
/// assert!(config.is_public("click"));
/// assert!(!config.is_public("tick"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProgramConfig {
    /// Event types the public trigger accepts. `None` accepts every type.
    pub public_events: Option<Vec<String>>,
    /// Event types the public trigger refuses even if listed as public.
    pub restricted_events: Vec<String>,
    /// Label carried by the scheduler's tracing spans.
    pub label: Option<String>,
}

impl ProgramConfig {
    /// Accept every event type.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict the public trigger to the given types.
    pub fn with_public_events<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.public_events = Some(types.into_iter().map(Into::into).collect());
        self
    }

    /// Refuse the given types at the public trigger.
    pub fn with_restricted_events<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.restricted_events = types.into_iter().map(Into::into).collect();
        self
    }

    /// Set the tracing label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Parse and validate JSON configuration text.
    pub fn from_json_str(text: &str) -> Result<Self, ProgramError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject a type that is both public and restricted.
    pub fn validate(&self) -> Result<(), ProgramError> {
        let Some(public) = &self.public_events else {
            return Ok(());
        };
        match self.restricted_events.iter().find(|t| public.contains(t)) {
            Some(t) => Err(ProgramError::InvalidConfig(format!(
                "event type \"{t}\" is both public and restricted"
            ))),
            None => Ok(()),
        }
    }

    /// True if the public list admits `event_type`. Restriction is checked
    /// separately.
    pub fn is_public(&self, event_type: &str) -> bool {
        self.public_events
            .as_ref()
            .is_none_or(|public| public.iter().any(|t| t == event_type))
    }
}
