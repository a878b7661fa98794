//! UI trigger identifiers.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Discrete user interaction delivered to a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Trigger {
    /// Guarded read through a weak handle.
    Check,
    /// Unguarded read through a raw handle.
    Crash,
    /// External deletion of the tracked entity.
    DeleteObject,
}

impl Trigger {
    pub const ALL: [Trigger; 3] = [Trigger::Check, Trigger::Crash, Trigger::DeleteObject];

    /// Button caption for this trigger.
    pub fn label(self) -> &'static str {
        match self {
            Self::Check => "check",
            Self::Crash => "crash",
            Self::DeleteObject => "delete object",
        }
    }
}

impl Display for Trigger {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Trigger {
    type Err = ParseTriggerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "check" => Ok(Self::Check),
            "crash" => Ok(Self::Crash),
            "delete object" | "delete-object" | "delete_object" | "delete" => {
                Ok(Self::DeleteObject)
            }
            other => Err(ParseTriggerError(other.to_string())),
        }
    }
}

/// Unknown trigger label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTriggerError(pub String);

impl Display for ParseTriggerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown trigger `{}`; expected check|crash|delete object",
            self.0
        )
    }
}

impl Error for ParseTriggerError {}

#[cfg(test)]
mod tests {
    use super::Trigger;

    #[test]
    fn parses_labels_and_aliases() {
        for trigger in Trigger::ALL {
            assert_eq!(
                trigger.label().parse::<Trigger>().expect("label should parse"),
                trigger
            );
        }
        assert_eq!(
            " Delete-Object ".parse::<Trigger>().expect("alias should parse"),
            Trigger::DeleteObject
        );
    }

    #[test]
    fn rejects_unknown_label() {
        let err = "paint".parse::<Trigger>().expect_err("unknown label must fail");
        assert!(err.to_string().contains("paint"));
    }
}
