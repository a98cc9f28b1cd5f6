// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! record_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Trims surrounding whitespace; blank input yields `None`.
            pub fn parse(raw: &str) -> Option<Self> {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(Self(trimmed.to_owned()))
                }
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

record_id!(RecordId);
record_id!(CaseId);
record_id!(OpportunityId);
record_id!(NoteId);

#[cfg(test)]
mod tests {
    use super::RecordId;

    #[test]
    fn parse_trims_and_rejects_blank() {
        assert_eq!(RecordId::parse("  001xx  "), Some(RecordId::new("001xx")));
        assert_eq!(RecordId::parse("   "), None);
        assert_eq!(RecordId::parse(""), None);
    }

    #[test]
    fn serializes_as_plain_string() -> anyhow::Result<()> {
        let id = RecordId::new("003abc");
        assert_eq!(serde_json::to_string(&id)?, "\"003abc\"");
        let back: RecordId = serde_json::from_str("\"003abc\"")?;
        assert_eq!(back, id);
        Ok(())
    }
}
