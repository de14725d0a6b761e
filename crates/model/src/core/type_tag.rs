use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Declared type of an ordering-key column, as reported by schema reflection
/// or supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeTag {
    String,
    Number,
    Date,
    Boolean,
    /// Reflection could not tell a date from a generic object.
    Unknown,
}

impl TypeTag {
    pub fn name(&self) -> &'static str {
        match self {
            TypeTag::String => "string",
            TypeTag::Number => "number",
            TypeTag::Date => "date",
            TypeTag::Boolean => "boolean",
            TypeTag::Unknown => "unknown",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TypeTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "string" | "text" | "varchar" => Ok(TypeTag::String),
            "number" | "int" | "integer" | "bigint" => Ok(TypeTag::Number),
            "date" | "timestamp" | "datetime" => Ok(TypeTag::Date),
            "boolean" | "bool" => Ok(TypeTag::Boolean),
            "unknown" | "object" => Ok(TypeTag::Unknown),
            other => Err(format!("Unknown type tag: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!("INT".parse::<TypeTag>(), Ok(TypeTag::Number));
        assert_eq!("timestamp".parse::<TypeTag>(), Ok(TypeTag::Date));
        assert_eq!(" object ".parse::<TypeTag>(), Ok(TypeTag::Unknown));
        assert!("blob".parse::<TypeTag>().is_err());
    }

    #[test]
    fn test_display_round_trips() {
        for tag in [
            TypeTag::String,
            TypeTag::Number,
            TypeTag::Date,
            TypeTag::Boolean,
            TypeTag::Unknown,
        ] {
            assert_eq!(tag.to_string().parse::<TypeTag>(), Ok(tag));
        }
    }
}
