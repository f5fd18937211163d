use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Venue {
    #[default]
    Nse,
    Bse,
}

impl Venue {
    pub fn parse(value: &str) -> Result<Self, String> {
        match value.trim().to_lowercase().as_str() {
            "nse" => Ok(Self::Nse),
            "bse" => Ok(Self::Bse),
            _ => Err(format!("unsupported venue: {value}")),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Nse => "NSE",
            Self::Bse => "BSE",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Nse => Self::Bse,
            Self::Bse => Self::Nse,
        }
    }
}

impl std::fmt::Display for Venue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::Venue;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(Venue::parse("BSE").unwrap(), Venue::Bse);
        assert_eq!(Venue::parse(" nse ").unwrap(), Venue::Nse);
        assert!(Venue::parse("mcx").is_err());
        assert_eq!(Venue::default(), Venue::Nse);
    }
}
