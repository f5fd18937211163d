use serde::{Deserialize, Serialize};

/// MCX contracts offered in the commodity selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Commodity {
    #[default]
    Gold,
    GoldM,
    Silver,
    SilverM,
    CrudeOil,
    NaturalGas,
    Copper,
    Zinc,
    Lead,
    Aluminium,
    Nickel,
    MenthaOil,
    Cotton,
}

impl Commodity {
    pub const ALL: [Commodity; 13] = [
        Commodity::Gold,
        Commodity::GoldM,
        Commodity::Silver,
        Commodity::SilverM,
        Commodity::CrudeOil,
        Commodity::NaturalGas,
        Commodity::Copper,
        Commodity::Zinc,
        Commodity::Lead,
        Commodity::Aluminium,
        Commodity::Nickel,
        Commodity::MenthaOil,
        Commodity::Cotton,
    ];

    pub fn parse(value: &str) -> Result<Self, String> {
        let normalized = value.trim().to_uppercase();
        Self::ALL
            .into_iter()
            .find(|c| c.symbol() == normalized)
            .ok_or_else(|| format!("unsupported commodity: {value}"))
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Gold => "GOLD",
            Self::GoldM => "GOLDM",
            Self::Silver => "SILVER",
            Self::SilverM => "SILVERM",
            Self::CrudeOil => "CRUDEOIL",
            Self::NaturalGas => "NATURALGAS",
            Self::Copper => "COPPER",
            Self::Zinc => "ZINC",
            Self::Lead => "LEAD",
            Self::Aluminium => "ALUMINIUM",
            Self::Nickel => "NICKEL",
            Self::MenthaOil => "MENTHAOIL",
            Self::Cotton => "COTTON",
        }
    }

    /// Contract size converting quoted price into notional value.
    pub fn lot_multiplier(self) -> u32 {
        match self {
            Self::Gold => 100,
            Self::GoldM => 10,
            Self::Silver => 30,
            Self::SilverM => 5,
            Self::CrudeOil => 100,
            Self::NaturalGas => 1250,
            Self::Copper => 2500,
            Self::Zinc | Self::Lead | Self::Aluminium => 5000,
            Self::Nickel => 1500,
            Self::MenthaOil => 360,
            Self::Cotton => 25,
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl std::fmt::Display for Commodity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::Commodity;

    #[test]
    fn parse_accepts_symbols_in_any_case() {
        for c in Commodity::ALL {
            assert_eq!(Commodity::parse(&c.symbol().to_lowercase()).unwrap(), c);
        }
        assert!(Commodity::parse("platinum").is_err());
    }

    #[test]
    fn cycling_wraps_around() {
        assert_eq!(Commodity::Cotton.next(), Commodity::Gold);
        assert_eq!(Commodity::Gold.prev(), Commodity::Cotton);
        assert_eq!(Commodity::Gold.next().prev(), Commodity::Gold);
    }

    #[test]
    fn every_lot_multiplier_is_positive() {
        assert!(Commodity::ALL.iter().all(|c| c.lot_multiplier() > 0));
    }
}
