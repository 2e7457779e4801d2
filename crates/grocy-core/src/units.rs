//! # Units Module
//!
//! Mass unit conversion for recipe ingredients.
//!
//! Callers may give ingredient amounts in one unit ("250 g") while Grocy
//! expects each product's stock unit. Units are matched by alias and
//! converted through a gram factor table. Any pair outside the table is
//! passed through unchanged with an explanatory note; conversion never fails.

/// A recognised mass unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MassUnit {
    Gram,
    Kilogram,
    Ounce,
    Pound,
}

impl MassUnit {
    /// Recognise a unit by name (`g`, `gram`, `grams`, ...), ignoring case.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "g" | "gram" | "grams" => Some(Self::Gram),
            "kg" | "kilogram" | "kilograms" => Some(Self::Kilogram),
            "oz" | "ounce" | "ounces" => Some(Self::Ounce),
            "lb" | "pound" | "pounds" => Some(Self::Pound),
            _ => None,
        }
    }

    /// Grams per one of this unit.
    #[must_use]
    pub const fn grams(self) -> f64 {
        match self {
            Self::Gram => 1.0,
            Self::Kilogram => 1000.0,
            Self::Ounce => 28.3495,
            Self::Pound => 453.592,
        }
    }

    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Gram => "g",
            Self::Kilogram => "kg",
            Self::Ounce => "oz",
            Self::Pound => "lb",
        }
    }

    /// Imperial amounts are shown to two decimals.
    fn format(self, amount: f64) -> String {
        match self {
            Self::Ounce | Self::Pound => format!("{amount:.2}"),
            Self::Gram | Self::Kilogram => format!("{amount}"),
        }
    }
}

/// Result of converting one ingredient amount.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    /// Amount in the stock unit (unchanged when not converted).
    pub amount: f64,
    /// Parenthesised note appended to the ingredient note.
    pub note: String,
}

/// Convert `amount` from `source_unit` into `stock_unit`.
///
/// Both names are free text as entered by the caller or stored in Grocy.
#[must_use]
pub fn convert(amount: f64, source_unit: &str, stock_unit: &str) -> Conversion {
    match (MassUnit::parse(source_unit), MassUnit::parse(stock_unit)) {
        (Some(from), Some(to)) if from == to => Conversion {
            amount,
            note: format!("({}{})", from.format(amount), from.symbol()),
        },
        (Some(from), Some(to)) => {
            let converted = amount * from.grams() / to.grams();
            Conversion {
                amount: converted,
                note: format!(
                    "({}{} → {}{})",
                    from.format(amount),
                    from.symbol(),
                    to.format(converted),
                    to.symbol()
                ),
                }
        }
        _ => Conversion {
            amount,
            note: format!("(no conversion: {source_unit} → {stock_unit})"),
        },
    }
}

// =============================================================================
// TESTS
// =============================================================================
