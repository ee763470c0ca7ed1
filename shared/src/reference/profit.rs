//! Profit reference data: expected yields and indicative market prices

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::types::{AreaUnit, Crop, YieldUnit};

/// Yield assumed for a catalog crop with no reference entry, per acre
pub const FALLBACK_YIELD_PER_ACRE: Decimal = dec!(20);

/// Expected yield and indicative price of a crop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropEconomics {
    pub yield_per_acre: Decimal,
    pub unit: YieldUnit,
    /// Indicative market price per yield unit
    pub suggested_price: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfitReference;

impl ProfitReference {
    pub fn basis(&self) -> AreaUnit {
        AreaUnit::Acre
    }

    pub fn economics(&self, crop: Crop) -> Option<CropEconomics> {
        let quintal = |yield_per_acre, suggested_price| {
            Some(CropEconomics {
                yield_per_acre,
                unit: YieldUnit::Quintal,
                suggested_price,
            })
        };
        match crop {
            Crop::Wheat => quintal(dec!(20), dec!(2200)),
            Crop::Rice => quintal(dec!(25), dec!(2100)),
            Crop::Maize => quintal(dec!(18), dec!(1800)),
            Crop::Tomato => quintal(dec!(120), dec!(1000)),
            Crop::Potato => quintal(dec!(90), dec!(900)),
            Crop::Onion => quintal(dec!(80), dec!(1200)),
            _ => None,
        }
    }

    pub fn crops(&self) -> Vec<Crop> {
        Crop::ALL
            .into_iter()
            .filter(|c| self.economics(*c).is_some())
            .collect()
    }
}
