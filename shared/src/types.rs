//! Common types used across the calculators

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::units;

/// The three calculator strategies
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CalculatorType {
    Fertilizer,
    Pesticide,
    Profit,
}

impl CalculatorType {
    pub const ALL: [CalculatorType; 3] = [
        CalculatorType::Fertilizer,
        CalculatorType::Pesticide,
        CalculatorType::Profit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CalculatorType::Fertilizer => "fertilizer",
            CalculatorType::Pesticide => "pesticide",
            CalculatorType::Profit => "profit",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fertilizer" => Some(CalculatorType::Fertilizer),
            "pesticide" => Some(CalculatorType::Pesticide),
            "profit" => Some(CalculatorType::Profit),
            _ => None,
        }
    }

    /// Namespaced key of the local rolling window for this calculator
    pub fn storage_key(&self) -> String {
        format!("{}Calculations", self.as_str())
    }
}

impl std::fmt::Display for CalculatorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unit an area was entered in
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AreaUnit {
    #[serde(alias = "acres")]
    Acre,
    #[serde(alias = "hectares", alias = "ha")]
    Hectare,
}

impl AreaUnit {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "acre" | "acres" | "ac" => Some(AreaUnit::Acre),
            "hectare" | "hectares" | "ha" => Some(AreaUnit::Hectare),
            _ => None,
        }
    }
}

impl std::fmt::Display for AreaUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AreaUnit::Acre => write!(f, "acre"),
            AreaUnit::Hectare => write!(f, "hectare"),
        }
    }
}

/// A field area together with the unit it was entered in
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Area {
    pub value: Decimal,
    pub unit: AreaUnit,
}

impl Area {
    pub fn new(value: Decimal, unit: AreaUnit) -> Self {
        Self { value, unit }
    }

    pub fn acres(value: Decimal) -> Self {
        Self::new(value, AreaUnit::Acre)
    }

    pub fn hectares(value: Decimal) -> Self {
        Self::new(value, AreaUnit::Hectare)
    }

    pub fn in_acres(&self) -> Decimal {
        units::to_acres(self.value, self.unit)
    }

    pub fn in_hectares(&self) -> Decimal {
        units::to_hectares(self.value, self.unit)
    }

    /// Area expressed in the given unit
    pub fn in_unit(&self, unit: AreaUnit) -> Decimal {
        match unit {
            AreaUnit::Acre => self.in_acres(),
            AreaUnit::Hectare => self.in_hectares(),
        }
    }
}

impl std::fmt::Display for Area {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.value.normalize(), self.unit)
    }
}

/// Crops known to at least one reference table
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Crop {
    Rice,
    Wheat,
    #[serde(alias = "corn")]
    Maize,
    Tomato,
    Potato,
    Cotton,
    Soybean,
    Coffee,
    Sugarcane,
    Chickpea,
    Onion,
    Garlic,
    Banana,
    Mango,
    Coconut,
    Chili,
    Cabbage,
    Cauliflower,
    Okra,
    Apple,
    Grapes,
    Citrus,
    Vegetables,
}

impl Crop {
    pub const ALL: [Crop; 23] = [
        Crop::Rice,
        Crop::Wheat,
        Crop::Maize,
        Crop::Tomato,
        Crop::Potato,
        Crop::Cotton,
        Crop::Soybean,
        Crop::Coffee,
        Crop::Sugarcane,
        Crop::Chickpea,
        Crop::Onion,
        Crop::Garlic,
        Crop::Banana,
        Crop::Mango,
        Crop::Coconut,
        Crop::Chili,
        Crop::Cabbage,
        Crop::Cauliflower,
        Crop::Okra,
        Crop::Apple,
        Crop::Grapes,
        Crop::Citrus,
        Crop::Vegetables,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Crop::Rice => "rice",
            Crop::Wheat => "wheat",
            Crop::Maize => "maize",
            Crop::Tomato => "tomato",
            Crop::Potato => "potato",
            Crop::Cotton => "cotton",
            Crop::Soybean => "soybean",
            Crop::Coffee => "coffee",
            Crop::Sugarcane => "sugarcane",
            Crop::Chickpea => "chickpea",
            Crop::Onion => "onion",
            Crop::Garlic => "garlic",
            Crop::Banana => "banana",
            Crop::Mango => "mango",
            Crop::Coconut => "coconut",
            Crop::Chili => "chili",
            Crop::Cabbage => "cabbage",
            Crop::Cauliflower => "cauliflower",
            Crop::Okra => "okra",
            Crop::Apple => "apple",
            Crop::Grapes => "grapes",
            Crop::Citrus => "citrus",
            Crop::Vegetables => "vegetables",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        let key = s.trim().to_ascii_lowercase();
        if key == "corn" {
            return Some(Crop::Maize);
        }
        Crop::ALL.into_iter().find(|c| c.as_str() == key)
    }
}

impl std::fmt::Display for Crop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Crop::Maize => write!(f, "Maize (Corn)"),
            Crop::Chili => write!(f, "Chili Pepper"),
            Crop::Vegetables => write!(f, "Mixed Vegetables"),
            other => {
                let name = other.as_str();
                let mut chars = name.chars();
                match chars.next() {
                    Some(first) => write!(f, "{}{}", first.to_ascii_uppercase(), chars.as_str()),
                    None => Ok(()),
                }
            }
        }
    }
}

/// Unit a harvest is measured and sold in
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum YieldUnit {
    #[default]
    Quintal,
    Kg,
    Ton,
    Bags,
}

impl YieldUnit {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quintal" | "quintals" => Some(YieldUnit::Quintal),
            "kg" | "kilogram" | "kilograms" => Some(YieldUnit::Kg),
            "ton" | "tons" | "tonne" => Some(YieldUnit::Ton),
            "bags" | "bag" => Some(YieldUnit::Bags),
            _ => None,
        }
    }
}

impl std::fmt::Display for YieldUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            YieldUnit::Quintal => write!(f, "quintal"),
            YieldUnit::Kg => write!(f, "kg"),
            YieldUnit::Ton => write!(f, "ton"),
            YieldUnit::Bags => write!(f, "bags"),
        }
    }
}

/// A crop the user typed in because it is not in the catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CustomCrop {
    pub name: String,
    pub unit: YieldUnit,
}

/// Either a catalog crop or a user-defined one
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum CropChoice {
    Catalog(Crop),
    Custom(CustomCrop),
}

impl CropChoice {
    pub fn custom(name: impl Into<String>, unit: YieldUnit) -> Self {
        CropChoice::Custom(CustomCrop {
            name: name.into(),
            unit,
        })
    }

    pub fn catalog(&self) -> Option<Crop> {
        match self {
            CropChoice::Catalog(crop) => Some(*crop),
            CropChoice::Custom(_) => None,
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, CropChoice::Custom(_))
    }

    pub fn display_name(&self) -> String {
        match self {
            CropChoice::Catalog(crop) => crop.to_string(),
            CropChoice::Custom(custom) => custom.name.trim().to_string(),
        }
    }
}

impl From<Crop> for CropChoice {
    fn from(crop: Crop) -> Self {
        CropChoice::Catalog(crop)
    }
}
