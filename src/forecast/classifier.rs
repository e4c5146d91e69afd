use crate::config::clothing_thresholds::*;
use crate::config::{ThresholdUnit, UnitSystem};
use crate::types::{ClothingBand, ClothingRecommendation};

/// Pick the clothing band for an average temperature, compared as-is against the thresholds.
/// Bands are checked warmest first; a value on a threshold belongs to the warmer band.
/// NaN matches no threshold and lands in `VeryCold`.
pub fn classify(f: f64) -> ClothingBand {
    if f >= VERY_HOT_MIN {
        ClothingBand::VeryHot
    } else if f >= HOT_MIN {
        ClothingBand::Hot
    } else if f >= WARM_MIN {
        ClothingBand::Warm
    } else if f >= COOL_MIN {
        ClothingBand::Cool
    } else if f >= COLD_MIN {
        ClothingBand::Cold
    } else {
        ClothingBand::VeryCold
    }
}

/// Band for an average in `units`, read in the scale chosen by `thresholds`.
pub fn classify_in(avg_temp: f64, units: UnitSystem, thresholds: ThresholdUnit) -> ClothingBand {
    classify(thresholds.scale(avg_temp, units))
}

impl ClothingBand {
    pub fn recommendation(&self) -> ClothingRecommendation {
        let (top, bottom, footwear, outerwear, accessories) = match self {
            ClothingBand::VeryHot => (
                "T-shirt",
                "Shorts",
                "Sandals",
                None,
                Some("Sun hat and sunglasses"),
            ),
            ClothingBand::Hot => (
                "T-shirt",
                "Shorts or light pants",
                "Sneakers or sandals",
                None,
                Some("Sun hat"),
            ),
            ClothingBand::Warm => (
                "Long sleeve shirt",
                "Light pants",
                "Sneakers",
                Some("Light jacket (morning/evening)"),
                None,
            ),
            ClothingBand::Cool => (
                "Long sleeve shirt",
                "Pants",
                "Sneakers",
                Some("Light jacket"),
                None,
            ),
            ClothingBand::Cold => (
                "Sweater",
                "Warm pants",
                "Shoes or boots",
                Some("Jacket"),
                Some("Hat and gloves"),
            ),
            ClothingBand::VeryCold => (
                "Sweater or thermal shirt",
                "Warm pants",
                "Winter boots",
                Some("Heavy winter coat"),
                Some("Winter hat, scarf, and gloves"),
            ),
        };
        ClothingRecommendation {
            top: Some(top.to_string()),
            bottom: Some(bottom.to_string()),
            footwear: Some(footwear.to_string()),
            outerwear: outerwear.map(str::to_string),
            accessories: accessories.map(str::to_string),
        }
    }
}
