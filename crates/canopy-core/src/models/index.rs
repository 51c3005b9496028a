use serde::{Deserialize, Serialize};

use crate::error::{CanopyError, Result};

/// Spectral index computed from multispectral reflectance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IndexType {
    /// Normalized Difference Vegetation Index
    Ndvi,
    /// Enhanced Vegetation Index
    Evi,
    /// Soil Adjusted Vegetation Index
    Savi,
    /// Modified Soil Adjusted Vegetation Index
    Msavi,
    /// Normalized Difference Water Index
    Ndwi,
    /// Normalized Burn Ratio
    Nbr,
    /// Normalized Difference Moisture Index
    Ndmi,
    /// Green Normalized Difference Vegetation Index
    Gndvi,
}

impl IndexType {
    pub const ALL: [IndexType; 8] = [
        IndexType::Ndvi,
        IndexType::Evi,
        IndexType::Savi,
        IndexType::Msavi,
        IndexType::Ndwi,
        IndexType::Nbr,
        IndexType::Ndmi,
        IndexType::Gndvi,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IndexType::Ndvi => "NDVI",
            IndexType::Evi => "EVI",
            IndexType::Savi => "SAVI",
            IndexType::Msavi => "MSAVI",
            IndexType::Ndwi => "NDWI",
            IndexType::Nbr => "NBR",
            IndexType::Ndmi => "NDMI",
            IndexType::Gndvi => "GNDVI",
        }
    }

    /// Indices whose value scale tracks green biomass like NDVI does
    pub fn is_greenness(&self) -> bool {
        matches!(
            self,
            IndexType::Ndvi
                | IndexType::Savi
                | IndexType::Msavi
                | IndexType::Gndvi
        )
    }
}

impl std::fmt::Display for IndexType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for IndexType {
    type Err = CanopyError;

    fn from_str(s: &str) -> Result<Self> {
        IndexType::ALL
            .iter()
            .copied()
            .find(|index| index.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CanopyError::UnknownIndex { name: s.to_string() })
    }
}
