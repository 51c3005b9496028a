//! Textual readings of index values

pub fn ndvi(value: f64) -> &'static str {
    match value {
        v if v < 0.1 => "No vegetation",
        v if v < 0.2 => "Sparse vegetation",
        v if v < 0.4 => "Moderate vegetation",
        v if v < 0.6 => "Dense vegetation",
        _ => "Very dense vegetation",
    }
}

pub fn evi(value: f64) -> &'static str {
    match value {
        v if v < 0.1 => "No photosynthetic activity",
        v if v < 0.3 => "Low activity",
        v if v < 0.5 => "Moderate activity",
        _ => "High photosynthetic activity",
    }
}

/// Soil-adjusted indices read on the NDVI scale
pub fn soil_adjusted(value: f64) -> &'static str {
    ndvi(value)
}

pub fn lai(value: f64) -> &'static str {
    match value {
        v if v < 1.0 => "Sparse canopy",
        v if v < 3.0 => "Moderate canopy",
        v if v < 5.0 => "Dense canopy",
        _ => "Very dense, multi-layer canopy",
    }
}

pub fn fpar(value: f64) -> &'static str {
    match value {
        v if v < 0.2 => "Low light absorption",
        v if v < 0.5 => "Moderate light absorption",
        v if v < 0.8 => "High light absorption",
        _ => "Maximum light absorption",
    }
}

pub fn vci(value: f64) -> &'static str {
    match value {
        v if v < 35.0 => "Poor vegetation condition",
        v if v < 65.0 => "Below normal condition",
        v if v < 85.0 => "Normal condition",
        _ => "Above normal condition",
    }
}

pub fn nbr(value: f64) -> &'static str {
    match value {
        v if v < -0.1 => "Severely burned or bare",
        v if v < 0.1 => "Moderate burn or stressed",
        v if v < 0.3 => "Healthy vegetation",
        _ => "Very healthy vegetation",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ladder_edges() {
        assert_eq!(ndvi(0.05), "No vegetation");
        assert_eq!(ndvi(0.6), "Very dense vegetation");
        assert_eq!(lai(2.99), "Moderate canopy");
        assert_eq!(vci(85.0), "Above normal condition");
        assert_eq!(nbr(-0.2), "Severely burned or bare");
    }
}
