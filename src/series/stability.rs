use crate::{series::HarmonizePolicy, types::{GeographyLevel, Stability}};

/// Whether boundaries of `level` may differ across `years`, using the default policy.
pub fn needs_interpolation(level: GeographyLevel, years: &[i32]) -> bool {
    HarmonizePolicy::default().needs_interpolation(level, years)
}

impl HarmonizePolicy {
    /// Whether boundaries of `level` may differ across `years`.
    pub fn needs_interpolation(&self, level: GeographyLevel, years: &[i32]) -> bool {
        match level.stability() {
            Stability::Permanent => false,
            Stability::ShortSpan => span(years) >= self.stable_county_span,
            Stability::Redrawn => true,
        }
    }
}

fn span(years: &[i32]) -> i32 {
    match (years.iter().min(), years.iter().max()) {
        (Some(min), Some(max)) => max - min,
        _ => 0,
    }
}
