//! Language mix extractor

use crate::models::{LanguageBytes, LanguageStats, UNKNOWN};

/// Rounded share of `bytes` in `total`, 0 when `total` is 0.
///
/// `f64::round` rounds half away from zero, so 12.5% reports as 13.
pub fn percentage(bytes: u64, total: u64) -> u32 {
    if total == 0 {
        return 0;
    }
    ((bytes as f64 / total as f64) * 100.0).round() as u32
}

pub fn analyze_languages(bytes: &LanguageBytes) -> LanguageStats {
    let total: u64 = bytes.values().sum();

    let languages = bytes
        .iter()
        .map(|(name, &count)| (name.clone(), percentage(count, total)))
        .collect();

    // First strictly-greater wins, so ties go to the earlier language
    let mut primary: Option<(&String, u64)> = None;
    for (name, &count) in bytes {
        if primary.map_or(true, |(_, best)| count > best) {
            primary = Some((name, count));
        }
    }

    LanguageStats {
        languages,
        primary_language: primary
            .map(|(name, _)| name.clone())
            .unwrap_or_else(|| UNKNOWN.to_string()),
    }
}
