//! Performance-gain estimation for grouped, minified, CDN-hosted assets.

use crate::types::{PerformanceGain, Snippet};

/// Assumed CDN/cache benefit on top of compression, in percentage points.
const CDN_BENEFIT: u8 = 25;

/// Hard ceiling on the advertised estimate.
const MAX_GAIN: u8 = 85;

/// Estimated size after minification, in bytes.
///
/// A fixed 70%-reduction heuristic, not real minification. The float
/// multiply-then-floor matches the historical dashboard arithmetic.
pub fn minified_estimate(bytes: usize) -> usize {
    (bytes as f64 * 0.3).floor() as usize
}

/// Estimates the gain of serving `codes` as a single minified CDN file.
///
/// Heuristic, user-facing numbers: compression percentage from the fixed
/// 70% model, plus the assumed CDN benefit, capped at 85. Zero total
/// content yields a zero estimate rather than a division by zero.
pub fn estimate_gain(codes: &[&Snippet]) -> PerformanceGain {
    let original_size: usize = codes.iter().map(|c| c.content.len()).sum();
    let minified_size = minified_estimate(original_size);

    let (compression_gain, total_gain) = if original_size == 0 {
        (0, 0)
    } else {
        let saved = 1.0 - (minified_size as f64 / original_size as f64);
        let compression = (saved * 100.0).floor() as u8;
        (compression, (compression + CDN_BENEFIT).min(MAX_GAIN))
    };

    PerformanceGain {
        original_size,
        minified_size,
        compression_gain,
        total_gain,
        files_reduced: codes.len().saturating_sub(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Location, PageScope, SnippetKind};
    use chrono::Utc;
    use uuid::Uuid;

    fn snippet_with_len(len: usize) -> Snippet {
        Snippet {
            id: Uuid::new_v4(),
            name: "sized".to_string(),
            content: "x".repeat(len),
            kind: SnippetKind::Css,
            location: Location::Head,
            pages: PageScope::All,
            active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn empty_input_yields_zero_gain() {
        let gain = estimate_gain(&[]);
        assert_eq!(gain.original_size, 0);
        assert_eq!(gain.minified_size, 0);
        assert_eq!(gain.compression_gain, 0);
        assert_eq!(gain.total_gain, 0);
        assert_eq!(gain.files_reduced, 0);
    }

    #[test]
    fn empty_contents_yield_zero_gain() {
        let a = snippet_with_len(0);
        let b = snippet_with_len(0);
        let gain = estimate_gain(&[&a, &b]);
        assert_eq!(gain.total_gain, 0);
        assert_eq!(gain.files_reduced, 1);
    }

    #[test]
    fn thousand_byte_snippet_hits_the_cap() {
        let snippet = snippet_with_len(1000);
        let gain = estimate_gain(&[&snippet]);
        assert_eq!(gain.original_size, 1000);
        assert_eq!(gain.minified_size, 300);
        assert_eq!(gain.compression_gain, 70);
        assert_eq!(gain.total_gain, 85);
        assert_eq!(gain.files_reduced, 0);
    }

    #[test]
    fn two_snippets_reduce_one_file() {
        let a = snippet_with_len(100);
        let b = snippet_with_len(300);
        let gain = estimate_gain(&[&a, &b]);
        assert_eq!(gain.original_size, 400);
        assert_eq!(gain.minified_size, 120);
        assert_eq!(gain.files_reduced, 1);
    }

    #[test]
    fn tiny_content_rounds_minified_to_zero() {
        let snippet = snippet_with_len(1);
        let gain = estimate_gain(&[&snippet]);
        assert_eq!(gain.minified_size, 0);
        assert_eq!(gain.compression_gain, 100);
        assert_eq!(gain.total_gain, 85);
    }

    #[cfg(feature = "property-tests")]
    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn gain_never_exceeds_cap(
                lens in prop::collection::vec(0usize..100_000, 0..20)
            ) {
                let snippets: Vec<Snippet> =
                    lens.iter().map(|&len| snippet_with_len(len)).collect();
                let refs: Vec<&Snippet> = snippets.iter().collect();

                let gain = estimate_gain(&refs);

                prop_assert!(gain.total_gain <= 85);
                prop_assert!(gain.compression_gain <= 100);
            }

            #[test]
            fn minified_never_exceeds_original(
                lens in prop::collection::vec(0usize..100_000, 0..20)
            ) {
                let snippets: Vec<Snippet> =
                    lens.iter().map(|&len| snippet_with_len(len)).collect();
                let refs: Vec<&Snippet> = snippets.iter().collect();

                let gain = estimate_gain(&refs);

                prop_assert!(gain.minified_size <= gain.original_size);
                prop_assert_eq!(gain.files_reduced, refs.len().saturating_sub(1));
            }
        }
    }
}
