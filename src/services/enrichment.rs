//! Heuristic lens-spec matcher: parses a free-text catalog title into
//! maker / focal range / aperture / tokens and scores it against the
//! imported Lensfun reference set. Weighted confidence, fixed thresholds.

use crate::db::models::{EnrichmentStatus, LensSpec};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

/// Confidence at or above which the best candidate is applied to the item.
pub const AUTO_APPLY_THRESHOLD: f64 = 0.85;
/// Confidence at or above which the candidate is kept for manual review.
pub const REVIEW_THRESHOLD: f64 = 0.60;

/// Makers recognized in free-text titles.
const KNOWN_MAKERS: &[&str] = &[
    "canon", "nikon", "sony", "fujifilm", "fuji", "olympus", "panasonic", "leica", "pentax",
    "sigma", "tamron", "tokina", "zeiss", "voigtlander", "samyang", "minolta",
];

static FOCAL_RANGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+(?:\.\d+)?)\s*-\s*(\d+(?:\.\d+)?)\s*mm").unwrap());
static FOCAL_PRIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+(?:\.\d+)?)\s*mm").unwrap());
// Apertures appear as "f/2.8", "f2.8" or the older "1:2.8" notation
static APERTURE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:f/?|1:)(\d+(?:\.\d+)?)").unwrap());
static TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z0-9]+").unwrap());

/// Parsed shape of a catalog title.
#[derive(Debug, Clone, PartialEq)]
pub struct LensQuery {
    pub maker: Option<String>,
    pub focal_min: Option<f64>,
    pub focal_max: Option<f64>,
    pub aperture: Option<f64>,
    pub tokens: BTreeSet<String>,
}

/// Scored candidate from the reference set.
#[derive(Debug, Clone)]
pub struct MatchCandidate {
    pub spec: LensSpec,
    pub confidence: f64,
    token_score: f64,
}

pub fn parse_lens_title(title: &str) -> LensQuery {
    let lower = title.to_lowercase();

    let maker = KNOWN_MAKERS
        .iter()
        .find(|m| lower.contains(*m))
        .map(|m| normalize_maker(m));

    let (focal_min, focal_max) = if let Some(caps) = FOCAL_RANGE_RE.captures(&lower) {
        (
            caps[1].parse::<f64>().ok(),
            caps[2].parse::<f64>().ok(),
        )
    } else if let Some(caps) = FOCAL_PRIME_RE.captures(&lower) {
        let focal = caps[1].parse::<f64>().ok();
        (focal, focal)
    } else {
        (None, None)
    };

    let aperture = APERTURE_RE
        .captures(&lower)
        .and_then(|caps| caps[1].parse::<f64>().ok());

    LensQuery {
        maker,
        focal_min,
        focal_max,
        aperture,
        tokens: tokenize(&lower),
    }
}

/// "fuji" and "fujifilm" are the same maker in the reference set.
fn normalize_maker(maker: &str) -> String {
    match maker {
        "fuji" => "fujifilm".to_string(),
        other => other.to_string(),
    }
}

fn tokenize(text: &str) -> BTreeSet<String> {
    TOKEN_RE
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count() as f64;
    let union = a.union(b).count() as f64;
    intersection / union
}

fn focal_score(query: &LensQuery, spec: &LensSpec) -> f64 {
    let (Some(q_min), Some(q_max)) = (query.focal_min, query.focal_max) else {
        return 0.0;
    };
    let (Some(s_min), Some(s_max)) = (spec.focal_min, spec.focal_max) else {
        return 0.0;
    };

    if (q_min - s_min).abs() <= 1.0 && (q_max - s_max).abs() <= 1.0 {
        1.0
    } else if q_min <= s_max && s_min <= q_max {
        0.5
    } else {
        0.0
    }
}

fn aperture_score(query: &LensQuery, spec: &LensSpec) -> f64 {
    let (Some(q), Some(s)) = (query.aperture, spec.aperture) else {
        return 0.0;
    };
    let diff = (q - s).abs();
    if diff <= 0.1 {
        1.0
    } else if diff <= 0.5 {
        0.5
    } else {
        0.0
    }
}

/// Weighted confidence for one reference spec against a parsed title.
pub fn match_confidence(query: &LensQuery, spec: &LensSpec) -> (f64, f64) {
    let maker_score = match &query.maker {
        Some(m) if m.eq_ignore_ascii_case(&spec.maker) => 1.0,
        _ => 0.0,
    };
    let token_score = jaccard(&query.tokens, &tokenize(&spec.model.to_lowercase()));

    let confidence = 0.30 * maker_score
        + 0.30 * focal_score(query, spec)
        + 0.20 * aperture_score(query, spec)
        + 0.20 * token_score;

    (confidence, token_score)
}

/// Best candidate across the reference set. Ties break on the higher token
/// score, then lexicographic model name, so repeated runs are deterministic.
pub fn best_match(title: &str, specs: &[LensSpec]) -> Option<MatchCandidate> {
    let query = parse_lens_title(title);

    specs
        .iter()
        .map(|spec| {
            let (confidence, token_score) = match_confidence(&query, spec);
            MatchCandidate {
                spec: spec.clone(),
                confidence,
                token_score,
            }
        })
        .max_by(|a, b| {
            a.confidence
                .total_cmp(&b.confidence)
                .then(a.token_score.total_cmp(&b.token_score))
                .then(b.spec.model.cmp(&a.spec.model))
        })
}

/// Matching outcome to persist: status, the spec to record, and the score.
/// `needs_review` keeps the candidate spec so the review queue has
/// something to show; only `matched` counts as applied.
pub fn resolve_outcome(
    candidate: Option<MatchCandidate>,
) -> (EnrichmentStatus, Option<LensSpec>, Option<f64>) {
    match candidate {
        Some(candidate) => {
            let status = classify(candidate.confidence);
            let spec = match status {
                EnrichmentStatus::NoMatch => None,
                _ => Some(candidate.spec),
            };
            (status, spec, Some(candidate.confidence))
        }
        None => (EnrichmentStatus::NoMatch, None, None),
    }
}

/// Classification of a candidate confidence into an enrichment outcome.
pub fn classify(confidence: f64) -> EnrichmentStatus {
    if confidence >= AUTO_APPLY_THRESHOLD {
        EnrichmentStatus::Matched
    } else if confidence >= REVIEW_THRESHOLD {
        EnrichmentStatus::NeedsReview
    } else {
        EnrichmentStatus::NoMatch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn spec(maker: &str, model: &str, focal: (f64, f64), aperture: f64) -> LensSpec {
        LensSpec {
            id: Uuid::new_v4(),
            maker: maker.to_string(),
            model: model.to_string(),
            mount: None,
            focal_min: Some(focal.0),
            focal_max: Some(focal.1),
            aperture: Some(aperture),
            source: "lensfun".to_string(),
            created_at: Utc::now().naive_utc(),
        }
    }

    #[test]
    fn test_parse_zoom_title() {
        let query = parse_lens_title("Canon EF 24-70mm f/2.8L II USM");
        assert_eq!(query.maker.as_deref(), Some("canon"));
        assert_eq!(query.focal_min, Some(24.0));
        assert_eq!(query.focal_max, Some(70.0));
        assert_eq!(query.aperture, Some(2.8));
    }

    #[test]
    fn test_parse_prime_title() {
        let query = parse_lens_title("Nikon 50mm f1.8 AI-S");
        assert_eq!(query.focal_min, Some(50.0));
        assert_eq!(query.focal_max, Some(50.0));
        assert_eq!(query.aperture, Some(1.8));
    }

    #[test]
    fn test_parse_ratio_aperture_notation() {
        let query = parse_lens_title("Minolta MD 35mm 1:2.8");
        assert_eq!(query.maker.as_deref(), Some("minolta"));
        assert_eq!(query.aperture, Some(2.8));
    }

    #[test]
    fn test_fuji_normalizes_to_fujifilm() {
        let query = parse_lens_title("Fuji XF 35mm f/1.4");
        assert_eq!(query.maker.as_deref(), Some("fujifilm"));
    }

    #[test]
    fn test_exact_match_clears_auto_threshold() {
        let specs = vec![
            spec("Canon", "EF 24-70mm f/2.8L II USM", (24.0, 70.0), 2.8),
            spec("Canon", "EF 70-200mm f/2.8L IS", (70.0, 200.0), 2.8),
        ];
        let candidate = best_match("Canon EF 24-70mm f/2.8L II USM", &specs).unwrap();
        assert_eq!(candidate.spec.model, "EF 24-70mm f/2.8L II USM");
        assert!(candidate.confidence >= AUTO_APPLY_THRESHOLD);
        assert_eq!(classify(candidate.confidence), EnrichmentStatus::Matched);
    }

    #[test]
    fn test_unrelated_title_is_no_match() {
        let specs = vec![spec("Canon", "EF 24-70mm f/2.8L II USM", (24.0, 70.0), 2.8)];
        let candidate = best_match("Sony A7 III body", &specs).unwrap();
        assert!(candidate.confidence < REVIEW_THRESHOLD);
        assert_eq!(classify(candidate.confidence), EnrichmentStatus::NoMatch);
    }

    #[test]
    fn test_near_match_lands_in_review_band() {
        let specs = vec![spec("Canon", "EF 24-70mm f/4L IS USM", (24.0, 70.0), 4.0)];
        // Same maker and focal range, different aperture and trim
        let candidate = best_match("Canon 24-70mm f/2.8", &specs).unwrap();
        assert!(candidate.confidence >= REVIEW_THRESHOLD);
        assert!(candidate.confidence < AUTO_APPLY_THRESHOLD);
        assert_eq!(
            classify(candidate.confidence),
            EnrichmentStatus::NeedsReview
        );
    }

    #[test]
    fn test_review_band_outcome_keeps_the_candidate() {
        let specs = vec![spec("Canon", "EF 24-70mm f/4L IS USM", (24.0, 70.0), 4.0)];
        let candidate = best_match("Canon 24-70mm f/2.8", &specs);

        let (status, recorded, confidence) = resolve_outcome(candidate);
        assert_eq!(status, EnrichmentStatus::NeedsReview);
        assert_eq!(
            recorded.map(|s| s.model),
            Some("EF 24-70mm f/4L IS USM".to_string())
        );
        assert!(confidence.is_some());
    }

    #[test]
    fn test_no_match_outcome_records_nothing() {
        let specs = vec![spec("Canon", "EF 24-70mm f/2.8L II USM", (24.0, 70.0), 2.8)];
        let candidate = best_match("Sony A7 III body", &specs);

        let (status, recorded, _) = resolve_outcome(candidate);
        assert_eq!(status, EnrichmentStatus::NoMatch);
        assert!(recorded.is_none());
    }

    #[test]
    fn test_overlapping_zoom_scores_half_focal() {
        let s = spec("Sigma", "24-105mm f/4 DG", (24.0, 105.0), 4.0);
        let query = parse_lens_title("Sigma 24-70mm f/4");
        let (confidence, _) = match_confidence(&query, &s);
        // maker 0.30 + focal overlap 0.15 + aperture 0.20 + some token overlap
        assert!(confidence > 0.60);
        assert!(confidence < AUTO_APPLY_THRESHOLD);
    }

    #[test]
    fn test_tie_breaks_are_deterministic() {
        let a = spec("Canon", "FD 50mm f/1.8", (50.0, 50.0), 1.8);
        let b = spec("Canon", "EF 50mm f/1.8", (50.0, 50.0), 1.8);
        let first = best_match("Canon 50mm f/1.8", &[a.clone(), b.clone()]).unwrap();
        let second = best_match("Canon 50mm f/1.8", &[b, a]).unwrap();
        assert_eq!(first.spec.model, second.spec.model);
    }
}
