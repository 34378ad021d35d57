use super::model::TagSequence;

/// Largest expansion accepted from a single triple.
const MAX_TAGS_PER_TRIPLE: f64 = 1_000_000.0;

/// Relative slack so that a final value sitting on the step grid survives
/// floating-point division (e.g. `0.3 / 0.1 = 2.9999999999999996`).
const GRID_TOLERANCE: f64 = 1e-9;

/// One operator-entered `(start, final, step)` row, as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagTriple {
    pub start: String,
    pub stop: String,
    pub step: String,
}

impl TagTriple {
    pub fn new(start: impl Into<String>, stop: impl Into<String>, step: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            stop: stop.into(),
            step: step.into(),
        }
    }

    /// All three fields as finite numbers with a non-zero step.
    pub fn parse(&self) -> Option<(f64, f64, f64)> {
        let start = parse_entry(&self.start)?;
        let stop = parse_entry(&self.stop)?;
        let step = parse_entry(&self.step)?;
        (step != 0.0).then_some((start, stop, step))
    }
}

/// Parse an operator entry.  Blank or unparsable text is `None`.
pub fn parse_entry(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// `start, start + step, ...` up to and including `stop` when it lies on the
/// grid.  Empty when `step` points away from `stop`.
pub fn expand(start: f64, stop: f64, step: f64) -> Vec<f64> {
    let span = (stop - start) / step;
    if !span.is_finite() || span < -GRID_TOLERANCE {
        return Vec::new();
    }
    let last = (span + GRID_TOLERANCE * span.abs().max(1.0)).floor();
    if last + 1.0 > MAX_TAGS_PER_TRIPLE {
        log::warn!("triple ({start}, {stop}, {step}) expands to {} tags; skipped", last + 1.0);
        return Vec::new();
    }
    (0..=last as usize).map(|k| start + k as f64 * step).collect()
}

/// Expand every valid triple in entry order.  Invalid or partially filled
/// triples are skipped.  Fewer than two tags means no tagging at all.
pub fn build_tags(triples: &[TagTriple]) -> Option<TagSequence> {
    let mut tags = Vec::new();
    for (i, triple) in triples.iter().enumerate() {
        match triple.parse() {
            Some((start, stop, step)) => tags.extend(expand(start, stop, step)),
            None => {
                if *triple != TagTriple::default() {
                    log::debug!("tag row {} skipped: {triple:?}", i + 1);
                }
            }
        }
    }
    TagSequence::new(tags)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_includes_final_on_grid() {
        assert_eq!(expand(0.0, 10.0, 2.0), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
    }

    #[test]
    fn test_expand_stops_before_off_grid_final() {
        assert_eq!(expand(0.0, 9.0, 2.0), vec![0.0, 2.0, 4.0, 6.0, 8.0]);
    }

    #[test]
    fn test_expand_count_and_last_element() {
        for &(a, b, s) in &[(0.0, 10.0, 2.0), (1.5, 7.0, 0.5), (-3.0, 4.0, 3.0), (0.0, 1.0, 0.1), (5.0, 5.0, 1.0)] {
            let tags = expand(a, b, s);
            let n = ((b - a) / s + 1e-9).floor();
            assert_eq!(tags.len(), n as usize + 1, "({a}, {b}, {s})");
            assert!(tags.windows(2).all(|w| w[1] > w[0]));
            let last = *tags.last().unwrap();
            assert!((last - (a + s * n)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_expand_floating_grid() {
        let tags = expand(0.0, 0.3, 0.1);
        assert_eq!(tags.len(), 4);
        assert!((tags[3] - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_expand_negative_step() {
        assert_eq!(expand(10.0, 4.0, -3.0), vec![10.0, 7.0, 4.0]);
        assert!(expand(0.0, 10.0, -1.0).is_empty());
    }

    #[test]
    fn test_build_tags_concatenates_in_order() {
        let tags = build_tags(&[
            TagTriple::new("0", "2", "1"),
            TagTriple::new("", "", ""),
            TagTriple::new("10", "20", "5"),
        ])
        .unwrap();
        assert_eq!(tags.values(), &[0.0, 1.0, 2.0, 10.0, 15.0, 20.0]);
    }

    #[test]
    fn test_build_tags_skips_invalid_triples() {
        let tags = build_tags(&[
            TagTriple::new("0", "abc", "1"),
            TagTriple::new("1", "5", ""),
            TagTriple::new("0", "5", "0"),
            TagTriple::new("0", "1", "0.5"),
        ])
        .unwrap();
        assert_eq!(tags.values(), &[0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_build_tags_too_short_is_absent() {
        assert!(build_tags(&[TagTriple::new("3", "3", "1")]).is_none());
        assert!(build_tags(&[]).is_none());
        assert!(build_tags(&[TagTriple::new("x", "y", "z")]).is_none());
    }

    #[test]
    fn test_runaway_triple_skipped() {
        assert!(expand(0.0, 1e12, 1.0).is_empty());
    }

    #[test]
    fn test_parse_entry() {
        assert_eq!(parse_entry(" 2.5 "), Some(2.5));
        assert_eq!(parse_entry("0"), Some(0.0));
        assert_eq!(parse_entry(""), None);
        assert_eq!(parse_entry("inf"), None);
        assert_eq!(parse_entry("NaN"), None);
    }
}
