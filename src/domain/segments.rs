use crate::error::{CutError, Result};

/// A half-open time window `[start, end)` of the source, in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentRange {
    pub start: f64,
    pub end: f64,
}

impl SegmentRange {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Partitions `[0, duration)` into consecutive windows of `window` seconds.
///
/// The last window is truncated to `duration`; an exact multiple never
/// produces a trailing zero-length window.
pub fn segment_ranges(duration: f64, window: f64) -> Result<Vec<SegmentRange>> {
    if !duration.is_finite() || duration <= 0.0 {
        return Err(CutError::InvalidInput(format!(
            "media duration must be positive, got {}",
            duration
        )));
    }
    if !window.is_finite() || window <= 0.0 {
        return Err(CutError::InvalidInput(format!(
            "segment length must be positive, got {}",
            window
        )));
    }

    let count = (duration / window).ceil() as usize;

    Ok((0..count)
        .map(|i| SegmentRange {
            start: i as f64 * window,
            end: ((i + 1) as f64 * window).min(duration),
        })
        // float rounding can push the last start onto `duration`
        .take_while(|range| range.start < range.end)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(ranges: &[SegmentRange]) -> Vec<(f64, f64)> {
        ranges.iter().map(|r| (r.start, r.end)).collect()
    }

    #[test]
    fn ten_seconds_in_three_second_windows() {
        let ranges = segment_ranges(10.0, 3.0).unwrap();
        assert_eq!(
            pairs(&ranges),
            vec![(0.0, 3.0), (3.0, 6.0), (6.0, 9.0), (9.0, 10.0)]
        );
    }

    #[test]
    fn exact_multiple_has_no_trailing_window() {
        let ranges = segment_ranges(9.0, 3.0).unwrap();
        assert_eq!(pairs(&ranges), vec![(0.0, 3.0), (3.0, 6.0), (6.0, 9.0)]);
        assert_eq!(ranges.last().unwrap().duration(), 3.0);
    }

    #[test]
    fn short_media_is_a_single_window() {
        let ranges = segment_ranges(1.25, 3.0).unwrap();
        assert_eq!(pairs(&ranges), vec![(0.0, 1.25)]);
    }

    #[test]
    fn rejects_non_positive_duration() {
        assert!(matches!(
            segment_ranges(0.0, 3.0),
            Err(CutError::InvalidInput(_))
        ));
        assert!(matches!(
            segment_ranges(-2.0, 3.0),
            Err(CutError::InvalidInput(_))
        ));
        assert!(matches!(
            segment_ranges(f64::NAN, 3.0),
            Err(CutError::InvalidInput(_))
        ));
    }

    #[test]
    fn rejects_non_positive_window() {
        assert!(matches!(
            segment_ranges(10.0, 0.0),
            Err(CutError::InvalidInput(_))
        ));
    }

    #[test]
    fn ranges_partition_the_whole_duration() {
        let durations = [0.4, 2.999, 3.0, 3.001, 7.5, 59.94, 120.0, 3601.2];
        let windows = [0.5, 1.0, 2.0, 3.0, 4.7, 10.0];

        for &duration in &durations {
            for &window in &windows {
                let ranges = segment_ranges(duration, window).unwrap();

                assert_eq!(
                    ranges.len(),
                    (duration / window).ceil() as usize,
                    "count for D={} W={}",
                    duration,
                    window
                );
                assert_eq!(ranges[0].start, 0.0);
                assert_eq!(ranges.last().unwrap().end, duration);

                for range in &ranges {
                    assert!(range.start < range.end);
                    assert!(range.duration() <= window + 1e-9);
                }
                for pair in ranges.windows(2) {
                    assert_eq!(pair[0].end, pair[1].start, "gap or overlap");
                }
            }
        }
    }
}
