//! Segment planning.
//!
//! Splits a duration into `segment_count` equal, contiguous ranges. Segment
//! `i` spans `[i * len, (i + 1) * len)`; the last segment ends exactly at the
//! total duration so the ranges always cover `[0, duration)` with no gap.

use log::debug;
use serde::Serialize;

use crate::error::{CoreError, CoreResult};

/// A contiguous time range of the source, processed independently.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Segment {
    /// 0-based position, defines concatenation order
    pub index: usize,
    /// Start time in seconds (inclusive)
    pub start: f64,
    /// End time in seconds (exclusive)
    pub end: f64,
}

impl Segment {
    /// Length of the segment in seconds.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Splits `duration` seconds into `segment_count` equal segments.
///
/// # Errors
///
/// Returns `CoreError::Plan` when `duration` is not a positive finite number
/// or `segment_count` is zero.
pub fn plan_segments(duration: f64, segment_count: usize) -> CoreResult<Vec<Segment>> {
    if !duration.is_finite() || duration <= 0.0 {
        return Err(CoreError::Plan(format!(
            "duration must be positive, got {duration}"
        )));
    }
    if segment_count == 0 {
        return Err(CoreError::Plan(
            "segment count must be at least 1".to_string(),
        ));
    }

    let segment_length = duration / segment_count as f64;
    let segments: Vec<Segment> = (0..segment_count)
        .map(|index| {
            let start = segment_length * index as f64;
            let end = if index + 1 == segment_count {
                duration
            } else {
                segment_length * (index + 1) as f64
            };
            Segment { index, start, end }
        })
        .collect();

    if let Some(bad) = segments.iter().find(|s| s.end <= s.start) {
        return Err(CoreError::Plan(format!(
            "duration {duration} is too short for {segment_count} segments (segment {} is empty)",
            bad.index
        )));
    }

    debug!(
        "Planned {} segments of {:.3}s over {:.3}s",
        segment_count, segment_length, duration
    );
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn assert_partition(segments: &[Segment], duration: f64) {
        let count = segments.len();
        assert!(count > 0);
        assert_eq!(segments[0].start, 0.0);
        assert_eq!(segments[count - 1].end, duration);
        for (i, pair) in segments.windows(2).enumerate() {
            assert_eq!(pair[0].end, pair[1].start, "gap after segment {i}");
        }
        let expected = duration / count as f64;
        for (i, segment) in segments.iter().enumerate() {
            assert_eq!(segment.index, i);
            assert!(segment.end > segment.start);
            assert!((segment.duration() - expected).abs() < expected * 1e-9 + EPS);
        }
    }

    #[test]
    fn test_hundred_seconds_five_segments() {
        let segments = plan_segments(100.0, 5).unwrap();
        let ranges: Vec<(f64, f64)> = segments.iter().map(|s| (s.start, s.end)).collect();
        assert_eq!(
            ranges,
            vec![(0.0, 20.0), (20.0, 40.0), (40.0, 60.0), (60.0, 80.0), (80.0, 100.0)]
        );
    }

    #[test]
    fn test_single_segment_covers_everything() {
        let segments = plan_segments(42.5, 1).unwrap();
        assert_eq!(segments, vec![Segment { index: 0, start: 0.0, end: 42.5 }]);
    }

    #[test]
    fn test_partition_for_awkward_values() {
        for &duration in &[0.1, 1.0 / 3.0, 7.77, 59.94, 3600.001, 12345.678] {
            for count in 1..=12 {
                let segments = plan_segments(duration, count).unwrap();
                assert_eq!(segments.len(), count);
                assert_partition(&segments, duration);
            }
        }
    }

    #[test]
    fn test_rejects_non_positive_duration() {
        for duration in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(plan_segments(duration, 5), Err(CoreError::Plan(_))));
        }
    }

    #[test]
    fn test_rejects_zero_segments() {
        assert!(matches!(plan_segments(10.0, 0), Err(CoreError::Plan(_))));
    }
}
