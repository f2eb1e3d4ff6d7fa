use crate::shared::constants::MIN_LINE_DURATION_MS;
use crate::shared::thousandths::{from_thousandths, to_thousandths};

use super::dialogue_line::DialogueLine;
use super::raw_segment::RawSegment;

/// Turns untrusted candidate segments into a monotonic script timeline.
///
/// Segments are ordered by start time (stable, so equal starts keep their
/// input order) and swept once. A segment never starts before the previous
/// line ended; the later segment absorbs the clamp. Every line is stretched to
/// at least `MIN_LINE_DURATION`. No segment is ever dropped.
///
/// The sweep runs on whole milliseconds: timestamps are rounded before the
/// clamp and the stretch, so the stored values keep both invariants exactly.
pub struct TimelineReconciler;

impl TimelineReconciler {
    pub fn reconcile(segments: &[RawSegment]) -> Vec<DialogueLine> {
        let mut ordered: Vec<&RawSegment> = segments.iter().collect();
        ordered.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));

        let mut lines = Vec::with_capacity(ordered.len());
        let mut prev_end: i64 = 0;

        for (index, segment) in ordered.into_iter().enumerate() {
            let source_start = to_thousandths(segment.start_time).unwrap_or(prev_end);
            let start = source_start.max(prev_end);
            // A non-finite end leaves a zero-length span for the stretch below.
            let mut end = to_thousandths(segment.end_time).unwrap_or(start);

            if end.saturating_sub(start) < MIN_LINE_DURATION_MS {
                end = start.saturating_add(MIN_LINE_DURATION_MS);
            }
            if start >= end {
                end = start.saturating_add(MIN_LINE_DURATION_MS);
            }

            lines.push(DialogueLine {
                id: format!("line-{}", index + 1),
                speaker: segment.speaker,
                text: segment.text.clone(),
                start_time: from_thousandths(start),
                end_time: from_thousandths(end),
                phonemes: None,
                pitch_pattern: None,
            });

            prev_end = end;
        }

        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::domain::speaker::Speaker;
    use crate::shared::constants::MIN_LINE_DURATION;
    use approx::assert_relative_eq;
    use rstest::rstest;

    const EPS: f64 = 1e-9;

    fn seg(start: f64, end: f64) -> RawSegment {
        RawSegment::new(Speaker::Npc, format!("{start}-{end}"), start, end)
    }

    fn millis(seconds: f64) -> i64 {
        to_thousandths(seconds).unwrap()
    }

    fn assert_valid_timeline(lines: &[DialogueLine]) {
        for line in lines {
            assert!(
                millis(line.end_time) - millis(line.start_time) >= MIN_LINE_DURATION_MS,
                "{} spans only {}ms",
                line.id,
                millis(line.end_time) - millis(line.start_time)
            );
            assert!(
                line.duration() >= MIN_LINE_DURATION - EPS,
                "{} lasts only {}",
                line.id,
                line.duration()
            );
            assert!(line.start_time < line.end_time);
        }
        for pair in lines.windows(2) {
            assert!(
                pair[1].start_time >= pair[0].end_time,
                "{} starts before {} ends",
                pair[1].id,
                pair[0].id
            );
        }
    }

    #[test]
    fn test_empty_input_yields_empty_script() {
        assert!(TimelineReconciler::reconcile(&[]).is_empty());
    }

    #[test]
    fn test_well_formed_segments_pass_through() {
        let lines = TimelineReconciler::reconcile(&[seg(0.0, 2.5), seg(2.6, 4.5)]);
        assert_eq!(lines.len(), 2);
        assert_relative_eq!(lines[0].start_time, 0.0);
        assert_relative_eq!(lines[0].end_time, 2.5);
        assert_relative_eq!(lines[1].start_time, 2.6);
        assert_relative_eq!(lines[1].end_time, 4.5);
    }

    #[test]
    fn test_unsorted_overlapping_segments() {
        let lines = TimelineReconciler::reconcile(&[seg(2.0, 3.0), seg(0.0, 1.0), seg(0.9, 1.05)]);

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].text, "0-1");
        assert_eq!(lines[1].text, "0.9-1.05");
        assert_eq!(lines[2].text, "2-3");

        // The 0.9 segment is clamped to the previous end and stretched.
        assert_relative_eq!(lines[1].start_time, 1.0);
        assert_relative_eq!(lines[1].end_time, 1.3, epsilon = EPS);
        assert_relative_eq!(lines[2].start_time, 2.0);
        assert_relative_eq!(lines[2].end_time, 3.0);
        assert_valid_timeline(&lines);
    }

    #[test]
    fn test_ids_follow_output_order() {
        let lines = TimelineReconciler::reconcile(&[seg(5.0, 6.0), seg(1.0, 2.0), seg(3.0, 4.0)]);
        let ids: Vec<_> = lines.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["line-1", "line-2", "line-3"]);
        assert_relative_eq!(lines[0].start_time, 1.0);
        assert_relative_eq!(lines[2].start_time, 5.0);
    }

    #[test]
    fn test_reversed_source_segment_gets_minimum_duration() {
        let lines = TimelineReconciler::reconcile(&[seg(3.0, 1.0)]);
        assert_eq!(lines.len(), 1);
        assert_relative_eq!(lines[0].start_time, 3.0);
        assert_relative_eq!(lines[0].end_time, 3.3, epsilon = EPS);
    }

    #[test]
    fn test_identical_start_times_keep_input_order() {
        let a = RawSegment::new(Speaker::Npc, "first", 1.0, 2.0);
        let b = RawSegment::new(Speaker::User, "second", 1.0, 1.5);
        let lines = TimelineReconciler::reconcile(&[a, b]);

        assert_eq!(lines[0].text, "first");
        assert_eq!(lines[1].text, "second");
        assert_eq!(lines[1].speaker, Speaker::User);
        assert_relative_eq!(lines[1].start_time, 2.0);
        assert_relative_eq!(lines[1].end_time, 2.3, epsilon = EPS);
    }

    #[test]
    fn test_cascading_clamp() {
        let lines = TimelineReconciler::reconcile(&[
            seg(0.0, 2.0),
            seg(0.5, 0.6),
            seg(0.7, 1.0),
            seg(2.1, 2.2),
        ]);

        assert_relative_eq!(lines[1].start_time, 2.0);
        assert_relative_eq!(lines[1].end_time, 2.3, epsilon = EPS);
        assert_relative_eq!(lines[2].start_time, 2.3, epsilon = EPS);
        assert_relative_eq!(lines[2].end_time, 2.6, epsilon = EPS);
        // Pushed past its own original start by the lines before it.
        assert_relative_eq!(lines[3].start_time, 2.6, epsilon = EPS);
        assert_relative_eq!(lines[3].end_time, 2.9, epsilon = EPS);
        assert_valid_timeline(&lines);
    }

    #[test]
    fn test_negative_start_clamped_to_zero() {
        let lines = TimelineReconciler::reconcile(&[seg(-1.0, 0.5)]);
        assert_relative_eq!(lines[0].start_time, 0.0);
        assert_relative_eq!(lines[0].end_time, 0.5);
    }

    #[test]
    fn test_timestamps_rounded_to_millis() {
        let lines = TimelineReconciler::reconcile(&[seg(0.12345, 1.98765)]);
        assert_relative_eq!(lines[0].start_time, 0.123, epsilon = EPS);
        assert_relative_eq!(lines[0].end_time, 1.988, epsilon = EPS);
    }

    #[test]
    fn test_non_finite_end_gets_minimum_duration() {
        let lines = TimelineReconciler::reconcile(&[seg(1.0, f64::NAN), seg(2.0, f64::INFINITY)]);
        assert_relative_eq!(lines[0].start_time, 1.0);
        assert_relative_eq!(lines[0].end_time, 1.3, epsilon = EPS);
        assert_relative_eq!(lines[1].start_time, 2.0);
        assert_relative_eq!(lines[1].end_time, 2.3, epsilon = EPS);
    }

    #[test]
    fn test_non_finite_start_follows_previous_line() {
        let lines = TimelineReconciler::reconcile(&[seg(0.0, 1.0), seg(f64::NAN, 0.5)]);
        assert_eq!(lines.len(), 2);
        assert_relative_eq!(lines[1].start_time, 1.0);
        assert_relative_eq!(lines[1].end_time, 1.3, epsilon = EPS);
    }

    #[test]
    fn test_stretch_from_sub_millisecond_clamp_keeps_minimum() {
        let first = RawSegment::new(Speaker::Npc, "long", 0.0, 255.7105);
        let second = RawSegment::new(Speaker::User, "short", 100.0, 100.01);
        let lines = TimelineReconciler::reconcile(&[first, second]);

        assert_eq!(lines[1].start_time, lines[0].end_time);
        assert_eq!(millis(lines[1].end_time) - millis(lines[1].start_time), 300);
        assert!(lines[1].duration() >= MIN_LINE_DURATION - EPS);
        assert_valid_timeline(&lines);
    }

    #[test]
    fn test_sub_millisecond_ends_never_shorten_stretched_lines() {
        for step in 0..50 {
            let end = 10.0 + f64::from(step) * 0.00013;
            let lines =
                TimelineReconciler::reconcile(&[seg(0.0, end), seg(5.0, 5.01), seg(5.1, 5.2)]);
            assert_valid_timeline(&lines);
        }
    }

    #[test]
    fn test_rounding_ties_go_to_even_millisecond() {
        let lines = TimelineReconciler::reconcile(&[seg(2.0625, 3.0)]);
        assert_eq!(lines[0].start_time, 2.062);
    }

    #[rstest]
    #[case::dense(vec![(0.0, 0.1), (0.05, 0.1), (0.1, 0.2), (0.15, 0.16)])]
    #[case::nested(vec![(0.0, 10.0), (1.0, 2.0), (3.0, 4.0)])]
    #[case::degenerate(vec![(1.0, 1.0), (1.0, 1.0), (1.0, 1.0)])]
    #[case::reversed(vec![(4.0, 3.0), (2.0, 1.0), (0.5, 0.0)])]
    #[case::sparse(vec![(10.0, 12.0), (0.0, 0.4), (5.5, 5.6)])]
    fn test_output_is_valid_and_lossless(#[case] ranges: Vec<(f64, f64)>) {
        let segments: Vec<_> = ranges.iter().map(|&(s, e)| seg(s, e)).collect();
        let lines = TimelineReconciler::reconcile(&segments);
        assert_eq!(lines.len(), segments.len());
        assert_valid_timeline(&lines);
    }
}
