//! Lyric synchronization: resolve the active line for a playback position.

use crate::catalog::LyricLine;

/// Index of the latest line whose timestamp is at or before `position_secs`.
///
/// Lines are assumed sorted ascending by timestamp. The reverse scan makes
/// ties on equal timestamps resolve in favor of the later line, and the next
/// line's timestamp acts as an exclusive upper bound, so exactly one line is
/// current at any instant. Returns `None` when no line has started yet or
/// the set is empty.
pub fn active_line_index(lines: &[LyricLine], position_secs: f64) -> Option<usize> {
    if lines.is_empty() {
        return None;
    }
    let now_ms = (position_secs.max(0.0) * 1000.0) as u64;
    lines.iter().rposition(|l| l.time <= now_ms)
}

pub fn active_line(lines: &[LyricLine], position_secs: f64) -> Option<&LyricLine> {
    active_line_index(lines, position_secs).map(|i| &lines[i])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(time: u64, text: &str) -> LyricLine {
        LyricLine {
            time,
            text: text.to_string(),
        }
    }

    fn sample() -> Vec<LyricLine> {
        vec![
            line(1_000, "one"),
            line(4_500, "two"),
            line(9_000, "three"),
        ]
    }

    #[test]
    fn empty_set_has_no_active_line() {
        assert_eq!(active_line(&[], 10.0), None);
    }

    #[test]
    fn before_first_timestamp_has_no_active_line() {
        assert_eq!(active_line_index(&sample(), 0.0), None);
        assert_eq!(active_line_index(&sample(), 0.999), None);
    }

    #[test]
    fn timestamp_boundary_is_inclusive() {
        assert_eq!(active_line_index(&sample(), 1.0), Some(0));
        assert_eq!(active_line_index(&sample(), 4.5), Some(1));
    }

    #[test]
    fn between_lines_the_earlier_one_is_active() {
        assert_eq!(active_line(&sample(), 4.499).map(|l| l.text.as_str()), Some("one"));
        assert_eq!(active_line(&sample(), 8.9).map(|l| l.text.as_str()), Some("two"));
    }

    #[test]
    fn past_the_end_the_last_line_stays_active() {
        assert_eq!(active_line(&sample(), 600.0).map(|l| l.text.as_str()), Some("three"));
    }

    #[test]
    fn equal_timestamps_prefer_the_later_line() {
        let lines = vec![line(2_000, "a"), line(2_000, "b"), line(5_000, "c")];
        assert_eq!(active_line(&lines, 2.0).map(|l| l.text.as_str()), Some("b"));
    }

    #[test]
    fn negative_positions_clamp_to_zero() {
        let lines = vec![line(0, "zero")];
        assert_eq!(active_line_index(&lines, -3.0), Some(0));
    }
}
