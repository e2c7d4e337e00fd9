//! Scoring module - line rewards, level progression and gravity speed
//!
//! Classic rules:
//! - Clearing `k` lines at once pays `(level + 1) * LINE_SCORES[k - 1]`.
//! - Every 10 lines advances the level, starting at 1 and capped at 10.
//! - The drop period shrinks linearly with level: `(11 - level) * 50ms`.

use crate::types::{DROP_UNIT_MS, LINES_PER_LEVEL, LINE_SCORES, MAX_LEVEL, START_LEVEL};

/// Calculate line clear score
/// lines: number of lines cleared in one settle
/// level: level at the time of the clear (1-based)
///
/// More than four lines at once (possible after garbage) pays the four-line reward.
pub fn calculate_line_score(lines: usize, level: u32) -> u32 {
    if lines == 0 {
        return 0;
    }
    let base_score = LINE_SCORES[lines.min(LINE_SCORES.len()) - 1];
    base_score * (level + 1)
}

/// Level management
/// Level increases every 10 lines cleared
pub fn calculate_level(total_lines: u32) -> u32 {
    (START_LEVEL + total_lines / LINES_PER_LEVEL).min(MAX_LEVEL)
}

/// Gravity period for a level (in milliseconds)
pub fn drop_interval_ms(level: u32) -> u32 {
    (MAX_LEVEL + 1 - level.clamp(START_LEVEL, MAX_LEVEL)) * DROP_UNIT_MS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classic_line_scores() {
        // Level 1
        assert_eq!(calculate_line_score(1, 1), 80);
        assert_eq!(calculate_line_score(2, 1), 200);
        assert_eq!(calculate_line_score(3, 1), 600);
        assert_eq!(calculate_line_score(4, 1), 2400);

        // Level 5
        assert_eq!(calculate_line_score(1, 5), 40 * 6);
        assert_eq!(calculate_line_score(4, 5), 1200 * 6);
    }

    #[test]
    fn test_no_lines_no_score() {
        assert_eq!(calculate_line_score(0, 7), 0);
    }

    #[test]
    fn test_oversized_clear_pays_four_line_reward() {
        assert_eq!(calculate_line_score(5, 1), 2400);
    }

    #[test]
    fn test_level_calculation() {
        assert_eq!(calculate_level(0), 1);
        assert_eq!(calculate_level(9), 1);
        assert_eq!(calculate_level(10), 2);
        assert_eq!(calculate_level(29), 3);
        assert_eq!(calculate_level(90), 10);
        assert_eq!(calculate_level(109), 10);
        assert_eq!(calculate_level(10_000), 10);
    }

    #[test]
    fn test_drop_intervals() {
        assert_eq!(drop_interval_ms(1), 500);
        assert_eq!(drop_interval_ms(5), 300);
        assert_eq!(drop_interval_ms(10), 50);
        // Floored at level 10
        assert_eq!(drop_interval_ms(20), 50);
    }
}
