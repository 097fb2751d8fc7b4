//! Adaptive difficulty controller.
//!
//! Pure function over the fixed ordered level sequence: the next quiz steps
//! down one level when the session's rolling average for the field drops
//! below 40, up one level when it exceeds 80, and never moves more than one
//! position per call.

/// Ordered proficiency sequence, easiest first.
pub const LEVELS: [&str; 3] = ["beginner", "intermediate", "advanced"];

/// Average score below which the next quiz steps down a level.
pub const STEP_DOWN_BELOW: f64 = 40.0;

/// Average score above which the next quiz steps up a level.
pub const STEP_UP_ABOVE: f64 = 80.0;

/// Computes the level for the next quiz from the level the user stated and
/// the scores of their prior attempts in the same field of study.
///
/// An unrecognized `current` level and an empty score history are both
/// no-ops: the stated level is returned unchanged.
pub fn next_level<'a>(current: &'a str, prior_scores: &[f64]) -> &'a str {
    let Some(index) = LEVELS.iter().position(|level| *level == current) else {
        return current;
    };

    if prior_scores.is_empty() {
        return current;
    }

    let avg = prior_scores.iter().sum::<f64>() / prior_scores.len() as f64;

    if avg < STEP_DOWN_BELOW && index > 0 {
        LEVELS[index - 1]
    } else if avg > STEP_UP_ABOVE && index + 1 < LEVELS.len() {
        LEVELS[index + 1]
    } else {
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_level_is_a_no_op() {
        assert_eq!(next_level("wizard", &[10.0, 20.0]), "wizard");
        assert_eq!(next_level("", &[95.0]), "");
    }

    #[test]
    fn empty_history_is_a_no_op() {
        for level in LEVELS {
            assert_eq!(next_level(level, &[]), level);
        }
    }

    #[test]
    fn low_average_steps_down_once() {
        assert_eq!(next_level("intermediate", &[20.0, 30.0, 50.0]), "beginner");
        assert_eq!(next_level("advanced", &[0.0]), "intermediate");
    }

    #[test]
    fn low_average_at_lowest_level_stays() {
        assert_eq!(next_level("beginner", &[0.0, 10.0]), "beginner");
    }

    #[test]
    fn high_average_steps_up_once() {
        assert_eq!(next_level("beginner", &[85.0, 90.0]), "intermediate");
        assert_eq!(next_level("intermediate", &[100.0]), "advanced");
    }

    #[test]
    fn high_average_at_highest_level_stays() {
        assert_eq!(next_level("advanced", &[100.0, 100.0]), "advanced");
    }

    #[test]
    fn mid_average_stays() {
        assert_eq!(next_level("intermediate", &[40.0, 80.0]), "intermediate");
        assert_eq!(next_level("beginner", &[60.0]), "beginner");
    }

    #[test]
    fn thresholds_are_exclusive() {
        // Exactly 40 and exactly 80 both stay put.
        assert_eq!(next_level("intermediate", &[40.0]), "intermediate");
        assert_eq!(next_level("intermediate", &[80.0]), "intermediate");
    }

    #[test]
    fn never_moves_more_than_one_position() {
        let histories: [&[f64]; 4] = [&[0.0], &[100.0], &[0.0, 0.0, 0.0], &[100.0; 5]];
        for (index, level) in LEVELS.iter().enumerate() {
            for scores in histories {
                let next = next_level(level, scores);
                let next_index = LEVELS.iter().position(|l| l == &next).unwrap();
                assert!(next_index.abs_diff(index) <= 1);
            }
        }
    }

    #[test]
    fn deterministic_for_equal_inputs() {
        let scores = [12.5, 88.0, 45.0];
        assert_eq!(
            next_level("intermediate", &scores),
            next_level("intermediate", &scores)
        );
    }
}
