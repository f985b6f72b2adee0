use crate::models::Entry;

/// Epley estimate of the one-rep max from a submaximal set. No input
/// validation; negative or zero values still produce a number.
pub fn estimate_e1rm(weight: f64, reps: i32) -> f64 {
    weight * (1.0 + reps as f64 / 30.0)
}

/// Advisory for the next session, from the set just logged.
///
/// Every 4th week is a deload (week 0 counts), and that branch wins over
/// the effort-based ones. First match applies.
pub fn next_session(current: &Entry) -> String {
    if current.week % 4 == 0 {
        return format!(
            "Deload → {} kg x {}",
            (current.weight * 0.9).round(),
            current.reps - 2
        );
    }

    if current.rir >= 3 {
        return format!("+2.5kg → {} kg x {}", current.weight + 2.5, current.reps);
    }

    if current.rir == 2 {
        return format!("+1.25kg → {} kg x {}", current.weight + 1.25, current.reps);
    }

    if current.rir <= 1 {
        return format!("Same weight → {} kg try +1 rep", current.weight);
    }

    "Maintain".to_string()
}

/// Chart dataset: `[week, e1rm]` pairs for the entries whose exercise
/// matches `exercise` exactly (case-sensitive), in insertion order.
pub fn trend_points(entries: &[Entry], exercise: &str) -> Vec<[f64; 2]> {
    entries
        .iter()
        .filter(|entry| entry.exercise == exercise)
        .map(|entry| [entry.week as f64, entry.e1rm])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(week: i32, exercise: &str, weight: f64, reps: i32, rir: i32) -> Entry {
        Entry::logged(week, exercise.to_string(), weight, reps, rir)
    }

    #[test]
    fn e1rm_matches_the_formula() {
        assert_eq!(estimate_e1rm(100.0, 5), 100.0 * (1.0 + 5.0 / 30.0));
        assert_eq!(estimate_e1rm(0.0, 0), 0.0);
        assert_eq!(estimate_e1rm(80.0, 0), 80.0);
        assert_eq!(estimate_e1rm(60.0, 30), 120.0);
    }

    #[test]
    fn logged_sets_derive_e1rm() {
        let entry = set(1, "Squat", 100.0, 5, 2);
        assert_eq!(entry.e1rm, estimate_e1rm(100.0, 5));
    }

    #[test]
    fn deload_week_wins_over_high_rir() {
        assert_eq!(next_session(&set(4, "Squat", 100.0, 5, 3)), "Deload → 90 kg x 3");
    }

    #[test]
    fn week_zero_counts_as_a_deload() {
        assert!(next_session(&set(0, "Squat", 100.0, 5, 0)).starts_with("Deload"));
    }

    #[test]
    fn three_in_reserve_adds_two_and_a_half() {
        assert_eq!(next_session(&set(1, "Squat", 100.0, 5, 3)), "+2.5kg → 102.5 kg x 5");
    }

    #[test]
    fn two_in_reserve_adds_one_and_a_quarter() {
        assert_eq!(next_session(&set(2, "Squat", 100.0, 5, 2)), "+1.25kg → 101.25 kg x 5");
    }

    #[test]
    fn near_failure_keeps_the_weight() {
        assert_eq!(
            next_session(&set(3, "Squat", 100.0, 5, 1)),
            "Same weight → 100 kg try +1 rep"
        );
    }

    #[test]
    fn deload_reps_can_go_negative() {
        assert_eq!(next_session(&set(8, "Squat", 60.0, 1, 2)), "Deload → 54 kg x -1");
    }

    #[test]
    fn trend_filters_by_exact_exercise_in_order() {
        let entries = vec![
            set(1, "Squat", 100.0, 5, 2),
            set(1, "Bench", 70.0, 8, 2),
            set(2, "Squat", 102.5, 5, 2),
            set(2, "squat", 90.0, 5, 2),
        ];

        let points = trend_points(&entries, "Squat");
        assert_eq!(
            points,
            vec![[1.0, entries[0].e1rm], [2.0, entries[2].e1rm]]
        );
        assert!(trend_points(&entries, "Deadlift").is_empty());
    }
}
