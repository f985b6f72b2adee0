//models.rs
use serde::{Deserialize, Serialize};

use crate::planner::estimate_e1rm;

/// One logged set. `e1rm` is derived from weight and reps when the set is
/// logged; imported sequences carry it verbatim from the file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub week: i32,
    pub exercise: String,
    pub weight: f64,
    pub reps: i32,
    pub rir: i32,
    pub e1rm: f64,
}

impl Entry {
    pub fn logged(week: i32, exercise: String, weight: f64, reps: i32, rir: i32) -> Self {
        Entry {
            week,
            exercise,
            weight,
            reps,
            rir,
            e1rm: estimate_e1rm(weight, reps),
        }
    }
}
