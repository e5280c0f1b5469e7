
pub(crate) use fixtures::{brute_force, random_points, scenario_points};
