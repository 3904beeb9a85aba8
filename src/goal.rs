use crate::models::AlertState;

pub fn evaluate(total_kg: f64, threshold_kg: Option<f64>) -> AlertState {
    match threshold_kg {
        None => AlertState::NoGoalSet,
        Some(threshold) if total_kg > threshold => AlertState::ExceededGoal,
        Some(_) => AlertState::WithinGoal,
    }
}

pub fn parse_goal(raw: Option<&str>) -> Option<f64> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .and_then(|value| value.parse::<f64>().ok())
        .filter(|value| value.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exceeding_is_strict() {
        assert_eq!(evaluate(150.0, Some(150.0)), AlertState::WithinGoal);
        assert_eq!(evaluate(150.01, Some(150.0)), AlertState::ExceededGoal);
        assert_eq!(evaluate(10.0, Some(150.0)), AlertState::WithinGoal);
    }

    #[test]
    fn absent_goal() {
        assert_eq!(evaluate(1_000.0, None), AlertState::NoGoalSet);
        assert_eq!(evaluate(0.0, parse_goal(Some("   "))), AlertState::NoGoalSet);
        assert_eq!(evaluate(0.0, parse_goal(None)), AlertState::NoGoalSet);
    }

    #[test]
    fn goal_parsing() {
        assert_eq!(parse_goal(Some(" 150 ")), Some(150.0));
        assert_eq!(parse_goal(Some("abc")), None);
        assert_eq!(parse_goal(Some("NaN")), None);
    }

    #[test]
    fn state_is_not_sticky() {
        assert_eq!(evaluate(200.0, Some(150.0)), AlertState::ExceededGoal);
        assert_eq!(evaluate(100.0, Some(150.0)), AlertState::WithinGoal);
    }
}
