use crate::errors::TrackerError;
use crate::models::{ActivityRecord, Category};

#[derive(Debug, Clone, PartialEq)]
pub struct EmissionFactorTable {
    travel_modes: Vec<(&'static str, f64)>,
    travel_default: f64,
    electricity_per_kwh: f64,
    food_per_log: f64,
    lifestyle_per_log: f64,
}

impl Default for EmissionFactorTable {
    fn default() -> Self {
        Self {
            travel_modes: vec![("car", 0.21), ("flight", 0.115), ("bus", 0.05)],
            travel_default: 0.21,
            electricity_per_kwh: 0.85,
            food_per_log: 2.5,
            lifestyle_per_log: 1.0,
        }
    }
}

impl EmissionFactorTable {
    pub fn factor_for(&self, category: &str, mode: Option<&str>) -> Result<f64, TrackerError> {
        let category = category.parse::<Category>()?;
        Ok(self.factor(category, mode))
    }

    pub fn factor(&self, category: Category, mode: Option<&str>) -> f64 {
        match category {
            Category::Travel => mode
                .map(|mode| mode.trim().to_ascii_lowercase())
                .and_then(|mode| {
                    self.travel_modes
                        .iter()
                        .find(|(name, _)| *name == mode)
                        .map(|(_, factor)| *factor)
                })
                .unwrap_or(self.travel_default),
            Category::Electricity => self.electricity_per_kwh,
            Category::Food => self.food_per_log,
            Category::Lifestyle => self.lifestyle_per_log,
        }
    }

    pub fn emission_of(&self, record: &ActivityRecord) -> f64 {
        match record {
            ActivityRecord::Travel(log) => {
                log.distance_km * self.factor(Category::Travel, log.mode.as_deref())
            }
            ActivityRecord::Electricity(log) => log.units * self.factor(Category::Electricity, None),
            ActivityRecord::Food(_) => self.factor(Category::Food, None),
            ActivityRecord::Lifestyle(_) => self.factor(Category::Lifestyle, None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TravelLog;
    use chrono::NaiveDate;

    #[test]
    fn travel_modes_resolve() {
        let table = EmissionFactorTable::default();
        assert_eq!(table.factor_for("travel", Some("car")).unwrap(), 0.21);
        assert_eq!(table.factor_for("travel", Some("Flight")).unwrap(), 0.115);
        assert_eq!(table.factor_for("travel", Some("bus")).unwrap(), 0.05);
    }

    #[test]
    fn missing_or_unknown_mode_uses_category_default() {
        let table = EmissionFactorTable::default();
        assert_eq!(table.factor_for("travel", None).unwrap(), 0.21);
        assert_eq!(table.factor_for("travel", Some("rocket")).unwrap(), 0.21);
        assert_eq!(table.factor_for("electricity", Some("solar")).unwrap(), 0.85);
        assert_eq!(table.factor_for("food", None).unwrap(), 2.5);
        assert_eq!(table.factor_for("lifestyle", None).unwrap(), 1.0);
    }

    #[test]
    fn unknown_category_is_rejected() {
        let table = EmissionFactorTable::default();
        assert!(matches!(
            table.factor_for("shopping", None),
            Err(TrackerError::UnknownFactorKind(kind)) if kind == "shopping"
        ));
    }

    #[test]
    fn emission_of_travel_record() {
        let table = EmissionFactorTable::default();
        let record = ActivityRecord::Travel(TravelLog {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            mode: Some("bus".into()),
            distance_km: 100.0,
        });
        assert!((table.emission_of(&record) - 5.0).abs() < 1e-9);
    }
}
