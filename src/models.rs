use crate::errors::TrackerError;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Food,
    Travel,
    Electricity,
    Lifestyle,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Food,
        Category::Travel,
        Category::Electricity,
        Category::Lifestyle,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Food => "food",
            Category::Travel => "travel",
            Category::Electricity => "electricity",
            Category::Lifestyle => "lifestyle",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = TrackerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "food" => Ok(Category::Food),
            "travel" => Ok(Category::Travel),
            "electricity" => Ok(Category::Electricity),
            "lifestyle" => Ok(Category::Lifestyle),
            other => Err(TrackerError::UnknownFactorKind(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Day(NaiveDate),
    Month { year: i32, month: u32 },
}

impl Period {
    pub fn month(year: i32, month: u32) -> Result<Self, TrackerError> {
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(TrackerError::InvalidPeriod(format!("{year}-{month:02}")));
        }
        Ok(Period::Month { year, month })
    }

    pub fn parse_month(value: &str) -> Result<Self, TrackerError> {
        let invalid = || TrackerError::InvalidPeriod(value.to_string());
        let (year, month) = value.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month.parse::<u32>().map_err(|_| invalid())?;
        Period::month(year, month).map_err(|_| invalid())
    }

    pub fn parse_day(value: &str) -> Result<Self, TrackerError> {
        NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
            .map(Period::Day)
            .map_err(|_| TrackerError::InvalidPeriod(value.to_string()))
    }

    pub fn api_segment(&self) -> String {
        match self {
            Period::Day(_) => format!("day/{self}"),
            Period::Month { .. } => format!("month/{self}"),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        match *self {
            Period::Day(day) => day == date,
            Period::Month { year, month } => date.year() == year && date.month() == month,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Day(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            Period::Month { year, month } => write!(f, "{year:04}-{month:02}"),
        }
    }
}

impl Serialize for Period {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodLog {
    pub date: NaiveDate,
    #[serde(default)]
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelLog {
    pub date: NaiveDate,
    #[serde(default)]
    pub mode: Option<String>,
    pub distance_km: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElectricityLog {
    pub date: NaiveDate,
    pub units: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifestyleLog {
    pub date: NaiveDate,
    #[serde(default)]
    pub habits: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ActivityRecord {
    Food(FoodLog),
    Travel(TravelLog),
    Electricity(ElectricityLog),
    Lifestyle(LifestyleLog),
}

impl ActivityRecord {
    pub fn category(&self) -> Category {
        match self {
            ActivityRecord::Food(_) => Category::Food,
            ActivityRecord::Travel(_) => Category::Travel,
            ActivityRecord::Electricity(_) => Category::Electricity,
            ActivityRecord::Lifestyle(_) => Category::Lifestyle,
        }
    }

    pub fn date(&self) -> NaiveDate {
        match self {
            ActivityRecord::Food(log) => log.date,
            ActivityRecord::Travel(log) => log.date,
            ActivityRecord::Electricity(log) => log.date,
            ActivityRecord::Lifestyle(log) => log.date,
        }
    }

    pub fn decode_many(category: Category, body: &[u8]) -> Result<Vec<Self>, serde_json::Error> {
        let records = match category {
            Category::Food => serde_json::from_slice::<Vec<FoodLog>>(body)?
                .into_iter()
                .map(ActivityRecord::Food)
                .collect(),
            Category::Travel => serde_json::from_slice::<Vec<TravelLog>>(body)?
                .into_iter()
                .map(ActivityRecord::Travel)
                .collect(),
            Category::Electricity => serde_json::from_slice::<Vec<ElectricityLog>>(body)?
                .into_iter()
                .map(ActivityRecord::Electricity)
                .collect(),
            Category::Lifestyle => serde_json::from_slice::<Vec<LifestyleLog>>(body)?
                .into_iter()
                .map(ActivityRecord::Lifestyle)
                .collect(),
        };
        Ok(records)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DegradedCategory {
    pub category: Category,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateResult {
    pub period: Period,
    pub per_category: BTreeMap<Category, f64>,
    pub total: f64,
    pub degraded: Vec<DegradedCategory>,
}

impl AggregateResult {
    pub fn is_partial(&self) -> bool {
        !self.degraded.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Band {
    Excellent,
    Good,
    Average,
    High,
}

impl Band {
    pub fn label(self) -> &'static str {
        match self {
            Band::Excellent => "Excellent",
            Band::Good => "Good",
            Band::Average => "Average",
            Band::High => "High Emissions",
        }
    }

    pub fn grade(self) -> &'static str {
        match self {
            Band::Excellent => "A+",
            Band::Good => "B",
            Band::Average => "C",
            Band::High => "D",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertState {
    NoGoalSet,
    WithinGoal,
    ExceededGoal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmissionReport {
    pub aggregate: AggregateResult,
    pub band: Band,
    pub alert: AlertState,
    pub share_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub username: String,
    pub total_emission: f64,
}

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    #[serde(default)]
    pub goal: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EstimateRequest {
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Estimated,
    Unparsable,
    Unavailable,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EstimateResponse {
    pub estimated_kg: f64,
    pub confidence: Confidence,
    pub raw: String,
}

#[derive(Debug, Deserialize)]
pub struct PlanRequest {
    pub descriptions: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PlanResponse {
    pub items: Vec<EstimateResponse>,
    pub total_kg: f64,
    pub unestimated: usize,
}

#[derive(Debug, Deserialize)]
pub struct AssistantRequest {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AssistantResponse {
    pub reply: String,
}
