use crate::config::Settings;
use crate::errors::TrackerError;
use crate::models::{ActivityRecord, Category, LeaderboardEntry, Period};
use async_trait::async_trait;
use reqwest::{header, Client};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionCredential(String);

impl SessionCredential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn token(&self) -> &str {
        &self.0
    }

    pub fn from_cookie_header(value: &str) -> Option<Self> {
        value
            .split(';')
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == "session")
            .map(|(_, token)| token.trim())
            .filter(|token| !token.is_empty())
            .map(Self::new)
    }
}

#[async_trait]
pub trait ActivityRecordSource: Send + Sync {
    async fn fetch(
        &self,
        credential: &SessionCredential,
        category: Category,
        period: Period,
    ) -> Result<Vec<ActivityRecord>, TrackerError>;
}

#[derive(Debug, Clone)]
pub struct HttpRecordSource {
    client: Client,
    base_url: String,
}

impl HttpRecordSource {
    pub fn new(settings: &Settings) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(settings.record_timeout).build()?;
        Ok(Self {
            client,
            base_url: settings.record_api_base.clone(),
        })
    }

    pub fn records_url(&self, category: Category, period: Period) -> String {
        format!("{}/api/{category}/{}", self.base_url, period.api_segment())
    }

    pub async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, reqwest::Error> {
        self.client
            .get(format!("{}/api/leaderboard", self.base_url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }
}

#[async_trait]
impl ActivityRecordSource for HttpRecordSource {
    async fn fetch(
        &self,
        credential: &SessionCredential,
        category: Category,
        period: Period,
    ) -> Result<Vec<ActivityRecord>, TrackerError> {
        let unavailable = |reason: String| TrackerError::SourceUnavailable { category, reason };

        let response = self
            .client
            .get(self.records_url(category, period))
            .header(header::COOKIE, format!("session={}", credential.token()))
            .send()
            .await
            .map_err(|err| unavailable(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(unavailable(format!("record api returned {status}")));
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| unavailable(err.to_string()))?;
        ActivityRecord::decode_many(category, &body).map_err(|err| unavailable(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_cookie_is_extracted() {
        let credential = SessionCredential::from_cookie_header("theme=dark; session=abc123; x=1");
        assert_eq!(credential, Some(SessionCredential::new("abc123")));
        assert_eq!(SessionCredential::from_cookie_header("theme=dark"), None);
        assert_eq!(SessionCredential::from_cookie_header("session="), None);
    }

    #[test]
    fn records_url_uses_category_and_period() {
        let settings = Settings {
            record_api_base: "http://records.local".into(),
            ..Settings::default()
        };
        let source = HttpRecordSource::new(&settings).unwrap();
        let month = Period::parse_month("2024-01").unwrap();
        let day = Period::parse_day("2024-01-09").unwrap();
        assert_eq!(
            source.records_url(Category::Travel, month),
            "http://records.local/api/travel/month/2024-01"
        );
        assert_eq!(
            source.records_url(Category::Food, day),
            "http://records.local/api/food/day/2024-01-09"
        );
    }
}
