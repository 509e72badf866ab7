use crate::sources::error::FetchError;
use crate::sources::http::HttpSource;
use crate::types::incidence::IncidenceObservation;
use chrono::NaiveDate;
use log::info;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};

/// Retrieves a district's incidence history from the incidence API.
pub struct IncidenceFetcher {
    http: HttpSource,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct IncidenceResponse {
    data: HashMap<String, DistrictHistory>,
}

#[derive(Debug, Deserialize)]
struct DistrictHistory {
    history: Vec<HistoryEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HistoryEntry {
    week_incidence: f64,
    date: String,
}

impl IncidenceFetcher {
    pub fn new(http: HttpSource, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    pub fn history_url(&self, region_code: &str) -> String {
        format!(
            "{}/districts/{}/history/incidence",
            self.base_url.trim_end_matches('/'),
            region_code
        )
    }

    /// Incidence history for `region_code`, ascending by date.
    pub async fn fetch_incidence(
        &self,
        region_code: &str,
    ) -> Result<Vec<IncidenceObservation>, FetchError> {
        let region_code = region_code.trim();
        if region_code.is_empty() {
            return Err(FetchError::InvalidRegionCode);
        }
        let url = self.history_url(region_code);
        let body = self.http.get_text(&url, &[]).await?;
        let series = parse_incidence(&url, &body, region_code)?;
        info!(
            "Fetched {} incidence values for region {} ({} to {})",
            series.len(),
            region_code,
            series.first().map(|o| o.date.to_string()).unwrap_or_default(),
            series.last().map(|o| o.date.to_string()).unwrap_or_default(),
        );
        Ok(series)
    }
}

/// Extracts `data.<region_code>.history` and normalizes it to a date-sorted series.
pub fn parse_incidence(
    url: &str,
    body: &str,
    region_code: &str,
) -> Result<Vec<IncidenceObservation>, FetchError> {
    let mut response: IncidenceResponse = serde_json::from_str(body)
        .map_err(|e| FetchError::malformed(url, format!("invalid incidence JSON: {e}")))?;

    let district = response
        .data
        .remove(region_code)
        .ok_or_else(|| FetchError::UnknownRegion(region_code.to_string()))?;

    let mut by_date = BTreeMap::new();
    for entry in district.history {
        let day = entry
            .date
            .get(..10)
            .ok_or_else(|| FetchError::malformed(url, format!("date '{}' is too short", entry.date)))?;
        let date = NaiveDate::parse_from_str(day, "%Y-%m-%d")
            .map_err(|e| FetchError::malformed(url, format!("invalid date '{}': {e}", entry.date)))?;
        if by_date.insert(date, entry.week_incidence).is_some() {
            return Err(FetchError::malformed(url, format!("duplicate date {date}")));
        }
    }

    Ok(by_date
        .into_iter()
        .map(|(date, incidence)| IncidenceObservation { date, incidence })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"{
        "data": {
            "16053": {
                "ags": "16053",
                "name": "Jena",
                "history": [
                    {"weekIncidence": 12.5, "date": "2020-03-21T00:00:00.000Z"},
                    {"weekIncidence": 9.75, "date": "2020-03-20T00:00:00.000Z"},
                    {"weekIncidence": 0, "date": "2020-03-22T00:00:00.000Z"}
                ]
            }
        },
        "meta": {"source": "Robert Koch-Institut"}
    }"#;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_incidence_sorts_and_renames() {
        let series = parse_incidence("test://inc", BODY, "16053").unwrap();
        assert_eq!(
            series,
            vec![
                IncidenceObservation { date: date(2020, 3, 20), incidence: 9.75 },
                IncidenceObservation { date: date(2020, 3, 21), incidence: 12.5 },
                IncidenceObservation { date: date(2020, 3, 22), incidence: 0.0 },
            ]
        );
    }

    #[test]
    fn test_unknown_region() {
        let err = parse_incidence("test://inc", BODY, "16051").unwrap_err();
        assert!(matches!(err, FetchError::UnknownRegion(code) if code == "16051"));
    }

    #[test]
    fn test_bad_date_is_malformed() {
        let body = BODY.replace("2020-03-22T00", "2020-13-22T00");
        let err = parse_incidence("test://inc", &body, "16053").unwrap_err();
        assert!(matches!(err, FetchError::MalformedSource { .. }));
    }

    #[test]
    fn test_non_numeric_incidence_is_malformed() {
        let body = BODY.replace("12.5", "\"n/a\"");
        let err = parse_incidence("test://inc", &body, "16053").unwrap_err();
        assert!(matches!(err, FetchError::MalformedSource { .. }));
    }

    #[test]
    fn test_duplicate_date_is_malformed() {
        let body = BODY.replace("2020-03-22T00", "2020-03-21T12");
        let err = parse_incidence("test://inc", &body, "16053").unwrap_err();
        assert!(err.to_string().contains("duplicate date 2020-03-21"));
    }

    #[tokio::test]
    async fn test_empty_region_code_is_rejected_before_request() {
        let config = crate::SourceConfig::builder()
            .incidence_base_url("http://127.0.0.1:9")
            .build();
        let fetcher = IncidenceFetcher::new(HttpSource::new(&config).unwrap(), &config.incidence_base_url);
        let err = fetcher.fetch_incidence("   ").await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidRegionCode));
    }

    #[test]
    fn test_history_url() {
        let config = crate::SourceConfig::default();
        let fetcher = IncidenceFetcher::new(
            HttpSource::new(&config).unwrap(),
            "https://api.corona-zahlen.org/",
        );
        assert_eq!(
            fetcher.history_url("16053"),
            "https://api.corona-zahlen.org/districts/16053/history/incidence"
        );
    }
}
