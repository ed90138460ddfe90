use super::types::{api_result, rows, MealRow, SchoolRow};
use super::{NeisError, School};
use chrono::NaiveDate;
use regex::Regex;
use reqwest::Client;
use serde_json::Value;
use std::sync::LazyLock;
use tracing::{debug, instrument, warn};

pub const NEIS_BASE_URL: &str = "https://open.neis.go.kr/hub";

static LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").expect("line break pattern"));

/// Split a `DDISH_NM` value into raw menu lines.
pub fn split_dishes(dishes: &str) -> Vec<String> {
    LINE_BREAK
        .split(dishes)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

pub struct NeisClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    school_page_size: u32,
    meal_page_size: u32,
}

impl NeisClient {
    pub fn new(client: Client, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key,
            school_page_size: 20,
            meal_page_size: 10,
        }
    }

    pub fn with_page_sizes(mut self, schools: u32, meals: u32) -> Self {
        self.school_page_size = schools;
        self.meal_page_size = meals;
        self
    }

    fn api_key(&self) -> Result<&str, NeisError> {
        self.api_key.as_deref().ok_or(NeisError::MissingApiKey)
    }

    async fn get(&self, service: &str, params: &[(&str, String)]) -> Result<Value, NeisError> {
        let response = self
            .client
            .get(format!("{}/{}", self.base_url.trim_end_matches('/'), service))
            .query(params)
            .send()
            .await?;

        let status = response.status();
        debug!(service, status = status.as_u16(), "NEIS response");
        if !status.is_success() {
            return Err(NeisError::Status(status.as_u16()));
        }
        Ok(response.json().await?)
    }

    /// Schools whose name contains `query`. A blank query returns nothing
    /// without calling NEIS.
    #[instrument(skip(self))]
    pub async fn search_schools(&self, query: &str) -> Result<Vec<School>, NeisError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let key = self.api_key()?;

        let payload = self
            .get(
                "schoolInfo",
                &[
                    ("KEY", key.to_string()),
                    ("Type", "json".to_string()),
                    ("pIndex", "1".to_string()),
                    ("pSize", self.school_page_size.to_string()),
                    ("SCHUL_NM", query.to_string()),
                ],
            )
            .await?;

        let Some(rows) = rows(&payload, "schoolInfo") else {
            log_result(&payload);
            return Ok(Vec::new());
        };
        let rows: Vec<SchoolRow> =
            serde_json::from_value(rows).map_err(|e| NeisError::Decode(e.to_string()))?;
        Ok(rows.into_iter().map(School::from).collect())
    }

    /// Raw menu lines served at a school on `date`, in menu order. A day
    /// without a meal is an empty list.
    #[instrument(skip(self))]
    pub async fn daily_menu(
        &self,
        office_code: &str,
        school_code: &str,
        date: NaiveDate,
    ) -> Result<Vec<String>, NeisError> {
        let key = self.api_key()?;

        let payload = self
            .get(
                "mealServiceDietInfo",
                &[
                    ("KEY", key.to_string()),
                    ("Type", "json".to_string()),
                    ("pIndex", "1".to_string()),
                    ("pSize", self.meal_page_size.to_string()),
                    ("ATPT_OFCDC_SC_CODE", office_code.to_string()),
                    ("SD_SCHUL_CODE", school_code.to_string()),
                    ("MLSV_YMD", date.format("%Y%m%d").to_string()),
                ],
            )
            .await?;

        let Some(rows) = rows(&payload, "mealServiceDietInfo") else {
            log_result(&payload);
            return Ok(Vec::new());
        };
        let rows: Vec<MealRow> =
            serde_json::from_value(rows).map_err(|e| NeisError::Decode(e.to_string()))?;

        // First service of the day (lunch for most schools).
        Ok(rows
            .into_iter()
            .next()
            .map(|row| split_dishes(&row.dishes))
            .unwrap_or_default())
    }
}

fn log_result(payload: &Value) {
    match api_result(payload) {
        Some(result) if result.code == "INFO-200" => debug!("NEIS has no data for this query"),
        Some(result) => warn!(code = %result.code, message = %result.message, "NEIS reported an error"),
        None => warn!("NEIS response had neither rows nor RESULT"),
    }
}
