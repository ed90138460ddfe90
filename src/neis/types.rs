//! Wire shapes of the NEIS hub API and the domain types built from them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct School {
    pub office_code: String,
    pub office_name: String,
    pub school_code: String,
    pub school_name: String,
    pub address: String,
}

#[derive(Deserialize, Debug)]
pub(crate) struct SchoolRow {
    #[serde(rename = "ATPT_OFCDC_SC_CODE")]
    pub office_code: String,
    #[serde(rename = "ATPT_OFCDC_SC_NM", default)]
    pub office_name: String,
    #[serde(rename = "SD_SCHUL_CODE")]
    pub school_code: String,
    #[serde(rename = "SCHUL_NM")]
    pub school_name: String,
    #[serde(rename = "ORG_RDNMA", default)]
    pub address: String,
}

impl From<SchoolRow> for School {
    fn from(row: SchoolRow) -> Self {
        Self {
            office_code: row.office_code,
            office_name: row.office_name,
            school_code: row.school_code,
            school_name: row.school_name,
            address: row.address,
        }
    }
}

#[derive(Deserialize, Debug)]
pub(crate) struct MealRow {
    #[serde(rename = "DDISH_NM")]
    pub dishes: String,
}

/// `RESULT` block NEIS sends instead of data (e.g. `INFO-200`: no data).
#[derive(Deserialize, Debug)]
pub(crate) struct ApiResult {
    #[serde(rename = "CODE")]
    pub code: String,
    #[serde(rename = "MESSAGE", default)]
    pub message: String,
}

/// Data envelopes look like `{"<service>": [{"head": [...]}, {"row": [...]}]}`.
pub(crate) fn rows(payload: &Value, service: &str) -> Option<Value> {
    payload
        .get(service)?
        .as_array()?
        .iter()
        .find_map(|section| section.get("row"))
        .cloned()
}

pub(crate) fn api_result(payload: &Value) -> Option<ApiResult> {
    serde_json::from_value(payload.get("RESULT")?.clone()).ok()
}
