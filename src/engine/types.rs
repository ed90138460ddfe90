//! Shared structs.

use crate::preprocessing::refine;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Provenance label: which tier produced an image.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    #[serde(rename = "tier1_preset")]
    Preset,
    #[serde(rename = "tier2_cache")]
    SharedCache,
    /// Rows written by the web app carry the provider name.
    #[serde(rename = "tier3_search", alias = "tier3_pixabay", alias = "tier3_naver")]
    WebSearch,
    #[serde(rename = "tier4_ai", alias = "tier4_openai")]
    AiGenerated,
    #[serde(rename = "user_upload")]
    UserUpload,
}

impl Tier {
    /// Stable key stored alongside cached images.
    pub fn as_key(&self) -> &'static str {
        match self {
            Tier::Preset => "tier1_preset",
            Tier::SharedCache => "tier2_cache",
            Tier::WebSearch => "tier3_search",
            Tier::AiGenerated => "tier4_ai",
            Tier::UserUpload => "user_upload",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tier::Preset => "기본 이미지",
            Tier::SharedCache => "공유 캐시",
            Tier::WebSearch => "이미지 검색",
            Tier::AiGenerated => "AI 생성",
            Tier::UserUpload => "직접 업로드",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_key())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    /// URL or bundled asset path.
    pub locator: String,
    pub tier: Tier,
}

impl ImageReference {
    pub fn new(locator: impl Into<String>, tier: Tier) -> Self {
        Self {
            locator: locator.into(),
            tier,
        }
    }
}

/// One dish of the fetched menu.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MenuItemRecord {
    pub id: Uuid,
    pub original_name: String,
    /// Always `refine(original_name)`; user renames live in `label_override`.
    pub refined_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_override: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageReference>,
    #[serde(default)]
    pub hidden: bool,
}

impl MenuItemRecord {
    pub fn from_raw(raw: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            original_name: raw.to_string(),
            refined_name: refine(raw),
            label_override: None,
            image: None,
            hidden: false,
        }
    }

    /// Label shown on the worksheet and used as the lookup key.
    pub fn display_name(&self) -> &str {
        self.label_override.as_deref().unwrap_or(&self.refined_name)
    }

    pub fn is_resolved(&self) -> bool {
        self.image.is_some()
    }
}
