//! Tier 1: bundled images for everyday dishes. No network.

use crate::engine::types::{ImageReference, Tier};

pub const DEFAULT_ASSET_ROOT: &str = "/assets/default-images";

/// Dish name → bundled asset. Substring matching walks this list top to
/// bottom, so the group order decides overlaps (`쇠고기배추된장국` hits the soup
/// group before the single-syllable `배`).
pub const PRESETS: &[(&str, &str)] = &[
    // rice
    ("현미밥", "rice.png"),
    ("보리밥", "rice.png"),
    ("흑미밥", "rice.png"),
    ("기장밥", "rice.png"),
    ("혼합잡곡밥", "rice.png"),
    ("귀리밥", "rice.png"),
    ("차수수밥", "rice.png"),
    ("백미밥", "rice.png"),
    ("수수밥", "rice.png"),
    // kimchi
    ("배추김치", "kimchi.png"),
    ("깍두기", "kimchi.png"),
    ("총각김치", "kimchi.png"),
    ("보쌈김치", "kimchi.png"),
    ("열무김치", "kimchi.png"),
    // soup
    ("미역국", "soup.png"),
    ("된장국", "soup.png"),
    ("어묵국", "soup.png"),
    ("무국", "soup.png"),
    ("계란국", "soup.png"),
    ("만둣국", "soup.png"),
    ("시금치된장국", "soup.png"),
    ("배추된장국", "soup.png"),
    ("아욱된장국", "soup.png"),
    // milk, snacks
    ("우유", "milk.png"),
    ("요구르트", "yogurt.png"),
    ("사과", "apple.png"),
    ("배", "pear.png"),
    ("귤", "tangerine.png"),
    ("바나나", "banana.png"),
    ("방울토마토", "tomato.png"),
];

pub struct PresetSource {
    asset_root: String,
}

impl Default for PresetSource {
    fn default() -> Self {
        Self::new(DEFAULT_ASSET_ROOT)
    }
}

impl PresetSource {
    pub fn new(asset_root: impl Into<String>) -> Self {
        Self {
            asset_root: asset_root.into(),
        }
    }

    /// Exact name first, then the first listed key contained in the name.
    pub fn lookup(&self, name: &str) -> Option<ImageReference> {
        let file = PRESETS
            .iter()
            .find(|(key, _)| *key == name)
            .or_else(|| PRESETS.iter().find(|(key, _)| name.contains(key)))
            .map(|(_, file)| *file)?;

        Some(ImageReference::new(
            format!("{}/{}", self.asset_root.trim_end_matches('/'), file),
            Tier::Preset,
        ))
    }
}
