//! Printable worksheet data: the tray picture at the top, cut-out stickers
//! below. Rendering is left to whatever consumes the serialized layout.

use crate::engine::types::MenuItemRecord;
use crate::session::MenuSession;
use chrono::{Datelike, NaiveDate, Weekday};
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;
use uuid::Uuid;

pub const SIDE_SLOTS: usize = 3;

static RICE: LazyLock<Regex> = LazyLock::new(|| Regex::new("밥").expect("rice pattern"));
static SOUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("국|찌개|전골|탕|스프").expect("soup pattern"));
static SNACK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("우유|요구르트|주스|과일|귤|사과|배$|바나나|단감|딸기|수박|포도|감귤|요플레")
        .expect("snack pattern")
});

/// One dish as it appears on paper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sticker {
    pub id: Uuid,
    pub label: String,
    pub image: Option<String>,
    pub tracing_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tray {
    pub rice: Option<Sticker>,
    pub soup: Option<Sticker>,
    /// Always `SIDE_SLOTS` long; `None` is an empty compartment.
    pub sides: Vec<Option<Sticker>>,
    pub snacks: Vec<Sticker>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Worksheet {
    pub title: String,
    pub date_label: String,
    pub tray: Tray,
    pub stickers: Vec<Sticker>,
}

impl Worksheet {
    pub fn build(session: &MenuSession) -> Self {
        let stickers: Vec<Sticker> = session
            .visible_items()
            .map(|item| sticker(item, session.show_tracing_text))
            .collect();

        Self {
            title: format!("{} 오늘의 급식", session.school_name),
            date_label: date_label(session.date),
            tray: Tray::arrange(&stickers),
            stickers,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.stickers.is_empty()
    }
}

impl Tray {
    /// First rice dish, then first soup, then snacks; the rest are sides.
    /// A second rice dish falls through to the later checks.
    fn arrange(stickers: &[Sticker]) -> Self {
        let mut rice = None;
        let mut soup = None;
        let mut sides = Vec::new();
        let mut snacks = Vec::new();

        for sticker in stickers {
            let name = sticker.label.as_str();
            if rice.is_none() && RICE.is_match(name) {
                rice = Some(sticker.clone());
            } else if soup.is_none() && SOUP.is_match(name) {
                soup = Some(sticker.clone());
            } else if SNACK.is_match(name) {
                snacks.push(sticker.clone());
            } else {
                sides.push(sticker.clone());
            }
        }

        let mut sides: Vec<Option<Sticker>> = sides.into_iter().take(SIDE_SLOTS).map(Some).collect();
        sides.resize(SIDE_SLOTS, None);

        Self { rice, soup, sides, snacks }
    }
}

fn sticker(item: &MenuItemRecord, show_tracing_text: bool) -> Sticker {
    let label = item.display_name().to_string();
    Sticker {
        id: item.id,
        tracing_text: show_tracing_text.then(|| label.clone()),
        image: item.image.as_ref().map(|image| image.locator.clone()),
        label,
    }
}

/// `2025년 3월 14일 (금요일)`
pub fn date_label(date: NaiveDate) -> String {
    format!(
        "{}년 {}월 {}일 ({})",
        date.year(),
        date.month(),
        date.day(),
        weekday_ko(date.weekday())
    )
}

fn weekday_ko(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "월요일",
        Weekday::Tue => "화요일",
        Weekday::Wed => "수요일",
        Weekday::Thu => "목요일",
        Weekday::Fri => "금요일",
        Weekday::Sat => "토요일",
        Weekday::Sun => "일요일",
    }
}

#[cfg(test)]
mod tests;
