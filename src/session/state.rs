use crate::engine::types::{ImageReference, MenuItemRecord};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SessionError {
    #[error("Unknown menu item: {0}")]
    UnknownItem(Uuid),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuSession {
    pub office_code: String,
    pub school_code: String,
    pub school_name: String,
    pub date: NaiveDate,
    items: Vec<MenuItemRecord>,
    #[serde(skip)]
    attempted: HashSet<Uuid>,
    #[serde(default = "default_true")]
    pub show_tracing_text: bool,
}

fn default_true() -> bool {
    true
}

impl MenuSession {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            office_code: String::new(),
            school_code: String::new(),
            school_name: String::new(),
            date,
            items: Vec::new(),
            attempted: HashSet::new(),
            show_tracing_text: true,
        }
    }

    /* ---------- 1.  SELECTION ---------- */

    pub fn set_school(
        &mut self,
        office_code: impl Into<String>,
        school_code: impl Into<String>,
        school_name: impl Into<String>,
    ) {
        self.office_code = office_code.into();
        self.school_code = school_code.into();
        self.school_name = school_name.into();
    }

    pub fn set_date(&mut self, date: NaiveDate) {
        self.date = date;
    }

    pub fn has_school(&self) -> bool {
        !self.office_code.is_empty() && !self.school_code.is_empty()
    }

    /* ---------- 2.  MENU ITEMS ---------- */

    /// Replace the whole menu with fresh records built from raw lines. The
    /// attempted set belongs to the old items and is cleared with them.
    pub fn replace_items<S: AsRef<str>>(&mut self, raw_lines: &[S]) {
        self.items = raw_lines
            .iter()
            .map(|raw| MenuItemRecord::from_raw(raw.as_ref()))
            .collect();
        self.attempted.clear();
    }

    pub fn items(&self) -> &[MenuItemRecord] {
        &self.items
    }

    pub fn item(&self, id: Uuid) -> Result<&MenuItemRecord, SessionError> {
        self.items
            .iter()
            .find(|item| item.id == id)
            .ok_or(SessionError::UnknownItem(id))
    }

    pub fn item_mut(&mut self, id: Uuid) -> Result<&mut MenuItemRecord, SessionError> {
        self.items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or(SessionError::UnknownItem(id))
    }

    /// Attach an image, replacing whatever the item had.
    pub fn set_image(&mut self, id: Uuid, image: ImageReference) -> Result<(), SessionError> {
        self.item_mut(id)?.image = Some(image);
        Ok(())
    }

    pub fn toggle_hidden(&mut self, id: Uuid) -> Result<bool, SessionError> {
        let item = self.item_mut(id)?;
        item.hidden = !item.hidden;
        Ok(item.hidden)
    }

    /// Override the label; a blank name restores the refined one.
    pub fn rename(&mut self, id: Uuid, name: &str) -> Result<(), SessionError> {
        let item = self.item_mut(id)?;
        let name = name.trim();
        item.label_override = if name.is_empty() || name == item.refined_name {
            None
        } else {
            Some(name.to_string())
        };
        Ok(())
    }

    pub fn visible_items(&self) -> impl Iterator<Item = &MenuItemRecord> {
        self.items.iter().filter(|item| !item.hidden)
    }

    /* ---------- 3.  AUTOMATIC LOOKUP BOOKKEEPING ---------- */

    /// Items without an image whose automatic lookup has not run yet.
    pub fn pending(&self) -> Vec<(Uuid, String)> {
        self.items
            .iter()
            .filter(|item| !item.is_resolved() && !self.attempted.contains(&item.id))
            .map(|item| (item.id, item.display_name().to_string()))
            .collect()
    }

    pub fn mark_attempted(&mut self, id: Uuid) {
        self.attempted.insert(id);
    }

    pub fn was_attempted(&self, id: Uuid) -> bool {
        self.attempted.contains(&id)
    }

    /* ---------- 4.  PRINT OPTIONS ---------- */

    pub fn toggle_tracing_text(&mut self) -> bool {
        self.show_tracing_text = !self.show_tracing_text;
        self.show_tracing_text
    }
}
