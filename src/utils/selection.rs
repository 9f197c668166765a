use super::catalog::{find_model, Model};
use serde::{Deserialize, Serialize};

pub const MAX_SELECTED: usize = 5;

pub const DEFAULT_SELECTION: [&str; MAX_SELECTED] = [
    "gemini-2.5-flash",
    "deepseek-r1",
    "llama-3.3-70b-instruct",
    "moonshot-kimi-k2",
    "qwen-2.5-72b-instruct",
];

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ToggleOutcome {
    Added,
    Removed,
    /// The set was full, nothing changed
    LimitReached,
}

/// Ordered set of selected model ids. Insertion order is column order.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Selection {
    ids: Vec<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self, model_id: &str) -> ToggleOutcome {
        if let Some(pos) = self.ids.iter().position(|id| id == model_id) {
            self.ids.remove(pos);
            ToggleOutcome::Removed
        } else if self.is_full() {
            ToggleOutcome::LimitReached
        } else {
            self.ids.push(model_id.to_string());
            ToggleOutcome::Added
        }
    }

    pub fn contains(&self, model_id: &str) -> bool {
        self.ids.iter().any(|id| id == model_id)
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.ids.len() >= MAX_SELECTED
    }

    /// Catalog entries for the selected ids, in selection order. Ids that
    /// are no longer in the catalog are skipped.
    pub fn resolve(&self) -> Vec<&'static Model> {
        self.ids.iter().filter_map(|id| find_model(id)).collect()
    }
}

impl From<Vec<String>> for Selection {
    // Persisted data may be hand-edited, so re-apply the invariants.
    fn from(raw: Vec<String>) -> Self {
        let mut selection = Selection::new();
        for id in raw {
            if !selection.contains(&id) && !selection.is_full() {
                selection.ids.push(id);
            }
        }
        selection
    }
}

impl From<Selection> for Vec<String> {
    fn from(selection: Selection) -> Self {
        selection.ids
    }
}

pub fn default_selection() -> Selection {
    Selection::from(
        DEFAULT_SELECTION
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>(),
    )
}
