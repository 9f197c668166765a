use super::catalog::Model;
use super::types::{Message, Role};
use regex::Regex;
use std::sync::OnceLock;

/// What a single grid cell shows.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum CellState<'a> {
    Answered(&'a Message),
    /// No answer yet and the model has a call in flight
    Waiting,
    /// No answer and nothing in flight
    Missing,
}

/// One user prompt and every answer that arrived for it.
#[derive(Clone, PartialEq, Debug)]
pub struct Turn<'a> {
    pub user: &'a Message,
    pub answers: Vec<&'a Message>,
}

impl<'a> Turn<'a> {
    pub fn answer_for(&self, model_id: &str) -> Option<&'a Message> {
        self.answers
            .iter()
            .copied()
            .find(|m| m.model_id.as_deref() == Some(model_id))
    }

    pub fn cell(&self, model_id: &str, pending: &[String]) -> CellState<'a> {
        match self.answer_for(model_id) {
            Some(message) => CellState::Answered(message),
            None if pending.iter().any(|id| id == model_id) => CellState::Waiting,
            None => CellState::Missing,
        }
    }

    /// Markdown with one `## <label>` section per model, in column order
    pub fn export_markdown(&self, models: &[&Model]) -> String {
        models
            .iter()
            .map(|model| {
                let body = self
                    .answer_for(model.id)
                    .map(|m| m.content.as_str())
                    .unwrap_or("");
                format!("## {}\n{}", model.label, body)
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Group a flat chronological message list into rows for the compare grid.
pub fn group_turns(messages: &[Message]) -> Vec<Turn<'_>> {
    let mut rows: Vec<Turn<'_>> = Vec::new();

    for message in messages {
        match message.role {
            Role::User => rows.push(Turn {
                user: message,
                answers: Vec::new(),
            }),
            Role::Assistant => {
                // answers before the first prompt have no row to join
                if let Some(row) = rows.last_mut() {
                    row.answers.push(message);
                }
            }
        }
    }

    rows
}

fn key_hint_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"(?i)rate limit|add your own\s+.*api key").ok())
        .as_ref()
}

/// Whether an answer looks like a quota or missing key problem the user can
/// fix by entering their own key.
pub fn needs_key_hint(content: &str) -> bool {
    key_hint_pattern().is_some_and(|re| re.is_match(content))
}
