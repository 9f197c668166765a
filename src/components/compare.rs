use crate::utils::{
    group_turns, needs_key_hint, segments, CellState, Model, Segment, Selection, ThreadStore, Turn,
};
use dioxus::prelude::*;
use std::time::Duration;

const COPIED_RESET: Duration = Duration::from_secs(2);

fn copy_to_clipboard(text: &str) {
    match serde_json::to_string(text) {
        Ok(literal) => {
            let _ = document::eval(&format!("navigator.clipboard.writeText({});", literal));
        }
        Err(e) => tracing::warn!("Could not encode text for the clipboard: {}", e),
    }
}

/// Show "Copied" on `flag` for a moment.
fn flash_copied(mut flag: Signal<bool>) {
    flag.set(true);
    spawn(async move {
        tokio::time::sleep(COPIED_RESET).await;
        flag.set(false);
    });
}

#[derive(Clone, PartialEq, Debug)]
enum CellContent {
    Answer(String),
    Waiting,
    Missing,
}

#[derive(Clone, PartialEq, Debug)]
struct Cell {
    model_id: String,
    content: CellContent,
}

#[component]
pub fn CompareGrid(
    threads: Signal<ThreadStore>,
    selection: Signal<Selection>,
    pending: Signal<Vec<String>>,
    on_open_models: EventHandler<()>,
    on_open_keys: EventHandler<()>,
) -> Element {
    let models = selection.read().resolve();

    if models.is_empty() {
        return rsx! {
            div {
                class: "empty-state",
                h2 { "No models selected" }
                p { class: "muted", "Pick the models you want to compare side by side." }
                button {
                    class: "primary-button",
                    onclick: move |_| on_open_models.call(()),
                    "Select Models"
                }
            }
        };
    }

    let store = threads.read();
    let thread_id = store.active_id().unwrap_or_default().to_string();
    let turns = store
        .active()
        .map(|t| group_turns(&t.messages))
        .unwrap_or_default();
    let in_flight = pending.read();
    let columns = format!(
        "grid-template-columns: repeat({}, minmax(260px, 1fr));",
        models.len()
    );

    rsx! {
        div {
            class: "compare",

            div {
                class: "compare-grid compare-head",
                style: "{columns}",
                for model in models.iter() {
                    div {
                        key: "{model.id}",
                        class: "column-header",
                        span { class: "model-badge", "{model.badge()}" }
                        span { class: "model-label", "{model.label}" }
                        if in_flight.iter().any(|id| id == model.id) {
                            span { class: "thinking", "Thinking…" }
                        }
                    }
                }
            }

            if turns.is_empty() {
                div {
                    class: "muted centered empty-thread",
                    "Ask something to see every selected model answer side by side."
                }
            }

            for (index, turn) in turns.iter().enumerate() {
                {
                    let key = row_key(&thread_id, index);
                    rsx! {
                        TurnRow {
                            key: "{key}",
                            prompt: turn.user.content.clone(),
                            cells: cells_for(turn, &models, &in_flight),
                            export: turn.export_markdown(&models),
                            columns: columns.clone(),
                            on_open_keys,
                        }
                    }
                }
            }
        }
    }
}

/// Rows of different threads never share a key, so per-row state resets on switch
fn row_key(thread_id: &str, index: usize) -> String {
    format!("{}-{}", thread_id, index)
}

fn cells_for(turn: &Turn<'_>, models: &[&Model], pending: &[String]) -> Vec<Cell> {
    models
        .iter()
        .map(|model| Cell {
            model_id: model.id.to_string(),
            content: match turn.cell(model.id, pending) {
                CellState::Answered(message) => CellContent::Answer(message.content.clone()),
                CellState::Waiting => CellContent::Waiting,
                CellState::Missing => CellContent::Missing,
            },
        })
        .collect()
}

#[component]
fn TurnRow(
    prompt: String,
    cells: Vec<Cell>,
    export: String,
    columns: String,
    on_open_keys: EventHandler<()>,
) -> Element {
    let copied = use_signal(|| false);

    rsx! {
        div {
            class: "turn",

            div {
                class: "turn-prompt",
                div { class: "prompt-text", "{prompt}" }
                button {
                    class: "ghost-button small",
                    title: "Copy every answer in this row as Markdown",
                    onclick: move |_| {
                        copy_to_clipboard(&export);
                        flash_copied(copied);
                    },
                    if copied() { "Copied" } else { "Copy all" }
                }
            }

            div {
                class: "compare-grid",
                style: "{columns}",

                for cell in cells.into_iter() {
                    AnswerCell {
                        key: "{cell.model_id}",
                        content: cell.content,
                        on_open_keys,
                    }
                }
            }
        }
    }
}

#[component]
fn AnswerCell(content: CellContent, on_open_keys: EventHandler<()>) -> Element {
    let copied = use_signal(|| false);

    match content {
        CellContent::Answer(text) => {
            let hint = needs_key_hint(&text);
            let parts = segments(&text);

            rsx! {
                div {
                    class: "answer-cell",

                    div {
                        class: "cell-toolbar",
                        button {
                            class: "icon-button small",
                            title: "Copy this answer",
                            onclick: move |_| {
                                copy_to_clipboard(&text);
                                flash_copied(copied);
                            },
                            if copied() { "Copied" } else { "⧉" }
                        }
                    }

                    div {
                        class: "answer-text",
                        for (i, part) in parts.into_iter().enumerate() {
                            match part {
                                Segment::Text(t) => rsx! { span { key: "{i}", "{t}" } },
                                Segment::InlineCode(code) => rsx! { code { key: "{i}", class: "inline-code", "{code}" } },
                                Segment::CodeBlock { language, code } => rsx! {
                                    div {
                                        key: "{i}",
                                        class: "code-block",
                                        if !language.is_empty() {
                                            div { class: "code-language", "{language}" }
                                        }
                                        pre { code { "{code}" } }
                                    }
                                },
                            }
                        }
                    }

                    if hint {
                        button {
                            class: "secondary-button small",
                            onclick: move |_| on_open_keys.call(()),
                            "Add API Keys"
                        }
                    }
                }
            }
        }
        CellContent::Waiting => rsx! {
            div {
                class: "answer-cell",
                div { class: "skeleton-line" }
                div { class: "skeleton-line" }
                div { class: "skeleton-line short" }
            }
        },
        CellContent::Missing => rsx! {
            div {
                class: "answer-cell",
                div { class: "muted waiting", "No response" }
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{catalog, Message};

    #[test]
    fn test_row_keys_differ_across_threads() {
        assert_ne!(row_key("thread-a", 0), row_key("thread-b", 0));
        assert_ne!(row_key("thread-a", 0), row_key("thread-a", 1));
    }

    #[test]
    fn test_cells_follow_pending() {
        let first = &catalog()[0];
        let second = &catalog()[1];
        let third = &catalog()[2];
        let messages = vec![Message::user("q"), Message::assistant(first.id, "answer")];
        let turns = group_turns(&messages);
        let pending = vec![second.id.to_string()];

        let cells = cells_for(&turns[0], &[first, second, third], &pending);
        assert_eq!(cells[0].content, CellContent::Answer("answer".to_string()));
        assert_eq!(cells[1].content, CellContent::Waiting);
        assert_eq!(cells[2].content, CellContent::Missing);
        assert_eq!(cells[1].model_id, second.id);
    }
}
