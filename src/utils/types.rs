use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

pub const DEFAULT_THREAD_TITLE: &str = "New Chat";
pub const TITLE_MAX_CHARS: usize = 40;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    pub ts: u64,
    #[serde(default, rename = "modelId", skip_serializing_if = "Option::is_none")]
    pub model_id: Option<String>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            ts: now_millis(),
            model_id: None,
        }
    }

    pub fn assistant(model_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            ts: now_millis(),
            model_id: Some(model_id.into()),
        }
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }
}

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Thread {
    pub id: String,
    pub title: String,
    pub messages: Vec<Message>,
    #[serde(rename = "createdAt")]
    pub created_at: u64,
}

impl Thread {
    pub fn new() -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: DEFAULT_THREAD_TITLE.to_string(),
            messages: Vec::new(),
            created_at: now_millis(),
        }
    }
}

impl Default for Thread {
    fn default() -> Self {
        Self::new()
    }
}

/// Title for a thread whose first prompt is `prompt`
pub fn derive_title(prompt: &str) -> String {
    prompt.chars().take(TITLE_MAX_CHARS).collect()
}

/// File extensions offered by the image picker.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

fn image_mime_type(file_name: &str) -> Option<&'static str> {
    let ext = Path::new(file_name).extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

/// Image picked from disk and sent alongside a prompt.
#[derive(Clone, PartialEq, Debug)]
pub struct ImageAttachment {
    pub file_name: String,
    pub mime_type: String,
    pub data_base64: String,
}

impl ImageAttachment {
    /// None for empty files and unsupported extensions
    pub fn from_bytes(file_name: &str, bytes: &[u8]) -> Option<Self> {
        if bytes.is_empty() {
            return None;
        }
        let mime_type = image_mime_type(file_name)?;
        Some(Self {
            file_name: file_name.to_string(),
            mime_type: mime_type.to_string(),
            data_base64: STANDARD.encode(bytes),
        })
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum AppView {
    Landing,
    Compare,
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct InputSettings {
    pub ctrl_enter_submit: bool, // true = Ctrl+Enter to submit, false = Enter to submit
}

pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Human readable age of a millisecond timestamp
pub fn format_age(ts_millis: u64) -> String {
    let diff = now_millis().saturating_sub(ts_millis) / 1000;

    if diff < 60 {
        "Just now".to_string()
    } else if diff < 3600 {
        format!("{} minutes ago", diff / 60)
    } else if diff < 86400 {
        format!("{} hours ago", diff / 3600)
    } else if diff < 86400 * 365 {
        format!("{} days ago", diff / 86400)
    } else {
        format!("{} years ago", diff / (86400 * 365))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_constructors() {
        let user = Message::user("hi");
        assert!(user.is_user());
        assert_eq!(user.model_id, None);

        let answer = Message::assistant("deepseek-r1", "hello");
        assert_eq!(answer.role, Role::Assistant);
        assert_eq!(answer.model_id.as_deref(), Some("deepseek-r1"));
    }

    #[test]
    fn test_message_wire_shape() {
        let json = serde_json::to_value(Message::assistant("m", "x")).unwrap();
        assert_eq!(json["role"], "assistant");
        assert_eq!(json["modelId"], "m");

        let json = serde_json::to_value(Message::user("x")).unwrap();
        assert!(json.get("modelId").is_none());
    }

    #[test]
    fn test_derive_title_is_char_bounded() {
        let long = "é".repeat(60);
        let title = derive_title(&long);
        assert_eq!(title.chars().count(), TITLE_MAX_CHARS);
        assert_eq!(derive_title("short"), "short");
    }

    #[test]
    fn test_image_from_picked_bytes() {
        let png = [0x89, b'P', b'N', b'G', 0x0D, 0x0A];
        let image = ImageAttachment::from_bytes("Screenshot.PNG", &png).unwrap();
        assert_eq!(image.file_name, "Screenshot.PNG");
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.data_base64, "iVBORw0K");

        let jpeg = ImageAttachment::from_bytes("photo.jpeg", &[0xFF, 0xD8, 0xFF]).unwrap();
        assert_eq!(jpeg.mime_type, "image/jpeg");
        assert_eq!(jpeg.data_base64, "/9j/");
    }

    #[test]
    fn test_image_rejects_unsupported_files() {
        assert!(ImageAttachment::from_bytes("notes.txt", b"hello").is_none());
        assert!(ImageAttachment::from_bytes("no_extension", b"hello").is_none());
        assert!(ImageAttachment::from_bytes("empty.png", &[]).is_none());
    }

    #[test]
    fn test_format_age() {
        assert_eq!(format_age(now_millis()), "Just now");
        assert_eq!(format_age(now_millis() - 5 * 60 * 1000), "5 minutes ago");
    }
}
