use super::types::{derive_title, Message, Thread};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Thread collection shared between the view and in-flight requests.
pub type SharedThreads = Arc<Mutex<ThreadStore>>;

/// All conversation threads, newest first, plus the active thread id.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct ThreadStore {
    threads: Vec<Thread>,
    active_id: Option<String>,
}

impl ThreadStore {
    pub fn new(threads: Vec<Thread>, active_id: Option<String>) -> Self {
        // An active id pointing at a deleted thread is meaningless
        let active_id = active_id.filter(|id| threads.iter().any(|t| &t.id == id));
        Self { threads, active_id }
    }

    pub fn into_shared(self) -> SharedThreads {
        Arc::new(Mutex::new(self))
    }

    pub fn threads(&self) -> &[Thread] {
        &self.threads
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active_id.as_deref()
    }

    pub fn get(&self, id: &str) -> Option<&Thread> {
        self.threads.iter().find(|t| t.id == id)
    }

    pub fn active(&self) -> Option<&Thread> {
        self.active_id.as_deref().and_then(|id| self.get(id))
    }

    /// Start an empty thread at the top of the list and make it active.
    pub fn create_thread(&mut self) -> String {
        let thread = Thread::new();
        let id = thread.id.clone();
        self.threads.insert(0, thread);
        self.active_id = Some(id.clone());
        id
    }

    /// Id of the active thread, creating one if there is none.
    pub fn ensure_active(&mut self) -> String {
        match self.active().map(|t| t.id.clone()) {
            Some(id) => id,
            None => self.create_thread(),
        }
    }

    pub fn set_active(&mut self, id: &str) -> bool {
        if self.get(id).is_some() {
            self.active_id = Some(id.to_string());
            true
        } else {
            false
        }
    }

    pub fn delete_thread(&mut self, id: &str) -> bool {
        let before = self.threads.len();
        self.threads.retain(|t| t.id != id);
        if self.active_id.as_deref() == Some(id) {
            self.active_id = None;
        }
        self.threads.len() != before
    }

    /// Append to whatever the thread holds right now. Returns false when the
    /// thread no longer exists.
    pub fn append(&mut self, thread_id: &str, message: Message) -> bool {
        match self.threads.iter_mut().find(|t| t.id == thread_id) {
            Some(thread) => {
                if thread.messages.is_empty() && message.is_user() {
                    thread.title = derive_title(&message.content);
                }
                thread.messages.push(message);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::types::DEFAULT_THREAD_TITLE;

    #[test]
    fn test_create_thread_is_newest_first_and_active() {
        let mut store = ThreadStore::default();
        let first = store.create_thread();
        let second = store.create_thread();
        assert_eq!(store.threads()[0].id, second);
        assert_eq!(store.threads()[1].id, first);
        assert_eq!(store.active_id(), Some(second.as_str()));
    }

    #[test]
    fn test_ensure_active_reuses_existing() {
        let mut store = ThreadStore::default();
        let id = store.ensure_active();
        assert_eq!(store.ensure_active(), id);
        assert_eq!(store.threads().len(), 1);
    }

    #[test]
    fn test_first_user_message_sets_title() {
        let mut store = ThreadStore::default();
        let id = store.create_thread();
        assert_eq!(store.get(&id).unwrap().title, DEFAULT_THREAD_TITLE);

        let prompt = "Explain the borrow checker in great detail, with examples please";
        assert!(store.append(&id, Message::user(prompt)));
        assert_eq!(store.get(&id).unwrap().title, derive_title(prompt));

        store.append(&id, Message::user("a later prompt"));
        assert_eq!(store.get(&id).unwrap().title, derive_title(prompt));
    }

    #[test]
    fn test_append_to_missing_thread() {
        let mut store = ThreadStore::default();
        assert!(!store.append("nope", Message::user("hi")));
    }

    #[test]
    fn test_delete_clears_active() {
        let mut store = ThreadStore::default();
        let keep = store.create_thread();
        let gone = store.create_thread();
        assert!(store.delete_thread(&gone));
        assert_eq!(store.active_id(), None);
        assert!(store.get(&keep).is_some());
        assert!(!store.delete_thread(&gone));
    }

    #[test]
    fn test_new_drops_dangling_active_id() {
        let store = ThreadStore::new(vec![Thread::new()], Some("missing".to_string()));
        assert_eq!(store.active_id(), None);
    }
}
