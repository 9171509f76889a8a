//! Notification sink injected into the flows in place of a global
//! snackbar. The web layer backs it with the session flash slot; tests use
//! the recording sink.

use std::sync::Mutex;

use actix_session::Session;

pub trait NotificationSink {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

/// Writes notifications into the session flash slot, shown once by the
/// next rendered page.
pub struct FlashSink<'a> {
    session: &'a Session,
}

impl<'a> FlashSink<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }
}

impl NotificationSink for FlashSink<'_> {
    fn success(&self, message: &str) {
        let _ = self.session.insert("flash", message);
    }

    fn error(&self, message: &str) {
        let _ = self.session.insert("flash", message);
    }
}

/// Reads and clears the flash message, if any.
pub fn take_flash(session: &Session) -> Option<String> {
    let flash = session.get::<String>("flash").unwrap_or(None);
    if flash.is_some() {
        session.remove("flash");
    }
    flash
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Collects notifications in memory; the assertion surface for flow tests.
#[derive(Default)]
pub struct RecordingSink {
    entries: Mutex<Vec<(NoticeLevel, String)>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<(NoticeLevel, String)> {
        self.entries.lock().expect("sink poisoned").clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|(level, _)| *level == NoticeLevel::Error)
            .map(|(_, msg)| msg)
            .collect()
    }
}

impl NotificationSink for RecordingSink {
    fn success(&self, message: &str) {
        self.entries
            .lock()
            .expect("sink poisoned")
            .push((NoticeLevel::Success, message.to_string()));
    }

    fn error(&self, message: &str) {
        self.entries
            .lock()
            .expect("sink poisoned")
            .push((NoticeLevel::Error, message.to_string()));
    }
}
