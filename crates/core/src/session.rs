use std::sync::RwLock;

/// Transient, in-process selection of the current uploaded file, for views
/// that don't carry the filename in their own navigation state. Cleared when
/// the user returns to the start view; never persisted.
#[derive(Default)]
pub struct SessionState {
    filename: RwLock<Option<String>>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_filename(&self, filename: impl Into<String>) {
        *self.filename.write().unwrap() = Some(filename.into());
    }

    pub fn filename(&self) -> Option<String> {
        self.filename.read().unwrap().clone()
    }

    pub fn clear(&self) {
        self.filename.write().unwrap().take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty_and_clears() {
        let session = SessionState::new();
        assert_eq!(session.filename(), None);
        session.set_filename("shot1.png");
        assert_eq!(session.filename().as_deref(), Some("shot1.png"));
        session.clear();
        assert_eq!(session.filename(), None);
    }
}
