use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Presence {
    Online,
    #[default]
    Offline,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserEntry {
    pub username: String,
    pub presence: Presence,
    pub selected: bool,
    pub has_unread: bool,
}

impl UserEntry {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            presence: Presence::Offline,
            selected: false,
            has_unread: false,
        }
    }

    pub fn is_online(&self) -> bool {
        self.presence == Presence::Online
    }
}

/// The roster panel. `cursor` is keyboard focus, `selected` is the open conversation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserListState {
    entries: Vec<UserEntry>,
    cursor: Option<usize>,
}

impl UserListState {
    pub fn new(usernames: impl IntoIterator<Item = String>) -> Self {
        let mut state = Self::default();
        state.set_users(usernames);
        state
    }

    pub fn entries(&self) -> &[UserEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn entry(&self, username: &str) -> Option<&UserEntry> {
        self.entries.iter().find(|entry| entry.username == username)
    }

    pub fn entry_at_cursor(&self) -> Option<&UserEntry> {
        self.cursor.and_then(|index| self.entries.get(index))
    }

    pub fn selected(&self) -> Option<&UserEntry> {
        self.entries.iter().find(|entry| entry.selected)
    }

    pub fn selected_count(&self) -> usize {
        self.entries.iter().filter(|entry| entry.selected).count()
    }

    /// Replaces the roster. Duplicates keep their first position.
    pub fn set_users(&mut self, usernames: impl IntoIterator<Item = String>) {
        let mut seen = HashSet::new();
        self.entries = usernames
            .into_iter()
            .filter(|name| seen.insert(name.clone()))
            .map(UserEntry::new)
            .collect();
        self.cursor = if self.entries.is_empty() { None } else { Some(0) };
    }

    /// Marks `username` as the only selected entry and clears its unread flag.
    /// Returns false, leaving the list untouched, when the user is unknown.
    pub fn select(&mut self, username: &str) -> bool {
        let Some(index) = self.position(username) else {
            return false;
        };

        for entry in &mut self.entries {
            entry.selected = false;
        }

        let entry = &mut self.entries[index];
        entry.selected = true;
        entry.has_unread = false;
        self.cursor = Some(index);
        true
    }

    /// Flags an unread message from `username` unless that conversation is open.
    pub fn mark_unread(&mut self, username: &str) -> bool {
        match self
            .entries
            .iter_mut()
            .find(|entry| entry.username == username)
        {
            Some(entry) if !entry.selected => {
                entry.has_unread = true;
                true
            }
            _ => false,
        }
    }

    /// Sets every known entry online or offline by membership in `online`.
    pub fn apply_presence<S: AsRef<str>>(&mut self, online: &[S]) {
        let online: HashSet<&str> = online.iter().map(AsRef::as_ref).collect();

        for entry in &mut self.entries {
            entry.presence = if online.contains(entry.username.as_str()) {
                Presence::Online
            } else {
                Presence::Offline
            };
        }
    }

    pub fn select_next(&mut self) {
        let Some(index) = self.cursor else {
            return;
        };

        let last_index = self.entries.len().saturating_sub(1);
        self.cursor = Some(std::cmp::min(index.saturating_add(1), last_index));
    }

    pub fn select_previous(&mut self) {
        let Some(index) = self.cursor else {
            return;
        };

        self.cursor = Some(index.saturating_sub(1));
    }

    fn position(&self, username: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.username == username)
    }
}
