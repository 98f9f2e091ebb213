// ABOUTME: Local cache of terminals the bridge reported as created
// Advisory only: entries are never reconciled with the bridge and may go stale

/// One known terminal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalEntry {
    pub id: String,
    pub name: String,
}

/// Terminal id → name, iterated in the order ids were first seen.
#[derive(Debug, Clone, Default)]
pub struct TerminalRegistry {
    entries: Vec<TerminalEntry>,
}

impl TerminalRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a terminal. A known id keeps its position and takes the new name.
    pub fn insert(&mut self, id: impl Into<String>, name: impl Into<String>) {
        let id = id.into();
        let name = name.into();
        match self.entries.iter_mut().find(|entry| entry.id == id) {
            Some(entry) => entry.name = name,
            None => self.entries.push(TerminalEntry { id, name }),
        }
    }

    /// Drop a terminal, returning its name if it was known
    pub fn remove(&mut self, id: &str) -> Option<String> {
        let index = self.entries.iter().position(|entry| entry.id == id)?;
        Some(self.entries.remove(index).name)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }

    pub fn name_of(&self, id: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| entry.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &TerminalEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
