/// The currently selected district, owned by the application and handed to
/// the renderer and popup logic by reference.
///
/// `revision` increments on every actual change so callers can react
/// (camera reset, popup rebuild) by comparing against the last value seen.
#[derive(Clone, Debug, Default)]
pub struct Selection {
    current: Option<String>,
    revision: u64,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or clear the selection. Returns true if the value changed.
    pub fn select(&mut self, name: Option<&str>) -> bool {
        if self.current.as_deref() == name {
            return false;
        }
        self.current = name.map(str::to_owned);
        self.revision = self.revision.wrapping_add(1);
        true
    }

    pub fn clear(&mut self) -> bool {
        self.select(None)
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Drawn at full strength: everything when nothing is selected,
    /// otherwise only the selected district.
    pub fn is_highlighted(&self, name: &str) -> bool {
        self.current.as_deref().map_or(true, |c| c == name)
    }

    /// Drawn faded: only when some other district is selected.
    pub fn is_dimmed(&self, name: &str) -> bool {
        self.current.as_deref().is_some_and(|c| c != name)
    }
}
