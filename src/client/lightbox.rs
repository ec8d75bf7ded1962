use crate::models::upload_model::UploadResponse;

/// Keys the lightbox reacts to, named after DOM `KeyboardEvent.key` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightboxKey {
    ArrowLeft,
    ArrowRight,
    Escape,
    Download,
    Other,
}

impl LightboxKey {
    pub fn from_key(key: &str) -> Self {
        match key {
            "ArrowLeft" => LightboxKey::ArrowLeft,
            "ArrowRight" => LightboxKey::ArrowRight,
            "Escape" => LightboxKey::Escape,
            "d" | "D" => LightboxKey::Download,
            _ => LightboxKey::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LightboxAction {
    None,
    Selected(usize),
    Closed,
    Download(UploadResponse),
}

/// Full-screen single-item viewer over the gallery list.
///
/// The selection is remembered by upload id and resolved against the current
/// list on every move, so a refreshed list keeps the same item open.
#[derive(Debug, Default)]
pub struct Lightbox {
    items: Vec<UploadResponse>,
    selected: Option<i64>,
}

impl Lightbox {
    pub fn new(items: Vec<UploadResponse>) -> Self {
        Self { items, selected: None }
    }

    pub fn items(&self) -> &[UploadResponse] {
        &self.items
    }

    pub fn is_open(&self) -> bool {
        self.selected_index().is_some()
    }

    pub fn selected_index(&self) -> Option<usize> {
        let id = self.selected?;
        self.items.iter().position(|u| u.id == id)
    }

    pub fn selected(&self) -> Option<&UploadResponse> {
        self.selected_index().map(|i| &self.items[i])
    }

    pub fn open(&mut self, index: usize) -> bool {
        match self.items.get(index) {
            Some(item) => {
                self.selected = Some(item.id);
                true
            }
            None => false,
        }
    }

    pub fn close(&mut self) {
        self.selected = None;
    }

    /// Swaps in a freshly polled list; the selection survives only if its item does.
    pub fn replace_items(&mut self, items: Vec<UploadResponse>) {
        self.items = items;
        if self.selected_index().is_none() {
            self.selected = None;
        }
    }

    pub fn next(&mut self) -> Option<usize> {
        let current = self.selected_index()?;
        let target = (current + 1).min(self.items.len() - 1);
        self.open(target);
        Some(target)
    }

    pub fn previous(&mut self) -> Option<usize> {
        let current = self.selected_index()?;
        let target = current.saturating_sub(1);
        self.open(target);
        Some(target)
    }

    pub fn handle_key(&mut self, key: LightboxKey) -> LightboxAction {
        if !self.is_open() {
            return LightboxAction::None;
        }

        match key {
            LightboxKey::ArrowRight => self.next().map_or(LightboxAction::None, LightboxAction::Selected),
            LightboxKey::ArrowLeft => self.previous().map_or(LightboxAction::None, LightboxAction::Selected),
            LightboxKey::Escape => {
                self.close();
                LightboxAction::Closed
            }
            LightboxKey::Download => self
                .selected()
                .cloned()
                .map_or(LightboxAction::None, LightboxAction::Download),
            LightboxKey::Other => LightboxAction::None,
        }
    }
}
