#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModalKind {
    Login,
    Register,
    Results,
}

/// Which modal dialog is open. Opening one closes the others.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ModalSet {
    open: Option<ModalKind>,
}

impl ModalSet {
    pub fn open(&mut self, kind: ModalKind) {
        self.open = Some(kind);
    }

    #[must_use]
    pub fn current(&self) -> Option<ModalKind> {
        self.open
    }

    #[must_use]
    pub fn is_open(&self, kind: ModalKind) -> bool {
        self.open == Some(kind)
    }

    pub fn close_button(&mut self, kind: ModalKind) {
        self.close(kind);
    }

    /// A click on the dimmed area outside the dialog box.
    pub fn backdrop_click(&mut self, kind: ModalKind) {
        self.close(kind);
    }

    /// Returns whether the key closed a modal.
    pub fn key_pressed(&mut self, key: &str) -> bool {
        if key == "Escape" && self.open.is_some() {
            self.open = None;
            return true;
        }
        false
    }

    pub fn close_all(&mut self) {
        self.open = None;
    }

    fn close(&mut self, kind: ModalKind) {
        if self.is_open(kind) {
            self.open = None;
        }
    }
}
