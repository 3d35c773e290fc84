//! Closed set of modal states driving the create/edit/delete dialogs of a data table.

/// Which dialog is open and the record it operates on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalState<T> {
    /// No dialog is shown.
    Closed,
    /// Blank form for a new record.
    AddNew,
    /// Form pre-filled with `T`.
    Edit(T),
    /// Confirmation prompt for deleting `T`.
    Delete(T),
}

/// Submit action implied by the open dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalAction {
    Create,
    Update,
    Delete,
}

impl<T> Default for ModalState<T> {
    fn default() -> Self {
        ModalState::Closed
    }
}

impl<T> ModalState<T> {
    /// Open the blank creation form.
    pub fn open_add(&mut self) {
        *self = ModalState::AddNew;
    }

    /// Open the edit form for `record`.
    pub fn open_edit(&mut self, record: T) {
        *self = ModalState::Edit(record);
    }

    /// Open the delete confirmation for `record`.
    pub fn open_delete(&mut self, record: T) {
        *self = ModalState::Delete(record);
    }

    /// Close whatever is open, handing back the record it held.
    pub fn close(&mut self) -> Option<T> {
        match std::mem::take(self) {
            ModalState::Edit(record) | ModalState::Delete(record) => Some(record),
            ModalState::Closed | ModalState::AddNew => None,
        }
    }

    /// Record the open dialog operates on.
    pub fn selected(&self) -> Option<&T> {
        match self {
            ModalState::Edit(record) | ModalState::Delete(record) => Some(record),
            ModalState::Closed | ModalState::AddNew => None,
        }
    }

    /// True while any dialog is shown.
    pub fn is_open(&self) -> bool {
        !matches!(self, ModalState::Closed)
    }

    /// Submit action of the open dialog.
    pub fn action(&self) -> Option<ModalAction> {
        match self {
            ModalState::Closed => None,
            ModalState::AddNew => Some(ModalAction::Create),
            ModalState::Edit(_) => Some(ModalAction::Update),
            ModalState::Delete(_) => Some(ModalAction::Delete),
        }
    }
}
