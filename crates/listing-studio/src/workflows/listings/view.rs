//! Presentation model derived from controller state. Nothing here decides
//! business rules; it only mirrors what the controller will accept.

use serde::{Deserialize, Serialize};

use super::controller::{ModalContext, ModalState};
use super::domain::{ListingId, ViewMode};

/// User intents the presentation layer forwards to the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "intent", content = "value", rename_all = "snake_case")]
pub enum ModalIntent {
    Open,
    SwitchToCopy,
    SwitchToCreate,
    SelectSource(String),
    EditName(String),
    Submit,
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderIcon {
    House,
    Copy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModalHeader {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub icon: HeaderIcon,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceOption {
    pub id: ListingId,
    pub label: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourcePicker {
    pub label: &'static str,
    pub placeholder: &'static str,
    pub options: Vec<SourceOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameInput {
    pub label: &'static str,
    pub value: String,
    pub placeholder: &'static str,
    pub helper_text: &'static str,
    pub disabled: bool,
}

/// Buttons rendered in the footer of the modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModalAction {
    CopyExisting,
    CreateNew,
    Back,
    Duplicate,
}

impl ModalAction {
    pub fn intent(self) -> ModalIntent {
        match self {
            ModalAction::CopyExisting => ModalIntent::SwitchToCopy,
            ModalAction::Back => ModalIntent::SwitchToCreate,
            ModalAction::CreateNew | ModalAction::Duplicate => ModalIntent::Submit,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionButton {
    pub action: ModalAction,
    pub label: &'static str,
    pub enabled: bool,
}

/// Everything a renderer needs to draw the modal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModalView {
    pub visible: bool,
    pub mode: ViewMode,
    pub header: ModalHeader,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_picker: Option<SourcePicker>,
    pub name_input: NameInput,
    pub actions: Vec<ActionButton>,
}

impl ModalView {
    pub fn render(state: &ModalState, context: &ModalContext) -> Self {
        let has_name = !state.name_draft.trim().is_empty();
        let idle = !state.is_submitting;

        let header = match state.mode {
            ViewMode::Create => ModalHeader {
                title: "Create New Listing",
                subtitle: "Enter the title guests will see when browsing.",
                icon: HeaderIcon::House,
            },
            ViewMode::Copy => ModalHeader {
                title: "Copy Existing Listing",
                subtitle: "Select a listing to duplicate and customize the name.",
                icon: HeaderIcon::Copy,
            },
        };

        let source_picker = (state.mode == ViewMode::Copy).then(|| SourcePicker {
            label: "Select Listing to Copy",
            placeholder: "-- Select a listing --",
            options: context
                .existing_listings
                .iter()
                .map(|listing| SourceOption {
                    id: listing.id.clone(),
                    label: listing.name.clone(),
                    selected: state.selected_source_id.as_ref() == Some(&listing.id),
                })
                .collect(),
        });

        let mut actions = Vec::with_capacity(2);
        match state.mode {
            ViewMode::Create => {
                if context.can_offer_copy() {
                    actions.push(ActionButton {
                        action: ModalAction::CopyExisting,
                        label: "Copy Existing",
                        enabled: idle,
                    });
                }
                actions.push(ActionButton {
                    action: ModalAction::CreateNew,
                    label: if idle { "Create New" } else { "Creating..." },
                    enabled: idle && has_name,
                });
            }
            ViewMode::Copy => {
                actions.push(ActionButton {
                    action: ModalAction::Back,
                    label: "Back",
                    enabled: idle,
                });
                actions.push(ActionButton {
                    action: ModalAction::Duplicate,
                    label: if idle { "Duplicate" } else { "Duplicating..." },
                    enabled: idle && has_name && state.selected_source_id.is_some(),
                });
            }
        }

        Self {
            visible: state.visible,
            mode: state.mode,
            header,
            source_picker,
            name_input: NameInput {
                label: "Listing Title",
                value: state.name_draft.clone(),
                placeholder: "Enter listing title",
                helper_text: "Don't worry, you can change it later",
                disabled: !idle,
            },
            actions,
        }
    }

    pub fn action(&self, action: ModalAction) -> Option<&ActionButton> {
        self.actions.iter().find(|button| button.action == action)
    }
}
