use super::common::*;
use crate::workflows::listings::controller::{ModalContext, ModalState};
use crate::workflows::listings::domain::{ListingId, Session, ViewMode};
use crate::workflows::listings::view::{HeaderIcon, ModalAction, ModalIntent, ModalView};

fn create_state(name: &str) -> ModalState {
    ModalState {
        mode: ViewMode::Create,
        name_draft: name.to_string(),
        selected_source_id: None,
        is_submitting: false,
        visible: true,
    }
}

#[test]
fn create_mode_offers_copy_only_when_possible() {
    let view = ModalView::render(&create_state(""), &logged_in_context());
    assert_eq!(view.header.title, "Create New Listing");
    assert_eq!(view.header.icon, HeaderIcon::House);
    assert!(view.source_picker.is_none());

    let copy = view
        .action(ModalAction::CopyExisting)
        .expect("copy offered for signed in host");
    assert!(copy.enabled);
    let create = view.action(ModalAction::CreateNew).expect("create button");
    assert!(!create.enabled, "blank title keeps create disabled");

    let anonymous = ModalContext::new(Session::Anonymous, vec![beach_house()]);
    let view = ModalView::render(&create_state("Loft"), &anonymous);
    assert!(view.action(ModalAction::CopyExisting).is_none());
    assert!(view.action(ModalAction::CreateNew).expect("create").enabled);
}

#[test]
fn submitting_disables_inputs_and_relabels_primary_action() {
    let mut state = create_state("Loft");
    state.is_submitting = true;

    let view = ModalView::render(&state, &logged_in_context());

    assert!(view.name_input.disabled);
    let create = view.action(ModalAction::CreateNew).expect("create button");
    assert_eq!(create.label, "Creating...");
    assert!(!create.enabled);
    assert!(!view.action(ModalAction::CopyExisting).expect("copy").enabled);
}

#[test]
fn copy_mode_lists_sources_and_requires_selection() {
    let mut state = create_state("Beach House copy");
    state.mode = ViewMode::Copy;

    let view = ModalView::render(&state, &logged_in_context());
    assert_eq!(view.header.title, "Copy Existing Listing");
    assert_eq!(view.header.icon, HeaderIcon::Copy);
    let picker = view.source_picker.as_ref().expect("picker shown");
    assert_eq!(picker.placeholder, "-- Select a listing --");
    assert_eq!(picker.options.len(), 2);
    assert!(picker.options.iter().all(|option| !option.selected));
    assert!(!view.action(ModalAction::Duplicate).expect("duplicate").enabled);
    assert!(view.action(ModalAction::Back).expect("back").enabled);

    state.selected_source_id = Some(ListingId("listing-1".to_string()));
    let view = ModalView::render(&state, &logged_in_context());
    let picker = view.source_picker.as_ref().expect("picker shown");
    assert!(picker.options[0].selected);
    assert!(view.action(ModalAction::Duplicate).expect("duplicate").enabled);
}

#[test]
fn actions_map_to_intents() {
    assert_eq!(ModalAction::CopyExisting.intent(), ModalIntent::SwitchToCopy);
    assert_eq!(ModalAction::Back.intent(), ModalIntent::SwitchToCreate);
    assert_eq!(ModalAction::CreateNew.intent(), ModalIntent::Submit);
    assert_eq!(ModalAction::Duplicate.intent(), ModalIntent::Submit);
}

#[test]
fn intents_deserialize_from_tagged_json() {
    let intent: ModalIntent =
        serde_json::from_str(r#"{"intent":"select_source","value":"listing-2"}"#)
            .expect("parse intent");
    assert_eq!(intent, ModalIntent::SelectSource("listing-2".to_string()));

    let intent: ModalIntent = serde_json::from_str(r#"{"intent":"submit"}"#).expect("parse");
    assert_eq!(intent, ModalIntent::Submit);
}

#[tokio::test]
async fn controller_view_tracks_transitions() {
    let (controller, _gateway, _notifications, _host) = build_controller(logged_in_context());

    controller.switch_to_copy().expect("copy offered");
    controller.select_source("listing-2").expect("select source");
    let view = controller.view();

    assert_eq!(view.mode, ViewMode::Copy);
    assert_eq!(view.name_input.value, "Spacious Studio Near Campus copy");
    assert!(view.visible);
}
