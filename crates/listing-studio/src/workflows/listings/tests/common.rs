use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;
use tokio::sync::Notify;

use crate::workflows::listings::availability::{DayToken, NightToken};
use crate::workflows::listings::controller::{ListingModalController, ModalContext, ModalHost};
use crate::workflows::listings::domain::{
    Listing, ListingDraft, ListingId, Session, User, UserId,
};
use crate::workflows::listings::gateway::{GatewayError, ListingGateway};
use crate::workflows::listings::notify::{Notification, NotificationSink};

pub(super) type TestController =
    ListingModalController<RecordingGateway, RecordingNotifications, RecordingHost>;

pub(super) fn submitted_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, 1, 9, 30, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn stored_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, 1, 9, 30, 5)
        .single()
        .expect("valid timestamp")
}

pub(super) fn host_user() -> User {
    User {
        id: UserId("user-1".to_string()),
        email: "john@example.com".to_string(),
        first_name: "John".to_string(),
        full_name: Some("John Doe".to_string()),
        is_usability_tester: false,
        tasks_completed: BTreeSet::new(),
        account_host_id: Some("host-1".to_string()),
    }
}

pub(super) fn onboarded_user() -> User {
    let mut user = host_user();
    user.tasks_completed.insert("listing".to_string());
    user
}

pub(super) fn beach_house() -> Listing {
    let created = Utc
        .with_ymd_and_hms(2024, 1, 15, 0, 0, 0)
        .single()
        .expect("valid timestamp");
    Listing {
        id: ListingId("listing-1".to_string()),
        name: "Beach House".to_string(),
        active: true,
        default_extension_setting: true,
        damage_deposit: 750,
        cleaning_cost: Some(75),
        host_landlord_id: "host-1".to_string(),
        host_name: "John Doe".to_string(),
        host_email: "john@example.com".to_string(),
        operator_last_updated: created,
        is_for_usability: false,
        nights_available: [NightToken::FridayNight, NightToken::SaturdayNight]
            .into_iter()
            .collect(),
        days_available: [DayToken::Friday, DayToken::Saturday, DayToken::Sunday]
            .into_iter()
            .collect(),
        qty_beds: 3,
        price_per_night: Some(85),
        four_week_rent: Some(2380),
        created_at: created,
        updated_at: created,
        duplicated_from: None,
    }
}

pub(super) fn studio() -> Listing {
    let mut listing = beach_house();
    listing.id = ListingId("listing-2".to_string());
    listing.name = "Spacious Studio Near Campus".to_string();
    listing.cleaning_cost = None;
    listing.qty_beds = 1;
    listing
}

pub(super) fn logged_in_context() -> ModalContext {
    ModalContext::new(Session::LoggedIn(host_user()), vec![beach_house(), studio()])
}

pub(super) fn build_controller(
    context: ModalContext,
) -> (
    TestController,
    Arc<RecordingGateway>,
    Arc<RecordingNotifications>,
    Arc<RecordingHost>,
) {
    build_controller_with(context, RecordingGateway::default())
}

pub(super) fn build_controller_with(
    context: ModalContext,
    gateway: RecordingGateway,
) -> (
    TestController,
    Arc<RecordingGateway>,
    Arc<RecordingNotifications>,
    Arc<RecordingHost>,
) {
    let gateway = Arc::new(gateway);
    let notifications = Arc::new(RecordingNotifications::default());
    let host = Arc::new(RecordingHost::default());
    let controller = ListingModalController::new(
        gateway.clone(),
        notifications.clone(),
        host.clone(),
        context,
    )
    .with_clock(submitted_at);
    controller.open();
    (controller, gateway, notifications, host)
}

#[derive(Default)]
pub(super) struct RecordingGateway {
    created: Mutex<Vec<(ListingDraft, Option<UserId>)>>,
    tasks: Mutex<Vec<(UserId, String)>>,
    create_failure: Option<GatewayError>,
    task_failure: Option<GatewayError>,
    gate: Option<Arc<Notify>>,
    sequence: AtomicU64,
}

impl RecordingGateway {
    pub(super) fn failing_create(error: GatewayError) -> Self {
        Self {
            create_failure: Some(error),
            ..Self::default()
        }
    }

    pub(super) fn failing_tasks(error: GatewayError) -> Self {
        Self {
            task_failure: Some(error),
            ..Self::default()
        }
    }

    /// Hold every create call until the gate is notified.
    pub(super) fn gated(gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::default()
        }
    }

    pub(super) fn created(&self) -> Vec<(ListingDraft, Option<UserId>)> {
        self.created.lock().expect("gateway mutex poisoned").clone()
    }

    pub(super) fn tasks(&self) -> Vec<(UserId, String)> {
        self.tasks.lock().expect("gateway mutex poisoned").clone()
    }
}

#[async_trait]
impl ListingGateway for RecordingGateway {
    async fn create_listing(
        &self,
        draft: ListingDraft,
        acting_user: Option<&UserId>,
    ) -> Result<Listing, GatewayError> {
        self.created
            .lock()
            .expect("gateway mutex poisoned")
            .push((draft.clone(), acting_user.cloned()));

        // Let sibling futures observe the in-flight submission.
        match &self.gate {
            Some(gate) => gate.notified().await,
            None => tokio::task::yield_now().await,
        }

        if let Some(error) = &self.create_failure {
            return Err(error.clone());
        }
        let id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        Ok(Listing::from_draft(
            ListingId(format!("listing-new-{id}")),
            draft,
            stored_at(),
        ))
    }

    async fn mark_task_completed(&self, user_id: &UserId, task: &str) -> Result<(), GatewayError> {
        self.tasks
            .lock()
            .expect("gateway mutex poisoned")
            .push((user_id.clone(), task.to_string()));
        match &self.task_failure {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

#[derive(Default)]
pub(super) struct RecordingNotifications {
    events: Mutex<Vec<Notification>>,
}

impl RecordingNotifications {
    pub(super) fn events(&self) -> Vec<Notification> {
        self.events.lock().expect("notification mutex poisoned").clone()
    }
}

impl NotificationSink for RecordingNotifications {
    fn notify(&self, notification: Notification) {
        self.events
            .lock()
            .expect("notification mutex poisoned")
            .push(notification);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum HostEvent {
    Closed,
    Saved(ListingId),
    Navigated(ListingId),
}

#[derive(Default)]
pub(super) struct RecordingHost {
    events: Mutex<Vec<HostEvent>>,
}

impl RecordingHost {
    pub(super) fn events(&self) -> Vec<HostEvent> {
        self.events.lock().expect("host mutex poisoned").clone()
    }
}

impl ModalHost for RecordingHost {
    fn close(&self) {
        self.events
            .lock()
            .expect("host mutex poisoned")
            .push(HostEvent::Closed);
    }

    fn listing_saved(&self, listing: &Listing) {
        self.events
            .lock()
            .expect("host mutex poisoned")
            .push(HostEvent::Saved(listing.id.clone()));
    }

    fn navigate_to_listing(&self, listing_id: &ListingId) {
        self.events
            .lock()
            .expect("host mutex poisoned")
            .push(HostEvent::Navigated(listing_id.clone()));
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 4096)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
