use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use listing_studio::workflows::listings::{
    DayToken, GatewayError, Listing, ListingDraft, ListingGateway, ListingId, ModalHost,
    NightToken, Notification, NotificationSink, TracingNotificationSink, User, UserId,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local listing store. Identifiers are minted from a counter that
/// starts after any seeded records.
#[derive(Default)]
pub(crate) struct InMemoryListingGateway {
    listings: Mutex<BTreeMap<ListingId, Listing>>,
    completed_tasks: Mutex<HashMap<UserId, BTreeSet<String>>>,
    sequence: AtomicU64,
}

impl InMemoryListingGateway {
    pub(crate) fn seeded(listings: Vec<Listing>) -> Self {
        let gateway = Self::default();
        if let Ok(mut guard) = gateway.listings.lock() {
            guard.extend(listings.into_iter().map(|listing| (listing.id.clone(), listing)));
        }
        gateway
    }

    pub(crate) fn listings(&self) -> Vec<Listing> {
        self.listings
            .lock()
            .map(|guard| guard.values().cloned().collect())
            .unwrap_or_default()
    }

    pub(crate) fn completed_tasks(&self, user_id: &UserId) -> BTreeSet<String> {
        self.completed_tasks
            .lock()
            .ok()
            .and_then(|guard| guard.get(user_id).cloned())
            .unwrap_or_default()
    }

    fn next_id(&self) -> ListingId {
        let next = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        ListingId(format!("listing-{next:06}"))
    }
}

fn store_unavailable<T>(_: T) -> GatewayError {
    GatewayError::Unavailable("listing store lock poisoned".to_string())
}

#[async_trait]
impl ListingGateway for InMemoryListingGateway {
    async fn create_listing(
        &self,
        draft: ListingDraft,
        acting_user: Option<&UserId>,
    ) -> Result<Listing, GatewayError> {
        if draft.name.trim().is_empty() {
            return Err(GatewayError::Rejected(
                "listing name must not be empty".to_string(),
            ));
        }

        let mut guard = self.listings.lock().map_err(store_unavailable)?;
        let mut id = self.next_id();
        while guard.contains_key(&id) {
            id = self.next_id();
        }

        let listing = Listing::from_draft(id.clone(), draft, Utc::now());
        guard.insert(id.clone(), listing.clone());
        info!(
            listing_id = %id,
            acting_user = acting_user.map(|user| user.0.as_str()).unwrap_or("anonymous"),
            duplicated_from = listing.duplicated_from.as_ref().map(|source| source.0.as_str()),
            "listing stored"
        );
        Ok(listing)
    }

    async fn mark_task_completed(&self, user_id: &UserId, task: &str) -> Result<(), GatewayError> {
        if task.trim().is_empty() {
            return Err(GatewayError::Rejected("task must not be empty".to_string()));
        }
        let mut guard = self.completed_tasks.lock().map_err(store_unavailable)?;
        guard
            .entry(user_id.clone())
            .or_default()
            .insert(task.to_string());
        Ok(())
    }
}

/// Prints notifications for the demo and mirrors them to tracing.
#[derive(Default)]
pub(crate) struct ConsoleNotificationSink {
    tracing: TracingNotificationSink,
}

impl NotificationSink for ConsoleNotificationSink {
    fn notify(&self, notification: Notification) {
        println!(
            "  [{}] {}: {}",
            notification.severity.label(),
            notification.title,
            notification.content.as_deref().unwrap_or_default()
        );
        self.tracing.notify(notification);
    }
}

/// Stands in for the page that embeds the modal.
#[derive(Default)]
pub(crate) struct ConsoleModalHost;

impl ModalHost for ConsoleModalHost {
    fn close(&self) {
        println!("  host: modal closed");
    }

    fn listing_saved(&self, listing: &Listing) {
        println!("  host: listing '{}' saved as {}", listing.name, listing.id);
    }

    fn navigate_to_listing(&self, listing_id: &ListingId) {
        println!("  host: navigating to /listing/{listing_id}");
    }
}

/// Host for modal sessions driven over HTTP; there is no page to close or navigate.
#[derive(Default)]
pub(crate) struct HeadlessModalHost;

impl ModalHost for HeadlessModalHost {
    fn close(&self) {
        tracing::debug!("headless modal session closed");
    }
}

pub(crate) fn demo_user() -> User {
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

pub(crate) fn demo_listings() -> Vec<Listing> {
    let listed_at = Utc
        .with_ymd_and_hms(2024, 1, 15, 0, 0, 0)
        .single()
        .unwrap_or_else(Utc::now);
    let user = demo_user();

    let weekend = ListingDraft {
        name: "Cozy Downtown Apartment".to_string(),
        active: true,
        default_extension_setting: true,
        damage_deposit: 500,
        cleaning_cost: Some(60),
        host_landlord_id: "host-1".to_string(),
        host_name: user.host_display_name().to_string(),
        host_email: user.email.clone(),
        operator_last_updated: listed_at,
        is_for_usability: false,
        nights_available: [
            NightToken::ThursdayNight,
            NightToken::FridayNight,
            NightToken::SaturdayNight,
        ]
        .into_iter()
        .collect(),
        days_available: [
            DayToken::Thursday,
            DayToken::Friday,
            DayToken::Saturday,
            DayToken::Sunday,
        ]
        .into_iter()
        .collect(),
        qty_beds: 2,
        price_per_night: Some(120),
        four_week_rent: Some(2800),
        duplicated_from: None,
    };

    let studio = ListingDraft {
        name: "Spacious Studio Near Campus".to_string(),
        active: true,
        cleaning_cost: None,
        nights_available: NightToken::ALL.into_iter().collect(),
        days_available: DayToken::ALL.into_iter().collect(),
        qty_beds: 1,
        price_per_night: Some(75),
        four_week_rent: Some(1650),
        ..weekend.clone()
    };

    vec![
        Listing::from_draft(ListingId("listing-1".to_string()), weekend, listed_at),
        Listing::from_draft(ListingId("listing-2".to_string()), studio, listed_at),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mints_sequential_ids() {
        let gateway = InMemoryListingGateway::default();
        let draft = demo_listings()[0].to_draft();

        let first = gateway
            .create_listing(draft.clone(), None)
            .await
            .expect("stored");
        let second = gateway.create_listing(draft, None).await.expect("stored");

        assert_eq!(first.id, ListingId("listing-000001".to_string()));
        assert_eq!(second.id, ListingId("listing-000002".to_string()));
        assert_eq!(gateway.listings().len(), 2);
    }

    #[tokio::test]
    async fn skips_ids_taken_by_seeded_records() {
        let mut seeded = demo_listings();
        seeded[0].id = ListingId("listing-000001".to_string());
        let gateway = InMemoryListingGateway::seeded(seeded);

        let stored = gateway
            .create_listing(demo_listings()[1].to_draft(), None)
            .await
            .expect("stored");

        assert_eq!(stored.id, ListingId("listing-000002".to_string()));
        assert_eq!(gateway.listings().len(), 3);
    }

    #[tokio::test]
    async fn rejects_blank_names() {
        let gateway = InMemoryListingGateway::default();
        let mut draft = demo_listings()[0].to_draft();
        draft.name = "  ".to_string();

        let err = gateway
            .create_listing(draft, None)
            .await
            .expect_err("blank name rejected");
        assert!(matches!(err, GatewayError::Rejected(_)));
        assert!(gateway.listings().is_empty());
    }

    #[tokio::test]
    async fn records_completed_tasks_once() {
        let gateway = InMemoryListingGateway::default();
        let user = UserId("user-1".to_string());

        gateway
            .mark_task_completed(&user, "listing")
            .await
            .expect("task recorded");
        gateway
            .mark_task_completed(&user, "listing")
            .await
            .expect("task recorded");

        let tasks = gateway.completed_tasks(&user);
        assert_eq!(tasks.len(), 1);
        assert!(tasks.contains("listing"));
    }
}
