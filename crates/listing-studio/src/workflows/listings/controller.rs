use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use super::availability::{all_day_tokens, all_night_tokens};
use super::domain::{
    Listing, ListingDraft, ListingId, Session, User, UserId, ViewMode, LISTING_TASK,
};
use super::gateway::{GatewayError, ListingGateway};
use super::notify::{Notification, NotificationSink};
use super::view::{ModalIntent, ModalView};

/// Field values applied to every brand new listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingDefaults {
    pub damage_deposit: u32,
    pub qty_beds: u16,
}

impl Default for ListingDefaults {
    fn default() -> Self {
        Self {
            damage_deposit: 500,
            qty_beds: 1,
        }
    }
}

/// Everything the embedding page hands the modal besides visibility.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModalContext {
    pub session: Session,
    pub existing_listings: Vec<Listing>,
}

impl ModalContext {
    pub fn new(session: Session, existing_listings: Vec<Listing>) -> Self {
        Self {
            session,
            existing_listings,
        }
    }

    /// Copy mode needs someone signed in and something to copy.
    pub fn can_offer_copy(&self) -> bool {
        self.session.is_logged_in() && !self.existing_listings.is_empty()
    }

    pub fn find_listing(&self, id: &ListingId) -> Option<&Listing> {
        self.existing_listings
            .iter()
            .find(|listing| &listing.id == id)
    }
}

/// Transient form state for one presentation of the modal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModalState {
    pub mode: ViewMode,
    pub name_draft: String,
    pub selected_source_id: Option<ListingId>,
    pub is_submitting: bool,
    pub visible: bool,
}

impl ModalState {
    fn reset_form(&mut self, mode: ViewMode) {
        self.mode = mode;
        self.name_draft.clear();
        self.selected_source_id = None;
    }
}

/// Callbacks into the page that embeds the modal.
pub trait ModalHost: Send + Sync {
    fn close(&self);

    fn listing_saved(&self, _listing: &Listing) {}

    fn navigate_to_listing(&self, _listing_id: &ListingId) {}
}

pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SubmissionKind {
    Create,
    Duplicate,
}

impl SubmissionKind {
    const fn label(self) -> &'static str {
        match self {
            SubmissionKind::Create => "create",
            SubmissionKind::Duplicate => "duplicate",
        }
    }

    const fn success_message(self) -> &'static str {
        match self {
            SubmissionKind::Create => "Listing created successfully!",
            SubmissionKind::Duplicate => "Listing duplicated successfully!",
        }
    }

    const fn failure_message(self) -> &'static str {
        match self {
            SubmissionKind::Create => "Failed to create listing. Please try again.",
            SubmissionKind::Duplicate => "Failed to duplicate listing. Please try again.",
        }
    }
}

struct PreparedSubmission {
    kind: SubmissionKind,
    draft: ListingDraft,
    acting_user: Option<User>,
    generation: u64,
}

struct ControllerInner {
    state: ModalState,
    context: ModalContext,
    generation: u64,
}

/// State machine behind the create-or-duplicate listing modal.
///
/// All methods take `&self`; the form state sits behind a mutex that is never
/// held across a gateway await, so the controller can be shared through an
/// `Arc` and `is_submitting` acts as the single-submission gate.
pub struct ListingModalController<G: ?Sized, N: ?Sized, H: ?Sized> {
    gateway: Arc<G>,
    notifications: Arc<N>,
    host: Arc<H>,
    defaults: ListingDefaults,
    clock: Clock,
    inner: Mutex<ControllerInner>,
}

impl<G, N, H> ListingModalController<G, N, H>
where
    G: ListingGateway + ?Sized,
    N: NotificationSink + ?Sized,
    H: ModalHost + ?Sized,
{
    pub fn new(gateway: Arc<G>, notifications: Arc<N>, host: Arc<H>, context: ModalContext) -> Self {
        Self {
            gateway,
            notifications,
            host,
            defaults: ListingDefaults::default(),
            clock: Arc::new(Utc::now),
            inner: Mutex::new(ControllerInner {
                state: ModalState::default(),
                context,
                generation: 0,
            }),
        }
    }

    pub fn with_defaults(mut self, defaults: ListingDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn with_clock<F>(mut self, clock: F) -> Self
    where
        F: Fn() -> DateTime<Utc> + Send + Sync + 'static,
    {
        self.clock = Arc::new(clock);
        self
    }

    fn lock(&self) -> MutexGuard<'_, ControllerInner> {
        // Every transition writes whole fields, so a poisoned guard is still usable.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> ModalState {
        self.lock().state.clone()
    }

    pub fn context(&self) -> ModalContext {
        self.lock().context.clone()
    }

    pub fn view(&self) -> ModalView {
        let inner = self.lock();
        ModalView::render(&inner.state, &inner.context)
    }

    /// Replace the session and listings, e.g. after the host appends a new listing.
    pub fn update_context(&self, context: ModalContext) {
        self.lock().context = context;
    }

    pub fn can_offer_copy(&self) -> bool {
        let inner = self.lock();
        !inner.state.is_submitting && inner.context.can_offer_copy()
    }

    /// Show the modal with a blank create form, discarding any previous state.
    pub fn open(&self) {
        Self::reopen(&mut self.lock());
    }

    /// Mirror an external visibility flag; only a hidden to visible edge resets the form.
    pub fn set_visible(&self, visible: bool) {
        let mut inner = self.lock();
        match (inner.state.visible, visible) {
            (false, true) => Self::reopen(&mut inner),
            (_, false) => inner.state.visible = false,
            (true, true) => {}
        }
    }

    #[cfg(test)]
    pub(super) fn generation(&self) -> u64 {
        self.lock().generation
    }

    fn reopen(inner: &mut ControllerInner) {
        inner.generation += 1;
        inner.state = ModalState {
            visible: true,
            ..ModalState::default()
        };
        debug!(generation = inner.generation, "listing modal opened");
    }

    pub fn close(&self) {
        self.lock().state.visible = false;
        self.host.close();
    }

    pub fn switch_to_copy(&self) -> Result<(), ListingWorkflowError> {
        let mut inner = self.lock();
        if inner.state.is_submitting {
            return Err(ListingWorkflowError::SubmissionInFlight);
        }
        if !inner.context.can_offer_copy() {
            return Err(ListingWorkflowError::CopyUnavailable);
        }
        inner.state.reset_form(ViewMode::Copy);
        debug!("listing modal switched to copy mode");
        Ok(())
    }

    pub fn switch_to_create(&self) -> Result<(), ListingWorkflowError> {
        let mut inner = self.lock();
        if inner.state.is_submitting {
            return Err(ListingWorkflowError::SubmissionInFlight);
        }
        if inner.state.mode == ViewMode::Copy {
            inner.state.reset_form(ViewMode::Create);
            debug!("listing modal switched back to create mode");
        }
        Ok(())
    }

    /// Pick the listing to copy. An empty id clears the selection.
    pub fn select_source(&self, listing_id: &str) -> Result<(), ListingWorkflowError> {
        let mut inner = self.lock();
        if inner.state.is_submitting {
            return Err(ListingWorkflowError::SubmissionInFlight);
        }
        if inner.state.mode != ViewMode::Copy {
            return Err(ListingWorkflowError::WrongMode {
                expected: ViewMode::Copy,
            });
        }

        if listing_id.is_empty() {
            inner.state.selected_source_id = None;
            return Ok(());
        }

        let id = ListingId(listing_id.to_string());
        let suggested = inner
            .context
            .find_listing(&id)
            .map(|source| format!("{} copy", source.name));
        if let Some(name) = suggested {
            inner.state.name_draft = name;
        }
        inner.state.selected_source_id = Some(id);
        Ok(())
    }

    pub fn edit_name(&self, text: impl Into<String>) -> Result<(), ListingWorkflowError> {
        let mut inner = self.lock();
        if inner.state.is_submitting {
            return Err(ListingWorkflowError::SubmissionInFlight);
        }
        inner.state.name_draft = text.into();
        Ok(())
    }

    /// Submit whichever workflow the current view mode selects.
    pub async fn submit(&self) -> Result<Listing, ListingWorkflowError> {
        let mode = self.lock().state.mode;
        match mode {
            ViewMode::Create => self.submit_create().await,
            ViewMode::Copy => self.submit_duplicate().await,
        }
    }

    pub async fn submit_create(&self) -> Result<Listing, ListingWorkflowError> {
        let prepared = self
            .prepare_create()
            .map_err(|err| self.report_rejection(SubmissionKind::Create, err))?;
        self.persist(prepared).await
    }

    pub async fn submit_duplicate(&self) -> Result<Listing, ListingWorkflowError> {
        let prepared = self
            .prepare_duplicate()
            .map_err(|err| self.report_rejection(SubmissionKind::Duplicate, err))?;
        self.persist(prepared).await
    }

    /// Apply one presentation intent. Successful submissions return the stored listing.
    pub async fn dispatch(
        &self,
        intent: ModalIntent,
    ) -> Result<Option<Listing>, ListingWorkflowError> {
        match intent {
            ModalIntent::Open => self.open(),
            ModalIntent::SwitchToCopy => self.switch_to_copy()?,
            ModalIntent::SwitchToCreate => self.switch_to_create()?,
            ModalIntent::SelectSource(id) => self.select_source(&id)?,
            ModalIntent::EditName(text) => self.edit_name(text)?,
            ModalIntent::Submit => return self.submit().await.map(Some),
            ModalIntent::Close => self.close(),
        }
        Ok(None)
    }

    fn prepare_create(&self) -> Result<PreparedSubmission, ListingWorkflowError> {
        let mut inner = self.lock();
        if inner.state.is_submitting {
            return Err(ListingWorkflowError::SubmissionInFlight);
        }
        if inner.state.mode != ViewMode::Create {
            return Err(ListingWorkflowError::WrongMode {
                expected: ViewMode::Create,
            });
        }

        let name = inner.state.name_draft.trim().to_string();
        if name.is_empty() {
            return Err(ValidationError::MissingName.into());
        }

        let acting_user = inner.context.session.user().cloned();
        let draft = self.new_listing_draft(name, acting_user.as_ref());
        inner.state.is_submitting = true;

        Ok(PreparedSubmission {
            kind: SubmissionKind::Create,
            draft,
            acting_user,
            generation: inner.generation,
        })
    }

    fn prepare_duplicate(&self) -> Result<PreparedSubmission, ListingWorkflowError> {
        let mut inner = self.lock();
        if inner.state.is_submitting {
            return Err(ListingWorkflowError::SubmissionInFlight);
        }
        if inner.state.mode != ViewMode::Copy {
            return Err(ListingWorkflowError::WrongMode {
                expected: ViewMode::Copy,
            });
        }

        let source_id = inner
            .state
            .selected_source_id
            .clone()
            .ok_or(ValidationError::NoSourceSelected)?;
        let name = inner.state.name_draft.trim().to_string();
        if name.is_empty() {
            return Err(ValidationError::MissingName.into());
        }
        let acting_user = inner
            .context
            .session
            .user()
            .cloned()
            .ok_or(ListingWorkflowError::NotLoggedIn)?;

        let source = inner
            .context
            .find_listing(&source_id)
            .ok_or_else(|| ListingWorkflowError::NotFound(source_id.clone()))?;
        let draft = ListingDraft {
            name,
            active: false,
            operator_last_updated: (self.clock)(),
            duplicated_from: Some(source.id.clone()),
            ..source.to_draft()
        };
        inner.state.is_submitting = true;

        Ok(PreparedSubmission {
            kind: SubmissionKind::Duplicate,
            draft,
            acting_user: Some(acting_user),
            generation: inner.generation,
        })
    }

    fn new_listing_draft(&self, name: String, user: Option<&User>) -> ListingDraft {
        ListingDraft {
            name,
            active: false,
            default_extension_setting: false,
            damage_deposit: self.defaults.damage_deposit,
            cleaning_cost: None,
            host_landlord_id: user
                .and_then(|user| user.account_host_id.clone())
                .unwrap_or_default(),
            host_name: user
                .map(User::host_display_name)
                .unwrap_or_default()
                .to_string(),
            host_email: user.map(|user| user.email.clone()).unwrap_or_default(),
            operator_last_updated: (self.clock)(),
            is_for_usability: user.is_some_and(|user| user.is_usability_tester),
            nights_available: all_night_tokens().into_iter().collect(),
            days_available: all_day_tokens().into_iter().collect(),
            qty_beds: self.defaults.qty_beds,
            price_per_night: None,
            four_week_rent: None,
            duplicated_from: None,
        }
    }

    fn report_rejection(
        &self,
        kind: SubmissionKind,
        err: ListingWorkflowError,
    ) -> ListingWorkflowError {
        let notification = match &err {
            ListingWorkflowError::Validation(validation) => {
                Some(Notification::validation(validation.prompt()))
            }
            ListingWorkflowError::NotLoggedIn => {
                Some(Notification::validation("Please log in to duplicate a listing"))
            }
            ListingWorkflowError::NotFound(_) => Some(Notification::error(kind.failure_message())),
            _ => None,
        };
        debug!(kind = kind.label(), error = %err, "listing submission rejected");
        if let Some(notification) = notification {
            self.notifications.notify(notification);
        }
        err
    }

    async fn persist(&self, prepared: PreparedSubmission) -> Result<Listing, ListingWorkflowError> {
        let PreparedSubmission {
            kind,
            draft,
            acting_user,
            generation,
        } = prepared;

        let acting_user_id = acting_user.as_ref().map(|user| &user.id);
        let listing = match self.gateway.create_listing(draft, acting_user_id).await {
            Ok(listing) => listing,
            Err(err) => {
                warn!(kind = kind.label(), error = %err, "listing submission failed");
                if self.finish(generation, false) {
                    self.notifications
                        .notify(Notification::error(kind.failure_message()));
                }
                return Err(err.into());
            }
        };

        if let Some(user) = acting_user
            .as_ref()
            .filter(|user| !user.has_completed(LISTING_TASK))
        {
            match self
                .gateway
                .mark_task_completed(&user.id, LISTING_TASK)
                .await
            {
                Ok(()) => self.record_task_completed(&user.id),
                Err(err) => warn!(
                    user_id = %user.id,
                    listing_id = %listing.id,
                    error = %err,
                    "profile completeness update failed; listing was saved"
                ),
            }
        }

        if !self.finish(generation, true) {
            debug!(listing_id = %listing.id, "modal re-opened before submission resolved");
            return Ok(listing);
        }

        info!(kind = kind.label(), listing_id = %listing.id, "listing saved");
        self.host.close();
        self.notifications
            .notify(Notification::success(kind.success_message()));
        self.host.listing_saved(&listing);
        self.host.navigate_to_listing(&listing.id);
        Ok(listing)
    }

    /// Mirror a completed profile task into the session, whichever presentation is current.
    fn record_task_completed(&self, user_id: &UserId) {
        let mut inner = self.lock();
        if let Session::LoggedIn(user) = &mut inner.context.session {
            if &user.id == user_id {
                user.tasks_completed.insert(LISTING_TASK.to_string());
            }
        }
    }

    /// Clear the loading flag unless the modal was re-opened meanwhile.
    fn finish(&self, generation: u64, saved: bool) -> bool {
        let mut inner = self.lock();
        if inner.generation != generation {
            return false;
        }
        inner.state.is_submitting = false;
        if saved {
            inner.state.visible = false;
        }
        true
    }
}

/// Input problems reported inline before any submission starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("missing name")]
    MissingName,
    #[error("no source selected")]
    NoSourceSelected,
}

impl ValidationError {
    /// Text shown to the user.
    pub const fn prompt(self) -> &'static str {
        match self {
            ValidationError::MissingName => "Please enter a listing title",
            ValidationError::NoSourceSelected => "Please select a listing to duplicate",
        }
    }
}

/// Error raised by the listing modal workflow.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ListingWorkflowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("listing {0} not found among existing listings")]
    NotFound(ListingId),
    #[error(transparent)]
    Persistence(#[from] GatewayError),
    #[error("a submission is already in flight")]
    SubmissionInFlight,
    #[error("copy mode requires a signed-in user with at least one listing")]
    CopyUnavailable,
    #[error("action is only available in {} mode", .expected.label())]
    WrongMode { expected: ViewMode },
    #[error("duplicating a listing requires a signed-in user")]
    NotLoggedIn,
}
