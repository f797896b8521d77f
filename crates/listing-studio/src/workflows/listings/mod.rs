//! Create-or-duplicate listing modal: domain, default availability, backend
//! seams, the workflow controller and its presentation model.

pub mod availability;
pub mod controller;
pub mod domain;
pub mod gateway;
pub mod notify;
pub mod router;
pub mod view;

#[cfg(test)]
mod tests;

pub use availability::{all_day_tokens, all_night_tokens, DayToken, NightToken, UnknownToken};
pub use controller::{
    Clock, ListingDefaults, ListingModalController, ListingWorkflowError, ModalContext, ModalHost,
    ModalState, ValidationError,
};
pub use domain::{
    Listing, ListingDraft, ListingId, Session, User, UserId, ViewMode, LISTING_TASK,
};
pub use gateway::{GatewayError, ListingGateway};
pub use notify::{Notification, NotificationSink, Severity, TracingNotificationSink};
pub use router::listing_router;
pub use view::{ActionButton, HeaderIcon, ModalAction, ModalIntent, ModalView};
