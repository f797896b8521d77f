use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::availability::{DayToken, NightToken};

/// Onboarding milestone recorded after a host's first listing is saved.
pub const LISTING_TASK: &str = "listing";

/// Identifier wrapper for persisted listings. Only gateways mint these.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ListingId(pub String);

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for platform users.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A rentable property unit as stored by the persistence backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub id: ListingId,
    pub name: String,
    pub active: bool,
    pub default_extension_setting: bool,
    pub damage_deposit: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cleaning_cost: Option<u32>,
    pub host_landlord_id: String,
    pub host_name: String,
    pub host_email: String,
    pub operator_last_updated: DateTime<Utc>,
    pub is_for_usability: bool,
    pub nights_available: BTreeSet<NightToken>,
    pub days_available: BTreeSet<DayToken>,
    pub qty_beds: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_per_night: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub four_week_rent: Option<u32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duplicated_from: Option<ListingId>,
}

impl Listing {
    /// Materialize a stored record from a draft. Gateways call this once they
    /// have minted the identifier.
    pub fn from_draft(id: ListingId, draft: ListingDraft, stored_at: DateTime<Utc>) -> Self {
        let ListingDraft {
            name,
            active,
            default_extension_setting,
            damage_deposit,
            cleaning_cost,
            host_landlord_id,
            host_name,
            host_email,
            operator_last_updated,
            is_for_usability,
            nights_available,
            days_available,
            qty_beds,
            price_per_night,
            four_week_rent,
            duplicated_from,
        } = draft;

        Self {
            id,
            name,
            active,
            default_extension_setting,
            damage_deposit,
            cleaning_cost,
            host_landlord_id,
            host_name,
            host_email,
            operator_last_updated,
            is_for_usability,
            nights_available,
            days_available,
            qty_beds,
            price_per_night,
            four_week_rent,
            created_at: stored_at,
            updated_at: stored_at,
            duplicated_from,
        }
    }

    /// Copy every client-owned field into a fresh draft. Identifier and
    /// backend timestamps are dropped.
    pub fn to_draft(&self) -> ListingDraft {
        ListingDraft {
            name: self.name.clone(),
            active: self.active,
            default_extension_setting: self.default_extension_setting,
            damage_deposit: self.damage_deposit,
            cleaning_cost: self.cleaning_cost,
            host_landlord_id: self.host_landlord_id.clone(),
            host_name: self.host_name.clone(),
            host_email: self.host_email.clone(),
            operator_last_updated: self.operator_last_updated,
            is_for_usability: self.is_for_usability,
            nights_available: self.nights_available.clone(),
            days_available: self.days_available.clone(),
            qty_beds: self.qty_beds,
            price_per_night: self.price_per_night,
            four_week_rent: self.four_week_rent,
            duplicated_from: self.duplicated_from.clone(),
        }
    }
}

/// Listing payload sent to the gateway. It has no identifier or backend
/// timestamps, so a client can never supply them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingDraft {
    pub name: String,
    pub active: bool,
    pub default_extension_setting: bool,
    pub damage_deposit: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cleaning_cost: Option<u32>,
    pub host_landlord_id: String,
    pub host_name: String,
    pub host_email: String,
    pub operator_last_updated: DateTime<Utc>,
    pub is_for_usability: bool,
    pub nights_available: BTreeSet<NightToken>,
    pub days_available: BTreeSet<DayToken>,
    pub qty_beds: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_per_night: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub four_week_rent: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duplicated_from: Option<ListingId>,
}

/// The acting principal behind a modal presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub first_name: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub is_usability_tester: bool,
    #[serde(default)]
    pub tasks_completed: BTreeSet<String>,
    #[serde(default)]
    pub account_host_id: Option<String>,
}

impl User {
    /// Name shown to guests: full name, then first name, then nothing.
    pub fn host_display_name(&self) -> &str {
        [self.full_name.as_deref(), Some(self.first_name.as_str())]
            .into_iter()
            .flatten()
            .find(|candidate| !candidate.trim().is_empty())
            .unwrap_or("")
    }

    pub fn has_completed(&self, task: &str) -> bool {
        self.tasks_completed.contains(task)
    }
}

/// Whether anyone is signed in. Anonymous is a normal state, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Session {
    LoggedIn(User),
    #[default]
    Anonymous,
}

impl Session {
    pub fn user(&self) -> Option<&User> {
        match self {
            Session::LoggedIn(user) => Some(user),
            Session::Anonymous => None,
        }
    }

    pub fn is_logged_in(&self) -> bool {
        matches!(self, Session::LoggedIn(_))
    }
}

impl From<Option<User>> for Session {
    fn from(value: Option<User>) -> Self {
        value.map_or(Session::Anonymous, Session::LoggedIn)
    }
}

/// Which submission workflow the modal is configured for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    #[default]
    Create,
    Copy,
}

impl ViewMode {
    pub const fn label(self) -> &'static str {
        match self {
            ViewMode::Create => "create",
            ViewMode::Copy => "copy",
        }
    }
}
