//! Authorization gate: pure role → capability derivation.
//!
//! ```text
//! anonymous  → VIEW_SHOWS | VIEW_BANDS | VIEW_VENUES
//! user/staff → public read | VIEW_DASHBOARD
//! admin      → ALL (includes MANAGE_STAFF and every mutation)
//! ```
//!
//! The set is recomputed from the identity every time it is asked for; nothing
//! here holds state.

use std::fmt;

use bitflags::bitflags;
use thiserror::Error;

use marquee_api_models::{Identity, Role};

bitflags! {
    /// Affordances a session may render or call.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CapabilitySet: u16 {
        /// Browse shows.
        const VIEW_SHOWS     = 1 << 0;
        /// Browse bands.
        const VIEW_BANDS     = 1 << 1;
        /// Browse venues.
        const VIEW_VENUES    = 1 << 2;
        /// Personal dashboard.
        const VIEW_DASHBOARD = 1 << 3;
        /// Create shows.
        const CREATE_SHOW    = 1 << 4;
        /// Edit shows.
        const EDIT_SHOW      = 1 << 5;
        /// Delete shows.
        const DELETE_SHOW    = 1 << 6;
        /// Create bands.
        const CREATE_BAND    = 1 << 7;
        /// Edit bands.
        const EDIT_BAND      = 1 << 8;
        /// Delete bands.
        const DELETE_BAND    = 1 << 9;
        /// Create venues.
        const CREATE_VENUE   = 1 << 10;
        /// Edit venues.
        const EDIT_VENUE     = 1 << 11;
        /// Delete venues.
        const DELETE_VENUE   = 1 << 12;
        /// List and manage staff accounts.
        const MANAGE_STAFF   = 1 << 13;
    }
}

impl CapabilitySet {
    /// What anonymous visitors may do.
    pub const PUBLIC: Self = Self::VIEW_SHOWS
        .union(Self::VIEW_BANDS)
        .union(Self::VIEW_VENUES);

    /// What any signed-in, non-admin account may do.
    pub const MEMBER: Self = Self::PUBLIC.union(Self::VIEW_DASHBOARD);

    /// Capability a CRUD action on `resource` needs.
    #[must_use]
    pub const fn required_for(resource: Resource, action: Action) -> Self {
        match (resource, action) {
            (Resource::Shows, Action::Read) => Self::VIEW_SHOWS,
            (Resource::Shows, Action::Create) => Self::CREATE_SHOW,
            (Resource::Shows, Action::Update) => Self::EDIT_SHOW,
            (Resource::Shows, Action::Delete) => Self::DELETE_SHOW,
            (Resource::Bands, Action::Read) => Self::VIEW_BANDS,
            (Resource::Bands, Action::Create) => Self::CREATE_BAND,
            (Resource::Bands, Action::Update) => Self::EDIT_BAND,
            (Resource::Bands, Action::Delete) => Self::DELETE_BAND,
            (Resource::Venues, Action::Read) => Self::VIEW_VENUES,
            (Resource::Venues, Action::Create) => Self::CREATE_VENUE,
            (Resource::Venues, Action::Update) => Self::EDIT_VENUE,
            (Resource::Venues, Action::Delete) => Self::DELETE_VENUE,
        }
    }

    /// Whether every capability in `required` is held.
    #[must_use]
    pub const fn allows(self, required: Self) -> bool {
        self.contains(required)
    }

    /// Refuse early when `required` is not held.
    ///
    /// # Errors
    ///
    /// Returns [`AccessDenied`] listing the missing capabilities.
    pub const fn ensure(self, required: Self) -> Result<(), AccessDenied> {
        if self.contains(required) {
            Ok(())
        } else {
            Err(AccessDenied {
                missing: required.difference(self),
            })
        }
    }

    /// Lower-case names of the held capabilities, for display.
    #[must_use]
    pub fn labels(self) -> Vec<String> {
        self.iter_names()
            .map(|(name, _)| name.to_ascii_lowercase())
            .collect()
    }
}

impl fmt::Display for CapabilitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.labels().join(", "))
    }
}

/// Collections the gate knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    /// `/shows`
    Shows,
    /// `/bands`
    Bands,
    /// `/venues`
    Venues,
}

/// CRUD verbs as the gate sees them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// List or detail.
    Read,
    /// Create.
    Create,
    /// Update.
    Update,
    /// Delete.
    Delete,
}

/// Raised before a request when the session lacks a capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("not permitted (requires {missing})")]
pub struct AccessDenied {
    /// Capabilities that were required but not held.
    pub missing: CapabilitySet,
}

/// Capabilities for the given identity (or an anonymous visitor).
#[must_use]
pub const fn capabilities_for(identity: Option<&Identity>) -> CapabilitySet {
    match identity {
        None => CapabilitySet::PUBLIC,
        Some(identity) => match identity.role {
            Role::Admin => CapabilitySet::all(),
            Role::Staff | Role::User => CapabilitySet::MEMBER,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(role: Role) -> Identity {
        Identity {
            id: 1,
            username: "alex".into(),
            role,
        }
    }

    #[test]
    fn anonymous_gets_public_read_only() {
        let caps = capabilities_for(None);
        assert_eq!(caps, CapabilitySet::PUBLIC);
        assert!(!caps.allows(CapabilitySet::VIEW_DASHBOARD));
        assert!(!caps.allows(CapabilitySet::CREATE_SHOW));
    }

    #[test]
    fn admin_gets_everything() {
        let caps = capabilities_for(Some(&identity(Role::Admin)));
        assert!(caps.allows(CapabilitySet::MANAGE_STAFF));
        assert!(caps.allows(CapabilitySet::DELETE_VENUE | CapabilitySet::EDIT_BAND));
        assert_eq!(caps, CapabilitySet::all());
    }

    #[test]
    fn staff_and_user_are_read_only_with_dashboard() {
        for role in [Role::Staff, Role::User] {
            let caps = capabilities_for(Some(&identity(role)));
            assert_eq!(caps, CapabilitySet::MEMBER);
            assert!(caps.allows(CapabilitySet::VIEW_DASHBOARD));
            assert!(!caps.allows(CapabilitySet::MANAGE_STAFF));
            assert!(!caps.allows(CapabilitySet::CREATE_BAND));
        }
    }

    #[test]
    fn derivation_is_referentially_transparent() {
        let admin = identity(Role::Admin);
        let first = capabilities_for(Some(&admin));
        let _ = capabilities_for(None);
        let _ = capabilities_for(Some(&identity(Role::User)));
        assert_eq!(first, capabilities_for(Some(&admin)));
    }

    #[test]
    fn required_capabilities_cover_every_mutation() {
        for resource in [Resource::Shows, Resource::Bands, Resource::Venues] {
            for action in [Action::Create, Action::Update, Action::Delete] {
                let required = CapabilitySet::required_for(resource, action);
                assert!(!CapabilitySet::MEMBER.allows(required));
                assert!(CapabilitySet::all().allows(required));
            }
            assert!(CapabilitySet::PUBLIC.allows(CapabilitySet::required_for(resource, Action::Read)));
        }
    }

    #[test]
    fn ensure_reports_missing_capabilities() {
        let denied = CapabilitySet::MEMBER
            .ensure(CapabilitySet::MANAGE_STAFF)
            .expect_err("members cannot manage staff");
        assert_eq!(denied.missing, CapabilitySet::MANAGE_STAFF);
        assert_eq!(denied.to_string(), "not permitted (requires manage_staff)");
        assert!(CapabilitySet::all().ensure(CapabilitySet::MANAGE_STAFF).is_ok());
    }
}
