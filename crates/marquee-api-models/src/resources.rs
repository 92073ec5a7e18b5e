//! Shows, Bands and Venues records plus the envelopes they travel in.
//!
//! # Design
//! - Records mirror the backend rows; drafts are create bodies and patches are
//!   partial update bodies that only serialize the fields being changed.
//! - [`ResourceKind`] ties a collection path to its record/draft/patch types so
//!   one generic client can serve every resource.

use std::fmt::Debug;

use chrono::{NaiveDate, NaiveTime};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::wire::{list_or_csv, text_or_number};

/// Static description of a REST collection (`/shows`, `/bands`, `/venues`).
pub trait ResourceKind {
    /// Collection segment, e.g. `shows`.
    const COLLECTION: &'static str;
    /// Human label for a single record, e.g. `show`.
    const SINGULAR: &'static str;

    /// Stored record returned by list/detail/create/update.
    type Record: DeserializeOwned + Serialize + Clone + Debug + PartialEq;
    /// Create body.
    type Draft: Serialize + Debug;
    /// Partial update body.
    type Patch: Serialize + Debug;
    /// `{ "<collection>": [...] }` envelope.
    type List: DeserializeOwned;
    /// `{ "<singular>": {...} }` envelope.
    type One: DeserializeOwned;

    /// Unwrap a list envelope.
    fn records(list: Self::List) -> Vec<Self::Record>;
    /// Unwrap a single-record envelope.
    fn record(one: Self::One) -> Self::Record;
}

/// A scheduled show.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Show {
    /// Show identifier.
    pub id: i64,
    /// Calendar date (`YYYY-MM-DD`).
    pub showdate: NaiveDate,
    /// Door time (`HH:MM:SS`).
    pub showtime: NaiveTime,
    /// Free-form description.
    pub showdescription: String,
    /// Venue or address.
    pub location: String,
    /// Band names on the bill.
    #[serde(default, deserialize_with = "list_or_csv")]
    pub bandsplaying: Vec<String>,
    /// Ticket price as entered (kept textual to avoid float rounding).
    #[serde(deserialize_with = "text_or_number")]
    pub ticketprice: String,
    /// Account that created the show.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
}

/// Create body for a show.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShowDraft {
    /// Calendar date.
    pub showdate: NaiveDate,
    /// Door time.
    pub showtime: NaiveTime,
    /// Free-form description.
    pub showdescription: String,
    /// Venue or address.
    pub location: String,
    /// Band names on the bill.
    pub bandsplaying: Vec<String>,
    /// Ticket price.
    pub ticketprice: String,
}

/// Partial update body for a show.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShowPatch {
    /// New date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showdate: Option<NaiveDate>,
    /// New door time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showtime: Option<NaiveTime>,
    /// New description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showdescription: Option<String>,
    /// New location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Replacement bill.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bandsplaying: Option<Vec<String>>,
    /// New ticket price.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticketprice: Option<String>,
}

impl ShowPatch {
    /// Whether the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.showdate.is_none()
            && self.showtime.is_none()
            && self.showdescription.is_none()
            && self.location.is_none()
            && self.bandsplaying.is_none()
            && self.ticketprice.is_none()
    }
}

/// A band on the roster.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Band {
    /// Band identifier.
    pub id: i64,
    /// Display name.
    pub bandname: String,
    /// Home town.
    #[serde(default)]
    pub hometown: Option<String>,
    /// Genre label.
    #[serde(default)]
    pub genre: Option<String>,
    /// Year the band formed.
    #[serde(default)]
    pub yearstarted: Option<i32>,
    /// Member names.
    #[serde(default, deserialize_with = "list_or_csv")]
    pub membernames: Vec<String>,
    /// Photo URL.
    #[serde(default)]
    pub bandphoto: Option<String>,
    /// Long description.
    #[serde(default)]
    pub banddescription: Option<String>,
    /// Account that created the band.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
}

/// Create body for a band.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BandDraft {
    /// Display name.
    pub bandname: String,
    /// Home town.
    pub hometown: String,
    /// Genre label.
    pub genre: String,
    /// Year the band formed.
    pub yearstarted: Option<i32>,
    /// Member names.
    pub membernames: Vec<String>,
    /// Photo URL.
    pub bandphoto: Option<String>,
    /// Long description.
    pub banddescription: Option<String>,
}

/// Partial update body for a band.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BandPatch {
    /// New name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bandname: Option<String>,
    /// New home town.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hometown: Option<String>,
    /// New genre.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    /// New formation year.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yearstarted: Option<i32>,
    /// Replacement member list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub membernames: Option<Vec<String>>,
    /// New photo URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bandphoto: Option<String>,
    /// New description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banddescription: Option<String>,
}

impl BandPatch {
    /// Whether the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bandname.is_none()
            && self.hometown.is_none()
            && self.genre.is_none()
            && self.yearstarted.is_none()
            && self.membernames.is_none()
            && self.bandphoto.is_none()
            && self.banddescription.is_none()
    }
}

/// A venue shows can be booked into.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Venue {
    /// Venue identifier.
    pub id: i64,
    /// Display name.
    pub venuename: String,
    /// Head-count capacity.
    #[serde(default)]
    pub capacity: Option<i64>,
    /// Address or city.
    #[serde(default)]
    pub location: Option<String>,
    /// Contact person.
    #[serde(default)]
    pub venuemanager: Option<String>,
    /// Account that created the venue.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
}

/// Create body for a venue.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VenueDraft {
    /// Head-count capacity.
    pub capacity: i64,
    /// Display name.
    pub venuename: String,
    /// Address or city.
    pub location: String,
    /// Contact person.
    pub venuemanager: String,
}

/// Partial update body for a venue.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct VenuePatch {
    /// New capacity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<i64>,
    /// New name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venuename: Option<String>,
    /// New location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// New contact person.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venuemanager: Option<String>,
}

impl VenuePatch {
    /// Whether the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.capacity.is_none()
            && self.venuename.is_none()
            && self.location.is_none()
            && self.venuemanager.is_none()
    }
}

/// `{ "shows": [...] }`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShowList {
    /// Shows ordered by date and time.
    pub shows: Vec<Show>,
}

/// `{ "show": {...} }`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShowEnvelope {
    /// The show.
    pub show: Show,
}

/// `{ "bands": [...] }`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BandList {
    /// Bands ordered by name.
    pub bands: Vec<Band>,
}

/// `{ "band": {...} }`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BandEnvelope {
    /// The band.
    pub band: Band,
}

/// `{ "venues": [...] }`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VenueList {
    /// Venues ordered by name.
    pub venues: Vec<Venue>,
}

/// `{ "venue": {...} }`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VenueEnvelope {
    /// The venue.
    pub venue: Venue,
}

/// Marker for the `/shows` collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shows {}

/// Marker for the `/bands` collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bands {}

/// Marker for the `/venues` collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Venues {}

impl ResourceKind for Shows {
    const COLLECTION: &'static str = "shows";
    const SINGULAR: &'static str = "show";
    type Record = Show;
    type Draft = ShowDraft;
    type Patch = ShowPatch;
    type List = ShowList;
    type One = ShowEnvelope;

    fn records(list: Self::List) -> Vec<Self::Record> {
        list.shows
    }

    fn record(one: Self::One) -> Self::Record {
        one.show
    }
}

impl ResourceKind for Bands {
    const COLLECTION: &'static str = "bands";
    const SINGULAR: &'static str = "band";
    type Record = Band;
    type Draft = BandDraft;
    type Patch = BandPatch;
    type List = BandList;
    type One = BandEnvelope;

    fn records(list: Self::List) -> Vec<Self::Record> {
        list.bands
    }

    fn record(one: Self::One) -> Self::Record {
        one.band
    }
}

impl ResourceKind for Venues {
    const COLLECTION: &'static str = "venues";
    const SINGULAR: &'static str = "venue";
    type Record = Venue;
    type Draft = VenueDraft;
    type Patch = VenuePatch;
    type List = VenueList;
    type One = VenueEnvelope;

    fn records(list: Self::List) -> Vec<Self::Record> {
        list.venues
    }

    fn record(one: Self::One) -> Self::Record {
        one.venue
    }
}
