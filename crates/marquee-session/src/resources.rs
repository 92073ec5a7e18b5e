//! Shows, Bands and Venues clients.
//!
//! # Design
//! - One generic [`ResourceClient`] per collection; the [`ResourceKind`]
//!   marker supplies path and payload types.
//! - Mutations read the credential right before sending. With none stored
//!   they fail with [`ApiError::NoCredential`] and nothing goes on the wire.
//! - Reads attach the credential when there is one.
//! - A 401/403 comes back as [`ApiError::Unauthorized`]. These clients only
//!   hold a [`CredentialReader`] and never touch the session themselves.

use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

use marquee_api_models::{Bands, MessageBody, ResourceKind, Shows, Venues};

use crate::config::ApiConfig;
use crate::credential::{Credential, CredentialReader};
use crate::error::ApiError;
use crate::gate::Resource;
use crate::transport::{ApiRequest, Method, Transport, fetch_json};

/// A collection the authorization gate knows how to guard.
pub trait GatedResource: ResourceKind {
    /// Gate-side name of the collection.
    const RESOURCE: Resource;
}

impl GatedResource for Shows {
    const RESOURCE: Resource = Resource::Shows;
}

impl GatedResource for Bands {
    const RESOURCE: Resource = Resource::Bands;
}

impl GatedResource for Venues {
    const RESOURCE: Resource = Resource::Venues;
}

/// CRUD client for one collection.
pub struct ResourceClient<R> {
    config: ApiConfig,
    transport: Rc<dyn Transport>,
    credentials: CredentialReader,
    _kind: PhantomData<R>,
}

/// `/shows` client.
pub type ShowsClient = ResourceClient<Shows>;
/// `/bands` client.
pub type BandsClient = ResourceClient<Bands>;
/// `/venues` client.
pub type VenuesClient = ResourceClient<Venues>;

impl<R> Clone for ResourceClient<R> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            transport: Rc::clone(&self.transport),
            credentials: self.credentials.clone(),
            _kind: PhantomData,
        }
    }
}

impl<R: ResourceKind> fmt::Debug for ResourceClient<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceClient")
            .field("collection", &R::COLLECTION)
            .field("base_url", &self.config.base_url())
            .finish_non_exhaustive()
    }
}

impl<R: ResourceKind> ResourceClient<R> {
    /// Build a client that reads the credential through `credentials`.
    #[must_use]
    pub fn new(config: ApiConfig, transport: Rc<dyn Transport>, credentials: CredentialReader) -> Self {
        Self {
            config,
            transport,
            credentials,
            _kind: PhantomData,
        }
    }

    fn collection_url(&self) -> String {
        self.config.endpoint(R::COLLECTION)
    }

    fn record_url(&self, id: i64) -> String {
        self.config.endpoint(&format!("{}/{id}", R::COLLECTION))
    }

    fn required_credential(&self) -> Result<Credential, ApiError> {
        self.credentials.read().ok_or_else(|| {
            tracing::debug!(collection = R::COLLECTION, "mutation refused without credential");
            ApiError::NoCredential
        })
    }

    /// Every record in the collection.
    ///
    /// # Errors
    ///
    /// Classified [`ApiError`] on any non-2xx or transport failure.
    pub async fn list(&self) -> Result<Vec<R::Record>, ApiError> {
        let request = ApiRequest::new(Method::Get, self.collection_url()).bearer(self.credentials.read());
        let list: R::List = fetch_json(self.transport.as_ref(), request).await?;
        Ok(R::records(list))
    }

    /// One record by id.
    ///
    /// # Errors
    ///
    /// Classified [`ApiError`]; a missing record is the backend's `{ error }`.
    pub async fn get(&self, id: i64) -> Result<R::Record, ApiError> {
        let request = ApiRequest::new(Method::Get, self.record_url(id)).bearer(self.credentials.read());
        let one: R::One = fetch_json(self.transport.as_ref(), request).await?;
        Ok(R::record(one))
    }

    /// Create a record.
    ///
    /// # Errors
    ///
    /// [`ApiError::NoCredential`] before sending when signed out, otherwise
    /// the classified response.
    pub async fn create(&self, draft: &R::Draft) -> Result<R::Record, ApiError> {
        let bearer = self.required_credential()?;
        let request = ApiRequest::new(Method::Post, self.collection_url())
            .bearer(Some(bearer))
            .json(draft)?;
        let one: R::One = fetch_json(self.transport.as_ref(), request).await?;
        Ok(R::record(one))
    }

    /// Apply a partial update.
    ///
    /// # Errors
    ///
    /// [`ApiError::NoCredential`] before sending when signed out, otherwise
    /// the classified response.
    pub async fn update(&self, id: i64, patch: &R::Patch) -> Result<R::Record, ApiError> {
        let bearer = self.required_credential()?;
        let request = ApiRequest::new(Method::Put, self.record_url(id))
            .bearer(Some(bearer))
            .json(patch)?;
        let one: R::One = fetch_json(self.transport.as_ref(), request).await?;
        Ok(R::record(one))
    }

    /// Delete a record and return the backend's confirmation message.
    ///
    /// # Errors
    ///
    /// [`ApiError::NoCredential`] before sending when signed out, otherwise
    /// the classified response.
    pub async fn delete(&self, id: i64) -> Result<String, ApiError> {
        let bearer = self.required_credential()?;
        let request = ApiRequest::new(Method::Delete, self.record_url(id)).bearer(Some(bearer));
        let body: MessageBody = fetch_json(self.transport.as_ref(), request).await?;
        Ok(body.message)
    }
}

/// The three collection clients sharing one transport and credential view.
#[derive(Debug, Clone)]
pub struct Catalog {
    /// `/shows`
    pub shows: ShowsClient,
    /// `/bands`
    pub bands: BandsClient,
    /// `/venues`
    pub venues: VenuesClient,
}

impl Catalog {
    /// Build all three clients.
    #[must_use]
    pub fn new(config: &ApiConfig, transport: &Rc<dyn Transport>, credentials: &CredentialReader) -> Self {
        Self {
            shows: ResourceClient::new(config.clone(), Rc::clone(transport), credentials.clone()),
            bands: ResourceClient::new(config.clone(), Rc::clone(transport), credentials.clone()),
            venues: ResourceClient::new(config.clone(), Rc::clone(transport), credentials.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::MemoryCredentialStore;
    use crate::testing::ScriptedTransport;
    use marquee_api_models::{BandDraft, VenuePatch};
    use serde_json::json;

    fn catalog(token: Option<&str>) -> (Catalog, Rc<ScriptedTransport>) {
        let scripted = Rc::new(ScriptedTransport::new());
        let store = Rc::new(token.map_or_else(MemoryCredentialStore::new, MemoryCredentialStore::with_token));
        let transport: Rc<dyn Transport> = scripted.clone();
        let catalog = Catalog::new(&ApiConfig::default(), &transport, &CredentialReader::new(store));
        (catalog, scripted)
    }

    fn band_draft() -> BandDraft {
        BandDraft {
            bandname: "Night Owls".into(),
            hometown: "Tulsa".into(),
            genre: "Indie".into(),
            yearstarted: Some(2019),
            membernames: vec!["Ana".into(), "Bo".into()],
            bandphoto: None,
            banddescription: None,
        }
    }

    #[tokio::test]
    async fn anonymous_reads_go_out_without_bearer() {
        let (catalog, transport) = catalog(None);
        transport.reply(200, &json!({"venues": [{"id": 3, "venuename": "Hall", "capacity": 300}]}));
        let venues = catalog.venues.list().await.expect("venues");
        assert_eq!(venues[0].venuename, "Hall");
        let sent = transport.requests();
        assert_eq!(sent[0].url, "http://127.0.0.1:5000/venues");
        assert!(sent[0].bearer.is_none());
    }

    #[tokio::test]
    async fn mutations_without_credential_send_nothing() {
        let (catalog, transport) = catalog(None);
        let create = catalog.bands.create(&band_draft()).await;
        let update = catalog.venues.update(1, &VenuePatch::default()).await;
        let delete = catalog.shows.delete(1).await;
        assert_eq!(create, Err(ApiError::NoCredential));
        assert_eq!(update, Err(ApiError::NoCredential));
        assert_eq!(delete, Err(ApiError::NoCredential));
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn create_attaches_bearer_and_body() {
        let (catalog, transport) = catalog(Some("tok"));
        transport.reply(
            201,
            &json!({"band": {"id": 9, "bandname": "Night Owls", "membernames": "Ana, Bo"}}),
        );
        let band = catalog.bands.create(&band_draft()).await.expect("created");
        assert_eq!(band.id, 9);
        assert_eq!(band.membernames, vec!["Ana", "Bo"]);
        let sent = &transport.requests()[0];
        assert_eq!(sent.method, Method::Post);
        assert_eq!(sent.url, "http://127.0.0.1:5000/bands");
        assert_eq!(sent.bearer.as_ref().map(Credential::bearer_header), Some("Bearer tok".into()));
        assert!(sent.body.as_deref().is_some_and(|body| body.contains("\"bandname\":\"Night Owls\"")));
    }

    #[tokio::test]
    async fn update_and_delete_target_the_record() {
        let (catalog, transport) = catalog(Some("tok"));
        transport.reply(200, &json!({"venue": {"id": 4, "venuename": "Loft", "capacity": 120}}));
        transport.reply(200, &json!({"message": "Venue deleted successfully"}));
        let patch = VenuePatch {
            capacity: Some(120),
            ..VenuePatch::default()
        };
        let venue = catalog.venues.update(4, &patch).await.expect("updated");
        assert_eq!(venue.capacity, Some(120));
        let message = catalog.venues.delete(4).await.expect("deleted");
        assert_eq!(message, "Venue deleted successfully");
        let sent = transport.requests();
        assert_eq!(sent[0].method, Method::Put);
        assert_eq!(sent[0].url, "http://127.0.0.1:5000/venues/4");
        assert_eq!(sent[0].body.as_deref(), Some(r#"{"capacity":120}"#));
        assert_eq!(sent[1].method, Method::Delete);
    }

    #[tokio::test]
    async fn rejected_bearer_is_distinguishable() {
        let (catalog, transport) = catalog(Some("stale"));
        transport.reply(401, &json!({"error": "Token expired"}));
        let err = catalog.shows.delete(2).await.expect_err("rejected");
        assert!(err.is_unauthorized());
    }

    #[tokio::test]
    async fn missing_record_is_a_validation_error() {
        let (catalog, transport) = catalog(None);
        transport.reply(404, &json!({"error": "Show not found"}));
        let err = catalog.shows.get(99).await.expect_err("missing");
        assert_eq!(
            err,
            ApiError::Validation {
                status: 404,
                message: "Show not found".into()
            }
        );
    }
}
