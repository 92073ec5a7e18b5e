//! Generic Shows/Bands/Venues handlers.
//!
//! Reads go straight to the collection. Mutations resolve the session first
//! so a missing capability is refused before anything is sent.

use marquee_session::{Action, CapabilitySet, GatedResource};

use super::authorize;
use crate::client::{AppContext, CliResult};
use crate::output::{TableRow, render_list, render_message, render_record};

async fn authorize_action<R: GatedResource>(ctx: &AppContext, action: Action) -> CliResult<()> {
    let required = CapabilitySet::required_for(R::RESOURCE, action);
    authorize(ctx, required).await.map(|_| ())
}

pub(crate) async fn handle_list<R>(ctx: &AppContext) -> CliResult<()>
where
    R: GatedResource,
    R::Record: TableRow,
{
    let records = ctx
        .session
        .resource::<R>()
        .list()
        .await
        .map_err(|err| ctx.fail(err))?;
    render_list(&records, ctx.output)
}

pub(crate) async fn handle_get<R>(ctx: &AppContext, id: i64) -> CliResult<()>
where
    R: GatedResource,
    R::Record: TableRow,
{
    let record = ctx
        .session
        .resource::<R>()
        .get(id)
        .await
        .map_err(|err| ctx.fail(err))?;
    render_record(&record, ctx.output)
}

pub(crate) async fn handle_create<R>(ctx: &AppContext, draft: &R::Draft) -> CliResult<()>
where
    R: GatedResource,
    R::Record: TableRow,
{
    authorize_action::<R>(ctx, Action::Create).await?;
    let record = ctx
        .session
        .resource::<R>()
        .create(draft)
        .await
        .map_err(|err| ctx.fail(err))?;
    tracing::info!(collection = R::COLLECTION, "record created");
    render_record(&record, ctx.output)
}

pub(crate) async fn handle_update<R>(ctx: &AppContext, id: i64, patch: &R::Patch) -> CliResult<()>
where
    R: GatedResource,
    R::Record: TableRow,
{
    authorize_action::<R>(ctx, Action::Update).await?;
    let record = ctx
        .session
        .resource::<R>()
        .update(id, patch)
        .await
        .map_err(|err| ctx.fail(err))?;
    tracing::info!(collection = R::COLLECTION, id, "record updated");
    render_record(&record, ctx.output)
}

pub(crate) async fn handle_delete<R: GatedResource>(ctx: &AppContext, id: i64) -> CliResult<()> {
    authorize_action::<R>(ctx, Action::Delete).await?;
    let message = ctx
        .session
        .resource::<R>()
        .delete(id)
        .await
        .map_err(|err| ctx.fail(err))?;
    tracing::info!(collection = R::COLLECTION, id, "record deleted");
    render_message(&message, ctx.output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::context_with;
    use httpmock::MockServer;
    use httpmock::prelude::*;
    use marquee_api_models::{Bands, Shows, VenueDraft, VenuePatch, Venues};
    use serde_json::json;
    use tempfile::TempDir;

    fn admin_me(server: &MockServer) {
        server.mock(|when, then| {
            when.method(GET).path("/auth/me");
            then.status(200)
                .json_body(json!({"id": 1, "username": "alex", "role": "admin"}));
        });
    }

    #[tokio::test]
    async fn listing_is_public() {
        let server = MockServer::start_async().await;
        let list = server.mock(|when, then| {
            when.method(GET).path("/bands");
            then.status(200).json_body(json!({"bands": [
                {"id": 1, "bandname": "Night Owls", "genre": "indie"}
            ]}));
        });
        let dir = TempDir::new().expect("tempdir");
        let ctx = context_with(&server, &dir, None);

        handle_list::<Bands>(&ctx).await.expect("list");
        list.assert();
    }

    #[tokio::test]
    async fn create_without_token_sends_nothing() {
        let server = MockServer::start_async().await;
        let create = server.mock(|when, then| {
            when.method(POST).path("/venues");
            then.status(201);
        });
        let dir = TempDir::new().expect("tempdir");
        let ctx = context_with(&server, &dir, None);
        let draft = VenueDraft {
            capacity: 120,
            venuename: "Loft".into(),
            location: "Downtown".into(),
            venuemanager: "Kim".into(),
        };

        let err = handle_create::<Venues>(&ctx, &draft).await.expect_err("not signed in");
        assert_eq!(err.exit_code(), 2);
        create.assert_hits(0);
    }

    #[tokio::test]
    async fn admin_update_sends_only_changed_fields() {
        let server = MockServer::start_async().await;
        admin_me(&server);
        let update = server.mock(|when, then| {
            when.method(PUT)
                .path("/venues/4")
                .header("authorization", "Bearer tok")
                .json_body(json!({"capacity": 300}));
            then.status(200).json_body(json!({"venue": {"id": 4, "venuename": "Loft", "capacity": 300}}));
        });
        let dir = TempDir::new().expect("tempdir");
        let ctx = context_with(&server, &dir, Some("tok"));
        let patch = VenuePatch {
            capacity: Some(300),
            ..VenuePatch::default()
        };

        handle_update::<Venues>(&ctx, 4, &patch).await.expect("update");
        update.assert();
    }

    #[tokio::test]
    async fn rejected_delete_clears_the_token() {
        let server = MockServer::start_async().await;
        admin_me(&server);
        server.mock(|when, then| {
            when.method(DELETE).path("/shows/9");
            then.status(401).json_body(json!({"error": "Token expired"}));
        });
        let dir = TempDir::new().expect("tempdir");
        let ctx = context_with(&server, &dir, Some("tok"));

        let err = handle_delete::<Shows>(&ctx, 9).await.expect_err("rejected");
        assert_eq!(err.exit_code(), 4);
        assert!(!dir.path().join("token").exists());
    }

    #[tokio::test]
    async fn validation_failures_keep_the_token() {
        let server = MockServer::start_async().await;
        admin_me(&server);
        server.mock(|when, then| {
            when.method(DELETE).path("/shows/9");
            then.status(404).json_body(json!({"error": "Show not found"}));
        });
        let dir = TempDir::new().expect("tempdir");
        let ctx = context_with(&server, &dir, Some("tok"));

        let err = handle_delete::<Shows>(&ctx, 9).await.expect_err("missing");
        assert_eq!(err.display_message(), "Show not found");
        assert!(dir.path().join("token").exists());
    }

    #[tokio::test]
    async fn member_cannot_delete() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/auth/me");
            then.status(200)
                .json_body(json!({"id": 3, "username": "sam", "role": "user"}));
        });
        let delete = server.mock(|when, then| {
            when.method(DELETE).path("/bands/1");
            then.status(200).json_body(json!({"message": "Band deleted"}));
        });
        let dir = TempDir::new().expect("tempdir");
        let ctx = context_with(&server, &dir, Some("tok"));

        let err = handle_delete::<Bands>(&ctx, 1).await.expect_err("denied");
        assert_eq!(err.exit_code(), 5);
        delete.assert_hits(0);
    }
}
