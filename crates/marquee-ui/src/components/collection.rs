use crate::components::gate::Gate;
use crate::components::{notify_success, surface_error};
use crate::core::view::{Listing, delete_prompt};
use marquee_session::{Action, CapabilitySet, SessionContext};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

enum Loadable<T> {
    Loading,
    Ready(T),
    Failed(String),
}

/// Table of one collection with gated delete buttons.
#[function_component(CollectionPage)]
pub(crate) fn collection_page<R>() -> Html
where
    R: Listing + 'static,
{
    let session = use_context::<SessionContext>();
    let rows = use_state(|| Loadable::<Vec<R::Record>>::Loading);
    let reload = use_state(|| 0_u32);

    {
        let rows = rows.clone();
        let session = session.clone();
        use_effect_with_deps(
            move |_| {
                if let Some(session) = session {
                    spawn_local(async move {
                        match session.resource::<R>().list().await {
                            Ok(records) => rows.set(Loadable::Ready(records)),
                            Err(err) => {
                                rows.set(Loadable::Failed(err.to_string()));
                                session.report(&err);
                            }
                        }
                    });
                }
                || ()
            },
            *reload,
        );
    }

    let delete_cap = CapabilitySet::required_for(R::RESOURCE, Action::Delete);
    let on_delete = {
        let reload = reload.clone();
        Callback::from(move |id: i64| {
            let Some(session) = session.clone() else {
                return;
            };
            if !gloo::dialogs::confirm(&delete_prompt::<R>(id)) {
                return;
            }
            let reload = reload.clone();
            spawn_local(async move {
                match session.resource::<R>().delete(id).await {
                    Ok(message) => {
                        notify_success(message);
                        reload.set(*reload + 1);
                    }
                    Err(err) => surface_error(&session, &err),
                }
            });
        })
    };

    let body = match &*rows {
        Loadable::Loading => html! { <p class="muted">{"Loading…"}</p> },
        Loadable::Failed(message) => html! { <p class="error-text">{message}</p> },
        Loadable::Ready(records) if records.is_empty() => {
            html! { <p class="muted">{format!("No {} yet.", R::COLLECTION)}</p> }
        }
        Loadable::Ready(records) => html! {
            <table class="table">
                <thead>
                    <tr>
                        { for R::COLUMNS.iter().map(|column| html! { <th>{*column}</th> }) }
                        <Gate require={delete_cap}><th /></Gate>
                    </tr>
                </thead>
                <tbody>
                    { for records.iter().map(|record| {
                        let id = R::id(record);
                        html! {
                            <tr key={id.to_string()}>
                                { for R::cells(record).into_iter().map(|cell| html! { <td>{cell}</td> }) }
                                <Gate require={delete_cap}>
                                    <td>
                                        <button class="ghost danger" onclick={on_delete.reform(move |_: MouseEvent| id)}>
                                            {"Delete"}
                                        </button>
                                    </td>
                                </Gate>
                            </tr>
                        }
                    }) }
                </tbody>
            </table>
        },
    };

    html! {
        <section class="collection">
            <h2>{R::TITLE}</h2>
            {body}
        </section>
    }
}
