use crate::app::Route;
use crate::components::gate::Gate;
use crate::components::surface_error;
use crate::core::store::AppStore;
use crate::core::view::upcoming_lines;
use marquee_api_models::{Identity, Show, Shows};
use marquee_session::{CapabilitySet, SessionContext};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::prelude::use_selector;

#[function_component(DashboardPage)]
pub(crate) fn dashboard_page() -> Html {
    let identity = use_selector(|store: &AppStore| store.session.state.identity().cloned());
    let capabilities = use_selector(|store: &AppStore| store.session.state.capabilities());

    let fallback = html! {
        <p class="muted">
            {"Sign in to see your dashboard. "}
            <Link<Route> to={Route::Login}>{"Sign in"}</Link<Route>>
        </p>
    };

    let summary = (*identity).clone().map_or_else(
        || html! {},
        |identity| {
            html! {
                <div class="card">
                    <h3>{identity.username}</h3>
                    <p class="muted">{format!("Role: {}", identity.role)}</p>
                    <p class="muted">{format!("Can: {}", *capabilities)}</p>
                </div>
            }
        },
    );

    html! {
        <Gate require={CapabilitySet::VIEW_DASHBOARD} {fallback}>
            <section class="dashboard">
                <h2>{"Dashboard"}</h2>
                {summary}
                <Gate require={CapabilitySet::MANAGE_STAFF}>
                    <StaffDirectory />
                </Gate>
                <UpcomingShows />
            </section>
        </Gate>
    }
}

#[function_component(StaffDirectory)]
fn staff_directory() -> Html {
    let session = use_context::<SessionContext>();
    let accounts = use_state(|| None as Option<Vec<Identity>>);

    {
        let accounts = accounts.clone();
        use_effect_with_deps(
            move |_| {
                if let Some(session) = session {
                    spawn_local(async move {
                        match session.staff_directory().await {
                            Ok(list) => accounts.set(Some(list)),
                            Err(err) => surface_error(&session, &err),
                        }
                    });
                }
                || ()
            },
            (),
        );
    }

    let rows = (*accounts).clone().map_or_else(
        || html! { <p class="muted">{"Loading accounts…"}</p> },
        |list| {
            html! {
                <table class="table">
                    <thead><tr><th>{"ID"}</th><th>{"Username"}</th><th>{"Role"}</th></tr></thead>
                    <tbody>
                        { for list.into_iter().map(|account| html! {
                            <tr key={account.id.to_string()}>
                                <td>{account.id}</td>
                                <td>{account.username}</td>
                                <td>{account.role.to_string()}</td>
                            </tr>
                        }) }
                    </tbody>
                </table>
            }
        },
    );

    html! {
        <div class="card">
            <h3>{"Staff"}</h3>
            {rows}
        </div>
    }
}

#[function_component(UpcomingShows)]
fn upcoming_shows() -> Html {
    let session = use_context::<SessionContext>();
    let shows = use_state(|| None as Option<Vec<Show>>);

    {
        let shows = shows.clone();
        use_effect_with_deps(
            move |_| {
                if let Some(session) = session {
                    spawn_local(async move {
                        match session.resource::<Shows>().list().await {
                            Ok(list) => shows.set(Some(list)),
                            Err(err) => {
                                shows.set(Some(Vec::new()));
                                surface_error(&session, &err);
                            }
                        }
                    });
                }
                || ()
            },
            (),
        );
    }

    let body = match (*shows).clone() {
        None => html! { <p class="muted">{"Loading shows…"}</p> },
        Some(list) if list.is_empty() => html! { <p class="muted">{"No upcoming shows found."}</p> },
        Some(list) => html! {
            <ul class="show-list">
                { for upcoming_lines(list).into_iter().map(|(id, line)| html! {
                    <li key={id.to_string()}>{line}</li>
                }) }
            </ul>
        },
    };

    html! {
        <div class="card">
            <h3>{"Upcoming Shows"}</h3>
            {body}
        </div>
    }
}
