use crate::components::account::{LoginPage, SignupPage};
use crate::components::collection::CollectionPage;
use crate::components::dashboard::DashboardPage;
use crate::components::shell::AppShell;
use crate::core::store::{AppStore, apply_session_state, request_redirect, take_redirect};
use crate::services::http::GlooTransport;
use crate::services::storage::LocalStorageCredentialStore;
use config::api_config;
use marquee_api_models::{Bands, Shows, Venues};
use marquee_session::{Navigator, PublicRoute, SessionContext};
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::prelude::{Dispatch, use_selector};

pub(crate) use routes::Route;

mod config;
mod routes;

/// Queues session-requested redirects in the store for [`RedirectWatcher`].
struct StoreNavigator;

impl Navigator for StoreNavigator {
    fn navigate(&self, route: PublicRoute) {
        Dispatch::<AppStore>::new().reduce_mut(|store| request_redirect(store, route));
    }
}

fn build_session() -> SessionContext {
    SessionContext::builder(
        api_config(),
        Rc::new(GlooTransport),
        Rc::new(LocalStorageCredentialStore),
    )
    .navigator(Rc::new(StoreNavigator))
    .build()
}

#[function_component(MarqueeApp)]
pub fn marquee_app() -> Html {
    let session = use_memo(|_| build_session(), ());

    {
        let session = (*session).clone();
        use_effect_with_deps(
            move |_| {
                let dispatch = Dispatch::<AppStore>::new();
                let subscription = session.subscribe(move |state| {
                    let state = state.clone();
                    dispatch.reduce_mut(|store| apply_session_state(store, state));
                });
                let starter = session.clone();
                spawn_local(async move { starter.start().await });
                move || {
                    drop(subscription);
                    session.stop();
                }
            },
            (),
        );
    }

    html! {
        <ContextProvider<SessionContext> context={(*session).clone()}>
            <BrowserRouter>
                <RedirectWatcher />
                <AppShell>
                    <Switch<Route> render={switch} />
                </AppShell>
            </BrowserRouter>
        </ContextProvider<SessionContext>>
    }
}

fn switch(route: Route) -> Html {
    match route {
        Route::Home | Route::Shows => html! { <CollectionPage<Shows> /> },
        Route::Bands => html! { <CollectionPage<Bands> /> },
        Route::Venues => html! { <CollectionPage<Venues> /> },
        Route::Login => html! { <LoginPage /> },
        Route::Signup => html! { <SignupPage /> },
        Route::Dashboard => html! { <DashboardPage /> },
        Route::NotFound => html! { <p class="muted">{"Page not found."}</p> },
    }
}

/// Applies redirects queued by the session once the router is mounted.
#[function_component(RedirectWatcher)]
fn redirect_watcher() -> Html {
    let navigator = use_navigator();
    let redirect = use_selector(|store: &AppStore| store.session.redirect);
    use_effect_with_deps(
        move |redirect| {
            if let (Some(route), Some(navigator)) = (**redirect, navigator) {
                Dispatch::<AppStore>::new().reduce_mut(|store| {
                    take_redirect(store);
                });
                navigator.push(&Route::from(route));
            }
            || ()
        },
        redirect,
    );
    html! {}
}

/// Mount the console on `#root`, or on `<body>` when there is none.
pub fn run_app() {
    console_error_panic_hook::set_once();
    if let Some(root) = gloo::utils::document().get_element_by_id("root") {
        yew::Renderer::<MarqueeApp>::with_root(root).render();
    } else {
        yew::Renderer::<MarqueeApp>::new().render();
    }
}
