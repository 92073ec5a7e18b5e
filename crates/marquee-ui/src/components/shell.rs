use crate::app::Route;
use crate::components::gate::Gate;
use crate::core::store::{AppStore, NoticeTone, clear_notice, select_username};
use marquee_session::{CapabilitySet, SessionContext};
use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::prelude::{Dispatch, use_selector};

#[derive(Properties, PartialEq)]
pub(crate) struct ShellProps {
    pub children: Children,
}

#[function_component(AppShell)]
pub(crate) fn app_shell(props: &ShellProps) -> Html {
    let session = use_context::<SessionContext>();
    let username = use_selector(select_username);
    let loading = use_selector(|store: &AppStore| store.session.state.loading());
    let notice = use_selector(|store: &AppStore| store.notice.clone());
    let active = use_route::<Route>().unwrap_or(Route::Home);

    let on_logout = Callback::from(move |_: MouseEvent| {
        if let Some(session) = &session {
            session.logout();
        }
    });
    let on_dismiss = Callback::from(|_: MouseEvent| {
        Dispatch::<AppStore>::new().reduce_mut(|store| clear_notice(store));
    });

    let account = if *loading {
        html! { <span class="muted">{"Checking session…"}</span> }
    } else if let Some(name) = (*username).clone() {
        html! {
            <>
                <span class="user">{name}</span>
                <button class="ghost" onclick={on_logout}>{"Sign out"}</button>
            </>
        }
    } else {
        html! { <Link<Route> to={Route::Login}>{"Sign in"}</Link<Route>> }
    };

    let banner = (*notice).clone().map_or_else(
        || html! {},
        |notice| {
            let tone = match notice.tone {
                NoticeTone::Success => "notice success",
                NoticeTone::Error => "notice error",
            };
            html! {
                <div class={tone} role="status">
                    <span>{notice.message}</span>
                    <button class="ghost" onclick={on_dismiss} aria-label="Dismiss">{"✕"}</button>
                </div>
            }
        },
    );

    html! {
        <div class="app-shell">
            <header class="topbar">
                <strong class="brand">{"Marquee"}</strong>
                <nav>
                    {nav_item(Route::Shows, "Shows", active)}
                    {nav_item(Route::Bands, "Bands", active)}
                    {nav_item(Route::Venues, "Venues", active)}
                    <Gate require={CapabilitySet::VIEW_DASHBOARD}>
                        {nav_item(Route::Dashboard, "Dashboard", active)}
                    </Gate>
                </nav>
                <div class="account">{account}</div>
            </header>
            {banner}
            <main>{ for props.children.iter() }</main>
        </div>
    }
}

fn nav_item(route: Route, label: &str, active: Route) -> Html {
    let class = if route == active { "nav-item active" } else { "nav-item" };
    html! {
        <Link<Route> to={route} classes={classes!(class)}>{label}</Link<Route>>
    }
}
