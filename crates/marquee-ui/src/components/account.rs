use crate::app::Route;
use crate::components::notify_success;
use crate::core::forms::{sign_in_request, sign_up_request};
use marquee_session::{ApiError, SessionContext};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::prelude::*;

fn bind_input(handle: &UseStateHandle<String>) -> Callback<InputEvent> {
    let handle = handle.clone();
    Callback::from(move |e: InputEvent| {
        if let Some(input) = e.target_dyn_into::<web_sys::HtmlInputElement>() {
            handle.set(input.value());
        }
    })
}

fn error_line(error: &Option<String>) -> Html {
    error.as_ref().map_or_else(
        || html! {},
        |message| html! { <p class="error-text">{message}</p> },
    )
}

#[function_component(LoginPage)]
pub(crate) fn login_page() -> Html {
    let session = use_context::<SessionContext>();
    let navigator = use_navigator();
    let username = use_state(String::new);
    let password = use_state(String::new);
    let error = use_state(|| None as Option<String>);
    let busy = use_state(|| false);

    let onsubmit = {
        let username = username.clone();
        let password = password.clone();
        let error = error.clone();
        let busy = busy.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let Some(session) = session.clone() else {
                return;
            };
            let request = match sign_in_request(&username, &password) {
                Ok(request) => request,
                Err(message) => {
                    error.set(Some(message.to_string()));
                    return;
                }
            };
            error.set(None);
            busy.set(true);
            let error = error.clone();
            let busy = busy.clone();
            let navigator = navigator.clone();
            spawn_local(async move {
                match session.login(&request.username, &request.password).await {
                    Ok(identity) => {
                        notify_success(format!("Welcome back, {}.", identity.username));
                        if let Some(navigator) = navigator {
                            navigator.push(&Route::Dashboard);
                        }
                    }
                    Err(ApiError::Superseded) => {}
                    Err(err) => error.set(Some(err.to_string())),
                }
                busy.set(false);
            });
        })
    };

    html! {
        <form class="card auth-form" {onsubmit}>
            <h2>{"Sign in"}</h2>
            <label class="stack">
                <span>{"Username"}</span>
                <input type="text" autocomplete="username" value={(*username).clone()} oninput={bind_input(&username)} />
            </label>
            <label class="stack">
                <span>{"Password"}</span>
                <input type="password" autocomplete="current-password" value={(*password).clone()} oninput={bind_input(&password)} />
            </label>
            {error_line(&error)}
            <div class="actions">
                <Link<Route> to={Route::Signup} classes={classes!("ghost")}>{"Create an account"}</Link<Route>>
                <button class="solid" type="submit" disabled={*busy}>{"Sign in"}</button>
            </div>
        </form>
    }
}

#[function_component(SignupPage)]
pub(crate) fn signup_page() -> Html {
    let session = use_context::<SessionContext>();
    let navigator = use_navigator();
    let username = use_state(String::new);
    let password = use_state(String::new);
    let confirm = use_state(String::new);
    let role = use_state(String::new);
    let error = use_state(|| None as Option<String>);
    let busy = use_state(|| false);

    let on_role = {
        let role = role.clone();
        Callback::from(move |e: Event| {
            if let Some(select) = e.target_dyn_into::<web_sys::HtmlSelectElement>() {
                role.set(select.value());
            }
        })
    };

    let onsubmit = {
        let username = username.clone();
        let password = password.clone();
        let confirm = confirm.clone();
        let role = role.clone();
        let error = error.clone();
        let busy = busy.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let Some(session) = session.clone() else {
                return;
            };
            let request = match sign_up_request(&username, &password, &confirm, &role) {
                Ok(request) => request,
                Err(message) => {
                    error.set(Some(message.to_string()));
                    return;
                }
            };
            error.set(None);
            busy.set(true);
            let error = error.clone();
            let busy = busy.clone();
            let navigator = navigator.clone();
            spawn_local(async move {
                match session.signup(&request).await {
                    Ok(created) => {
                        notify_success(format!(
                            "Account {} created. Sign in to continue.",
                            created.user.username
                        ));
                        if let Some(navigator) = navigator {
                            navigator.push(&Route::Login);
                        }
                    }
                    Err(err) => error.set(Some(err.to_string())),
                }
                busy.set(false);
            });
        })
    };

    html! {
        <form class="card auth-form" {onsubmit}>
            <h2>{"Create an account"}</h2>
            <label class="stack">
                <span>{"Username"}</span>
                <input type="text" autocomplete="username" value={(*username).clone()} oninput={bind_input(&username)} />
            </label>
            <label class="stack">
                <span>{"Password"}</span>
                <input type="password" autocomplete="new-password" value={(*password).clone()} oninput={bind_input(&password)} />
            </label>
            <label class="stack">
                <span>{"Confirm password"}</span>
                <input type="password" autocomplete="new-password" value={(*confirm).clone()} oninput={bind_input(&confirm)} />
            </label>
            <label class="stack">
                <span>{"Role"}</span>
                <select onchange={on_role}>
                    <option value="" selected={role.is_empty()}>{"Default"}</option>
                    <option value="user">{"User"}</option>
                    <option value="staff">{"Staff"}</option>
                    <option value="admin">{"Admin"}</option>
                </select>
            </label>
            {error_line(&error)}
            <div class="actions">
                <Link<Route> to={Route::Login} classes={classes!("ghost")}>{"Back to sign in"}</Link<Route>>
                <button class="solid" type="submit" disabled={*busy}>{"Sign up"}</button>
            </div>
        </form>
    }
}
