//! Routing definitions for the Marquee console.
use marquee_session::PublicRoute;
use yew_router::prelude::*;

#[derive(Clone, Copy, Routable, PartialEq, Eq, Debug)]
pub(crate) enum Route {
    #[at("/")]
    Home,
    #[at("/login")]
    Login,
    #[at("/signup")]
    Signup,
    #[at("/shows")]
    Shows,
    #[at("/bands")]
    Bands,
    #[at("/venues")]
    Venues,
    #[at("/dashboard")]
    Dashboard,
    #[not_found]
    #[at("/404")]
    NotFound,
}

impl From<PublicRoute> for Route {
    fn from(route: PublicRoute) -> Self {
        match route {
            PublicRoute::Login => Self::Login,
            PublicRoute::Home => Self::Home,
        }
    }
}
