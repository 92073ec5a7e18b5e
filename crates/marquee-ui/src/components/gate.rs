use crate::core::store::{AppStore, select_capabilities};
use marquee_session::CapabilitySet;
use yew::prelude::*;
use yewdux::prelude::use_selector;

#[derive(Properties, PartialEq)]
pub(crate) struct GateProps {
    pub require: CapabilitySet,
    #[prop_or_default]
    pub children: Children,
    #[prop_or_default]
    pub fallback: Html,
}

/// Renders its children only when the session holds `require`.
#[function_component(Gate)]
pub(crate) fn gate(props: &GateProps) -> Html {
    let capabilities = use_selector(|store: &AppStore| select_capabilities(store));
    if capabilities.allows(props.require) {
        html! { <>{ for props.children.iter() }</> }
    } else {
        props.fallback.clone()
    }
}
