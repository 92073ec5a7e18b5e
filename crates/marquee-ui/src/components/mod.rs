pub(crate) mod account;
pub(crate) mod collection;
pub(crate) mod dashboard;
pub(crate) mod gate;
pub(crate) mod shell;

use crate::core::store::{AppStore, NoticeTone, set_notice};
use marquee_session::{ApiError, SessionContext};
use yewdux::prelude::Dispatch;

/// Route a failed call: a rejected credential ends the session, anything
/// else becomes a banner.
pub(crate) fn surface_error(session: &SessionContext, err: &ApiError) {
    if !session.report(err) {
        let message = err.to_string();
        Dispatch::<AppStore>::new().reduce_mut(|store| set_notice(store, NoticeTone::Error, message));
    }
}

pub(crate) fn notify_success(message: String) {
    Dispatch::<AppStore>::new().reduce_mut(|store| set_notice(store, NoticeTone::Success, message));
}
