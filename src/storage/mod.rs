use crate::state::SessionWitcher;

/// `sessionStorage` key of the signed-in witcher. Tab-scoped on purpose: each
/// browser tab can act as a different witcher.
pub(crate) const SESSION_KEY: &str = "witcher";

fn session_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.session_storage().ok().flatten())
}

pub(crate) fn load_session_from_storage() -> Option<SessionWitcher> {
    let raw = session_storage()?.get_item(SESSION_KEY).ok().flatten()?;
    let parsed = SessionWitcher::from_persisted(&raw);
    if parsed.is_none() {
        log::warn!("ignoring malformed session record");
    }
    parsed
}

pub(crate) fn save_session_to_storage(witcher: &SessionWitcher) {
    if let Ok(json) = serde_json::to_string(witcher) {
        if let Some(storage) = session_storage() {
            let _ = storage.set_item(SESSION_KEY, &json);
        }
    }
}

pub(crate) fn clear_session_storage() {
    if let Some(storage) = session_storage() {
        let _ = storage.remove_item(SESSION_KEY);
    }
}
