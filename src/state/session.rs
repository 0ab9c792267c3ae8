use crate::storage::{clear_session_storage, load_session_from_storage, save_session_to_storage};
use leptos::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The locally remembered identity. Not a credential: the backend never sees
/// it except as the witcher id sent when assigning a contract.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct SessionWitcher {
    pub id: i64,
    pub name: String,
    /// Empty when the witcher has no avatar.
    pub avatar: String,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub(crate) enum SessionError {
    #[error("witcher id {0} is not a number")]
    InvalidId(String),
}

fn integral(n: &serde_json::Number) -> Option<i64> {
    n.as_i64().or_else(|| {
        let f = n.as_f64()?;
        (f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64).then_some(f as i64)
    })
}

fn coerce_string(v: Option<&Value>) -> String {
    match v {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

impl SessionWitcher {
    /// Decodes a persisted record.
    ///
    /// Requires a numeric `id` and a string `name`; a missing or non-string
    /// `avatar` becomes empty. Anything else is `None`.
    pub fn from_persisted(raw: &str) -> Option<Self> {
        let v: Value = serde_json::from_str(raw).ok()?;
        let obj = v.as_object()?;

        let id = match obj.get("id")? {
            Value::Number(n) => integral(n)?,
            _ => return None,
        };
        let name = obj.get("name")?.as_str()?.to_string();
        let avatar = obj
            .get("avatar")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        Some(Self { id, name, avatar })
    }

    /// Coerces a loosely shaped login candidate into a session record.
    pub fn normalize(candidate: &Value) -> Result<Self, SessionError> {
        let raw_id = candidate.get("id");
        let id = match raw_id {
            Some(Value::Number(n)) => integral(n),
            Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
            _ => None,
        }
        .ok_or_else(|| SessionError::InvalidId(coerce_string(raw_id)))?;

        Ok(Self {
            id,
            name: coerce_string(candidate.get("name")),
            avatar: coerce_string(candidate.get("avatar")),
        })
    }

    pub fn avatar_url(&self) -> Option<&str> {
        Some(self.avatar.as_str()).filter(|a| !a.trim().is_empty())
    }
}

/// Read/login/logout capability over the current identity.
///
/// One instance per app, provided by [`SessionProvider`]. Every change is
/// mirrored to `sessionStorage` so a reload in the same tab keeps it.
#[derive(Clone, Copy)]
pub(crate) struct SessionStore {
    witcher: RwSignal<Option<SessionWitcher>>,
}

impl SessionStore {
    pub fn hydrate() -> Self {
        let stored = load_session_from_storage();
        if let Some(w) = &stored {
            log::info!("restored session for witcher #{} ({})", w.id, w.name);
        }
        Self {
            witcher: RwSignal::new(stored),
        }
    }

    pub fn current(&self) -> Option<SessionWitcher> {
        self.witcher.get()
    }

    pub fn current_untracked(&self) -> Option<SessionWitcher> {
        self.witcher.get_untracked()
    }

    pub fn login(&self, candidate: &Value) -> Result<SessionWitcher, SessionError> {
        let normalized = SessionWitcher::normalize(candidate)?;
        save_session_to_storage(&normalized);
        log::info!("signed in as witcher #{} ({})", normalized.id, normalized.name);
        self.witcher.set(Some(normalized.clone()));
        Ok(normalized)
    }

    pub fn logout(&self) {
        clear_session_storage();
        log::info!("signed out");
        self.witcher.set(None);
    }
}

/// Hydrates the session from storage and makes it available to `children`.
#[component]
pub fn SessionProvider(children: Children) -> impl IntoView {
    provide_context(SessionStore::hydrate());
    children()
}

/// The session capability. Panics when called outside [`SessionProvider`]:
/// that is a wiring bug, not a runtime condition.
pub(crate) fn use_session() -> SessionStore {
    use_context::<SessionStore>()
        .unwrap_or_else(|| panic!("use_session must be used within <SessionProvider>"))
}
