mod session;

pub(crate) use session::{use_session, SessionProvider, SessionStore, SessionWitcher};

use crate::api::ApiClient;

#[derive(Clone)]
pub(crate) struct AppState {
    pub api_client: ApiClient,
}

impl AppState {
    pub fn new() -> Self {
        let api_client = ApiClient::from_env();
        log::info!("API base URL: {}", api_client.base_url);
        Self { api_client }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
pub(crate) struct AppContext(pub AppState);
