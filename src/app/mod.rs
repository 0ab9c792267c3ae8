use crate::components::TopBar;
use crate::pages::{
    ContractDetailsPage, ContractsListPage, CreateContractPage, EditContractPage, HomePage,
    LoginPage,
};
use crate::state::{AppContext, AppState, SessionProvider};
use leptos::prelude::*;
use leptos_router::components::{Redirect, Route, Router, Routes};
use leptos_router::path;

#[component]
pub fn App() -> impl IntoView {
    provide_context(AppContext(AppState::new()));

    // Router hooks (used by TopBar too) need to live inside <Router>.
    view! {
        <SessionProvider>
            <Router>
                <div class="min-h-screen bg-background text-foreground">
                    <TopBar />
                    <Routes fallback=|| view! { <Redirect path="/" /> }>
                        <Route path=path!("login") view=LoginPage />
                        <Route path=path!("contracts") view=ContractsListPage />
                        <Route path=path!("contracts/new") view=CreateContractPage />
                        <Route path=path!("contracts/:id/edit") view=EditContractPage />
                        <Route path=path!("contracts/:id") view=ContractDetailsPage />
                        <Route path=path!("") view=HomePage />
                    </Routes>
                </div>
            </Router>
        </SessionProvider>
    }
}
