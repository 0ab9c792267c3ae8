mod contract_details;
mod contracts_list;
mod create_contract;
mod edit_contract;
mod home;
mod login;

pub use contract_details::ContractDetailsPage;
pub use contracts_list::ContractsListPage;
pub use create_contract::CreateContractPage;
pub use edit_contract::EditContractPage;
pub use home::HomePage;
pub use login::LoginPage;

use crate::api::ApiClient;
use crate::models::Witcher;
use crate::resource::Resource;
use leptos::prelude::*;
use leptos_router::hooks::use_params;
use leptos_router::params::Params;

#[derive(Params, PartialEq, Clone, Debug)]
pub struct ContractRouteParams {
    pub id: Option<String>,
}

pub(crate) fn parse_contract_id(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok().filter(|id| *id >= 0)
}

/// The `:id` route segment, `None` when missing or not a valid id.
pub(crate) fn use_contract_id() -> Memo<Option<i64>> {
    let params = use_params::<ContractRouteParams>();
    Memo::new(move |_| {
        params
            .get()
            .ok()
            .and_then(|p| p.id)
            .and_then(|raw| parse_contract_id(&raw))
    })
}

/// Enrichment read of a contract's assignee. Failures stay in `witcher` and
/// never touch the contract itself.
pub(crate) fn load_assigned_witcher(api: ApiClient, witcher: Resource<Witcher>, witcher_id: i64) {
    witcher.load(move |token| async move { api.get_witcher(witcher_id, &token).await });
}

/// Centered page column below the top bar.
#[component]
pub(crate) fn PageShell(children: Children) -> impl IntoView {
    view! {
        <main class="mx-auto w-full max-w-5xl px-4 py-8">
            {children()}
        </main>
    }
}

#[component]
pub(crate) fn BackLink(#[prop(into)] href: String) -> impl IntoView {
    view! {
        <a href=href class="mb-4 inline-block text-xs text-muted-foreground hover:text-foreground">
            "← Back"
        </a>
    }
}
