use super::PageShell;
use crate::components::ui::{
    link_button_class, Card, CardDescription, CardHeader, CardTitle, ErrorAlert, Input, Label,
    LoadingLine, NativeSelect,
};
use crate::components::{StatusBadge, WitcherChip};
use crate::models::{Contract, ContractFilters, ContractStatus, Witcher};
use crate::resource::Resource;
use crate::state::AppContext;
use leptos::prelude::*;
use std::collections::HashMap;
use std::str::FromStr;
use strum::IntoEnumIterator;

/// `""` means "any status".
pub(crate) fn parse_status_filter(raw: &str) -> Option<ContractStatus> {
    ContractStatus::from_str(raw).ok()
}

pub(crate) fn status_filter_options() -> Vec<(String, String)> {
    std::iter::once((String::new(), "All".to_string()))
        .chain(ContractStatus::iter().map(|s| (s.to_string(), s.to_string())))
        .collect()
}

pub(crate) fn witcher_lookup(witchers: &[Witcher]) -> HashMap<i64, Witcher> {
    witchers.iter().map(|w| (w.id, w.clone())).collect()
}

#[derive(Clone, Copy)]
pub(crate) struct ContractsListModel {
    pub title_filter: RwSignal<String>,
    pub status_filter: RwSignal<Option<ContractStatus>>,
    pub contracts: Resource<Vec<Contract>>,
    /// Empty until (and unless) the roster read succeeds.
    pub witchers_by_id: Memo<HashMap<i64, Witcher>>,
}

pub(crate) fn use_contracts_list() -> ContractsListModel {
    let api = StoredValue::new(expect_context::<AppContext>().0.api_client);

    let title_filter: RwSignal<String> = RwSignal::new(String::new());
    let status_filter: RwSignal<Option<ContractStatus>> = RwSignal::new(None);
    let contracts: Resource<Vec<Contract>> = Resource::loading();
    let roster: Resource<Vec<Witcher>> = Resource::new();

    // Normalised so that e.g. a trailing space does not trigger a new read.
    let filters = Memo::new(move |_| ContractFilters {
        title: title_filter.get().trim().to_string(),
        status: status_filter.get(),
    });

    Effect::new(move |_| {
        let filters = filters.get();
        let api = api.get_value();
        contracts.load(move |token| async move { api.list_contracts(&filters, &token).await });
    });

    // Enrichment only: the list renders fine without it.
    roster.load(move |token| {
        let api = api.get_value();
        async move {
            let result = api.list_witchers(&token).await;
            if let Err(e) = &result {
                log::warn!("witcher roster unavailable: {e}");
            }
            result.map(Option::unwrap_or_default)
        }
    });

    let witchers_by_id = Memo::new(move |_| {
        roster.with(|s| s.value().map(|ws| witcher_lookup(ws)).unwrap_or_default())
    });

    ContractsListModel {
        title_filter,
        status_filter,
        contracts,
        witchers_by_id,
    }
}

#[component]
pub fn ContractsListPage() -> impl IntoView {
    let model = use_contracts_list();
    view! { <ContractsListView model=model /> }
}

#[component]
fn ContractCard(contract: Contract, assigned: Option<Witcher>) -> impl IntoView {
    let href = format!("/contracts/{}", contract.id);

    view! {
        <a href=href class="block">
            <Card class="h-full gap-3 py-4 transition-colors hover:bg-surface-hover hover:ring-1 hover:ring-border">
                <CardHeader class="w-full px-4">
                    <div class="flex w-full items-start justify-between gap-2">
                        <CardTitle class="text-sm">{contract.title}</CardTitle>
                        <StatusBadge status=contract.status />
                    </div>
                    <CardDescription class="line-clamp-3 text-xs">{contract.description}</CardDescription>
                </CardHeader>
                {assigned.map(|w| view! {
                    <div class="px-4 text-xs text-muted-foreground">
                        "Assigned to: "
                        <WitcherChip name=w.name.clone() avatar=w.avatar_url().map(str::to_string) />
                    </div>
                })}
            </Card>
        </a>
    }
}

#[component]
pub(crate) fn ContractsListView(model: ContractsListModel) -> impl IntoView {
    let ContractsListModel {
        title_filter,
        status_filter,
        contracts,
        witchers_by_id,
    } = model;

    let status_value =
        Signal::derive(move || status_filter.get().map(|s| s.to_string()).unwrap_or_default());

    view! {
        <PageShell>
            <div class="mb-6 flex items-center justify-between">
                <h1 class="text-2xl font-semibold">"Contracts"</h1>
                <a href="/contracts/new" class=link_button_class(true)>"+ Create contract"</a>
            </div>

            <div class="mb-6 grid gap-3 sm:grid-cols-2">
                <div class="flex flex-col gap-1.5">
                    <Label html_for="filter-title" class="text-xs">"Title"</Label>
                    <Input id="filter-title" placeholder="e.g. Griffin..." bind_value=title_filter />
                </div>
                <div class="flex flex-col gap-1.5">
                    <Label html_for="filter-status" class="text-xs">"Status"</Label>
                    <NativeSelect
                        id="filter-status"
                        options=Signal::derive(status_filter_options)
                        value=status_value
                        on_change=move |raw: String| status_filter.set(parse_status_filter(&raw))
                    />
                </div>
            </div>

            <Show when=move || contracts.is_loading() fallback=|| ()>
                <LoadingLine />
            </Show>
            <ErrorAlert message=Signal::derive(move || contracts.error()) />

            <div class="mt-4 grid gap-3 sm:grid-cols-2 lg:grid-cols-3">
                {move || {
                    let lookup = witchers_by_id.get();
                    contracts
                        .value()
                        .unwrap_or_default()
                        .into_iter()
                        .map(|c| {
                            let assigned = c.assigned_to.and_then(|id| lookup.get(&id).cloned());
                            view! { <ContractCard contract=c assigned=assigned /> }
                        })
                        .collect_view()
                }}
            </div>
        </PageShell>
    }
}
