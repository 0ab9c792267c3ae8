use super::create_contract::{ContractFormFields, ContractFormInputs};
use super::{load_assigned_witcher, use_contract_id, BackLink, PageShell};
use crate::components::ui::{
    Button, ButtonSize, Card, CardContent, CardHeader, CardTitle, ErrorAlert, LoadingLine, Spinner,
};
use crate::components::{StatusBadge, WitcherChip};
use crate::models::{Contract, ContractDraft, ContractUpdate, Witcher};
use crate::resource::Resource;
use crate::state::AppContext;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;

#[derive(Clone, Copy)]
pub(crate) struct EditContractModel {
    pub id: Memo<Option<i64>>,
    pub contract: Resource<Contract>,
    pub witcher: Resource<Witcher>,
    pub fields: ContractFormFields,
    pub submission: Resource<()>,
    pub can_submit: Memo<bool>,
    pub submit: Callback<()>,
}

pub(crate) fn use_edit_contract(
    id: Memo<Option<i64>>,
    on_saved: Callback<i64>,
) -> EditContractModel {
    let api = StoredValue::new(expect_context::<AppContext>().0.api_client);

    let contract: Resource<Contract> = Resource::loading();
    let witcher: Resource<Witcher> = Resource::new();
    let submission: Resource<()> = Resource::new();
    let fields = ContractFormFields::new();

    Effect::new(move |_| {
        submission.reset();
        witcher.reset();
        fields.seed(ContractDraft::default());

        let Some(id) = id.get() else {
            contract.fail("Invalid contract id");
            return;
        };

        let api = api.get_value();
        let token = contract.begin();
        spawn_local(async move {
            let result = api.get_contract(id, &token).await;
            let loaded = result.as_ref().ok().cloned();
            if !contract.commit(&token, result) {
                return;
            }
            if let Some(c) = loaded {
                fields.seed(ContractDraft::from_contract(&c));
                if let Some(witcher_id) = c.assigned_to {
                    load_assigned_witcher(api, witcher, witcher_id);
                }
            }
        });
    });

    let can_submit = Memo::new(move |_| {
        contract.with(|s| s.value().is_some())
            && fields.draft().is_complete()
            && !submission.is_loading()
    });

    let submit = Callback::new(move |_: ()| {
        if !can_submit.get_untracked() {
            return;
        }
        let Some(id) = id.get_untracked() else {
            return;
        };
        let Some(loaded) = contract.value_untracked() else {
            return;
        };

        // Status and assignee are not editable here; they are sent back as loaded.
        let body = ContractUpdate::from_loaded(&loaded, &fields.draft_untracked());
        let api = api.get_value();
        let token = submission.begin();
        spawn_local(async move {
            let result = api.update_contract(id, &body).await;
            if submission.commit(&token, result) {
                log::info!("updated contract {id}");
                on_saved.run(id);
            }
        });
    });

    EditContractModel {
        id,
        contract,
        witcher,
        fields,
        submission,
        can_submit,
        submit,
    }
}

#[component]
pub fn EditContractPage() -> impl IntoView {
    let navigate = StoredValue::new(use_navigate());
    let id = use_contract_id();
    let model = use_edit_contract(
        id,
        Callback::new(move |saved_id: i64| {
            let path = format!("/contracts/{saved_id}");
            navigate.with_value(|nav| nav(&path, Default::default()));
        }),
    );

    view! { <EditContractView model=model /> }
}

#[component]
pub(crate) fn EditContractView(model: EditContractModel) -> impl IntoView {
    let EditContractModel {
        id,
        contract,
        witcher,
        fields,
        submission,
        can_submit,
        submit,
    } = model;

    let back_href = move || match id.get() {
        Some(id) => format!("/contracts/{id}"),
        None => "/contracts".to_string(),
    };

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        submit.run(());
    };

    let assignee = move || {
        let Some(c) = contract.value() else {
            return view! { <span>"—"</span> }.into_any();
        };
        let Some(assigned_id) = c.assigned_to else {
            return view! { <span>"—"</span> }.into_any();
        };
        match witcher.value() {
            Some(w) => view! {
                <WitcherChip name=w.name.clone() avatar=w.avatar_url().map(str::to_string) />
            }
            .into_any(),
            None => view! { <span>{format!("#{assigned_id}")}</span> }.into_any(),
        }
    };

    view! {
        <PageShell>
            {move || view! { <BackLink href=back_href() /> }}

            <Card class="mx-auto max-w-xl">
                <CardHeader>
                    <CardTitle class="text-lg">"Edit contract"</CardTitle>
                </CardHeader>
                <CardContent class="flex flex-col gap-3">
                    <Show when=move || contract.is_loading() fallback=|| ()>
                        <LoadingLine />
                    </Show>
                    <ErrorAlert message=Signal::derive(move || contract.error()) />

                    <Show when=move || contract.with(|s| s.value().is_some()) fallback=|| ()>
                        <div class="flex flex-wrap items-center gap-3 text-xs text-muted-foreground">
                            <span class="inline-flex items-center gap-1">
                                "Status: "
                                {move || contract.value().map(|c| view! { <StatusBadge status=c.status /> })}
                            </span>
                            <span class="inline-flex items-center gap-1">"Assigned to: " {assignee}</span>
                        </div>

                        <form class="flex flex-col gap-3" on:submit=on_submit>
                            <ContractFormInputs fields=fields />

                            <ErrorAlert message=Signal::derive(move || submission.error()) />

                            <Button class="w-full" size=ButtonSize::Sm attr:disabled=move || !can_submit.get()>
                                <span class="inline-flex items-center gap-2">
                                    <Show when=move || submission.is_loading() fallback=|| ()>
                                        <Spinner />
                                    </Show>
                                    {move || if submission.is_loading() { "Saving..." } else { "Save" }}
                                </span>
                            </Button>
                        </form>
                    </Show>
                </CardContent>
            </Card>
        </PageShell>
    }
}
