use super::{BackLink, PageShell};
use crate::components::ui::{
    Button, ButtonSize, Card, CardContent, CardHeader, CardTitle, ErrorAlert, Input, Label,
    Spinner, Textarea,
};
use crate::models::ContractDraft;
use crate::resource::Resource;
use crate::state::AppContext;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;

#[derive(Clone, Copy)]
pub(crate) struct ContractFormFields {
    pub title: RwSignal<String>,
    pub description: RwSignal<String>,
    pub reward: RwSignal<String>,
}

impl ContractFormFields {
    pub fn new() -> Self {
        Self {
            title: RwSignal::new(String::new()),
            description: RwSignal::new(String::new()),
            reward: RwSignal::new(String::new()),
        }
    }

    pub fn draft(&self) -> ContractDraft {
        ContractDraft {
            title: self.title.get(),
            description: self.description.get(),
            reward: self.reward.get(),
        }
    }

    pub fn draft_untracked(&self) -> ContractDraft {
        ContractDraft {
            title: self.title.get_untracked(),
            description: self.description.get_untracked(),
            reward: self.reward.get_untracked(),
        }
    }

    pub fn seed(&self, draft: ContractDraft) {
        self.title.set(draft.title);
        self.description.set(draft.description);
        self.reward.set(draft.reward);
    }
}

#[derive(Clone, Copy)]
pub(crate) struct CreateContractModel {
    pub fields: ContractFormFields,
    pub submission: Resource<()>,
    pub can_submit: Memo<bool>,
    pub submit: Callback<()>,
}

pub(crate) fn use_create_contract(on_created: Callback<()>) -> CreateContractModel {
    let api = StoredValue::new(expect_context::<AppContext>().0.api_client);
    let fields = ContractFormFields::new();
    let submission: Resource<()> = Resource::new();

    let can_submit = Memo::new(move |_| fields.draft().is_complete() && !submission.is_loading());

    let submit = Callback::new(move |_: ()| {
        if !can_submit.get_untracked() {
            return;
        }

        let body = fields.draft_untracked().into_new_contract();
        let api = api.get_value();
        let token = submission.begin();
        spawn_local(async move {
            let result = api.create_contract(&body).await;
            if submission.commit(&token, result) {
                log::info!("created contract {:?}", body.title);
                on_created.run(());
            }
        });
    });

    CreateContractModel {
        fields,
        submission,
        can_submit,
        submit,
    }
}

#[component]
pub fn CreateContractPage() -> impl IntoView {
    let navigate = StoredValue::new(use_navigate());
    let model = use_create_contract(Callback::new(move |_| {
        navigate.with_value(|nav| nav("/contracts", Default::default()));
    }));

    view! { <CreateContractView model=model /> }
}

/// Title / description / reward inputs shared by the create and edit forms.
#[component]
pub(crate) fn ContractFormInputs(fields: ContractFormFields) -> impl IntoView {
    view! {
        <div class="flex flex-col gap-1.5">
            <Label html_for="title" class="text-xs">"Title"</Label>
            <Input id="title" placeholder="Griffin in Velen" bind_value=fields.title required=true />
        </div>

        <div class="flex flex-col gap-1.5">
            <Label html_for="description" class="text-xs">"Description"</Label>
            <Textarea id="description" placeholder="What needs doing?" bind_value=fields.description />
        </div>

        <div class="flex flex-col gap-1.5">
            <Label html_for="reward" class="text-xs">"Reward"</Label>
            <Input id="reward" placeholder="500 crowns" bind_value=fields.reward required=true />
        </div>
    }
}

#[component]
pub(crate) fn CreateContractView(model: CreateContractModel) -> impl IntoView {
    let CreateContractModel {
        fields,
        submission,
        can_submit,
        submit,
    } = model;

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        submit.run(());
    };

    view! {
        <PageShell>
            <BackLink href="/contracts" />

            <Card class="mx-auto max-w-xl">
                <CardHeader>
                    <CardTitle class="text-lg">"Create contract"</CardTitle>
                </CardHeader>
                <CardContent>
                    <form class="flex flex-col gap-3" on:submit=on_submit>
                        <ContractFormInputs fields=fields />

                        <ErrorAlert message=Signal::derive(move || submission.error()) />

                        <Button class="w-full" size=ButtonSize::Sm attr:disabled=move || !can_submit.get()>
                            <span class="inline-flex items-center gap-2">
                                <Show when=move || submission.is_loading() fallback=|| ()>
                                    <Spinner />
                                </Show>
                                {move || if submission.is_loading() { "Creating..." } else { "Create" }}
                            </span>
                        </Button>
                    </form>
                </CardContent>
            </Card>
        </PageShell>
    }
}
