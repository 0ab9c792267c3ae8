use super::PageShell;
use crate::components::ui::{link_button_class, Card, CardDescription, CardHeader, CardTitle};
use crate::state::use_session;
use leptos::prelude::*;

const INFO_CARDS: [(&str, &str); 3] = [
    ("Filter", "Search by title and status (Available, Assigned, Completed)."),
    ("Act", "Sign in to assign yourself an available contract and complete it."),
    ("Manage", "Create a new contract or edit an existing one."),
];

#[component]
pub fn HomePage() -> impl IntoView {
    let session = use_session();
    let signed_in_as = Signal::derive(move || session.current().map(|w| w.name));

    view! { <HomeView signed_in_as=signed_in_as /> }
}

#[component]
pub(crate) fn HomeView(#[prop(into)] signed_in_as: Signal<Option<String>>) -> impl IntoView {
    view! {
        <PageShell>
            <section class="flex flex-col gap-6 py-8">
                <div class="flex flex-col gap-2">
                    <p class="text-xs uppercase tracking-wide text-muted-foreground">"Contracts board"</p>
                    <h1 class="text-4xl font-bold">"Witcher Board"</h1>
                    <p class="text-sm text-muted-foreground">
                        "Browse contracts, assign one to yourself, then mark it as completed."
                    </p>
                </div>

                <div class="flex flex-wrap gap-3">
                    <a href="/contracts" class=link_button_class(true)>"View contracts"</a>
                    <a href="/login" class=link_button_class(false)>
                        {move || if signed_in_as.get().is_some() { "Switch witcher" } else { "Sign in" }}
                    </a>
                </div>

                <div class="grid gap-3 sm:grid-cols-3">
                    {INFO_CARDS
                        .into_iter()
                        .map(|(title, body)| view! {
                            <Card class="py-4">
                                <CardHeader class="px-4">
                                    <CardTitle class="text-sm">{title}</CardTitle>
                                    <CardDescription class="text-xs">{body}</CardDescription>
                                </CardHeader>
                            </Card>
                        })
                        .collect_view()}
                </div>

                <p class="text-sm">
                    {move || match signed_in_as.get() {
                        Some(name) => view! { "Signed in as " <strong>{name}</strong> "." }.into_any(),
                        None => view! {
                            "You are not signed in. Choose a witcher on the sign-in page."
                        }
                        .into_any(),
                    }}
                </p>
            </section>
        </PageShell>
    }
}
