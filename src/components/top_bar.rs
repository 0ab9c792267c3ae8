use crate::components::ui::{Button, ButtonSize, ButtonVariant};
use crate::components::WitcherChip;
use crate::state::use_session;
use leptos::prelude::*;
use leptos_router::hooks::{use_location, use_navigate};

/// Global header: brand plus the current session with sign-in/sign-out.
#[component]
pub fn TopBar() -> impl IntoView {
    let session = use_session();
    let pathname = use_location().pathname;
    let navigate = StoredValue::new(use_navigate());

    let on_logout = move |_: web_sys::MouseEvent| {
        session.logout();

        // Staying on the sign-in page right after signing out is confusing.
        if pathname.get_untracked() == "/login" {
            navigate.with_value(|nav| nav("/contracts", Default::default()));
        }
    };

    view! {
        <header class="border-b bg-background">
            <div class="mx-auto flex h-14 w-full max-w-5xl items-center justify-between px-4">
                <a href="/contracts" class="text-sm font-semibold text-foreground">"Witcher Board"</a>

                <div class="flex items-center gap-3 text-xs">
                    {move || match session.current() {
                        Some(w) => view! {
                            <span class="text-muted-foreground">"Signed in: "</span>
                            <WitcherChip name=w.name.clone() avatar=w.avatar.clone() />
                            <Button variant=ButtonVariant::Ghost size=ButtonSize::Sm on:click=on_logout>
                                "Sign out"
                            </Button>
                        }
                        .into_any(),
                        None => view! {
                            <span class="text-muted-foreground">"Not signed in"</span>
                            <a class="text-primary underline underline-offset-4" href="/login">"Sign in"</a>
                        }
                        .into_any(),
                    }}
                </div>
            </div>
        </header>
    }
}
