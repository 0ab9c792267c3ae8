use leptos::prelude::*;
use leptos_ui::clx;

mod components {
    use super::*;
    clx! {Alert, div, "relative w-full rounded-lg border px-4 py-3 text-sm"}
    clx! {AlertDescription, p, "text-sm [&_p]:leading-relaxed"}
}

pub use components::*;

/// Destructive alert for a page-local error, rendered only when present.
#[component]
pub fn ErrorAlert(#[prop(into)] message: Signal<Option<String>>) -> impl IntoView {
    move || {
        message.get().map(|e| {
            view! {
                <Alert class="border-destructive/30">
                    <AlertDescription class="text-destructive text-xs">
                        {format!("Error: {e}")}
                    </AlertDescription>
                </Alert>
            }
        })
    }
}
