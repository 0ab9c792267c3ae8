use icons::Loader;
use leptos::prelude::*;
use tw_merge::tw_merge;

#[component]
pub fn Spinner(#[prop(into, optional)] class: String) -> impl IntoView {
    let merged_class = tw_merge!("size-4 animate-spin", class);

    view! { <Loader class=merged_class attr:role="status" attr:aria-label="Loading" /> }
}

/// Inline "Loading..." row used while a page's primary read is in flight.
#[component]
pub fn LoadingLine(#[prop(into, optional)] label: Option<String>) -> impl IntoView {
    let label = label.unwrap_or_else(|| "Loading...".to_string());
    view! {
        <div class="flex items-center gap-2 text-xs text-muted-foreground">
            <Spinner />
            <span>{label}</span>
        </div>
    }
}
