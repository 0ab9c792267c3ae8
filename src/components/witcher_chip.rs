use leptos::prelude::*;
use tw_merge::tw_merge;

/// Avatar (when there is one) followed by the witcher's name.
#[component]
pub fn WitcherChip(
    #[prop(into)] name: String,
    #[prop(into, default = None)] avatar: Option<String>,
    #[prop(optional)] large: bool,
    #[prop(into, optional)] class: String,
) -> impl IntoView {
    let img_class = if large { "size-16 rounded-full object-cover" } else { "size-6 rounded-full object-cover" };
    let merged_class = tw_merge!("inline-flex items-center gap-2", class);
    let avatar = avatar.filter(|a| !a.trim().is_empty());
    let alt = name.clone();

    view! {
        <span data-name="WitcherChip" class=merged_class>
            {avatar.map(|src| view! { <img class=img_class src=src alt=alt /> })}
            <span>{name}</span>
        </span>
    }
}
