use crate::models::ContractStatus;
use leptos::prelude::*;
use tw_merge::tw_merge;

pub(crate) fn status_class(status: ContractStatus) -> &'static str {
    match status {
        ContractStatus::Available => "bg-emerald-100 text-emerald-800 border-emerald-200",
        ContractStatus::Assigned => "bg-amber-100 text-amber-800 border-amber-200",
        ContractStatus::Completed => "bg-zinc-100 text-zinc-600 border-zinc-200",
    }
}

#[component]
pub fn StatusBadge(
    status: ContractStatus,
    #[prop(into, optional)] class: String,
) -> impl IntoView {
    let merged_class = tw_merge!(
        "inline-flex items-center rounded-full border px-2.5 py-0.5 text-xs font-medium",
        status_class(status),
        class
    );

    view! {
        <span data-name="StatusBadge" class=merged_class>
            {status.to_string()}
        </span>
    }
}
