use super::{BackLink, PageShell};
use crate::components::ui::{
    Button, ButtonSize, Card, CardContent, CardHeader, CardTitle, ErrorAlert, Label, LoadingLine,
    NativeSelect,
};
use crate::components::WitcherChip;
use crate::models::Witcher;
use crate::resource::Resource;
use crate::state::{use_session, AppContext, SessionStore};
use leptos::prelude::*;
use leptos_router::hooks::use_navigate;
use serde_json::json;

/// Pre-selection once the roster arrives.
pub(crate) fn first_selection(witchers: &[Witcher]) -> Option<i64> {
    witchers.first().map(|w| w.id)
}

pub(crate) fn find_selected(witchers: &[Witcher], selected_id: Option<i64>) -> Option<Witcher> {
    let id = selected_id?;
    witchers.iter().find(|w| w.id == id).cloned()
}

fn roster_options(witchers: &[Witcher]) -> Vec<(String, String)> {
    witchers
        .iter()
        .map(|w| (w.id.to_string(), w.name.clone()))
        .collect()
}

#[derive(Clone, Copy)]
pub(crate) struct LoginModel {
    pub session: SessionStore,
    pub roster: Resource<Vec<Witcher>>,
    pub selected_id: RwSignal<Option<i64>>,
    pub selected: Memo<Option<Witcher>>,
    pub login_error: RwSignal<Option<String>>,
    pub submit: Callback<()>,
}

pub(crate) fn use_login(on_logged_in: Callback<()>) -> LoginModel {
    let api = expect_context::<AppContext>().0.api_client;
    let session = use_session();

    let roster: Resource<Vec<Witcher>> = Resource::loading();
    let selected_id: RwSignal<Option<i64>> = RwSignal::new(None);
    let login_error: RwSignal<Option<String>> = RwSignal::new(None);

    roster.load(move |token| async move {
        let result = api
            .list_witchers(&token)
            .await
            .map(Option::unwrap_or_default);
        if let Some(first) = result.as_ref().ok().and_then(|ws| first_selection(ws)) {
            selected_id.try_set(Some(first));
        }
        result
    });

    let selected = Memo::new(move |_| {
        let id = selected_id.get();
        roster.with(|s| s.value().and_then(|ws| find_selected(ws, id)))
    });

    let submit = Callback::new(move |_: ()| {
        let Some(w) = selected.get_untracked() else {
            return;
        };
        let candidate = json!({ "id": w.id, "name": w.name, "avatar": w.avatar });
        match session.login(&candidate) {
            Ok(_) => {
                login_error.set(None);
                on_logged_in.run(());
            }
            Err(e) => {
                log::warn!("login rejected: {e}");
                login_error.set(Some(e.to_string()));
            }
        }
    });

    LoginModel {
        session,
        roster,
        selected_id,
        selected,
        login_error,
        submit,
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let navigate = StoredValue::new(use_navigate());
    let model = use_login(Callback::new(move |_| {
        navigate.with_value(|nav| nav("/contracts", Default::default()));
    }));

    view! { <LoginView model=model /> }
}

#[component]
pub(crate) fn LoginView(model: LoginModel) -> impl IntoView {
    let LoginModel {
        session,
        roster,
        selected_id,
        selected,
        login_error,
        submit,
    } = model;

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        submit.run(());
    };

    let options = Signal::derive(move || {
        roster.with(|s| s.value().map(|ws| roster_options(ws)).unwrap_or_default())
    });
    let value = Signal::derive(move || {
        selected_id.get().map(|id| id.to_string()).unwrap_or_default()
    });
    let form_visible = move || roster.with(|s| s.value().is_some());

    view! {
        <PageShell>
            <BackLink href="/contracts" />

            <Card class="mx-auto max-w-md">
                <CardHeader>
                    <CardTitle class="text-lg">"Witcher sign-in"</CardTitle>
                </CardHeader>
                <CardContent class="flex flex-col gap-4">
                    {move || session.current().map(|me| view! {
                        <p class="flex items-center gap-1 text-sm">
                            "Signed in as "
                            <WitcherChip name=me.name.clone() avatar=me.avatar_url().map(str::to_string) />
                        </p>
                    })}

                    <Show when=move || roster.is_loading() fallback=|| ()>
                        <LoadingLine />
                    </Show>
                    <ErrorAlert message=Signal::derive(move || roster.error()) />

                    <Show when=form_visible fallback=|| ()>
                        <form class="flex flex-col gap-3" on:submit=on_submit>
                            {move || selected.get().and_then(|w| {
                                let avatar = w.avatar_url()?.to_string();
                                Some(view! {
                                    <div class="flex flex-col items-center gap-2">
                                        <WitcherChip name=w.name.clone() avatar=avatar large=true />
                                    </div>
                                })
                            })}

                            <div class="flex flex-col gap-1.5">
                                <Label html_for="witcher" class="text-xs">"Witcher"</Label>
                                <NativeSelect
                                    id="witcher"
                                    options=options
                                    value=value
                                    on_change=move |raw: String| selected_id.set(raw.parse::<i64>().ok())
                                />
                            </div>

                            <ErrorAlert message=login_error />

                            <Button class="w-full" size=ButtonSize::Sm attr:disabled=move || selected.get().is_none()>
                                "Sign in"
                            </Button>
                        </form>
                    </Show>
                </CardContent>
            </Card>
        </PageShell>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Vec<Witcher> {
        vec![
            Witcher {
                id: 1,
                name: "Geralt".to_string(),
                avatar: Some("https://x/g.png".to_string()),
            },
            Witcher {
                id: 2,
                name: "Ciri".to_string(),
                avatar: None,
            },
        ]
    }

    #[test]
    fn test_first_selection() {
        assert_eq!(first_selection(&roster()), Some(1));
        assert_eq!(first_selection(&[]), None);
    }

    #[test]
    fn test_find_selected() {
        let ws = roster();
        assert_eq!(find_selected(&ws, Some(2)).map(|w| w.name), Some("Ciri".to_string()));
        assert!(find_selected(&ws, Some(9)).is_none());
        assert!(find_selected(&ws, None).is_none());
    }

    #[test]
    fn test_roster_options_use_id_as_value() {
        let opts = roster_options(&roster());
        assert_eq!(
            opts,
            vec![
                ("1".to_string(), "Geralt".to_string()),
                ("2".to_string(), "Ciri".to_string()),
            ]
        );
    }
}
