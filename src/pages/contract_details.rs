use super::{use_contract_id, BackLink, PageShell};
use crate::api::{ApiClient, ApiResult};
use crate::components::ui::{
    link_button_class, Button, ButtonSize, Card, CardContent, CardHeader, CardTitle, ErrorAlert,
    LoadingLine, Spinner,
};
use crate::components::{StatusBadge, WitcherChip};
use crate::models::{Contract, ContractStatus, Witcher};
use crate::resource::{CancelToken, Resource};
use crate::state::{use_session, AppContext, SessionStore, SessionWitcher};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ContractAction {
    /// Take an available contract as the signed-in witcher.
    Assign,
    /// Finish a contract the signed-in witcher holds.
    Complete,
}

/// The one mutation the current session may perform on `contract`, if any.
pub(crate) fn available_action(
    contract: &Contract,
    session: Option<&SessionWitcher>,
) -> Option<ContractAction> {
    let me = session?;
    match contract.status {
        ContractStatus::Available => Some(ContractAction::Assign),
        ContractStatus::Assigned if contract.assigned_to == Some(me.id) => {
            Some(ContractAction::Complete)
        }
        _ => None,
    }
}

/// Backend calls the details page makes.
pub(crate) trait ContractDetailsApi {
    async fn get_contract(&self, id: i64, token: &CancelToken) -> ApiResult<Contract>;
    async fn get_witcher(&self, id: i64, token: &CancelToken) -> ApiResult<Witcher>;
    async fn assign_contract(&self, id: i64, witcher_id: i64) -> ApiResult<()>;
    async fn set_contract_status(&self, id: i64, status: ContractStatus) -> ApiResult<()>;
}

impl ContractDetailsApi for ApiClient {
    async fn get_contract(&self, id: i64, token: &CancelToken) -> ApiResult<Contract> {
        ApiClient::get_contract(self, id, token).await
    }

    async fn get_witcher(&self, id: i64, token: &CancelToken) -> ApiResult<Witcher> {
        ApiClient::get_witcher(self, id, token).await
    }

    async fn assign_contract(&self, id: i64, witcher_id: i64) -> ApiResult<()> {
        ApiClient::assign_contract(self, id, witcher_id).await
    }

    async fn set_contract_status(&self, id: i64, status: ContractStatus) -> ApiResult<()> {
        ApiClient::set_contract_status(self, id, status).await
    }
}

/// The three independent resources of the details page.
#[derive(Clone, Copy)]
pub(crate) struct DetailsState {
    pub contract: Resource<Contract>,
    pub witcher: Resource<Witcher>,
    pub action: Resource<()>,
}

impl DetailsState {
    pub fn new() -> Self {
        Self {
            contract: Resource::loading(),
            witcher: Resource::new(),
            action: Resource::new(),
        }
    }
}

/// Reads contract `id` under `token` (already begun on `state.contract`),
/// then its assignee. A witcher failure stays in `state.witcher`.
pub(crate) async fn refresh_contract<A: ContractDetailsApi>(
    api: &A,
    id: i64,
    token: CancelToken,
    state: DetailsState,
) {
    let result = api.get_contract(id, &token).await;
    let assigned_to = result.as_ref().ok().and_then(|c| c.assigned_to);
    if !state.contract.commit(&token, result) {
        return;
    }

    let Some(witcher_id) = assigned_to else {
        state.witcher.reset();
        return;
    };
    let same_witcher = state
        .witcher
        .with_untracked(|s| s.value().is_some_and(|w| w.id == witcher_id));
    let witcher_token = if same_witcher {
        state.witcher.begin_background()
    } else {
        state.witcher.begin()
    };
    let result = api.get_witcher(witcher_id, &witcher_token).await;
    state.witcher.commit(&witcher_token, result);
}

/// Performs `kind` for witcher `witcher_id`, then re-reads the contract.
///
/// `token` was begun on `state.action`; the action stays loading until the
/// re-read has landed so the page never offers the same write twice.
pub(crate) async fn run_contract_action<A: ContractDetailsApi>(
    api: &A,
    id: i64,
    witcher_id: i64,
    kind: ContractAction,
    token: CancelToken,
    state: DetailsState,
) {
    let written = match kind {
        ContractAction::Assign => api.assign_contract(id, witcher_id).await,
        ContractAction::Complete => api.set_contract_status(id, ContractStatus::Completed).await,
    };
    if let Err(e) = written {
        state.action.commit(&token, Err(e));
        return;
    }
    if token.is_cancelled() {
        return;
    }

    // The write response is not trusted for display; re-read instead.
    let read = state.contract.begin_background();
    refresh_contract(api, id, read, state).await;
    state.action.commit(&token, Ok(()));
}

#[derive(Clone, Copy)]
pub(crate) struct ContractDetailsModel {
    pub id: Memo<Option<i64>>,
    pub contract: Resource<Contract>,
    pub witcher: Resource<Witcher>,
    pub action: Resource<()>,
    pub session: SessionStore,
    pub run_action: Callback<ContractAction>,
}

pub(crate) fn use_contract_details(id: Memo<Option<i64>>) -> ContractDetailsModel {
    let api = StoredValue::new(expect_context::<AppContext>().0.api_client);
    let session = use_session();
    let state = DetailsState::new();
    let DetailsState {
        contract,
        witcher,
        action,
    } = state;

    Effect::new(move |_| {
        action.reset();
        witcher.reset();
        match id.get() {
            Some(id) => {
                let api = api.get_value();
                let token = contract.begin();
                spawn_local(async move { refresh_contract(&api, id, token, state).await });
            }
            None => contract.fail("Invalid contract id"),
        }
    });

    let run_action = Callback::new(move |kind: ContractAction| {
        let Some(id) = id.get_untracked() else {
            return;
        };
        let Some(current) = contract.value_untracked() else {
            return;
        };
        let Some(me) = session.current_untracked() else {
            return;
        };
        if available_action(&current, Some(&me)) != Some(kind) {
            return;
        }
        if action.with_untracked(|s| s.is_loading()) {
            return;
        }

        let api = api.get_value();
        let token = action.begin();
        spawn_local(async move { run_contract_action(&api, id, me.id, kind, token, state).await });
    });

    ContractDetailsModel {
        id,
        contract,
        witcher,
        action,
        session,
        run_action,
    }
}

#[component]
pub fn ContractDetailsPage() -> impl IntoView {
    let id = use_contract_id();
    let model = use_contract_details(id);

    view! { <ContractDetailsView model=model /> }
}

#[component]
fn AssignedTo(contract: Contract, witcher: Resource<Witcher>) -> impl IntoView {
    let Some(assigned_id) = contract.assigned_to else {
        return view! { <span>"—"</span> }.into_any();
    };

    (move || {
        witcher.with(|state| {
            if state.is_loading() {
                return view! { <span>{format!("#{assigned_id} (loading...)")}</span> }.into_any();
            }
            if let Some(w) = state.value() {
                return view! {
                    <WitcherChip name=w.name.clone() avatar=w.avatar_url().map(str::to_string) />
                }
                .into_any();
            }
            match state.error() {
                Some(e) => view! { <span>{format!("#{assigned_id} (error: {e})")}</span> }.into_any(),
                None => view! { <span>{format!("#{assigned_id}")}</span> }.into_any(),
            }
        })
    })
    .into_any()
}

#[component]
pub(crate) fn ContractDetailsView(model: ContractDetailsModel) -> impl IntoView {
    let ContractDetailsModel {
        id,
        contract,
        witcher,
        action,
        session,
        run_action,
    } = model;

    let busy = move || action.is_loading();

    view! {
        <PageShell>
            <BackLink href="/contracts" />

            <Show when=move || contract.is_loading() fallback=|| ()>
                <LoadingLine />
            </Show>
            <ErrorAlert message=Signal::derive(move || contract.error()) />

            {move || {
                contract.value().map(|c| {
                    let offered = available_action(&c, session.current().as_ref());
                    let edit_href = format!("/contracts/{}/edit", id.get().unwrap_or(c.id));
                    let assign_label = move || {
                        if busy() {
                            "Assigning...".to_string()
                        } else {
                            format!(
                                "Assign to {}",
                                session.current().map(|w| w.name).unwrap_or_default(),
                            )
                        }
                    };

                    // Children below become separate closures, so each one
                    // gets its own owned copy.
                    let title = c.title.clone();
                    let description = c.description.clone();
                    let reward = if c.reward.is_empty() { "—".to_string() } else { c.reward.clone() };
                    let status = c.status;

                    view! {
                        <Card>
                            <CardHeader class="w-full">
                                <div class="flex w-full items-start justify-between gap-3">
                                    <CardTitle class="text-xl">{title}</CardTitle>
                                    <StatusBadge status=status />
                                </div>
                            </CardHeader>

                            <CardContent class="flex flex-col gap-4">
                                <div class="flex flex-wrap items-center gap-2">
                                    <a href=edit_href class=link_button_class(false)>"Edit"</a>

                                    {(offered == Some(ContractAction::Assign)).then(|| view! {
                                        <Button
                                            size=ButtonSize::Default
                                            attr:disabled=busy
                                            on:click=move |_: web_sys::MouseEvent| run_action.run(ContractAction::Assign)
                                        >
                                            <Show when=busy fallback=|| ()><Spinner /></Show>
                                            {assign_label}
                                        </Button>
                                    })}

                                    {(offered == Some(ContractAction::Complete)).then(|| view! {
                                        <Button
                                            size=ButtonSize::Default
                                            attr:disabled=busy
                                            on:click=move |_: web_sys::MouseEvent| run_action.run(ContractAction::Complete)
                                        >
                                            <Show when=busy fallback=|| ()><Spinner /></Show>
                                            {move || if busy() { "Completing..." } else { "Complete" }}
                                        </Button>
                                    })}
                                </div>

                                <ErrorAlert message=Signal::derive(move || action.error()) />

                                <p class="text-sm whitespace-pre-line">{description}</p>

                                <p class="text-sm">
                                    <strong>"Reward: "</strong>
                                    {reward}
                                </p>

                                <p class="flex items-center gap-1 text-sm">
                                    <strong>"Assigned to: "</strong>
                                    <AssignedTo contract=c witcher=witcher />
                                </p>
                            </CardContent>
                        </Card>
                    }
                })
            }}
        </PageShell>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use futures::channel::oneshot;
    use futures::executor::block_on;
    use futures::future::join;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// In-memory backend that records every request it serves.
    #[derive(Default)]
    struct FakeBackend {
        contracts: RefCell<HashMap<i64, Contract>>,
        witchers: HashMap<i64, Witcher>,
        /// Reads of these ids wait until the sender side delivers a contract.
        held: RefCell<HashMap<i64, oneshot::Receiver<Contract>>>,
        /// When set, writes fail with this message as a 409.
        reject_writes: RefCell<Option<String>>,
        log: RefCell<Vec<String>>,
    }

    impl FakeBackend {
        fn with(contracts: Vec<Contract>) -> Self {
            let witchers = [(3, "Geralt"), (4, "Lambert")]
                .into_iter()
                .map(|(id, name)| {
                    (
                        id,
                        Witcher {
                            id,
                            name: name.to_string(),
                            avatar: None,
                        },
                    )
                })
                .collect();
            Self {
                contracts: RefCell::new(contracts.into_iter().map(|c| (c.id, c)).collect()),
                witchers,
                ..Default::default()
            }
        }

        fn hold(&self, id: i64) -> oneshot::Sender<Contract> {
            let (tx, rx) = oneshot::channel();
            self.held.borrow_mut().insert(id, rx);
            tx
        }

        fn requests(&self) -> Vec<String> {
            self.log.borrow().clone()
        }

        fn write_outcome(&self) -> ApiResult<()> {
            match self.reject_writes.borrow().clone() {
                Some(message) => Err(ApiError::http(409, message)),
                None => Ok(()),
            }
        }
    }

    impl ContractDetailsApi for FakeBackend {
        async fn get_contract(&self, id: i64, _token: &CancelToken) -> ApiResult<Contract> {
            self.log.borrow_mut().push(format!("GET /contracts/{id}"));
            let held = self.held.borrow_mut().remove(&id);
            if let Some(rx) = held {
                return rx.await.map_err(|_| ApiError::cancelled());
            }
            self.contracts
                .borrow()
                .get(&id)
                .cloned()
                .ok_or_else(|| ApiError::http(404, "Contract not found".to_string()))
        }

        async fn get_witcher(&self, id: i64, _token: &CancelToken) -> ApiResult<Witcher> {
            self.log.borrow_mut().push(format!("GET /witchers/{id}"));
            self.witchers
                .get(&id)
                .cloned()
                .ok_or_else(|| ApiError::http(404, "Witcher not found".to_string()))
        }

        async fn assign_contract(&self, id: i64, witcher_id: i64) -> ApiResult<()> {
            let body = serde_json::to_string(&witcher_id).unwrap();
            self.log
                .borrow_mut()
                .push(format!("PUT /contracts/{id}/assignedTo {body}"));
            self.write_outcome()?;
            if let Some(c) = self.contracts.borrow_mut().get_mut(&id) {
                c.status = ContractStatus::Assigned;
                c.assigned_to = Some(witcher_id);
            }
            Ok(())
        }

        async fn set_contract_status(&self, id: i64, status: ContractStatus) -> ApiResult<()> {
            let body = serde_json::to_string(&status).unwrap();
            self.log
                .borrow_mut()
                .push(format!("PUT /contracts/{id}/status {body}"));
            self.write_outcome()?;
            if let Some(c) = self.contracts.borrow_mut().get_mut(&id) {
                c.status = status;
            }
            Ok(())
        }
    }

    fn with_id(id: i64, status: ContractStatus, assigned_to: Option<i64>) -> Contract {
        Contract {
            id,
            ..contract(status, assigned_to)
        }
    }

    fn load(api: &FakeBackend, id: i64, state: DetailsState) {
        let token = state.contract.begin();
        block_on(refresh_contract(api, id, token, state));
    }

    fn is_busy(state: &DetailsState) -> bool {
        state.action.with_untracked(|s| s.is_loading())
    }

    fn contract(status: ContractStatus, assigned_to: Option<i64>) -> Contract {
        Contract {
            id: 7,
            title: "Griffin".to_string(),
            description: "Kill the griffin".to_string(),
            reward: "300".to_string(),
            status,
            assigned_to,
        }
    }

    fn me(id: i64) -> SessionWitcher {
        SessionWitcher {
            id,
            name: "Geralt".to_string(),
            avatar: String::new(),
        }
    }

    #[test]
    fn test_assign_offered_for_available_when_signed_in() {
        let c = contract(ContractStatus::Available, None);
        assert_eq!(available_action(&c, Some(&me(3))), Some(ContractAction::Assign));
        assert_eq!(available_action(&c, None), None);
    }

    #[test]
    fn test_complete_offered_only_to_assignee() {
        let c = contract(ContractStatus::Assigned, Some(3));
        assert_eq!(available_action(&c, Some(&me(3))), Some(ContractAction::Complete));
        assert_eq!(available_action(&c, Some(&me(4))), None);
        assert_eq!(available_action(&c, None), None);
    }

    #[test]
    fn test_nothing_offered_otherwise() {
        let completed = contract(ContractStatus::Completed, Some(3));
        assert_eq!(available_action(&completed, Some(&me(3))), None);
        assert_eq!(available_action(&completed, None), None);

        let orphan = contract(ContractStatus::Assigned, None);
        assert_eq!(available_action(&orphan, Some(&me(3))), None);
    }

    #[test]
    fn test_every_combination() {
        for status in [
            ContractStatus::Available,
            ContractStatus::Assigned,
            ContractStatus::Completed,
        ] {
            for assigned_to in [None, Some(3), Some(4)] {
                for session in [None, Some(me(3))] {
                    let c = contract(status, assigned_to);
                    let got = available_action(&c, session.as_ref());
                    let expected = match (status, &session) {
                        (_, None) => None,
                        (ContractStatus::Available, Some(_)) => Some(ContractAction::Assign),
                        (ContractStatus::Assigned, Some(s)) if assigned_to == Some(s.id) => {
                            Some(ContractAction::Complete)
                        }
                        _ => None,
                    };
                    assert_eq!(got, expected, "{status:?} {assigned_to:?} {session:?}");
                }
            }
        }
    }

    #[test]
    fn test_refresh_reads_assignee_after_contract() {
        Owner::new().with(|| {
            let api = FakeBackend::with(vec![with_id(7, ContractStatus::Assigned, Some(3))]);
            let state = DetailsState::new();

            load(&api, 7, state);

            assert_eq!(api.requests(), vec!["GET /contracts/7", "GET /witchers/3"]);
            assert_eq!(state.contract.value_untracked().map(|c| c.id), Some(7));
            assert_eq!(
                state.witcher.value_untracked().map(|w| w.name),
                Some("Geralt".to_string())
            );
        });
    }

    #[test]
    fn test_missing_witcher_does_not_hide_contract() {
        Owner::new().with(|| {
            let api = FakeBackend::with(vec![with_id(7, ContractStatus::Assigned, Some(99))]);
            let state = DetailsState::new();

            load(&api, 7, state);

            assert_eq!(state.contract.value_untracked().map(|c| c.id), Some(7));
            assert!(state.contract.with_untracked(|s| s.error().is_none()));
            assert_eq!(
                state.witcher.with_untracked(|s| s.error().map(str::to_string)),
                Some("Witcher not found".to_string())
            );
        });
    }

    #[test]
    fn test_unknown_contract_reports_error_without_witcher_read() {
        Owner::new().with(|| {
            let api = FakeBackend::with(vec![]);
            let state = DetailsState::new();

            load(&api, 404, state);

            assert_eq!(api.requests(), vec!["GET /contracts/404"]);
            assert_eq!(
                state.contract.with_untracked(|s| s.error().map(str::to_string)),
                Some("Contract not found".to_string())
            );
        });
    }

    #[test]
    fn test_switching_ids_shows_the_newer_contract() {
        Owner::new().with(|| {
            let api = FakeBackend::with(vec![with_id(2, ContractStatus::Available, None)]);
            let release_first = api.hold(1);
            let state = DetailsState::new();

            let first = state.contract.begin();
            let first_read = refresh_contract(&api, 1, first, state);
            block_on(join(first_read, async {
                // The id changes while contract 1 is still in flight.
                state.witcher.reset();
                let second = state.contract.begin();
                refresh_contract(&api, 2, second, state).await;
                release_first
                    .send(with_id(1, ContractStatus::Available, None))
                    .unwrap();
            }));

            assert_eq!(state.contract.value_untracked().map(|c| c.id), Some(2));
        });
    }

    #[test]
    fn test_assign_writes_bare_id_then_rereads() {
        Owner::new().with(|| {
            let api = FakeBackend::with(vec![with_id(7, ContractStatus::Available, None)]);
            let state = DetailsState::new();
            load(&api, 7, state);

            let token = state.action.begin();
            block_on(run_contract_action(
                &api,
                7,
                3,
                ContractAction::Assign,
                token,
                state,
            ));

            assert_eq!(
                api.requests(),
                vec![
                    "GET /contracts/7",
                    "PUT /contracts/7/assignedTo 3",
                    "GET /contracts/7",
                    "GET /witchers/3",
                ]
            );
            let shown = state.contract.value_untracked().unwrap();
            assert_eq!(shown.status, ContractStatus::Assigned);
            assert_eq!(shown.assigned_to, Some(3));
            assert!(!is_busy(&state));
            assert!(state.action.with_untracked(|s| s.error().is_none()));
        });
    }

    #[test]
    fn test_complete_writes_bare_status_then_rereads() {
        Owner::new().with(|| {
            let api = FakeBackend::with(vec![with_id(7, ContractStatus::Assigned, Some(3))]);
            let state = DetailsState::new();
            load(&api, 7, state);

            let token = state.action.begin();
            block_on(run_contract_action(
                &api,
                7,
                3,
                ContractAction::Complete,
                token,
                state,
            ));

            assert_eq!(
                api.requests(),
                vec![
                    "GET /contracts/7",
                    "GET /witchers/3",
                    r#"PUT /contracts/7/status "Completed""#,
                    "GET /contracts/7",
                    "GET /witchers/3",
                ]
            );
            assert_eq!(
                state.contract.value_untracked().map(|c| c.status),
                Some(ContractStatus::Completed)
            );
            assert!(!is_busy(&state));
        });
    }

    #[test]
    fn test_action_stays_busy_until_reread_lands() {
        Owner::new().with(|| {
            let api = FakeBackend::with(vec![with_id(7, ContractStatus::Available, None)]);
            let state = DetailsState::new();
            load(&api, 7, state);
            let release_reread = api.hold(7);

            let token = state.action.begin();
            let action = run_contract_action(&api, 7, 3, ContractAction::Assign, token, state);
            block_on(join(action, async {
                // Write done, re-read pending: the old contract is still shown
                // and must not offer Assign again.
                assert!(is_busy(&state));
                assert_eq!(
                    state.contract.value_untracked().map(|c| c.status),
                    Some(ContractStatus::Available)
                );
                release_reread
                    .send(with_id(7, ContractStatus::Assigned, Some(3)))
                    .unwrap();
            }));

            assert!(!is_busy(&state));
            assert_eq!(
                state.contract.value_untracked().map(|c| c.status),
                Some(ContractStatus::Assigned)
            );
        });
    }

    #[test]
    fn test_rejected_write_reports_error_without_reread() {
        Owner::new().with(|| {
            let api = FakeBackend::with(vec![with_id(7, ContractStatus::Available, None)]);
            *api.reject_writes.borrow_mut() = Some("Contract already assigned".to_string());
            let state = DetailsState::new();
            load(&api, 7, state);

            let token = state.action.begin();
            block_on(run_contract_action(
                &api,
                7,
                3,
                ContractAction::Assign,
                token,
                state,
            ));

            assert_eq!(
                api.requests(),
                vec!["GET /contracts/7", "PUT /contracts/7/assignedTo 3"]
            );
            assert_eq!(
                state.action.with_untracked(|s| s.error().map(str::to_string)),
                Some("Contract already assigned".to_string())
            );
            assert!(!is_busy(&state));
            assert_eq!(
                state.contract.value_untracked().map(|c| c.status),
                Some(ContractStatus::Available)
            );
        });
    }
}
