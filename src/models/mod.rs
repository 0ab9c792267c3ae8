use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Lifecycle state of a contract.
///
/// The backend uses the variant names verbatim, both in JSON bodies and in the
/// `status` query parameter of the list endpoint.
#[derive(
    Serialize,
    Deserialize,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
pub(crate) enum ContractStatus {
    Available,
    Assigned,
    Completed,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Contract {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Free text; the API stores it as a string even when it looks numeric.
    #[serde(default)]
    pub reward: String,
    pub status: ContractStatus,
    #[serde(rename = "assignedTo", default)]
    pub assigned_to: Option<i64>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Witcher {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub avatar: Option<String>,
}

impl Witcher {
    /// Avatar URL, treating an empty string like a missing one.
    pub fn avatar_url(&self) -> Option<&str> {
        self.avatar.as_deref().filter(|a| !a.trim().is_empty())
    }
}

/// `POST /contracts/` body.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct NewContract {
    pub title: String,
    pub description: String,
    pub reward: String,
}

/// `PUT /contracts/{id}` body.
///
/// The endpoint replaces the whole record, so `status` and `assignedTo` are
/// always sent (`assignedTo` as `null` when unassigned).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct ContractUpdate {
    pub title: String,
    pub description: String,
    pub reward: String,
    pub status: ContractStatus,
    #[serde(rename = "assignedTo")]
    pub assigned_to: Option<i64>,
}

impl ContractUpdate {
    /// Edited text fields on top of the loaded contract's status/assignee.
    pub fn from_loaded(loaded: &Contract, draft: &ContractDraft) -> Self {
        let draft = draft.trimmed();
        Self {
            title: draft.title,
            description: draft.description,
            reward: draft.reward,
            status: loaded.status,
            assigned_to: loaded.assigned_to,
        }
    }
}

/// Server-side filters of the contracts list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct ContractFilters {
    pub title: String,
    pub status: Option<ContractStatus>,
}

/// The three user-editable text fields shared by the create and edit forms.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct ContractDraft {
    pub title: String,
    pub description: String,
    pub reward: String,
}

impl ContractDraft {
    pub fn from_contract(c: &Contract) -> Self {
        Self {
            title: c.title.clone(),
            description: c.description.clone(),
            reward: c.reward.clone(),
        }
    }

    pub fn trimmed(&self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            reward: self.reward.trim().to_string(),
        }
    }

    /// Whitespace-only input counts as empty.
    pub fn is_complete(&self) -> bool {
        !self.title.trim().is_empty()
            && !self.description.trim().is_empty()
            && !self.reward.trim().is_empty()
    }

    pub fn into_new_contract(self) -> NewContract {
        let t = self.trimmed();
        NewContract {
            title: t.title,
            description: t.description,
            reward: t.reward,
        }
    }
}
