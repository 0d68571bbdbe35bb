use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::{collections::BTreeMap, fmt::Display};

pub const STATUS_SUBSCRIBED: &str = "subscribed";
pub const STATUS_PENDING: &str = "pending";
pub const STATUS_ARCHIVED: &str = "archived";
pub const STATUS_UNSUBSCRIBED: &str = "unsubscribed";

/// The status of a list member.
///
/// MailChimp may return statuses beyond the ones this crate acts upon, so
/// anything unknown is kept verbatim in [`MemberStatus::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MemberStatus {
    Subscribed,
    Pending,
    Archived,
    Unsubscribed,
    Other(String),
}

impl MemberStatus {
    pub fn as_str(&self) -> &str {
        match self {
            MemberStatus::Subscribed => STATUS_SUBSCRIBED,
            MemberStatus::Pending => STATUS_PENDING,
            MemberStatus::Archived => STATUS_ARCHIVED,
            MemberStatus::Unsubscribed => STATUS_UNSUBSCRIBED,
            MemberStatus::Other(status) => status,
        }
    }
}

impl From<&str> for MemberStatus {
    fn from(status: &str) -> Self {
        match status {
            STATUS_SUBSCRIBED => MemberStatus::Subscribed,
            STATUS_PENDING => MemberStatus::Pending,
            STATUS_ARCHIVED => MemberStatus::Archived,
            STATUS_UNSUBSCRIBED => MemberStatus::Unsubscribed,
            other => MemberStatus::Other(other.to_string()),
        }
    }
}

impl Display for MemberStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for MemberStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for MemberStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Problem documents (e.g. the 404 for an unknown member) carry a
        // numeric `status` in the same position.
        match Value::deserialize(deserializer)? {
            Value::String(status) => Ok(MemberStatus::from(status.as_str())),
            Value::Number(code) => Ok(MemberStatus::Other(code.to_string())),
            other => Err(serde::de::Error::custom(format!(
                "expected a member status, found {other}"
            ))),
        }
    }
}

/// The only part of a member resource the subscription logic looks at.
#[derive(Deserialize, Clone, Debug)]
pub struct MemberStatusRecord {
    pub status: MemberStatus,
    #[serde(default)]
    pub email_address: Option<String>,
}

/// A MailChimp problem document.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct MailchimpError {
    #[serde(default)]
    pub r#type: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub instance: Option<String>,
}

impl MailchimpError {
    pub fn has_title(&self, title: &str) -> bool {
        self.title.as_deref() == Some(title)
    }
}

impl Display for MailchimpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}): {}",
            self.title.as_deref().unwrap_or("Unknown error"),
            self.status.map(|s| s.to_string()).unwrap_or_default(),
            self.detail.as_deref().unwrap_or_default()
        )
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, Default)]
pub struct AccountDetails {
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub login_id: Option<String>,
    #[serde(default)]
    pub account_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub total_subscribers: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default)]
pub struct MergeField {
    #[serde(default)]
    pub merge_id: Option<u64>,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub r#type: Option<String>,
    #[serde(default)]
    pub required: Option<bool>,
    #[serde(default)]
    pub default_value: Option<String>,
    #[serde(default)]
    pub public: Option<bool>,
    #[serde(default)]
    pub display_order: Option<u64>,
    #[serde(default)]
    pub list_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default)]
pub struct MergeFieldsPage {
    #[serde(default)]
    pub merge_fields: Vec<MergeField>,
    #[serde(default)]
    pub list_id: Option<String>,
    #[serde(default)]
    pub total_items: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default)]
pub struct InterestCategory {
    #[serde(default)]
    pub list_id: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub display_order: Option<u64>,
    #[serde(default)]
    pub r#type: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default)]
pub struct InterestCategoriesPage {
    #[serde(default)]
    pub list_id: Option<String>,
    #[serde(default)]
    pub categories: Vec<InterestCategory>,
    #[serde(default)]
    pub total_items: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default)]
pub struct Interest {
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub list_id: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub subscriber_count: Option<String>,
    #[serde(default)]
    pub display_order: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default)]
pub struct InterestsPage {
    #[serde(default)]
    pub interests: Vec<Interest>,
    #[serde(default)]
    pub list_id: Option<String>,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub total_items: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default)]
pub struct MemberTag {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub date_added: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default)]
pub struct MemberTagsPage {
    #[serde(default)]
    pub tags: Vec<MemberTag>,
    #[serde(default)]
    pub total_items: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of the member upsert issued when subscribing.
#[derive(Serialize, Clone, Debug)]
pub struct SubscribeRequest {
    pub id: String,
    pub email_address: String,
    pub status: MemberStatus,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub merge_fields: BTreeMap<String, Value>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub interests: BTreeMap<String, bool>,
}

#[derive(Serialize, Clone, Debug)]
pub struct StatusUpdate {
    pub status: MemberStatus,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TagStatus {
    Active,
    Inactive,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TagUpdate {
    pub name: String,
    pub status: TagStatus,
}

impl TagUpdate {
    /// Maps plain tag names onto updates with the given status, preserving order.
    pub fn from_names<I, S>(names: I, status: TagStatus) -> Vec<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names
            .into_iter()
            .map(|name| TagUpdate {
                name: name.into(),
                status,
            })
            .collect()
    }
}

#[derive(Serialize, Clone, Debug)]
pub struct TagsRequest {
    pub tags: Vec<TagUpdate>,
    pub is_syncing: bool,
}
