use crate::{
    client::{params, resource_path, Client, Params},
    error::Result,
    hash::subscriber_hash,
    models::{
        MemberStatus, MemberStatusRecord, MemberTagsPage, StatusUpdate, SubscribeRequest,
        TagStatus, TagUpdate, TagsRequest,
    },
    response::LastError,
};
use serde_json::{json, Value};
use std::collections::BTreeMap;

/// Title of the 400 MailChimp answers with when re-subscribing a member it
/// already holds (e.g. a pending one). The member is in the requested state.
const MEMBER_EXISTS: &str = "Member Exists";

#[derive(Debug, Clone)]
pub struct SubscribeOptions {
    pub merge_fields: BTreeMap<String, Value>,
    /// Subscribe as `pending` and let MailChimp send a confirmation email.
    pub double_opt_in: bool,
    pub interests: BTreeMap<String, bool>,
}

impl Default for SubscribeOptions {
    fn default() -> Self {
        Self {
            merge_fields: BTreeMap::new(),
            double_opt_in: true,
            interests: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MemberTagsQuery {
    pub fields: Vec<String>,
    pub exclude_fields: Vec<String>,
    pub count: usize,
    pub offset: usize,
}

impl Default for MemberTagsQuery {
    fn default() -> Self {
        Self {
            fields: vec![],
            exclude_fields: vec![],
            count: 10,
            offset: 0,
        }
    }
}

fn member_path(list_id: &str, email: &str) -> String {
    resource_path(&["lists", list_id, "members", &subscriber_hash(email)])
}

impl Client {
    /// Reads the status of `email` in the list.
    ///
    /// An unknown member still gets a response (a 404 problem document), whose
    /// numeric status comes back as [`MemberStatus::Other`].
    pub async fn get_subscriber_status(&self, list_id: &str, email: &str) -> Result<MemberStatus> {
        let resp = self.get(&member_path(list_id, email), Params::new()).await?;
        let record: MemberStatusRecord = resp.json()?;
        Ok(record.status)
    }

    pub async fn is_subscribed(&self, list_id: &str, email: &str) -> Result<bool> {
        Ok(self.get_subscriber_status(list_id, email).await? == MemberStatus::Subscribed)
    }

    /// Subscribes `email` to the list.
    ///
    /// Returns `false` without touching the member when it is already
    /// subscribed. Archived members are re-activated with a PATCH, everyone
    /// else is upserted with a PUT.
    ///
    /// ## Example
    ///
    /// ```no_run
    /// use mailchimp_v3::{Client, SubscribeOptions};
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = Client::new("abcd1234-us2")?;
    ///     let options = SubscribeOptions {
    ///         double_opt_in: false,
    ///         ..Default::default()
    ///     };
    ///     if client.subscribe_to_list("list-id", "someone@example.org", options).await? {
    ///         println!("Subscribed");
    ///     }
    ///     Ok(())
    /// }
    /// ```
    pub async fn subscribe_to_list(
        &self,
        list_id: &str,
        email: &str,
        options: SubscribeOptions,
    ) -> Result<bool> {
        let current = self.get_subscriber_status(list_id, email).await?;
        if current == MemberStatus::Subscribed {
            tracing::debug!(list_id, email, "Member already subscribed");
            return Ok(false);
        }

        let request = SubscribeRequest {
            id: list_id.to_string(),
            email_address: email.to_string(),
            status: if options.double_opt_in {
                MemberStatus::Pending
            } else {
                MemberStatus::Subscribed
            },
            merge_fields: options.merge_fields,
            interests: options.interests,
        };

        let path = member_path(list_id, email);
        let resp = if current == MemberStatus::Archived {
            self.patch(&path, params(&request)?).await?
        } else {
            self.put(&path, params(&request)?).await?
        };

        let member_exists = resp
            .error()
            .and_then(LastError::api)
            .is_some_and(|err| err.has_title(MEMBER_EXISTS));
        if resp.is_status(400) && member_exists {
            return Ok(true);
        }

        Ok(resp.is_status(200))
    }

    pub async fn unsubscribe_from_list(&self, list_id: &str, email: &str) -> Result<bool> {
        let request = StatusUpdate {
            status: MemberStatus::Unsubscribed,
        };
        let resp = self
            .patch(&member_path(list_id, email), params(&request)?)
            .await?;
        Ok(resp.is_status(200))
    }

    /// Permanently deletes the member. Only a 204 counts as success.
    pub async fn remove_from_list(&self, list_id: &str, email: &str) -> Result<bool> {
        let resp = self
            .delete(&member_path(list_id, email), Params::new())
            .await?;
        Ok(resp.is_status(204))
    }

    pub async fn get_member_tags(
        &self,
        list_id: &str,
        email: &str,
        query: MemberTagsQuery,
    ) -> Result<MemberTagsPage> {
        let path = format!("{}/tags", member_path(list_id, email));
        let query = json!({
            "fields": query.fields.join(","),
            "exclude_fields": query.exclude_fields.join(","),
            "count": query.count,
            "offset": query.offset,
        });
        let resp = self.get(&path, params(&query)?).await?;
        Self::expect_status("member tags", resp, 200)?.json()
    }

    pub async fn add_member_tags<I, S>(
        &self,
        list_id: &str,
        email: &str,
        tags: I,
        is_syncing: bool,
    ) -> Result<bool>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tags = TagUpdate::from_names(tags, TagStatus::Active);
        self.add_or_remove_member_tags(list_id, email, tags, is_syncing)
            .await
    }

    pub async fn remove_member_tags<I, S>(
        &self,
        list_id: &str,
        email: &str,
        tags: I,
        is_syncing: bool,
    ) -> Result<bool>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tags = TagUpdate::from_names(tags, TagStatus::Inactive);
        self.add_or_remove_member_tags(list_id, email, tags, is_syncing)
            .await
    }

    /// Applies tag updates to a member. Only a 204 counts as success.
    pub async fn add_or_remove_member_tags(
        &self,
        list_id: &str,
        email: &str,
        tags: Vec<TagUpdate>,
        is_syncing: bool,
    ) -> Result<bool> {
        let path = format!("{}/tags", member_path(list_id, email));
        let request = TagsRequest { tags, is_syncing };
        let resp = self.post(&path, params(&request)?).await?;
        Ok(resp.is_status(204))
    }
}
