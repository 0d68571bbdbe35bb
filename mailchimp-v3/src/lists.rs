use crate::{
    client::{resource_path, Client, Params},
    error::Result,
    models::{InterestCategoriesPage, InterestsPage, MergeFieldsPage},
};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// `offset`/`limit` pagination, passed through to the API verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub offset: usize,
    pub limit: usize,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 10,
        }
    }
}

impl Page {
    fn params(self) -> Params {
        let mut params = Params::new();
        params.insert("offset".to_string(), Value::from(self.offset));
        params.insert("limit".to_string(), Value::from(self.limit));
        params
    }
}

impl Client {
    pub async fn get_list_fields(&self, list_id: &str, page: Page) -> Result<MergeFieldsPage> {
        let path = resource_path(&["lists", list_id, "merge-fields"]);
        self.fetch_page("merge-fields", &path, page).await
    }

    pub async fn get_list_group_categories(
        &self,
        list_id: &str,
        page: Page,
    ) -> Result<InterestCategoriesPage> {
        let path = resource_path(&["lists", list_id, "interest-categories"]);
        self.fetch_page("interest-categories", &path, page).await
    }

    pub async fn get_list_group(
        &self,
        list_id: &str,
        group_id: &str,
        page: Page,
    ) -> Result<InterestsPage> {
        let path = resource_path(&[
            "lists",
            list_id,
            "interest-categories",
            group_id,
            "interests",
        ]);
        self.fetch_page("interest group", &path, page).await
    }

    async fn fetch_page<T: DeserializeOwned>(
        &self,
        resource: &'static str,
        path: &str,
        page: Page,
    ) -> Result<T> {
        let resp = self.get(path, page.params()).await?;
        Self::expect_status(resource, resp, 200)?.json()
    }
}
