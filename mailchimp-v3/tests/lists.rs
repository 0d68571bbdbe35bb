mod common;

use common::{setup, unreachable_client, API_KEY, LIST_ID};
use mailchimp_v3::{Error, Page};
use serde_json::json;
use wiremock::{
    matchers::{method, path, query_param},
    Mock, ResponseTemplate,
};

#[tokio::test]
async fn reads_merge_fields_with_default_paging() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path(format!("/lists/{LIST_ID}/merge-fields")))
        .and(query_param("offset", "0"))
        .and(query_param("limit", "10"))
        .and(query_param("apikey", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "merge_fields": [
                {"merge_id": 1, "tag": "FNAME", "name": "First Name", "type": "text", "required": false},
                {"merge_id": 2, "tag": "LNAME", "name": "Last Name", "type": "text", "required": false},
            ],
            "list_id": LIST_ID,
            "total_items": 2,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let page = client.get_list_fields(LIST_ID, Page::default()).await.unwrap();
    assert_eq!(page.total_items, Some(2));
    let tags: Vec<_> = page
        .merge_fields
        .iter()
        .filter_map(|field| field.tag.as_deref())
        .collect();
    assert_eq!(tags, ["FNAME", "LNAME"]);
}

#[tokio::test]
async fn merge_fields_rejection_differs_from_connectivity_failure() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path(format!("/lists/{LIST_ID}/merge-fields")))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "title": "API Key Invalid",
            "status": 401,
        })))
        .mount(&server)
        .await;

    let err = client
        .get_list_fields(LIST_ID, Page::default())
        .await
        .unwrap_err();
    match err {
        Error::Fetch {
            resource,
            status,
            error,
        } => {
            assert_eq!(resource, "merge-fields");
            assert_eq!(status, 401);
            let problem = error.and_then(|e| e.api().cloned()).unwrap();
            assert_eq!(problem.title.as_deref(), Some("API Key Invalid"));
        }
        other => panic!("expected a fetch failure, got {other:?}"),
    }

    let err = unreachable_client()
        .get_list_fields(LIST_ID, Page::default())
        .await
        .unwrap_err();
    assert!(err.is_connectivity());
}

#[tokio::test]
async fn reads_interest_categories_with_custom_paging() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path(format!("/lists/{LIST_ID}/interest-categories")))
        .and(query_param("offset", "20"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "list_id": LIST_ID,
            "categories": [{"id": "cat1", "title": "Topics", "type": "checkboxes"}],
            "total_items": 21,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let page = client
        .get_list_group_categories(LIST_ID, Page { offset: 20, limit: 5 })
        .await
        .unwrap();
    assert_eq!(page.categories[0].id.as_deref(), Some("cat1"));
    assert_eq!(page.categories[0].r#type.as_deref(), Some("checkboxes"));
}

#[tokio::test]
async fn interest_categories_rejection_differs_from_connectivity_failure() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path(format!("/lists/{LIST_ID}/interest-categories")))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "title": "Resource Not Found",
            "status": 404,
        })))
        .mount(&server)
        .await;

    let err = client
        .get_list_group_categories(LIST_ID, Page::default())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Fetch {
            resource: "interest-categories",
            status: 404,
            ..
        }
    ));
    assert!(!err.is_connectivity());

    let err = unreachable_client()
        .get_list_group_categories(LIST_ID, Page::default())
        .await
        .unwrap_err();
    assert!(err.is_connectivity());
}

#[tokio::test]
async fn ids_stay_inside_their_path_segment() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/lists/a%2Fb%3Fc/interest-categories/g%23h/interests"))
        .and(query_param("apikey", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"interests": []})))
        .expect(1)
        .mount(&server)
        .await;

    let page = client
        .get_list_group("a/b?c", "g#h", Page::default())
        .await
        .unwrap();
    assert!(page.interests.is_empty());
}

#[tokio::test]
async fn reads_interests_of_a_group() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path(format!("/lists/{LIST_ID}/interest-categories/cat1/interests")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "interests": [
                {"category_id": "cat1", "id": "i1", "name": "Rust", "subscriber_count": "12"},
            ],
            "list_id": LIST_ID,
            "category_id": "cat1",
            "total_items": 1,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let page = client
        .get_list_group(LIST_ID, "cat1", Page::default())
        .await
        .unwrap();
    assert_eq!(page.interests[0].name.as_deref(), Some("Rust"));
    assert_eq!(page.category_id.as_deref(), Some("cat1"));
}

#[tokio::test]
async fn interest_group_rejection_differs_from_connectivity_failure() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
        .mount(&server)
        .await;

    let err = client
        .get_list_group(LIST_ID, "cat1", Page::default())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Fetch {
            resource: "interest group",
            status: 500,
            ..
        }
    ));
    assert!(!err.is_connectivity());

    let err = unreachable_client()
        .get_list_group(LIST_ID, "cat1", Page::default())
        .await
        .unwrap_err();
    assert!(err.is_connectivity());
}
