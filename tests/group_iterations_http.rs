//! HTTP-level tests for the group iterations endpoint.
//!
//! Uses wiremock to check the exact requests the client puts on the wire.

use gitlabapi::{
    GitLabClient, GitLabError, Iteration, IterationListQuery, IterationParams, IterationState,
    Method, Transport,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn iteration_json(id: u64, iid: u64, title: &str) -> serde_json::Value {
    json!({
        "id": id,
        "iid": iid,
        "group_id": 5,
        "title": title,
        "state": 2,
        "start_date": "2024-01-01",
        "due_date": "2024-01-14"
    })
}

#[tokio::test]
async fn test_list_sends_iids_as_bracket_array() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/groups/5/iterations"))
        .and(query_param("iids[]", "1"))
        .and(query_param("iids[]", "2"))
        .and(query_param("iids[]", "3"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([iteration_json(11, 1, "Sprint 1")])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = GitLabClient::new("test-token", &mock_server.uri()).unwrap();
    let listed = client
        .group_iterations()
        .all(5, &json!({"iids": [1, 2, 3]}))
        .await
        .unwrap();

    let listed: Vec<Iteration> = serde_json::from_value(listed).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].title.as_deref(), Some("Sprint 1"));
}

#[tokio::test]
async fn test_list_with_typed_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/groups/my-group/iterations"))
        .and(query_param("state", "opened"))
        .and(query_param("search", "sprint 2"))
        .and(query_param("in[]", "title"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = GitLabClient::new("test-token", &mock_server.uri()).unwrap();
    let query = IterationListQuery {
        state: Some(IterationState::Opened),
        search: Some("sprint 2".to_string()),
        in_fields: Some(vec!["title".to_string()]),
        ..Default::default()
    };

    let listed = client.group_iterations().all("my-group", &query).await.unwrap();
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn test_invalid_list_options_send_nothing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = GitLabClient::new("test-token", &mock_server.uri()).unwrap();
    let iterations = client.group_iterations();

    let err = iterations.all(5, &json!({"iids": [1, "x"]})).await.unwrap_err();
    assert!(err.is_validation());
    assert!(err.to_string().contains("every element must be of type int"));

    let err = iterations.all(5, &json!({"state": "archived"})).await.unwrap_err();
    assert!(err.is_validation());

    let err = iterations.all(5, &json!({"order_by": "due_date"})).await.unwrap_err();
    assert!(err.to_string().contains("\"order_by\" does not exist"));

    // wiremock verifies the expectation on MockServer drop
}

#[tokio::test]
async fn test_show_authenticates_and_returns_raw_body() {
    let mock_server = MockServer::start().await;

    let body = iteration_json(42, 3, "Sprint 3");
    Mock::given(method("GET"))
        .and(path("/groups/5/iterations/42"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = GitLabClient::new("test-token", &mock_server.uri()).unwrap();
    let value = client.group_iterations().show(5, 42).await.unwrap();

    assert_eq!(value, body);
}

#[tokio::test]
async fn test_create_posts_json_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/groups/5/iterations"))
        .and(body_json(json!({"title": "Sprint 4", "due_date": "2024-02-25"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(iteration_json(44, 4, "Sprint 4")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = GitLabClient::new("test-token", &mock_server.uri()).unwrap();
    let params = IterationParams {
        title: Some("Sprint 4".to_string()),
        due_date: chrono::NaiveDate::from_ymd_opt(2024, 2, 25),
        ..Default::default()
    };

    let created = client.group_iterations().create(5, &params).await.unwrap();
    assert_eq!(created["id"], 44);
}

#[tokio::test]
async fn test_update_drops_null_fields() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/groups/5/iterations/44"))
        .and(body_json(json!({"description": "Planned"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(iteration_json(44, 4, "Sprint 4")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = GitLabClient::new("test-token", &mock_server.uri()).unwrap();
    client
        .group_iterations()
        .update(5, 44, &json!({"description": "Planned", "title": null}))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_remove_encodes_group_path_and_accepts_no_content() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/groups/my%2Fgroup/iterations/7"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = GitLabClient::new("test-token", &mock_server.uri()).unwrap();
    let value = client.group_iterations().remove("my/group", 7).await.unwrap();

    assert!(value.is_null());
}

#[tokio::test]
async fn test_sub_resources() {
    let mock_server = MockServer::start().await;

    for (suffix, body) in [
        ("issues", json!([{"id": 1, "iid": 10, "title": "Bug"}])),
        ("discussions", json!([{"id": "abc", "notes": []}])),
        ("notes", json!([{"id": 7, "body": "Looks good"}])),
    ] {
        Mock::given(method("GET"))
            .and(path(format!("/groups/5/iterations/3/{suffix}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let client = GitLabClient::new("test-token", &mock_server.uri()).unwrap();
    let iterations = client.group_iterations();

    assert_eq!(iterations.issues(5, 3).await.unwrap()[0]["title"], "Bug");
    assert_eq!(iterations.show_discussions(5, 3).await.unwrap()[0]["id"], "abc");
    assert_eq!(iterations.show_notes(5, 3).await.unwrap()[0]["body"], "Looks good");
}

#[tokio::test]
async fn test_not_found_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/groups/5/iterations/404"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"message": "404 Iteration Not Found"})),
        )
        .mount(&mock_server)
        .await;

    let client = GitLabClient::new("test-token", &mock_server.uri()).unwrap();
    let err = client.group_iterations().show(5, 404).await.unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "GitLab API error: 404 Iteration Not Found");
}

#[tokio::test]
async fn test_structured_error_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/groups/5/iterations"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"message": {"title": ["can't be blank"]}})),
        )
        .mount(&mock_server)
        .await;

    let client = GitLabClient::new("test-token", &mock_server.uri()).unwrap();
    let err = client
        .group_iterations()
        .create(5, &json!({}))
        .await
        .unwrap_err();

    match err {
        GitLabError::ApiError {
            message,
            status_code,
        } => {
            assert_eq!(status_code, Some(400));
            assert!(message.contains("can't be blank"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_rate_limited() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "30"))
        .mount(&mock_server)
        .await;

    let client = GitLabClient::new("test-token", &mock_server.uri()).unwrap();
    let err = client.group_iterations().all(5, &()).await.unwrap_err();

    assert!(matches!(
        err,
        GitLabError::RateLimited {
            retry_after_secs: Some(30)
        }
    ));
}

#[tokio::test]
async fn test_transport_places_payload_by_verb() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/groups/5/iterations/7"))
        .and(query_param("confirm", "1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/groups/5/iterations"))
        .and(query_param_is_missing("title"))
        .and(body_json(json!({"title": "Sprint 9"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(iteration_json(49, 9, "Sprint 9")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = GitLabClient::new("test-token", &mock_server.uri()).unwrap();

    let query = json!({"confirm": true});
    let deleted = client
        .request(Method::Delete, "groups/5/iterations/7", query.as_object())
        .await
        .unwrap();
    assert!(deleted.is_null());

    let body = json!({"title": "Sprint 9"});
    let created = client
        .request(Method::Post, "groups/5/iterations", body.as_object())
        .await
        .unwrap();
    assert_eq!(created["id"], 49);
}
