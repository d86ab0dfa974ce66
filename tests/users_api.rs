use axum::http::{StatusCode, header};
use serde_json::json;
use userhub_shared::UserEvent;

mod common;

#[tokio::test]
async fn create_returns_201_with_location() -> anyhow::Result<()> {
    let app = common::create_test_app().await?;

    let response = app
        .json(
            "POST",
            "/users/create",
            json!({ "name": "name", "email": " Name@Mail.ru ", "age": 21 }),
        )
        .await?;

    assert_eq!(response.status(), StatusCode::CREATED);
    let location = response.headers()[header::LOCATION].to_str()?.to_owned();

    let body = common::read_json(response).await?;
    assert_eq!(location, format!("/users/read/{}", body["id"]));
    assert_eq!(body["email"], "name@mail.ru");
    assert_eq!(body["age"], 21);
    assert!(body["createdAt"].is_string());
    assert_eq!(body["createdAt"], body["updatedAt"]);

    let response = app.empty("GET", &location).await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(common::read_json(response).await?, body);

    let messages = app.outbox.recent(10).await?;
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].event()?, UserEvent::created("name@mail.ru"));

    Ok(())
}

#[tokio::test]
async fn duplicate_email_is_conflict() -> anyhow::Result<()> {
    let app = common::create_test_app().await?;
    app.json(
        "POST",
        "/users/create",
        json!({ "name": "name", "email": "Name@Mail.ru", "age": 21 }),
    )
    .await?;

    let response = app
        .json(
            "POST",
            "/users/create",
            json!({ "name": "other", "email": "NAME@MAIL.RU", "age": 30 }),
        )
        .await?;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/problem+json"
    );
    let body = common::read_json(response).await?;
    assert_eq!(body["type"], "/users/error/conflict");
    assert_eq!(body["status"], 409);
    assert_eq!(body["detail"], "Email already in use");
    assert!(body["timestamp"].is_string());

    assert_eq!(app.outbox.recent(10).await?.len(), 1);

    Ok(())
}

#[tokio::test]
async fn invalid_create_lists_field_errors() -> anyhow::Result<()> {
    let app = common::create_test_app().await?;

    let response = app
        .json("POST", "/users/create", json!({ "name": "  ", "email": "nope" }))
        .await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = common::read_json(response).await?;
    assert_eq!(body["type"], "/users/error/bad-request");
    assert_eq!(body["detail"], "Validation failed");

    let fields = body["errors"]
        .as_array()
        .map(|errors| {
            errors
                .iter()
                .filter_map(|e| e["field"].as_str().map(str::to_owned))
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();
    assert_eq!(fields, vec!["age", "email", "name"]);
    assert_eq!(body["errors"][0]["message"], "must not be null");

    let response = app.empty("GET", "/users").await?;
    let body = common::read_json(response).await?;
    assert!(body.get("_embedded").is_none());
    assert_eq!(body["_links"]["self"]["href"], "/users");

    Ok(())
}

#[tokio::test]
async fn malformed_body_and_path_are_bad_requests() -> anyhow::Result<()> {
    let app = common::create_test_app().await?;

    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/users/create")
        .header(header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from("{ not json"))?;
    let response = app.send(request).await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        common::read_json(response).await?["type"],
        "/users/error/bad-request"
    );

    let response = app.empty("GET", "/users/read/abc").await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn update_flow() -> anyhow::Result<()> {
    let app = common::create_test_app().await?;
    let created = common::read_json(
        app.json(
            "POST",
            "/users/create",
            json!({ "name": "name", "email": "name@mail.ru", "age": 21 }),
        )
        .await?,
    )
    .await?;
    let id = created["id"].as_i64().unwrap_or_default();

    let response = app
        .json(
            "PUT",
            &format!("/users/update/{id}"),
            json!({ "name": "X", "email": "" }),
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::read_json(response).await?;
    assert_eq!(body["name"], "X");
    assert_eq!(body["email"], "name@mail.ru");
    assert_eq!(body["age"], 21);
    assert_eq!(body["createdAt"], created["createdAt"]);

    let response = app
        .json("PUT", "/users/update/999", json!({ "name": "Y" }))
        .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = common::read_json(response).await?;
    assert_eq!(body["type"], "/users/error/not-found");
    assert_eq!(body["detail"], "User not found");

    app.json(
        "POST",
        "/users/create",
        json!({ "name": "other", "email": "other@mail.ru", "age": 30 }),
    )
    .await?;
    let response = app
        .json(
            "PUT",
            &format!("/users/update/{id}"),
            json!({ "email": "Other@Mail.ru" }),
        )
        .await?;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    assert_eq!(app.outbox.recent(10).await?.len(), 2);

    Ok(())
}

#[tokio::test]
async fn delete_flow() -> anyhow::Result<()> {
    let app = common::create_test_app().await?;
    let created = common::read_json(
        app.json(
            "POST",
            "/users/create",
            json!({ "name": "name", "email": "Name@Mail.ru", "age": 21 }),
        )
        .await?,
    )
    .await?;
    let uri = format!("/users/delete/{}", created["id"]);

    let response = app.empty("DELETE", &uri).await?;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let bytes = http_body_util::BodyExt::collect(response.into_body())
        .await?
        .to_bytes();
    assert!(bytes.is_empty());

    let response = app.empty("DELETE", &uri).await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .empty("GET", &format!("/users/read/{}", created["id"]))
        .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let events = app
        .outbox
        .recent(10)
        .await?
        .iter()
        .map(|message| message.event())
        .collect::<Result<Vec<_>, _>>()?;
    assert_eq!(
        events,
        vec![
            UserEvent::deleted("name@mail.ru"),
            UserEvent::created("name@mail.ru")
        ]
    );

    Ok(())
}

#[tokio::test]
async fn racing_requests_create_one_user() -> anyhow::Result<()> {
    let app = common::create_test_app().await?;

    let requests = ["race@mail.ru", "RACE@mail.ru", "Race@Mail.RU"].map(|email| {
        app.json(
            "POST",
            "/users/create",
            json!({ "name": "racer", "email": email, "age": 20 }),
        )
    });

    let mut statuses = futures::future::join_all(requests)
        .await
        .into_iter()
        .map(|response| response.map(|r| r.status().as_u16()))
        .collect::<Result<Vec<_>, _>>()?;
    statuses.sort();

    assert_eq!(statuses, vec![201, 409, 409]);
    assert_eq!(app.outbox.recent(10).await?.len(), 1);

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM user")
        .fetch_one(&app.pool)
        .await?;
    assert_eq!(count, 1);

    Ok(())
}

#[tokio::test]
async fn health_and_ready() -> anyhow::Result<()> {
    let app = common::create_test_app().await?;

    let response = app.empty("GET", "/health").await?;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.empty("GET", "/ready").await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(common::read_json(response).await?["status"], "ready");

    Ok(())
}

#[tokio::test]
async fn user_bodies_carry_hal_links() -> anyhow::Result<()> {
    let app = common::create_test_app().await?;

    let response = app
        .json(
            "POST",
            "/users/create",
            json!({ "name": "name", "email": "name@mail.ru", "age": 123 }),
        )
        .await?;
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/hal+json");
    let created = common::read_json(response).await?;
    let id = created["id"].as_i64().unwrap_or_default();
    assert_eq!(created["_links"]["self"]["href"], format!("/users/read/{id}"));
    assert_eq!(created["_links"]["all-users"]["href"], "/users");
    assert_eq!(created["_links"]["update"]["href"], format!("/users/update/{id}"));
    assert_eq!(created["_links"]["delete"]["href"], format!("/users/delete/{id}"));

    let response = app.empty("GET", &format!("/users/read/{id}")).await?;
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/hal+json");
    let read = common::read_json(response).await?;
    assert_eq!(read["email"], "name@mail.ru");
    assert_eq!(read["_links"], created["_links"]);

    let response = app
        .json(
            "PUT",
            &format!("/users/update/{id}"),
            json!({ "name": "updated", "age": 12 }),
        )
        .await?;
    let updated = common::read_json(response).await?;
    assert_eq!(updated["name"], "updated");
    assert_eq!(updated["_links"]["update"]["href"], format!("/users/update/{id}"));

    app.json(
        "POST",
        "/users/create",
        json!({ "name": "name1", "email": "name1@mail.ru", "age": 12 }),
    )
    .await?;

    let response = app.empty("GET", "/users").await?;
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/hal+json");
    let list = common::read_json(response).await?;
    assert_eq!(list["_links"]["self"]["href"], "/users");
    assert_eq!(list["_links"]["create"]["href"], "/users/create");
    let users = &list["_embedded"]["userResponseList"];
    assert_eq!(users[0]["id"], id);
    assert_eq!(users[0]["_links"]["self"]["href"], format!("/users/read/{id}"));
    assert_eq!(users[1]["email"], "name1@mail.ru");
    assert_eq!(
        users[1]["_links"]["self"]["href"],
        format!("/users/read/{}", users[1]["id"])
    );

    Ok(())
}
