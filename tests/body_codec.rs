// End-to-end body serialization: content-type aliases, structured-body
// merging, form encoding, raw passthrough, and chunked writes.

use httptest::{all_of, matchers::*, responders::*, Expectation, Server};
use serde_json::json;

#[tokio::test]
async fn test_content_type_alias_reaches_the_wire() {
    let server = Server::run();
    server.expect(
        Expectation::matching(all_of![
            request::method_path("POST", "/echo"),
            request::headers(contains(("content-type", "application/json"))),
        ])
        .respond_with(status_code(200)),
    );

    let res = courier::post(&server.url("/echo").to_string())
        .content_type("json")
        .body(json!({ "name": "tobi" }))
        .send()
        .await
        .unwrap();
    assert!(res.ok());
}

#[tokio::test]
async fn test_explicit_mime_passes_through() {
    let server = Server::run();
    server.expect(
        Expectation::matching(all_of![
            request::method_path("POST", "/echo"),
            request::headers(contains(("content-type", "text/x-foo"))),
        ])
        .respond_with(status_code(200)),
    );

    let res = courier::post(&server.url("/echo").to_string())
        .content_type("text/x-foo")
        .body("payload")
        .send()
        .await
        .unwrap();
    assert!(res.ok());
}

#[tokio::test]
async fn test_structured_bodies_merge_into_one_json_object() {
    let server = Server::run();
    server.expect(
        Expectation::matching(all_of![
            request::method_path("POST", "/echo"),
            request::headers(contains(("content-type", "application/json"))),
            request::body(r#"{"name":"tobi","age":1}"#),
        ])
        .respond_with(
            status_code(200)
                .insert_header("Content-Type", "application/json")
                .body(r#"{"name":"tobi","age":1}"#),
        ),
    );

    let res = courier::post(&server.url("/echo").to_string())
        .body(json!({ "name": "tobi" }))
        .body(json!({ "age": 1 }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.text().unwrap(), r#"{"name":"tobi","age":1}"#);
    assert_eq!(res.body().unwrap()["name"], "tobi");
}

#[tokio::test]
async fn test_form_data_type_sends_urlencoded_pairs() {
    let server = Server::run();
    server.expect(
        Expectation::matching(all_of![
            request::method_path("POST", "/echo"),
            request::headers(contains((
                "content-type",
                "application/x-www-form-urlencoded"
            ))),
            request::body("name=tobi"),
        ])
        .respond_with(status_code(200).body("name=tobi")),
    );

    let res = courier::post(&server.url("/echo").to_string())
        .content_type("form-data")
        .body(json!({ "name": "tobi" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.text().unwrap(), "name=tobi");
}

#[tokio::test]
async fn test_raw_string_body_sent_verbatim() {
    let server = Server::run();
    server.expect(
        Expectation::matching(all_of![
            request::method_path("POST", "/echo"),
            request::body(r#"{"name":"tobi"}"#),
        ])
        .respond_with(status_code(200).body(r#"{"name":"tobi"}"#)),
    );

    let res = courier::post(&server.url("/echo").to_string())
        .body(r#"{"name":"tobi"}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(res.text().unwrap(), r#"{"name":"tobi"}"#);
}

#[tokio::test]
async fn test_written_chunks_concatenate_on_the_wire() {
    let server = Server::run();
    server.expect(
        Expectation::matching(all_of![
            request::method_path("POST", "/echo"),
            request::body(r#"{"name":"tobi"}"#),
        ])
        .respond_with(status_code(200).body(r#"{"name":"tobi"}"#)),
    );

    let mut req = courier::post(&server.url("/echo").to_string());
    assert!(req.write_chunk(r#"{"name""#));
    assert!(req.write_chunk(r#":"tobi"}"#));
    let res = req.send().await.unwrap();
    assert_eq!(res.text().unwrap(), r#"{"name":"tobi"}"#);
}

#[tokio::test]
async fn test_json_response_decodes_lazily() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/json")).respond_with(
            status_code(200)
                .insert_header("Content-Type", "application/json")
                .body(r#"{"name":"manny"}"#),
        ),
    );

    let res = courier::get(&server.url("/json").to_string()).send().await.unwrap();
    assert_eq!(res.body().unwrap()["name"], "manny");
}
