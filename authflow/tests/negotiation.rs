//! Content negotiation and formatting through the public responder.

use authflow::prelude::*;
use authflow::respond::{CsvFormatter, TabularFormatter};
use authflow::testing::{CollectingLogger, TestRequest};
use http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;

fn responder() -> Responder {
    Responder::new(&ServerConfig::default(), Arc::new(CollectingLogger::new()))
}

#[test]
fn csv_preferred_when_listed_first() {
    let request = TestRequest::get("/").accept("text/csv,application/json").build();
    let response = responder().respond(&request, &json!([{"a": 1}]));
    assert_eq!(response.content_type(), Some("text/csv"));
}

#[test]
fn unsupported_type_falls_back_to_json() {
    let request = TestRequest::get("/").accept("application/xml").build();
    let response = responder().respond(&request, &json!({"a": 1}));
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.content_type(), Some("application/json"));
}

#[test]
fn repeated_accept_headers_are_read_in_order() {
    let request = TestRequest::get("/")
        .accept("application/xml")
        .accept("text/csv")
        .build();
    let response = responder().respond(&request, &json!([{"a": 1}]));
    assert_eq!(response.content_type(), Some("text/csv"));
}

#[test]
fn quality_weights_are_not_interpreted() {
    let request = TestRequest::get("/")
        .accept("text/plain;q=0.1, text/tabular")
        .build();
    let response = responder().respond(&request, &json!([{"a": 1}]));
    assert!(response.body_text().starts_with('+'));
}

#[test]
fn unregistered_csv_is_skipped() {
    let responder = Responder::bare(&ServerConfig::default(), Arc::new(CollectingLogger::new()))
        .with_formatter(TabularFormatter);
    let request = TestRequest::get("/").accept("text/csv, text/tabular").build();
    let response = responder.respond(&request, &json!({"a": 1}));
    assert_eq!(response.content_type(), Some("text/plain"));
    assert!(responder.formatter(MediaType::Csv).is_none());
    assert!(responder.with_formatter(CsvFormatter).formatter(MediaType::Csv).is_some());
}

#[test]
fn tabular_rendering_is_fixed_width_and_stable() {
    let columns = [Column::named("a", "A"), Column::named("b", "B")];
    let data = json!([{"a": 1, "b": "xy"}]);
    let responder = responder();

    let first = responder.tabular(&data, Some(&columns));
    let second = responder.tabular(&data, Some(&columns));

    assert_eq!(
        first.body_text(),
        "+---+----+\n| A | B  |\n+---+----+\n| 1 | xy |\n+---+----+\n"
    );
    assert_eq!(first.body_text(), second.body_text());
}

#[test]
fn embedded_json_and_timestamps_are_normalized() {
    let response = responder().json(&json!({
        "prefs": "{\"theme\":\"dark\"}",
        "created": "2023-01-02T03:04:05Z"
    }));
    assert_eq!(
        response.body_json().unwrap(),
        json!({"prefs": {"theme": "dark"}, "created": "2023-01-02 03:04:05"})
    );
}
