// ABOUTME: Tests for envelope construction and inbound message classification

use bridge_client::bridge::protocol::{generate_id, parse_inbound, ProtocolError};
use bridge_client::bridge::{Envelope, Request, Response};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

#[test]
fn test_execute_envelope_parses_back() {
    let envelope = Request::Execute {
        command: "echo hi".into(),
        terminal_id: Some("t1".into()),
    }
    .into_envelope();

    let parsed: Value = serde_json::from_str(&envelope.to_json().unwrap()).unwrap();

    assert_eq!(parsed["type"], "execute");
    assert_eq!(parsed["id"], Value::String(envelope.id.clone()));
    assert_eq!(parsed["data"], json!({"command": "echo hi", "terminalId": "t1"}));
}

#[test]
fn test_request_payloads() {
    assert_eq!(Request::Ping.payload().len(), 0);
    assert_eq!(
        Value::Object(
            Request::CreateTerminal {
                terminal_name: "Build".into()
            }
            .payload()
        ),
        json!({"terminalName": "Build"})
    );
    assert_eq!(
        Value::Object(
            Request::CloseTerminal {
                terminal_id: "t1".into()
            }
            .payload()
        ),
        json!({"terminalId": "t1"})
    );
    assert_eq!(
        Value::Object(
            Request::Execute {
                command: "ls".into(),
                terminal_id: None
            }
            .payload()
        ),
        json!({"command": "ls"})
    );
}

#[test]
fn test_generated_id_is_type_and_epoch_seconds() {
    let id = generate_id("create_terminal");
    let seconds = id
        .strip_prefix("create_terminal-")
        .expect("id starts with type")
        .parse::<f64>()
        .expect("suffix is a float");

    let now = chrono::Utc::now().timestamp() as f64;
    assert!((now - seconds).abs() < 5.0);
}

#[test]
fn test_envelope_always_serializes_data_object() {
    let text = Request::Ping.into_envelope().to_json().unwrap();
    let parsed: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed["data"], json!({}));
}

#[test]
fn test_parse_known_responses() {
    let created = parse_inbound(
        r#"{"type":"terminal_created","id":"y","data":{"terminalId":"t42","terminalName":"Build"}}"#,
    )
    .unwrap();
    assert_eq!(created.kind, "terminal_created");
    assert_eq!(created.id, "y");
    assert_eq!(
        created.response,
        Response::TerminalCreated {
            terminal_id: "t42".into(),
            terminal_name: "Build".into()
        }
    );

    let success = parse_inbound(r#"{"type":"success","id":"a","data":{"output":"done"}}"#).unwrap();
    assert_eq!(success.response, Response::Success { output: "done".into() });

    let error = parse_inbound(r#"{"type":"error","id":"b","data":{"error":"boom"}}"#).unwrap();
    assert_eq!(error.response, Response::Error { error: "boom".into() });
}

#[test]
fn test_pong_without_data_or_with_null_data() {
    assert_eq!(
        parse_inbound(r#"{"type":"pong","id":"p"}"#).unwrap().response,
        Response::Pong
    );
    assert_eq!(
        parse_inbound(r#"{"type":"pong","id":"p","data":null}"#)
            .unwrap()
            .response,
        Response::Pong
    );
}

#[test]
fn test_non_string_fields_are_rendered_as_json() {
    let inbound = parse_inbound(r#"{"type":"success","id":7,"data":{"output":{"lines":2}}}"#).unwrap();
    assert_eq!(inbound.id, "7");
    assert_eq!(
        inbound.response,
        Response::Success {
            output: r#"{"lines":2}"#.into()
        }
    );
}

#[test]
fn test_missing_field_names_the_field() {
    let error = parse_inbound(r#"{"type":"success","id":"a","data":{}}"#).unwrap_err();
    match error {
        ProtocolError::MissingField { kind, id, field } => {
            assert_eq!(kind, "success");
            assert_eq!(id, "a");
            assert_eq!(field, "output");
        }
        other => panic!("unexpected {other}"),
    }

    assert!(matches!(
        parse_inbound(r#"{"type":"terminal_created","id":"c","data":{"terminalId":"t1"}}"#),
        Err(ProtocolError::MissingField {
            field: "terminalName",
            ..
        })
    ));
}

#[test]
fn test_invalid_json() {
    assert!(matches!(
        parse_inbound("not json"),
        Err(ProtocolError::InvalidJson(_))
    ));
}

#[test]
fn test_unknown_and_non_envelope_messages() {
    let unknown = parse_inbound(r#"{"type":"output","id":"o","data":{"x":1}}"#).unwrap();
    assert_eq!(unknown.kind, "output");
    assert_eq!(
        unknown.response,
        Response::Unknown(json!({"type":"output","id":"o","data":{"x":1}}))
    );

    let bare = parse_inbound("42").unwrap();
    assert_eq!(bare.kind, "");
    assert_eq!(bare.response, Response::Unknown(json!(42)));
}

#[test]
fn test_envelope_deserializes_from_wire() {
    let envelope: Envelope =
        serde_json::from_str(r#"{"type":"close_terminal","id":"close_terminal-1.5","data":{"terminalId":"t1"}}"#)
            .unwrap();
    assert_eq!(envelope.kind, "close_terminal");
    assert_eq!(envelope.text_field("terminalId").as_deref(), Some("t1"));
    assert_eq!(envelope.text_field("missing"), None);
}
