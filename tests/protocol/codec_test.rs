//! Envelope encode/decode properties.

use qdb::protocol::{decode, encode, encode_command, Command, DisableMode};
use serde_json::json;

#[test]
fn payloadless_commands_roundtrip_without_payload() {
    for command in [
        Command::Step,
        Command::Return,
        Command::Next,
        Command::Until,
        Command::Continue,
    ] {
        let frame = encode_command(&command).unwrap();
        assert!(!frame.contains("\"p\""), "{frame} should not carry a payload");

        let envelope = decode(&frame).unwrap();
        assert_eq!(envelope.tag, command.tag());
        assert!(envelope.payload.is_none());
    }
}

#[test]
fn tagged_payloads_roundtrip() {
    let cases = [
        ("eval", json!("x + 1")),
        ("set_watch", json!(["x", "y"])),
        (
            "list",
            json!({"file": "a.py", "start": "1", "end": "20"}),
        ),
        ("disable", json!("hard")),
        ("custom", json!({"nested": {"deep": [1, 2.5, null, true]}})),
        ("number", json!(7)),
    ];

    for (tag, payload) in cases {
        let envelope = decode(&encode(tag, Some(&payload)).unwrap()).unwrap();
        assert_eq!(envelope.tag, tag);
        assert_eq!(envelope.payload, Some(payload));
    }
}

#[test]
fn start_with_empty_auth_has_no_payload() {
    let frame = encode_command(&Command::Start {
        auth: String::new(),
    })
    .unwrap();
    assert_eq!(frame, r#"{"e":"start"}"#);

    let frame = encode_command(&Command::Start {
        auth: "secret".to_string(),
    })
    .unwrap();
    assert_eq!(frame, r#"{"e":"start","p":"secret"}"#);
}

#[test]
fn quit_modes_encode_as_disable() {
    assert_eq!(
        encode_command(&Command::Disable(DisableMode::Soft)).unwrap(),
        r#"{"e":"disable","p":"soft"}"#
    );
    assert_eq!(
        encode_command(&Command::Disable(DisableMode::Hard)).unwrap(),
        r#"{"e":"disable","p":"hard"}"#
    );
}

#[test]
fn decode_ignores_extra_fields() {
    let envelope = decode(r#"{"e":"return","p":"1","seq":9}"#).unwrap();
    assert_eq!(envelope.tag, "return");
    assert_eq!(envelope.payload, Some(json!("1")));
}

#[test]
fn decode_null_payload_is_absent() {
    let envelope = decode(r#"{"e":"breakpoints","p":null}"#).unwrap();
    assert!(envelope.payload.is_none());
}

#[test]
fn decode_event_rejects_positional_array_frame() {
    let result = qdb::protocol::decode_event(r#"["error", {"type":"NameError","data":"x"}]"#);
    assert!(matches!(result, Err(qdb::protocol::CodecError::Envelope(_))));
}
