//! Template-to-wire composition flows driven through the public API only:
//! load, address, render, attach buttons and elements, then validate the
//! result the way the sender would.

use pagebot_core::{
    add_message_element, make_message, make_postback_button, make_url_button, validate_callback,
    validate_message, TemplateStore,
};
use serde_json::{json, Map, Value};
use std::fs;

fn fixture_store() -> (tempfile::TempDir, TemplateStore) {
    let dir = tempfile::tempdir().unwrap();
    let fixtures: &[(&str, &str)] = &[
        (
            "text_message.json",
            r#"{"recipient": {"id": ""}, "message": {"text": "{{message_text}}"}}"#,
        ),
        (
            "image_message.json",
            r#"{"recipient": {"id": ""}, "message": {"attachment": {"type": "image", "payload": {"url": "{{image_url}}"}}}}"#,
        ),
        (
            "button_message.json",
            r#"{"recipient": {"id": ""}, "message": {"attachment": {"type": "template", "payload": {"template_type": "button", "text": "{{prompt_text}}", "buttons": []}}}}"#,
        ),
        (
            "generic_message.json",
            r#"{"recipient": {"id": ""}, "message": {"attachment": {"type": "template", "payload": {"template_type": "generic", "elements": []}}}}"#,
        ),
        (
            "_element.json",
            r#"{"title": "{{element_title}}", "subtitle": "{{element_subtitle}}", "image_url": "{{element_image_url}}", "item_url": "{{element_item_url}}"}"#,
        ),
        (
            "_url_button.json",
            r#"{"type": "web_url", "title": "{{button_title}}", "url": "{{button_url}}"}"#,
        ),
        (
            "_postback_button.json",
            r#"{"type": "postback", "title": "{{button_title}}", "payload": "{{button_payload}}"}"#,
        ),
    ];
    for (name, body) in fixtures {
        fs::write(dir.path().join(name), body).unwrap();
    }
    let store = TemplateStore::new(dir.path());
    (dir, store)
}

fn data(pairs: &[(&str, &str)]) -> Map<String, Value> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), json!(v)))
        .collect()
}

#[test]
fn text_message_is_ready_to_send() {
    let (_dir, store) = fixture_store();
    let message = make_message(
        &store,
        "1789953497899630",
        "text_message",
        Some(&data(&[("message_text", "hello, world!")])),
        None,
    )
    .unwrap();

    assert_eq!(
        message,
        json!({
            "recipient": {"id": "1789953497899630"},
            "message": {"text": "hello, world!"}
        })
    );
    validate_message(&message).unwrap();
}

#[test]
fn button_message_with_both_button_kinds() {
    let (_dir, store) = fixture_store();
    let url_button = make_url_button(&store, "Docs", "https://example.com/docs").unwrap();
    let postback_button = make_postback_button(&store, "Start", "USER_START").unwrap();

    let message = make_message(
        &store,
        "1789953497899630",
        "button_message",
        Some(&data(&[("prompt_text", "Pick one:")])),
        Some(&[url_button.clone(), postback_button.clone()]),
    )
    .unwrap();

    let payload = &message["message"]["attachment"]["payload"];
    assert_eq!(payload["text"], "Pick one:");
    assert_eq!(payload["buttons"], json!([url_button, postback_button]));
    validate_message(&message).unwrap();
}

#[test]
fn generic_message_accumulates_elements() {
    let (_dir, store) = fixture_store();
    let mut message =
        make_message(&store, "1789953497899630", "generic_message", None, None).unwrap();

    let button = make_postback_button(&store, "Buy", "BUY:sku-1").unwrap();
    add_message_element(
        &store,
        &mut message,
        "First",
        Some("the first element"),
        Some("https://example.com/a.png"),
        None,
        Some(&[button]),
    )
    .unwrap();
    add_message_element(&store, &mut message, "Second", None, None, None, None).unwrap();

    let elements = message["message"]["attachment"]["payload"]["elements"]
        .as_array()
        .unwrap();
    assert_eq!(elements.len(), 2);
    assert_eq!(elements[0]["title"], "First");
    assert_eq!(elements[0]["buttons"].as_array().unwrap().len(), 1);
    // Absent optionals substitute as empty strings rather than leaking
    // placeholder literals.
    assert_eq!(
        elements[1],
        json!({"title": "Second", "subtitle": "", "image_url": "", "item_url": ""})
    );
    validate_message(&message).unwrap();
}

#[test]
fn element_on_non_generic_message_is_an_error() {
    let (_dir, store) = fixture_store();
    let mut message = make_message(
        &store,
        "1789953497899630",
        "text_message",
        Some(&data(&[("message_text", "hi")])),
        None,
    )
    .unwrap();

    let err =
        add_message_element(&store, &mut message, "Nope", None, None, None, None).unwrap_err();
    assert!(err.to_string().starts_with("500"));
}

#[test]
fn buttons_are_ignored_on_non_button_templates() {
    let (_dir, store) = fixture_store();
    let button = make_url_button(&store, "Docs", "https://example.com").unwrap();
    let message = make_message(
        &store,
        "1789953497899630",
        "text_message",
        Some(&data(&[("message_text", "hi")])),
        Some(&[button]),
    )
    .unwrap();
    assert_eq!(message["message"], json!({"text": "hi"}));
}

#[test]
fn image_message_renders_url() {
    let (_dir, store) = fixture_store();
    let message = make_message(
        &store,
        "1789953497899630",
        "image_message",
        Some(&data(&[("image_url", "https://example.com/cat.png")])),
        None,
    )
    .unwrap();
    assert_eq!(
        message["message"]["attachment"]["payload"]["url"],
        "https://example.com/cat.png"
    );
    validate_message(&message).unwrap();
}

#[test]
fn callback_fixtures_from_live_traffic_validate() {
    let text = json!({
        "object": "page",
        "entry": [{
            "id": "250612827219",
            "time": 1478229618321u64,
            "messaging": [{
                "sender": {"id": "1789953497899630"},
                "recipient": {"id": "250612827219"},
                "timestamp": 1478229618247u64,
                "message": {
                    "mid": "mid.1478229618203:1ca78a5836",
                    "seq": 146,
                    "text": "hi there"
                }
            }]
        }]
    });
    validate_callback(&text).unwrap();

    let delivery = json!({
        "object": "page",
        "entry": [{
            "id": "250612827219",
            "time": 1478229618594u64,
            "messaging": [{
                "sender": {"id": "1789953497899630"},
                "recipient": {"id": "250612827219"},
                "delivery": {
                    "mids": ["mid.1478229618203:1ca78a5836"],
                    "watermark": 1478229618428u64,
                    "seq": 147
                }
            }]
        }]
    });
    validate_callback(&delivery).unwrap();
}

#[test]
fn callback_error_paths_use_dotted_properties() {
    let err = validate_callback(&json!({"object": "page"})).unwrap_err();
    assert!(err.to_string().contains("$.entry"), "got {err}");

    let err = validate_callback(&json!({
        "object": "page",
        "entry": [{
            "id": "250612827219",
            "time": 1478229618321u64,
            "messaging": [{
                "sender": {"id": "1789953497899630"},
                "recipient": {"id": "250612827219"},
                "timestamp": 1478229618247u64,
                "message": {"mid": "mid.1", "seq": 146}
            }]
        }]
    }))
    .unwrap_err();
    assert!(
        err.to_string().contains("text, attachments"),
        "got {err}"
    );
}
