//! Outbound message composition from named templates.
//!
//! `make_message` materializes a template for a recipient; the element and
//! button helpers assemble carousel content on top of it. Everything here
//! produces plain JSON in outbound-message shape; validation happens in the
//! sender right before the wire.

use crate::error::WebhookError;
use crate::render::render;
use crate::templates::TemplateStore;
use serde_json::{json, Map, Value};

/// Loads the named template, addresses it, renders any supplied data, and,
/// for button-style templates only, appends the supplied buttons to the
/// template's existing button list.
pub fn make_message(
    store: &TemplateStore,
    recipient_id: &str,
    template_name: &str,
    data: Option<&Map<String, Value>>,
    buttons: Option<&[Value]>,
) -> Result<Value, WebhookError> {
    let mut message = store.load(template_name)?;

    match message.get_mut("recipient").and_then(Value::as_object_mut) {
        Some(recipient) => {
            recipient.insert("id".to_string(), json!(recipient_id));
        }
        None => {
            tracing::error!(template = %template_name, "template has no recipient object");
            return Err(WebhookError::internal("failed to render template"));
        }
    }

    if let Some(data) = data {
        render(&mut message, data);
    }

    if let Some(buttons) = buttons {
        if let Some(list) = button_template_buttons(&mut message) {
            list.extend(buttons.iter().cloned());
        }
    }

    Ok(message)
}

/// Builds one carousel element from the `_element` template and appends it to
/// the generic template's element list. Absent optional fields substitute as
/// empty strings.
pub fn add_message_element(
    store: &TemplateStore,
    message: &mut Value,
    title: &str,
    subtitle: Option<&str>,
    image_url: Option<&str>,
    item_url: Option<&str>,
    buttons: Option<&[Value]>,
) -> Result<(), WebhookError> {
    let mut element = store.load("_element")?;

    let mut substitutions = Map::new();
    substitutions.insert("element_title".to_string(), json!(title));
    substitutions.insert(
        "element_subtitle".to_string(),
        json!(subtitle.unwrap_or_default()),
    );
    substitutions.insert(
        "element_image_url".to_string(),
        json!(image_url.unwrap_or_default()),
    );
    substitutions.insert(
        "element_item_url".to_string(),
        json!(item_url.unwrap_or_default()),
    );
    render(&mut element, &substitutions);

    if let Some(buttons) = buttons {
        if let Some(element) = element.as_object_mut() {
            element.insert("buttons".to_string(), json!(buttons));
        }
    }

    match generic_template_elements(message) {
        Some(elements) => {
            elements.push(element);
            Ok(())
        }
        None => {
            tracing::error!("message is not a generic template; cannot append element");
            Err(WebhookError::internal("failed to render template"))
        }
    }
}

/// Renders a web-url button fragment.
pub fn make_url_button(
    store: &TemplateStore,
    title: &str,
    url: &str,
) -> Result<Value, WebhookError> {
    let mut button = store.load("_url_button")?;
    let mut substitutions = Map::new();
    substitutions.insert("button_title".to_string(), json!(title));
    substitutions.insert("button_url".to_string(), json!(url));
    render(&mut button, &substitutions);
    Ok(button)
}

/// Renders a postback button fragment; `payload` comes back verbatim in the
/// postback callback when the button is tapped.
pub fn make_postback_button(
    store: &TemplateStore,
    title: &str,
    payload: &str,
) -> Result<Value, WebhookError> {
    let mut button = store.load("_postback_button")?;
    let mut substitutions = Map::new();
    substitutions.insert("button_title".to_string(), json!(title));
    substitutions.insert("button_payload".to_string(), json!(payload));
    render(&mut button, &substitutions);
    Ok(button)
}

fn template_payload<'a>(message: &'a mut Value, template_type: &str) -> Option<&'a mut Value> {
    let payload = message
        .get_mut("message")?
        .get_mut("attachment")?
        .get_mut("payload")?;
    if payload.get("template_type").and_then(Value::as_str) != Some(template_type) {
        return None;
    }
    Some(payload)
}

fn button_template_buttons(message: &mut Value) -> Option<&mut Vec<Value>> {
    template_payload(message, "button")?
        .get_mut("buttons")?
        .as_array_mut()
}

fn generic_template_elements(message: &mut Value) -> Option<&mut Vec<Value>> {
    template_payload(message, "generic")?
        .get_mut("elements")?
        .as_array_mut()
}
