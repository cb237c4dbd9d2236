//! Structural validation for inbound callbacks and outbound messages.
//!
//! Both validators walk raw `serde_json::Value` payloads depth-first and fail
//! on the first violation. Errors carry the dotted property path of the field
//! that failed (`$.entry[].messaging[].message.mid`); this path format is part
//! of the observable contract and must not change.

use crate::error::WebhookError;
use serde_json::Value;

// Messenger's published guidance for structured messages:
//
//   Title: 45 characters
//   Subtitle: 80 characters
//   Call-to-action title: 20 characters
//   Call-to-action items: 3 buttons
//   Bubbles per message (horizontal scroll): 10 elements
//
// Exceeding these is advisory only; we warn and send anyway.
const TITLE_WARN_LEN: usize = 45;
const SUBTITLE_WARN_LEN: usize = 80;
const BUTTON_TITLE_WARN_LEN: usize = 20;
const BUTTONS_WARN_COUNT: usize = 3;
const ELEMENTS_WARN_COUNT: usize = 10;

/// Falsy in the wire-contract sense: absent, null, empty
/// string/array/object, or a zero number all count as missing. A legitimate
/// zero watermark/seq is therefore rejected too; callers depend on that
/// behavior, so it stays.
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f == 0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

// The published limits are character counts, so multibyte text must not be
// measured in bytes.
fn char_len(text: &str) -> usize {
    text.chars().count()
}

fn field_falsy(value: &Value, key: &str) -> bool {
    value.get(key).map(is_falsy).unwrap_or(true)
}

fn require(value: &Value, key: &str, path: &str) -> Result<(), WebhookError> {
    if field_falsy(value, key) {
        return Err(WebhookError::missing_property(path));
    }
    Ok(())
}

/// Validates that callback data received from the platform is complete and
/// well-formed. Must pass before any event handler runs.
pub fn validate_callback(data: &Value) -> Result<(), WebhookError> {
    if data.get("object").and_then(Value::as_str) != Some("page") {
        return Err(WebhookError::bad_value("$.object", "must be set to 'page'"));
    }

    let entries = match data.get("entry") {
        None => return Err(WebhookError::missing_property("$.entry")),
        Some(value) => value
            .as_array()
            .filter(|items| !items.is_empty())
            .ok_or_else(|| WebhookError::empty_value("$.entry"))?,
    };

    for entry in entries {
        require(entry, "id", "$.entry[].id")?;
        require(entry, "time", "$.entry[].time")?;

        let items = match entry.get("messaging") {
            None => return Err(WebhookError::missing_property("$.entry[].messaging")),
            Some(value) => value
                .as_array()
                .filter(|items| !items.is_empty())
                .ok_or_else(|| WebhookError::empty_value("$.entry[].messaging"))?,
        };

        for item in items {
            validate_messaging_item(item)?;
        }
    }

    Ok(())
}

fn validate_messaging_item(item: &Value) -> Result<(), WebhookError> {
    if item.get("sender").is_none() {
        return Err(WebhookError::missing_property("$.entry[].messaging[].sender"));
    }
    if field_falsy(&item["sender"], "id") {
        return Err(WebhookError::missing_property(
            "$.entry[].messaging[].sender.id",
        ));
    }
    if item.get("recipient").is_none() {
        return Err(WebhookError::missing_property(
            "$.entry[].messaging[].recipient",
        ));
    }
    if field_falsy(&item["recipient"], "id") {
        return Err(WebhookError::missing_property(
            "$.entry[].messaging[].recipient.id",
        ));
    }

    // Discriminator keys checked in fixed priority order; delivery receipts
    // are the one variant that does not carry a timestamp.
    if let Some(optin) = item.get("optin") {
        require(item, "timestamp", "$.entry[].messaging[].timestamp")?;
        validate_auth(optin)
    } else if let Some(message) = item.get("message") {
        require(item, "timestamp", "$.entry[].messaging[].timestamp")?;
        validate_received_message(message)
    } else if let Some(delivery) = item.get("delivery") {
        validate_delivery(delivery)
    } else if let Some(postback) = item.get("postback") {
        require(item, "timestamp", "$.entry[].messaging[].timestamp")?;
        validate_user_postback(postback)
    } else {
        Err(WebhookError::bad_value(
            "$.entry[].messaging[]",
            "must contain one of 'optin', 'message', 'delivery' or 'postback'",
        ))
    }
}

fn validate_auth(optin: &Value) -> Result<(), WebhookError> {
    if is_falsy(optin) {
        return Err(WebhookError::missing_property("$.entry[].messaging[].optin"));
    }
    require(optin, "ref", "$.entry[].messaging[].optin.ref")
}

fn validate_received_message(message: &Value) -> Result<(), WebhookError> {
    if is_falsy(message) {
        return Err(WebhookError::missing_property(
            "$.entry[].messaging[].message",
        ));
    }
    require(message, "mid", "$.entry[].messaging[].message.mid")?;
    require(message, "seq", "$.entry[].messaging[].message.seq")?;

    if message.get("text").is_some() {
        require(message, "text", "$.entry[].messaging[].message.text")
    } else if let Some(attachments) = message.get("attachments") {
        let attachments = attachments
            .as_array()
            .filter(|items| !items.is_empty())
            .ok_or_else(|| {
                WebhookError::empty_value("$.entry[].messaging[].message.attachments")
            })?;
        for attachment in attachments {
            validate_received_attachment(attachment)?;
        }
        Ok(())
    } else {
        Err(WebhookError::missing_property(
            "$.entry[].messaging[].message must have one of: text, attachments",
        ))
    }
}

fn validate_received_attachment(attachment: &Value) -> Result<(), WebhookError> {
    if is_falsy(attachment) {
        return Err(WebhookError::missing_property(
            "$.entry[].messaging[].message.attachment[]",
        ));
    }
    match attachment.get("type").and_then(Value::as_str) {
        Some("image") | Some("video") | Some("audio") => {}
        _ => {
            return Err(WebhookError::bad_value(
                "$.entry[].messaging[].message.attachment[].type",
                "must be one of 'image', 'video' or 'audio'",
            ));
        }
    }
    let payload = attachment.get("payload").ok_or_else(|| {
        WebhookError::missing_property("$.entry[].messaging[].message.attachment[].payload")
    })?;
    require(
        payload,
        "url",
        "$.entry[].messaging[].message.attachment[].payload.url",
    )
}

fn validate_delivery(delivery: &Value) -> Result<(), WebhookError> {
    if is_falsy(delivery) {
        return Err(WebhookError::missing_property(
            "$.entry[].messaging[].delivery",
        ));
    }
    require(delivery, "watermark", "$.entry[].messaging[].delivery.watermark")?;
    require(delivery, "seq", "$.entry[].messaging[].delivery.seq")?;

    let mids = match delivery.get("mids") {
        None => {
            return Err(WebhookError::missing_property(
                "$.entry[].messaging[].delivery.mids",
            ));
        }
        Some(value) => value
            .as_array()
            .filter(|items| !items.is_empty())
            .ok_or_else(|| WebhookError::empty_value("$.entry[].messaging[].delivery.mids"))?,
    };
    for mid in mids {
        if is_falsy(mid) {
            // Only presence is checked; the `mid.<ts>:<hash>` shape is not.
            return Err(WebhookError::missing_property(
                "$.entry[].messaging[].delivery.mids[]",
            ));
        }
    }
    Ok(())
}

fn validate_user_postback(postback: &Value) -> Result<(), WebhookError> {
    if is_falsy(postback) {
        return Err(WebhookError::missing_property(
            "$.entry[].messaging[].postback",
        ));
    }
    require(postback, "payload", "$.entry[].messaging[].postback.payload")
}

/// Validates an assembled outbound message against the platform's structural
/// constraints before it is handed to the sender. Recommended length/count
/// limits only produce warnings.
pub fn validate_message(message: &Value) -> Result<(), WebhookError> {
    if is_falsy(message) {
        return Err(WebhookError::empty_value("$"));
    }

    let recipient = message
        .get("recipient")
        .ok_or_else(|| WebhookError::missing_property("$.recipient"))?;
    if let Some(id) = recipient.get("id") {
        if is_falsy(id) {
            return Err(WebhookError::empty_value("$.recipient.id"));
        }
    } else if let Some(phone) = recipient.get("phone_number") {
        if is_falsy(phone) {
            return Err(WebhookError::empty_value("$.recipient.phone_number"));
        }
    } else {
        return Err(WebhookError::bad_value(
            "$.message.recipient",
            "must contain either 'id' or 'phone_number'",
        ));
    }

    let body = message
        .get("message")
        .ok_or_else(|| WebhookError::missing_property("$.message"))?;
    if is_falsy(body) {
        return Err(WebhookError::empty_value("$.message"));
    }

    if let Some(text) = body.get("text") {
        if is_falsy(text) {
            return Err(WebhookError::empty_value("$.message.text"));
        }
        Ok(())
    } else if let Some(attachment) = body.get("attachment") {
        validate_attachment(attachment, "$.message.attachment")
    } else {
        Err(WebhookError::bad_value(
            "$.message",
            "must contain either 'text' or 'attachment'",
        ))
    }
}

fn validate_attachment(attachment: &Value, base: &str) -> Result<(), WebhookError> {
    if is_falsy(attachment) {
        return Err(WebhookError::empty_value(base));
    }
    let payload = attachment
        .get("payload")
        .ok_or_else(|| WebhookError::missing_property(&format!("{base}.payload")))?;
    if is_falsy(payload) {
        return Err(WebhookError::empty_value(&format!("{base}.payload")));
    }
    match attachment.get("type").and_then(Value::as_str) {
        Some("image") => {
            let url = payload
                .get("url")
                .ok_or_else(|| WebhookError::missing_property(&format!("{base}.payload.url")))?;
            if is_falsy(url) {
                return Err(WebhookError::empty_value(&format!("{base}.payload.url")));
            }
            Ok(())
        }
        Some("template") => validate_template(payload, &format!("{base}.payload")),
        _ => Err(WebhookError::bad_value(
            "$.message.attachment.type",
            "must contain either 'image' or 'template'",
        )),
    }
}

fn validate_template(template: &Value, base: &str) -> Result<(), WebhookError> {
    match template.get("template_type").and_then(Value::as_str) {
        None => {
            if template.get("template_type").is_none() {
                Err(WebhookError::missing_property(&format!(
                    "{base}.template_type"
                )))
            } else {
                Err(WebhookError::empty_value(&format!("{base}.template_type")))
            }
        }
        Some("") => Err(WebhookError::empty_value(&format!("{base}.template_type"))),
        Some("button") => validate_button_template(template, base),
        Some("generic") => validate_generic_template(template, base),
        Some(_) => Err(WebhookError::bad_value(
            &format!("{base}.template_type"),
            "must contain either 'button' or 'generic'",
        )),
    }
}

fn validate_button_template(template: &Value, base: &str) -> Result<(), WebhookError> {
    let text = template
        .get("text")
        .ok_or_else(|| WebhookError::missing_property(&format!("{base}.text")))?;
    if is_falsy(text) {
        return Err(WebhookError::empty_value(&format!("{base}.text")));
    }
    if let Some(text) = text.as_str() {
        if char_len(text) > BUTTON_TITLE_WARN_LEN {
            tracing::warn!(
                length = char_len(text),
                max = BUTTON_TITLE_WARN_LEN,
                "button template text exceeds the recommended maximum"
            );
        }
    }
    validate_button_list(template.get("buttons"), base)
}

fn validate_generic_template(template: &Value, base: &str) -> Result<(), WebhookError> {
    let elements = template
        .get("elements")
        .and_then(Value::as_array)
        .ok_or_else(|| WebhookError::missing_property(&format!("{base}.elements")))?;
    if elements.len() > ELEMENTS_WARN_COUNT {
        tracing::warn!(
            count = elements.len(),
            max = ELEMENTS_WARN_COUNT,
            "template element count exceeds the recommended maximum"
        );
    }
    for element in elements {
        validate_element(element, &format!("{base}.elements[]"))?;
    }
    Ok(())
}

fn validate_element(element: &Value, base: &str) -> Result<(), WebhookError> {
    if is_falsy(element) {
        return Err(WebhookError::empty_value(base));
    }
    let title = element
        .get("title")
        .ok_or_else(|| WebhookError::missing_property(&format!("{base}.title")))?;
    if is_falsy(title) {
        return Err(WebhookError::empty_value(&format!("{base}.title")));
    }
    if let Some(title) = title.as_str() {
        if char_len(title) > TITLE_WARN_LEN {
            tracing::warn!(
                length = char_len(title),
                max = TITLE_WARN_LEN,
                "element title exceeds the recommended maximum"
            );
        }
    }
    if let Some(subtitle) = element.get("subtitle").and_then(Value::as_str) {
        if char_len(subtitle) > SUBTITLE_WARN_LEN {
            tracing::warn!(
                length = char_len(subtitle),
                max = SUBTITLE_WARN_LEN,
                "element subtitle exceeds the recommended maximum"
            );
        }
    }
    validate_button_list(element.get("buttons"), base)
}

fn validate_button_list(buttons: Option<&Value>, base: &str) -> Result<(), WebhookError> {
    let Some(buttons) = buttons.and_then(Value::as_array) else {
        return Ok(());
    };
    if buttons.len() > BUTTONS_WARN_COUNT {
        tracing::warn!(
            count = buttons.len(),
            max = BUTTONS_WARN_COUNT,
            "button count exceeds the recommended maximum"
        );
    }
    for button in buttons {
        validate_button(button, &format!("{base}.button[]"))?;
    }
    Ok(())
}

fn validate_button(button: &Value, base: &str) -> Result<(), WebhookError> {
    if is_falsy(button) {
        return Err(WebhookError::empty_value(base));
    }
    let title = button
        .get("title")
        .ok_or_else(|| WebhookError::missing_property(&format!("{base}.title")))?;
    if is_falsy(title) {
        return Err(WebhookError::empty_value(&format!("{base}.title")));
    }
    if let Some(title) = title.as_str() {
        if char_len(title) > BUTTON_TITLE_WARN_LEN {
            tracing::warn!(
                length = char_len(title),
                max = BUTTON_TITLE_WARN_LEN,
                "button title exceeds the recommended maximum"
            );
        }
    }
    match button.get("type").and_then(Value::as_str) {
        None => {
            if button.get("type").is_none() {
                Err(WebhookError::missing_property(&format!("{base}.type")))
            } else {
                Err(WebhookError::bad_value(
                    &format!("{base}.type"),
                    "must contain either 'web_url' or 'postback'",
                ))
            }
        }
        Some("web_url") => {
            let url = button
                .get("url")
                .ok_or_else(|| WebhookError::missing_property(&format!("{base}.url")))?;
            if is_falsy(url) {
                return Err(WebhookError::empty_value(&format!("{base}.url")));
            }
            Ok(())
        }
        Some("postback") => {
            let payload = button
                .get("payload")
                .ok_or_else(|| WebhookError::missing_property(&format!("{base}.payload")))?;
            if is_falsy(payload) {
                return Err(WebhookError::empty_value(&format!("{base}.payload")));
            }
            Ok(())
        }
        Some(_) => Err(WebhookError::bad_value(
            &format!("{base}.type"),
            "must contain either 'web_url' or 'postback'",
        )),
    }
}
