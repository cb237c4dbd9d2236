//! Two-phase template substitution and pruning.
//!
//! Templates are plain JSON documents whose scalar fields may hold
//! `"{{name}}"` placeholders. Rendering first replaces placeholders that have
//! a supplied substitution, recursing into nested objects and dropping any
//! that render down to nothing, then prunes whatever placeholders remain so
//! optional template sections vanish cleanly when their data is absent.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

// Prefix match, not a full anchor; trailing text after a placeholder still
// counts as unrendered.
static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\{\{.+\}\}").expect("placeholder pattern"));

/// Renders `template` in place using the supplied substitutions.
///
/// Arrays are never descended into or pruned; pruning examines scalar string
/// values only. With no substitutions this reduces to a single top-level
/// prune pass.
pub fn render(template: &mut Value, data: &Map<String, Value>) {
    let Some(fields) = template.as_object_mut() else {
        return;
    };

    for (name, replacement) in data {
        let placeholder = format!("{{{{{name}}}}}");
        let keys: Vec<String> = fields.keys().cloned().collect();
        for key in keys {
            let Some(value) = fields.get_mut(&key) else {
                continue;
            };
            if value.is_object() {
                render(value, data);
                if value.as_object().is_some_and(Map::is_empty) {
                    fields.remove(&key);
                }
            } else if value.as_str() == Some(placeholder.as_str()) {
                *value = replacement.clone();
            }
        }
    }

    fields.retain(|_, value| match value.as_str() {
        Some(text) => !PLACEHOLDER_RE.is_match(text),
        None => true,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn data(pairs: &[(&str, &str)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), json!(v)))
            .collect()
    }

    #[test]
    fn substitutes_exact_placeholder_matches() {
        let mut template = json!({"message": {"text": "{{message_text}}"}});
        render(&mut template, &data(&[("message_text", "hi")]));
        assert_eq!(template, json!({"message": {"text": "hi"}}));
    }

    #[test]
    fn prunes_unmatched_placeholders() {
        let mut template = json!({
            "title": "{{element_title}}",
            "subtitle": "{{element_subtitle}}"
        });
        render(&mut template, &data(&[("element_title", "A title")]));
        assert_eq!(template, json!({"title": "A title"}));
    }

    #[test]
    fn drops_nested_objects_that_render_empty() {
        let mut template = json!({
            "message": {"text": "{{message_text}}"},
            "extras": {"note": "{{note_text}}"}
        });
        render(&mut template, &data(&[("message_text", "hi")]));
        assert_eq!(template, json!({"message": {"text": "hi"}}));
    }

    #[test]
    fn leaves_arrays_untouched() {
        let mut template = json!({
            "buttons": ["{{not_pruned}}"],
            "text": "{{prompt_text}}"
        });
        render(&mut template, &data(&[("prompt_text", "pick one")]));
        assert_eq!(
            template,
            json!({"buttons": ["{{not_pruned}}"], "text": "pick one"})
        );
    }

    #[test]
    fn no_substitutions_only_prunes_top_level_scalars() {
        let mut template = json!({
            "kept": "plain",
            "dropped": "{{orphan}}",
            "nested": {"inner": "{{orphan}}"}
        });
        render(&mut template, &Map::new());
        // Recursion is driven by the substitution loop, so nested
        // placeholders survive an empty render.
        assert_eq!(
            template,
            json!({"kept": "plain", "nested": {"inner": "{{orphan}}"}})
        );
    }

    #[test]
    fn replacement_preserves_value_type() {
        let mut template = json!({"seq": "{{seq}}"});
        let mut substitutions = Map::new();
        substitutions.insert("seq".into(), json!(75));
        render(&mut template, &substitutions);
        assert_eq!(template, json!({"seq": 75}));
    }
}
