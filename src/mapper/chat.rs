use serde_json::Value;

use super::positional::{truthy, Positional};
use crate::models::{ChatGoal, ChatSettings, ResponseLength};

/// Map a chat configuration response.
///
/// The server echoes the notebook record; its settings block sits in slot 7.
pub fn map_chat_settings(
    result: &Value,
    notebook_id: &str,
    goal: ChatGoal,
    custom_prompt: Option<&str>,
    response_length: ResponseLength,
) -> Option<ChatSettings> {
    if !truthy(result) {
        return None;
    }
    Some(ChatSettings {
        notebook_id: notebook_id.to_string(),
        goal,
        custom_prompt: custom_prompt
            .filter(|_| goal == ChatGoal::Custom)
            .map(str::to_string),
        response_length,
        raw_settings: result.at(7).cloned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_settings_block_is_kept() {
        let result = json!(["Title", null, "nb", null, null, [1], null, [[2, "Be terse"], [5]]]);
        let settings = map_chat_settings(&result, "nb", ChatGoal::Custom, Some("Be terse"), ResponseLength::Shorter).unwrap();
        assert_eq!(settings.raw_settings, Some(json!([[2, "Be terse"], [5]])));
        assert_eq!(settings.custom_prompt.as_deref(), Some("Be terse"));
    }

    #[test]
    fn test_prompt_dropped_for_non_custom_goal() {
        let settings = map_chat_settings(&json!(["T"]), "nb", ChatGoal::Default, Some("ignored"), ResponseLength::Default).unwrap();
        assert_eq!(settings.custom_prompt, None);
        assert_eq!(settings.raw_settings, None);
    }

    #[test]
    fn test_empty_response_is_failure() {
        assert!(map_chat_settings(&json!([]), "nb", ChatGoal::Default, None, ResponseLength::Default).is_none());
    }
}
