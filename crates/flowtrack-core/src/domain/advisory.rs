//! Advisory state cached between sessions: the last advice the assistant gave
//! and the tips extracted from it. The plan builder draws its tip pool from
//! here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What the user last asked the assistant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdvisoryAction {
    Analyze,
    Schedule,
    Tips,
    Summary,
    Chat,
}

impl AdvisoryAction {
    /// Keyword classification of a chat message. First match wins.
    pub fn classify(message: &str) -> Self {
        let lower = message.to_lowercase();
        let has = |words: &[&str]| words.iter().any(|w| lower.contains(w));

        if has(&["analyze", "analysis"]) {
            AdvisoryAction::Analyze
        } else if has(&["schedule", "optimize"]) {
            AdvisoryAction::Schedule
        } else if has(&["tip", "productivity"]) {
            AdvisoryAction::Tips
        } else if has(&["summary", "progress"]) {
            AdvisoryAction::Summary
        } else {
            AdvisoryAction::Chat
        }
    }
}

/// The whole cached blob.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdvisoryState {
    pub last_action: Option<AdvisoryAction>,
    pub latest_response: Option<String>,
    pub latest_tips: Vec<String>,
    pub base_tips: Vec<String>,
    pub suggestions: Vec<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Keys to overwrite on the next write. Keys left `None` keep their value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdvisoryPatch {
    pub last_action: Option<AdvisoryAction>,
    pub latest_response: Option<String>,
    pub latest_tips: Option<Vec<String>>,
    pub base_tips: Option<Vec<String>>,
    pub suggestions: Option<Vec<String>>,
}

impl AdvisoryState {
    pub fn merge(&mut self, patch: AdvisoryPatch, now: DateTime<Utc>) {
        if let Some(action) = patch.last_action {
            self.last_action = Some(action);
        }
        if let Some(response) = patch.latest_response {
            self.latest_response = Some(response);
        }
        if let Some(tips) = patch.latest_tips {
            self.latest_tips = tips;
        }
        if let Some(tips) = patch.base_tips {
            self.base_tips = tips;
        }
        if let Some(suggestions) = patch.suggestions {
            self.suggestions = suggestions;
        }
        self.updated_at = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    #[rstest]
    #[case("Can you analyze my tasks?", AdvisoryAction::Analyze)]
    #[case("Please optimize my day", AdvisoryAction::Schedule)]
    #[case("What are some productivity tips?", AdvisoryAction::Tips)]
    #[case("Give me a daily summary", AdvisoryAction::Summary)]
    #[case("hello there", AdvisoryAction::Chat)]
    fn classify_matches_first_keyword_group(#[case] message: &str, #[case] expected: AdvisoryAction) {
        assert_eq!(AdvisoryAction::classify(message), expected);
    }

    #[test]
    fn merge_keeps_untouched_keys() {
        let t0 = Utc.with_ymd_and_hms(2026, 2, 1, 8, 0, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(2026, 2, 2, 8, 0, 0).unwrap();
        let mut state = AdvisoryState::default();

        state.merge(
            AdvisoryPatch {
                base_tips: Some(vec!["Take breaks".into()]),
                suggestions: Some(vec!["Plan my week".into()]),
                ..AdvisoryPatch::default()
            },
            t0,
        );
        state.merge(
            AdvisoryPatch {
                last_action: Some(AdvisoryAction::Tips),
                latest_tips: Some(vec!["Batch similar tasks".into()]),
                ..AdvisoryPatch::default()
            },
            t1,
        );

        assert_eq!(state.base_tips, vec!["Take breaks".to_string()]);
        assert_eq!(state.suggestions, vec!["Plan my week".to_string()]);
        assert_eq!(state.latest_tips, vec!["Batch similar tasks".to_string()]);
        assert_eq!(state.last_action, Some(AdvisoryAction::Tips));
        assert_eq!(state.updated_at, Some(t1));
    }

    #[test]
    fn missing_keys_deserialize_to_defaults() {
        let state: AdvisoryState = serde_json::from_str(r#"{"latestTips":["a"]}"#).unwrap();
        assert_eq!(state.latest_tips, vec!["a".to_string()]);
        assert!(state.base_tips.is_empty());
        assert_eq!(state.last_action, None);
    }
}
