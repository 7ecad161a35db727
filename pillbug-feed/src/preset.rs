use pillbug_ref::StatusId;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::{fmt, str::FromStr};

use crate::{Action, Condition, FeedError, FeedRule, FieldPath};

/// Rule sets shipped with the client, picked per feed view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedPreset {
    Following,
    Pillbug,
}

impl FeedPreset {
    pub fn rules(&self) -> Vec<FeedRule> {
        match self {
            FeedPreset::Following => following_rules(),
            FeedPreset::Pillbug => {
                let mut rules = following_rules();
                rules.push(FeedRule::new(
                    "label pillbug posts",
                    Condition::Equal {
                        path: FieldPath::from_static("/application/name"),
                        value: json!("pillbug"),
                    },
                    Action::ApplyLabel {
                        label: "pillbug".to_string(),
                    },
                ));
                rules
            }
        }
    }
}

fn following_rules() -> Vec<FeedRule> {
    vec![
        FeedRule::new(
            "hide replies",
            Condition::Present {
                path: FieldPath::from_static("/in_reply_to_id"),
            },
            Action::HidePost,
        ),
        FeedRule::new(
            "attach replied-to post",
            Condition::Present {
                path: FieldPath::from_static("/in_reply_to_id"),
            },
            Action::AttachLinked,
        ),
    ]
}

impl FromStr for FeedPreset {
    type Err = FeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "following" => Ok(FeedPreset::Following),
            "pillbug" => Ok(FeedPreset::Pillbug),
            _ => Err(FeedError::UnknownPreset(s.to_string())),
        }
    }
}

impl fmt::Display for FeedPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedPreset::Following => f.write_str("following"),
            FeedPreset::Pillbug => f.write_str("pillbug"),
        }
    }
}

/// How a feed view is fetched and filtered.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct FeedConfig {
    #[serde(default)]
    pub preset: Option<FeedPreset>,
    #[serde(default)]
    pub rules: Vec<FeedRule>,
    #[serde(default = "FeedConfig::default_limit")]
    pub limit: u32,
    // window bounds, exclusive
    #[serde(default)]
    pub since_id: Option<StatusId>,
    #[serde(default)]
    pub max_id: Option<StatusId>,
}

impl FeedConfig {
    pub fn default_limit() -> u32 {
        20
    }

    /// Preset rules first, then the ones configured by hand.
    pub fn rules(&self) -> Vec<FeedRule> {
        let mut rules = self.preset.map(|preset| preset.rules()).unwrap_or_default();
        rules.extend(self.rules.iter().cloned());
        rules
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            preset: None,
            rules: Vec::new(),
            limit: Self::default_limit(),
            since_id: None,
            max_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluate;
    use pillbug_msg::Status;
    use pretty_assertions::assert_eq;

    fn status(id: &str, in_reply_to_id: Option<&str>, application: &str) -> Status {
        serde_json::from_value(json!({
            "id": id,
            "account": { "id": "1", "username": "alice", "acct": "alice" },
            "in_reply_to_id": in_reply_to_id,
            "application": { "name": application },
        }))
        .unwrap()
    }

    #[test]
    fn test_following_preset() {
        let posts = vec![
            status("1", None, "pillbug"),
            status("2", Some("1"), "web"),
        ];
        let annotated = evaluate(&posts, &FeedPreset::Following.rules()).unwrap();

        assert!(!annotated[0].hide);
        assert!(!annotated[0].attach_linked);
        assert!(annotated[0].labels.is_empty());
        assert!(annotated[1].hide);
        assert!(annotated[1].attach_linked);
    }

    #[test]
    fn test_pillbug_preset_labels() {
        let posts = vec![
            status("1", None, "pillbug"),
            status("2", None, "web"),
            status("3", Some("2"), "pillbug"),
        ];
        let annotated = evaluate(&posts, &FeedPreset::Pillbug.rules()).unwrap();

        assert_eq!(annotated[0].labels, vec!["pillbug".to_string()]);
        assert!(annotated[1].labels.is_empty());
        assert!(annotated[2].hide);
        assert_eq!(annotated[2].labels, vec!["pillbug".to_string()]);
    }

    #[test]
    fn test_preset_names() {
        assert_eq!("pillbug".parse::<FeedPreset>().unwrap(), FeedPreset::Pillbug);
        assert_eq!(FeedPreset::Following.to_string(), "following");
        assert!(matches!(
            "home".parse::<FeedPreset>(),
            Err(FeedError::UnknownPreset(_))
        ));
    }

    #[test]
    fn test_config_from_yaml() {
        let config: FeedConfig = serde_yaml::from_str(
            r#"
preset: following
limit: 40
since_id: "1000"
rules:
  - name: label bots
    condition:
      op: equal
      path: /account/bot
      value: true
    action:
      type: apply_label
      label: bot
"#,
        )
        .unwrap();

        assert_eq!(config.preset, Some(FeedPreset::Following));
        assert_eq!(config.limit, 40);
        assert_eq!(config.since_id.as_ref().map(StatusId::as_str), Some("1000"));
        assert_eq!(config.max_id, None);

        let rules = config.rules();
        assert_eq!(rules.len(), 3);
        assert_eq!(rules[2].name, "label bots");
    }

    #[test]
    fn test_config_defaults() {
        let config: FeedConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, FeedConfig::default());
        assert!(config.rules().is_empty());
    }
}
