//! Declarative UI gating rules.
//!
//! Dashboard elements carry an optional allow-list of role labels
//! (`data-roles`) and an optional deny-list (`data-hide-for`). The browser
//! posts the rules it found on the page and applies the decisions once per
//! page load.

use serde::{Deserialize, Serialize};

use crate::roles::Role;

/// Gating attributes of one element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GateRule {
    /// Caller-chosen identifier echoed back with the decision.
    pub id: String,
    /// Roles allowed to see the element. `None` means no allow-list.
    #[serde(default)]
    pub roles: Option<Vec<String>>,
    /// Roles the element is hidden from.
    #[serde(default)]
    pub hide_for: Vec<String>,
    /// Buttons, links and `data-action` elements are disabled as well as
    /// hidden when gated out.
    #[serde(default)]
    pub actionable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GateDecision {
    Visible,
    Hidden,
    HiddenDisabled,
}

fn lists_role(labels: &[String], role: Role) -> bool {
    labels.iter().any(|label| label.trim() == role.as_str())
}

/// Decide how an element is rendered for `role`.
///
/// The allow-list is applied first; the deny-list can only hide further.
pub fn evaluate(role: Role, rule: &GateRule) -> GateDecision {
    if let Some(allowed) = &rule.roles {
        if !lists_role(allowed, role) {
            return if rule.actionable {
                GateDecision::HiddenDisabled
            } else {
                GateDecision::Hidden
            };
        }
    }
    if lists_role(&rule.hide_for, role) {
        return GateDecision::Hidden;
    }
    GateDecision::Visible
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(roles: Option<&[&str]>, hide_for: &[&str], actionable: bool) -> GateRule {
        GateRule {
            id: "el".into(),
            roles: roles.map(|r| r.iter().map(|s| s.to_string()).collect()),
            hide_for: hide_for.iter().map(|s| s.to_string()).collect(),
            actionable,
        }
    }

    #[test]
    fn test_untagged_element_is_visible() {
        assert_eq!(evaluate(Role::TeamMember, &GateRule::default()), GateDecision::Visible);
    }

    #[test]
    fn test_allow_list_hides_and_disables_actions() {
        let button = rule(Some(&["Admin", " Project Manager"]), &[], true);
        assert_eq!(evaluate(Role::ProjectManager, &button), GateDecision::Visible);
        assert_eq!(evaluate(Role::Finance, &button), GateDecision::HiddenDisabled);

        let panel = rule(Some(&["Admin"]), &[], false);
        assert_eq!(evaluate(Role::Finance, &panel), GateDecision::Hidden);
    }

    #[test]
    fn test_deny_list_hides() {
        let el = rule(None, &["Team Member"], true);
        assert_eq!(evaluate(Role::TeamMember, &el), GateDecision::Hidden);
        assert_eq!(evaluate(Role::Admin, &el), GateDecision::Visible);
    }

    #[test]
    fn test_rule_deserializes_from_camel_case() {
        let parsed: GateRule =
            serde_json::from_str(r#"{"id":"btnNew","roles":["Admin"],"hideFor":[]}"#).unwrap();
        assert_eq!(parsed.roles, Some(vec!["Admin".to_string()]));
        assert!(!parsed.actionable);
    }
}
