use std::collections::BTreeMap;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    Item,
    List,
}

/// One field of an extraction ruleset.
///
/// A bare selector returns the text of the first match. The detailed form
/// controls cardinality (`type`) and what is read from each match (`output`:
/// `"text"`, `"html"` or `"@attribute"`).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Rule {
    Selector(String),
    Detailed {
        selector: String,
        #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
        kind: Option<RuleKind>,
        #[serde(skip_serializing_if = "Option::is_none")]
        output: Option<String>,
    },
}

impl Rule {
    pub fn css(selector: &str) -> Rule {
        Rule::Selector(selector.to_string())
    }

    pub fn item(selector: &str, output: Option<&str>) -> Rule {
        Rule::Detailed {
            selector: selector.to_string(),
            kind: None,
            output: output.map(String::from),
        }
    }

    pub fn list(selector: &str, output: Option<&str>) -> Rule {
        Rule::Detailed {
            selector: selector.to_string(),
            kind: Some(RuleKind::List),
            output: output.map(String::from),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractRules {
    pub fields: BTreeMap<String, Rule>,
    pub wait_for: Option<String>,
}

impl ExtractRules {
    pub fn new() -> ExtractRules {
        ExtractRules::default()
    }

    pub fn field(mut self, name: &str, rule: Rule) -> ExtractRules {
        self.fields.insert(name.to_string(), rule);
        self
    }

    pub fn wait_for(mut self, selector: &str) -> ExtractRules {
        self.wait_for = Some(selector.to_string());
        self
    }

    /// JSON form sent in the `extract_rules` query parameter
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.fields)
    }
}
