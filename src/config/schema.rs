use serde::{Deserialize, Serialize};

use crate::conditions::{Operator, TriggerValues};
use crate::dom::memory::NodeSpec;
use crate::field::{FieldSpec, ParentSelector};

/// one conditional-field rule: a trigger, a condition and what it controls
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleConfig {
    pub trigger: TriggerConfig,
    #[serde(default)]
    pub affected: AffectedConfig,
    /// an empty trigger counts as a match when false
    #[serde(default = "default_true")]
    pub hide_on_empty: bool,
    #[serde(default = "default_true")]
    pub clear_on_hide: bool,
    #[serde(default = "default_true")]
    pub initial_check: bool,
}

impl RuleConfig {
    pub fn new(trigger: TriggerConfig, affected: AffectedConfig) -> Self {
        Self {
            trigger,
            affected,
            hide_on_empty: true,
            clear_on_hide: true,
            initial_check: true,
        }
    }

    pub fn hide_on_empty(mut self, hide_on_empty: bool) -> Self {
        self.hide_on_empty = hide_on_empty;
        self
    }

    pub fn clear_on_hide(mut self, clear_on_hide: bool) -> Self {
        self.clear_on_hide = clear_on_hide;
        self
    }

    pub fn initial_check(mut self, initial_check: bool) -> Self {
        self.initial_check = initial_check;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerConfig {
    pub selector: String,
    #[serde(default)]
    pub operator: Operator,
    pub value: TriggerValues,
}

impl TriggerConfig {
    pub fn new(selector: impl Into<String>, value: impl Into<TriggerValues>) -> Self {
        Self {
            selector: selector.into(),
            operator: Operator::default(),
            value: value.into(),
        }
    }

    pub fn operator(mut self, operator: impl Into<Operator>) -> Self {
        self.operator = operator.into();
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AffectedConfig {
    /// container toggled instead of the individual fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block: Option<String>,
    #[serde(default)]
    pub fields: Vec<AffectedFieldConfig>,
    /// default for fields that do not set their own
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_selector: Option<ParentSelector>,
}

impl AffectedConfig {
    pub fn fields(fields: impl IntoIterator<Item = AffectedFieldConfig>) -> Self {
        Self {
            fields: fields.into_iter().collect(),
            ..Default::default()
        }
    }

    pub fn block(mut self, selector: impl Into<String>) -> Self {
        self.block = Some(selector.into());
        self
    }

    pub fn parent(mut self, parent: ParentSelector) -> Self {
        self.parent_selector = Some(parent);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AffectedFieldConfig {
    pub selector: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub associated_elements: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_selector: Option<ParentSelector>,
}

impl AffectedFieldConfig {
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            required: false,
            associated_elements: Vec::new(),
            parent_selector: None,
        }
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn associated(mut self, selector: impl Into<String>) -> Self {
        self.associated_elements.push(selector.into());
        self
    }

    pub fn parent(mut self, parent: ParentSelector) -> Self {
        self.parent_selector = Some(parent);
        self
    }

    /// field construction options, falling back to the group-level parent selector
    pub fn to_field_spec(&self, default_parent: Option<&ParentSelector>) -> FieldSpec {
        let mut spec = FieldSpec::new(&self.selector)
            .required(self.required)
            .associated(self.associated_elements.iter().cloned());
        if let Some(parent) = self.parent_selector.as_ref().or(default_parent) {
            spec = spec.parent(parent.clone());
        }
        spec
    }
}

/// a rules file is either a bare list or an object with a `rules` key
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RulesFile {
    List(Vec<RuleConfig>),
    Wrapped { rules: Vec<RuleConfig> },
}

impl RulesFile {
    pub fn into_rules(self) -> Vec<RuleConfig> {
        match self {
            RulesFile::List(rules) | RulesFile::Wrapped { rules } => rules,
        }
    }
}

/// a form file is one element tree or a list of sibling trees
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormFile {
    One(NodeSpec),
    Many(Vec<NodeSpec>),
}

impl FormFile {
    pub fn into_nodes(self) -> Vec<NodeSpec> {
        match self {
            FormFile::One(node) => vec![node],
            FormFile::Many(nodes) => nodes,
        }
    }
}

fn default_true() -> bool {
    true
}
