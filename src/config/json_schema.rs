use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

pub const JSON_SCHEMA: &str = r##"{
  "$schema": "http://json-schema.org/draft-07/schema#",
  "title": "Conditional Fields Rules",
  "description": "Rules that show, hide, require and clear form fields based on a trigger field",
  "oneOf": [
    {
      "type": "array",
      "items": { "$ref": "#/$defs/Rule" }
    },
    {
      "type": "object",
      "required": ["rules"],
      "properties": {
        "$schema": {
          "type": "string",
          "description": "JSON schema reference"
        },
        "rules": {
          "type": "array",
          "items": { "$ref": "#/$defs/Rule" }
        }
      }
    }
  ],
  "$defs": {
    "Rule": {
      "type": "object",
      "description": "One trigger field controlling a set of affected fields or a block",
      "required": ["trigger"],
      "properties": {
        "trigger": { "$ref": "#/$defs/Trigger" },
        "affected": { "$ref": "#/$defs/Affected" },
        "hideOnEmpty": {
          "type": "boolean",
          "default": true,
          "description": "Hide the affected fields while the trigger has no value. When false an empty trigger shows them"
        },
        "clearOnHide": {
          "type": "boolean",
          "default": true,
          "description": "Reset affected fields to their empty state when hidden"
        },
        "initialCheck": {
          "type": "boolean",
          "default": true,
          "description": "Evaluate the rule once at setup, without animation"
        }
      }
    },
    "Trigger": {
      "type": "object",
      "required": ["selector", "value"],
      "properties": {
        "selector": {
          "type": "string",
          "description": "CSS selector of the trigger field. A checkbox or radio group may match several elements"
        },
        "operator": { "$ref": "#/$defs/Operator" },
        "value": {
          "description": "Value or values to compare against. A match on any value counts",
          "oneOf": [
            { "$ref": "#/$defs/Value" },
            { "type": "array", "items": { "$ref": "#/$defs/Value" } }
          ]
        }
      }
    },
    "Value": {
      "type": ["string", "number"]
    },
    "Operator": {
      "type": "string",
      "default": "equal",
      "enum": [
        "equal",
        "notEqual",
        "greaterThan",
        "lessThan",
        "greaterThanOrEqual",
        "lessThanOrEqual",
        "contains",
        "startsWith",
        "endsWith"
      ],
      "description": "Comparison between the trigger's value and the configured value. Ordering operators compare numerically"
    },
    "Affected": {
      "type": "object",
      "properties": {
        "block": {
          "type": "string",
          "description": "CSS selector of a container shown and hidden instead of the individual fields"
        },
        "parentSelector": {
          "type": "string",
          "description": "Default container selector for fields that do not set their own"
        },
        "fields": {
          "type": "array",
          "items": { "$ref": "#/$defs/AffectedField" },
          "default": []
        }
      }
    },
    "AffectedField": {
      "type": "object",
      "required": ["selector"],
      "properties": {
        "selector": {
          "type": "string",
          "description": "CSS selector of the affected field"
        },
        "required": {
          "type": "boolean",
          "default": false,
          "description": "Mark the field required while it is shown"
        },
        "associatedElements": {
          "type": "array",
          "items": { "type": "string" },
          "description": "Selectors of labels or hints that follow the field's visibility"
        },
        "parentSelector": {
          "type": "string",
          "description": "Selector passed to closest() to find the container that receives the hidden class",
          "examples": [".form-group"]
        }
      }
    }
  }
}"##;

/// writes the JSON schema to the specified path
pub fn write_schema_file(path: &Path) -> Result<()> {
    fs::write(path, JSON_SCHEMA)
        .with_context(|| format!("failed to write schema file: {}", path.display()))
}
