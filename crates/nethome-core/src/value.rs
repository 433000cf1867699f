//! Tagged attribute values and their string boundary.
//!
//! Every item attribute is string-valued at the external boundary (UI, REST,
//! relation queries), but carried internally as a tagged [`Value`] so numeric
//! and boolean attributes are not reparsed on every hop. Marshalling to and
//! from strings happens only at the edge, driven by the attribute's declared
//! [`AttributeType`].

use serde::{Deserialize, Serialize};

/// A typed attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Text(String),
    Integer(i64),
    Boolean(bool),
    /// Ordered list of strings, comma-joined at the string boundary.
    List(Vec<String>),
}

impl Value {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(v) => Some(v),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Integer(_) => "integer",
            Self::Boolean(_) => "boolean",
            Self::List(_) => "list",
        }
    }

    /// Render the value in its external string form.
    ///
    /// Booleans render as `"True"`/`"False"`, lists join their elements with
    /// a comma. This is the inverse of [`AttributeType::unmarshal`].
    pub fn marshal(&self) -> String {
        match self {
            Self::Text(v) => v.clone(),
            Self::Integer(v) => v.to_string(),
            Self::Boolean(true) => "True".to_string(),
            Self::Boolean(false) => "False".to_string(),
            Self::List(v) => v.join(","),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Integer(v.into())
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<Vec<String>> for Value {
    fn from(v: Vec<String>) -> Self {
        Self::List(v)
    }
}

/// Declared type tag of an attribute in an item model.
///
/// `Item`, `Items` and `Command` are string-valued at runtime; the tag marks
/// them as references to other items so the relation cache can find them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttributeType {
    Text,
    Integer,
    Boolean,
    TextList,
    /// Reference to a single item by name.
    Item,
    /// Comma-separated list of item names.
    Items,
    /// Command string whose second comma-separated field is an item name.
    Command,
}

impl AttributeType {
    /// Parse the `Type=` tag used in model XML.
    pub fn parse(tag: &str) -> Result<Self, ValueError> {
        match tag {
            "String" => Ok(Self::Text),
            "Integer" => Ok(Self::Integer),
            "Boolean" => Ok(Self::Boolean),
            "StringList" => Ok(Self::TextList),
            "Item" => Ok(Self::Item),
            "Items" => Ok(Self::Items),
            "Command" => Ok(Self::Command),
            other => Err(ValueError::UnknownType(other.to_string())),
        }
    }

    /// The tag name as it appears in model XML.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Text => "String",
            Self::Integer => "Integer",
            Self::Boolean => "Boolean",
            Self::TextList => "StringList",
            Self::Item => "Item",
            Self::Items => "Items",
            Self::Command => "Command",
        }
    }

    /// Whether attributes of this type reference other items.
    pub fn is_relation(&self) -> bool {
        matches!(self, Self::Item | Self::Items | Self::Command)
    }

    /// Parse an external string into a [`Value`] of this type.
    ///
    /// A malformed integer or boolean is a validation failure, not a silent
    /// default; callers surface it as an illegal-value error.
    pub fn unmarshal(&self, s: &str) -> Result<Value, ValueError> {
        match self {
            Self::Text | Self::Item | Self::Command => Ok(Value::Text(s.to_string())),
            Self::Integer => s
                .trim()
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|_| ValueError::InvalidInteger(s.to_string())),
            Self::Boolean => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "on" => Ok(Value::Boolean(true)),
                "false" | "no" | "off" => Ok(Value::Boolean(false)),
                _ => Err(ValueError::InvalidBoolean(s.to_string())),
            },
            Self::TextList | Self::Items => {
                if s.is_empty() {
                    Ok(Value::List(Vec::new()))
                } else {
                    Ok(Value::List(s.split(',').map(|p| p.to_string()).collect()))
                }
            }
        }
    }
}

/// Errors from the value string boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueError {
    #[error("Unknown attribute type: {0}")]
    UnknownType(String),

    #[error("Not a valid integer: {0}")]
    InvalidInteger(String),

    #[error("Not a valid boolean: {0}")]
    InvalidBoolean(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marshal_round_trip() {
        assert_eq!(Value::Integer(42).marshal(), "42");
        assert_eq!(Value::Boolean(true).marshal(), "True");
        assert_eq!(
            Value::List(vec!["A".into(), "B".into()]).marshal(),
            "A,B"
        );
        assert_eq!(
            AttributeType::Integer.unmarshal("42").unwrap(),
            Value::Integer(42)
        );
        assert_eq!(
            AttributeType::Boolean.unmarshal("Yes").unwrap(),
            Value::Boolean(true)
        );
    }

    #[test]
    fn test_unmarshal_rejects_malformed() {
        assert!(matches!(
            AttributeType::Integer.unmarshal("warm"),
            Err(ValueError::InvalidInteger(_))
        ));
        assert!(matches!(
            AttributeType::Boolean.unmarshal("maybe"),
            Err(ValueError::InvalidBoolean(_))
        ));
    }

    #[test]
    fn test_list_unmarshal() {
        assert_eq!(
            AttributeType::Items.unmarshal("Lamp,Fan").unwrap(),
            Value::List(vec!["Lamp".into(), "Fan".into()])
        );
        assert_eq!(
            AttributeType::Items.unmarshal("").unwrap(),
            Value::List(Vec::new())
        );
    }

    #[test]
    fn test_type_tags() {
        for tag in ["String", "Integer", "Boolean", "StringList", "Item", "Items", "Command"] {
            let parsed = AttributeType::parse(tag).unwrap();
            assert_eq!(parsed.tag(), tag);
        }
        assert!(AttributeType::parse("Duration").is_err());
    }

    #[test]
    fn test_relation_types() {
        assert!(AttributeType::Item.is_relation());
        assert!(AttributeType::Items.is_relation());
        assert!(AttributeType::Command.is_relation());
        assert!(!AttributeType::Text.is_relation());
    }
}
