//! Parser for the item model XML grammar.
//!
//! An item declares its surface as:
//!
//! ```xml
//! <HomeItem Class="Lamp" Category="Lamps" Morphing="false">
//!   <Attribute Name="State" Type="Boolean" Get="getState" Set="setState" Default="true"/>
//!   <Attribute Name="Mode" Type="String" Get="getMode" Init="initMode">
//!     <item>Normal</item>
//!     <item>Dimmed</item>
//!   </Attribute>
//!   <Action Name="Toggle" Method="toggle"/>
//! </HomeItem>
//! ```
//!
//! Attributes and actions are kept in document order; the first (or the one
//! flagged `Default="true"`) is the default display value for UI callers.
//! Unknown elements and attributes are ignored.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use nethome_core::value::{AttributeType, ValueError};

/// Parsed form of one `<Attribute>` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeDescriptor {
    pub name: String,
    pub kind: AttributeType,
    /// Get method name, if the attribute is readable.
    pub get: Option<String>,
    /// Set method name, if the attribute is writable.
    pub set: Option<String>,
    /// Init method name, used only during the construction window.
    pub init: Option<String>,
    /// Marks the default display attribute.
    pub is_default: bool,
    /// Enumerated legal values from nested `<item>` children.
    pub values: Vec<String>,
}

/// Parsed form of one `<Action>` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionDescriptor {
    pub name: String,
    pub method: String,
    /// Marks the default action.
    pub is_default: bool,
}

/// Parsed form of a complete `<HomeItem>` model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelDescriptor {
    pub class: String,
    pub category: String,
    pub morphing: bool,
    pub attributes: Vec<AttributeDescriptor>,
    pub actions: Vec<ActionDescriptor>,
}

/// Errors from model XML parsing.
#[derive(Debug, thiserror::Error)]
pub enum ModelParseError {
    #[error("Malformed model XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Model XML has no <HomeItem> root element")]
    MissingRoot,

    #[error("<{element}> element without a Name attribute")]
    MissingName { element: &'static str },

    #[error("Action {action} has no Method attribute")]
    MissingMethod { action: String },

    #[error("Attribute {attribute}: {source}")]
    BadType {
        attribute: String,
        source: ValueError,
    },
}

struct RawElement {
    name: Option<String>,
    kind: Option<String>,
    get: Option<String>,
    set: Option<String>,
    init: Option<String>,
    method: Option<String>,
    is_default: bool,
}

fn read_element(start: &BytesStart<'_>) -> Result<RawElement, ModelParseError> {
    let mut raw = RawElement {
        name: None,
        kind: None,
        get: None,
        set: None,
        init: None,
        method: None,
        is_default: false,
    };
    for attr in start.attributes().flatten() {
        let value = String::from_utf8_lossy(&attr.value).to_string();
        match attr.key.as_ref() {
            b"Name" => raw.name = Some(value),
            b"Type" => raw.kind = Some(value),
            b"Get" => raw.get = Some(value),
            b"Set" => raw.set = Some(value),
            b"Init" => raw.init = Some(value),
            b"Method" => raw.method = Some(value),
            b"Default" => raw.is_default = value.eq_ignore_ascii_case("true"),
            _ => {}
        }
    }
    Ok(raw)
}

fn attribute_from(raw: RawElement) -> Result<AttributeDescriptor, ModelParseError> {
    let name = raw
        .name
        .ok_or(ModelParseError::MissingName {
            element: "Attribute",
        })?;
    let kind = AttributeType::parse(raw.kind.as_deref().unwrap_or("String")).map_err(|source| {
        ModelParseError::BadType {
            attribute: name.clone(),
            source,
        }
    })?;
    Ok(AttributeDescriptor {
        name,
        kind,
        get: raw.get,
        set: raw.set,
        init: raw.init,
        is_default: raw.is_default,
        values: Vec::new(),
    })
}

fn action_from(raw: RawElement) -> Result<ActionDescriptor, ModelParseError> {
    let name = raw
        .name
        .ok_or(ModelParseError::MissingName { element: "Action" })?;
    let method = raw
        .method
        .ok_or_else(|| ModelParseError::MissingMethod {
            action: name.clone(),
        })?;
    Ok(ActionDescriptor {
        name,
        method,
        is_default: raw.is_default,
    })
}

impl ModelDescriptor {
    /// Parse a model XML string.
    pub fn parse(xml: &str) -> Result<Self, ModelParseError> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        let mut model: Option<ModelDescriptor> = None;
        // Inside an <item> child; its text goes to the last parsed attribute.
        let mut in_value_item = false;

        loop {
            buf.clear();
            match reader.read_event_into(&mut buf)? {
                Event::Eof => break,
                Event::Start(start) | Event::Empty(start) => {
                    match start.name().as_ref() {
                        b"HomeItem" => {
                            let mut class = String::new();
                            let mut category = String::new();
                            let mut morphing = false;
                            for attr in start.attributes().flatten() {
                                let value = String::from_utf8_lossy(&attr.value).to_string();
                                match attr.key.as_ref() {
                                    b"Class" => class = value,
                                    b"Category" => category = value,
                                    b"Morphing" => morphing = value.eq_ignore_ascii_case("true"),
                                    _ => {}
                                }
                            }
                            model = Some(ModelDescriptor {
                                class,
                                category,
                                morphing,
                                attributes: Vec::new(),
                                actions: Vec::new(),
                            });
                        }
                        b"Attribute" => {
                            if let Some(model) = model.as_mut() {
                                model.attributes.push(attribute_from(read_element(&start)?)?);
                            }
                        }
                        b"Action" => {
                            if let Some(model) = model.as_mut() {
                                model.actions.push(action_from(read_element(&start)?)?);
                            }
                        }
                        b"item" => {
                            in_value_item = true;
                        }
                        _ => {}
                    }
                }
                Event::Text(text) => {
                    if in_value_item {
                        if let (Some(model), Ok(content)) = (model.as_mut(), text.unescape()) {
                            if let Some(attribute) = model.attributes.last_mut() {
                                attribute.values.push(content.to_string());
                            }
                        }
                    }
                }
                Event::End(end) => {
                    if end.name().as_ref() == b"item" {
                        in_value_item = false;
                    }
                }
                _ => {}
            }
        }

        model.ok_or(ModelParseError::MissingRoot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAMP_MODEL: &str = r#"
        <HomeItem Class="Lamp" Category="Lamps">
          <Attribute Name="State" Type="Boolean" Get="getState" Set="setState" Default="true"/>
          <Attribute Name="Room" Type="String" Get="getRoom" Init="initRoom"/>
          <Attribute Name="Mode" Type="String" Get="getMode" Set="setMode">
            <item>Normal</item>
            <item>Dimmed</item>
          </Attribute>
          <Action Name="Toggle" Method="toggle" Default="true"/>
          <Action Name="Flash" Method="flash"/>
        </HomeItem>"#;

    #[test]
    fn test_parse_full_model() {
        let model = ModelDescriptor::parse(LAMP_MODEL).unwrap();
        assert_eq!(model.class, "Lamp");
        assert_eq!(model.category, "Lamps");
        assert!(!model.morphing);

        let names: Vec<_> = model.attributes.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["State", "Room", "Mode"]);

        let state = &model.attributes[0];
        assert_eq!(state.kind, AttributeType::Boolean);
        assert_eq!(state.get.as_deref(), Some("getState"));
        assert_eq!(state.set.as_deref(), Some("setState"));
        assert!(state.is_default);

        let room = &model.attributes[1];
        assert_eq!(room.init.as_deref(), Some("initRoom"));
        assert!(room.set.is_none());

        let mode = &model.attributes[2];
        assert_eq!(mode.values, ["Normal", "Dimmed"]);

        let actions: Vec<_> = model.actions.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(actions, ["Toggle", "Flash"]);
        assert_eq!(model.actions[0].method, "toggle");
    }

    #[test]
    fn test_parse_morphing_flag() {
        let model = ModelDescriptor::parse(r#"<HomeItem Class="X" Morphing="true"/>"#).unwrap();
        assert!(model.morphing);
        assert!(model.attributes.is_empty());
    }

    #[test]
    fn test_missing_root_is_error() {
        assert!(matches!(
            ModelDescriptor::parse("<Other/>"),
            Err(ModelParseError::MissingRoot)
        ));
    }

    #[test]
    fn test_attribute_without_name_is_error() {
        let xml = r#"<HomeItem Class="X"><Attribute Type="String"/></HomeItem>"#;
        assert!(matches!(
            ModelDescriptor::parse(xml),
            Err(ModelParseError::MissingName { .. })
        ));
    }

    #[test]
    fn test_unknown_type_is_error() {
        let xml = r#"<HomeItem Class="X"><Attribute Name="A" Type="Duration"/></HomeItem>"#;
        assert!(matches!(
            ModelDescriptor::parse(xml),
            Err(ModelParseError::BadType { .. })
        ));
    }

    #[test]
    fn test_unknown_elements_ignored() {
        let xml = r#"
            <HomeItem Class="X">
              <Comment>ignored</Comment>
              <Attribute Name="A" Type="String" Get="getA"/>
            </HomeItem>"#;
        let model = ModelDescriptor::parse(xml).unwrap();
        assert_eq!(model.attributes.len(), 1);
    }

    #[test]
    fn test_action_without_method_is_error() {
        let xml = r#"<HomeItem Class="X"><Action Name="Go"/></HomeItem>"#;
        assert!(matches!(
            ModelDescriptor::parse(xml),
            Err(ModelParseError::MissingMethod { .. })
        ));
    }
}
