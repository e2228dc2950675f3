//! Static UI metadata for the GOWA node: the operation catalog.
//!
//! Describes which resources and operations exist and which input fields
//! apply to which operation.  Parameter resolution reads property defaults
//! from here, so the catalog is also the single source of defaults.

use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::resources;
use crate::NodeError;

// ---------------------------------------------------------------------------
// Resource
// ---------------------------------------------------------------------------

/// Logical grouping of operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    App,
    Chat,
    Device,
    Group,
    Message,
    Newsletter,
    Send,
    User,
}

impl Resource {
    pub const ALL: [Resource; 8] = [
        Self::App,
        Self::Chat,
        Self::Device,
        Self::Group,
        Self::Message,
        Self::Newsletter,
        Self::Send,
        Self::User,
    ];

    /// Preselected resource.
    pub const DEFAULT: Resource = Self::Send;

    pub fn value(self) -> &'static str {
        match self {
            Self::App => "app",
            Self::Chat => "chat",
            Self::Device => "device",
            Self::Group => "group",
            Self::Message => "message",
            Self::Newsletter => "newsletter",
            Self::Send => "send",
            Self::User => "user",
        }
    }

    fn option(self) -> OptionValue {
        let (name, description) = match self {
            Self::App => ("App", "App connection and device management"),
            Self::Chat => ("Chat", "Chat management operations"),
            Self::Device => ("Device", "Multi-device slot management"),
            Self::Group => ("Group", "Group management operations"),
            Self::Message => ("Message", "Message management operations"),
            Self::Newsletter => ("Newsletter", "Newsletter management operations"),
            Self::Send => ("Send", "Send messages and media"),
            Self::User => ("User", "User profile and settings"),
        };
        OptionValue::new(name, self.value()).with_description(description)
    }

    /// Operation records of this resource, in catalog order.
    pub fn operations(self) -> Vec<OperationInfo> {
        match self {
            Self::App => resources::catalog_of::<resources::app::AppOperation>(),
            Self::Chat => resources::catalog_of::<resources::chat::ChatOperation>(),
            Self::Device => resources::catalog_of::<resources::device::DeviceOperation>(),
            Self::Group => resources::catalog_of::<resources::group::GroupOperation>(),
            Self::Message => resources::catalog_of::<resources::message::MessageOperation>(),
            Self::Newsletter => {
                resources::catalog_of::<resources::newsletter::NewsletterOperation>()
            }
            Self::Send => resources::catalog_of::<resources::send::SendOperation>(),
            Self::User => resources::catalog_of::<resources::user::UserOperation>(),
        }
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.value())
    }
}

impl FromStr for Resource {
    type Err = NodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|resource| resource.value() == s)
            .ok_or_else(|| NodeError::UnknownResource(s.to_owned()))
    }
}

// ---------------------------------------------------------------------------
// Operation records
// ---------------------------------------------------------------------------

/// One entry of a resource's operation selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationInfo {
    pub name: &'static str,
    pub value: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'static str>,
    pub action: &'static str,
}

impl OperationInfo {
    pub const fn new(
        value: &'static str,
        name: &'static str,
        description: Option<&'static str>,
        action: &'static str,
    ) -> Self {
        Self {
            name,
            value,
            description,
            action,
        }
    }
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    String,
    Number,
    Boolean,
    Options,
}

/// A selectable value of an `options` property.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionValue {
    pub name: &'static str,
    pub value: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<&'static str>,
}

impl OptionValue {
    pub fn new(name: &'static str, value: impl Into<Value>) -> Self {
        Self {
            name,
            value: value.into(),
            description: None,
            action: None,
        }
    }

    pub fn with_description(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }
}

impl From<OperationInfo> for OptionValue {
    fn from(info: OperationInfo) -> Self {
        Self {
            name: info.name,
            value: Value::from(info.value),
            description: info.description,
            action: Some(info.action),
        }
    }
}

/// Visibility rule: the property is shown when every listed field holds one
/// of the listed values.  An empty `operation` list means "any operation".
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ShowRule {
    pub resource: Vec<Resource>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub operation: Vec<&'static str>,
    #[serde(flatten)]
    pub conditions: BTreeMap<&'static str, Vec<Value>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DisplayOptions {
    pub show: ShowRule,
}

impl DisplayOptions {
    /// No rule at all: the property is always shown.
    pub fn is_unrestricted(&self) -> bool {
        self.show.resource.is_empty()
    }
}

/// One input field of the node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub display_name: &'static str,
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: PropertyType,
    #[serde(skip_serializing_if = "is_false")]
    pub required: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub no_data_expression: bool,
    #[serde(skip_serializing_if = "DisplayOptions::is_unrestricted")]
    pub display_options: DisplayOptions,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionValue>,
    pub default: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_value: Option<i64>,
}

fn is_false(flag: &bool) -> bool {
    !*flag
}

impl Property {
    fn new(name: &'static str, display_name: &'static str, kind: PropertyType, default: Value) -> Self {
        Self {
            display_name,
            name,
            kind,
            required: false,
            no_data_expression: false,
            display_options: DisplayOptions::default(),
            options: Vec::new(),
            default,
            placeholder: None,
            description: None,
            min_value: None,
        }
    }

    pub fn string(name: &'static str, display_name: &'static str) -> Self {
        Self::new(name, display_name, PropertyType::String, json!(""))
    }

    pub fn number(name: &'static str, display_name: &'static str, default: impl Into<Value>) -> Self {
        Self::new(name, display_name, PropertyType::Number, default.into())
    }

    pub fn boolean(name: &'static str, display_name: &'static str, default: bool) -> Self {
        Self::new(name, display_name, PropertyType::Boolean, Value::Bool(default))
    }

    pub fn options(
        name: &'static str,
        display_name: &'static str,
        options: Vec<OptionValue>,
        default: impl Into<Value>,
    ) -> Self {
        let mut property = Self::new(name, display_name, PropertyType::Options, default.into());
        property.options = options;
        property
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn no_data_expression(mut self) -> Self {
        self.no_data_expression = true;
        self
    }

    pub fn default_value(mut self, default: impl Into<Value>) -> Self {
        self.default = default.into();
        self
    }

    pub fn placeholder(mut self, placeholder: &'static str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    pub fn description(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }

    pub fn min_value(mut self, min: i64) -> Self {
        self.min_value = Some(min);
        self
    }

    /// Show for `resource`, limited to `operations` (all when empty).
    pub fn show(mut self, resource: Resource, operations: &[&'static str]) -> Self {
        self.display_options.show.resource = vec![resource];
        self.display_options.show.operation = operations.to_vec();
        self
    }

    /// Additionally require `field` to hold one of `values`.
    pub fn show_when(mut self, field: &'static str, values: &[&'static str]) -> Self {
        self.display_options
            .show
            .conditions
            .insert(field, values.iter().map(|v| Value::from(*v)).collect());
        self
    }

    /// Whether the property applies to `resource`/`operation`, ignoring
    /// extra field conditions.
    pub fn applies_to(&self, resource: Resource, operation: &str) -> bool {
        let show = &self.display_options.show;
        show.resource.contains(&resource)
            && (show.operation.is_empty() || show.operation.iter().any(|op| *op == operation))
    }

    /// `true` when the default is a usable value rather than an empty
    /// placeholder.
    pub fn has_meaningful_default(&self) -> bool {
        match &self.default {
            Value::Null => false,
            Value::String(s) => !s.is_empty(),
            _ => true,
        }
    }
}

// ---------------------------------------------------------------------------
// Node description
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct CredentialRef {
    pub name: &'static str,
    pub required: bool,
}

/// Everything the host needs to render and validate the node.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDescription {
    pub display_name: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub group: Vec<&'static str>,
    pub version: u32,
    pub subtitle: &'static str,
    pub description: &'static str,
    pub defaults: Value,
    pub inputs: Vec<&'static str>,
    pub outputs: Vec<&'static str>,
    pub credentials: Vec<CredentialRef>,
    pub properties: Vec<Property>,
}

/// The static node description, built on first use.
pub fn node_description() -> &'static NodeDescription {
    static DESCRIPTION: OnceLock<NodeDescription> = OnceLock::new();
    DESCRIPTION.get_or_init(build_description)
}

fn build_description() -> NodeDescription {
    let resource = Property::options(
        "resource",
        "Resource",
        Resource::ALL.into_iter().map(Resource::option).collect(),
        Resource::DEFAULT.value(),
    )
    .no_data_expression();

    let mut properties = vec![resource];
    properties.extend(resources::all_properties());

    NodeDescription {
        display_name: "GOWA",
        name: "gowa",
        icon: "file:gowa.svg",
        group: vec!["messaging"],
        version: 1,
        subtitle: "={{$parameter[\"operation\"] + \": \" + $parameter[\"resource\"]}}",
        description: "Interact with Go WhatsApp Web MultiDevice API",
        defaults: json!({ "name": "GOWA" }),
        inputs: vec!["main"],
        outputs: vec!["main"],
        credentials: vec![CredentialRef {
            name: gateway::CREDENTIAL_NAME,
            required: true,
        }],
        properties,
    }
}

/// The property named `name` that applies to `resource`/`operation`.
///
/// `resource` and `operation` themselves are looked up unscoped.
pub fn find_property(resource: Resource, operation: &str, name: &str) -> Option<&'static Property> {
    node_description()
        .properties
        .iter()
        .filter(|p| p.name == name)
        .find(|p| p.name == "resource" || p.applies_to(resource, operation))
}
