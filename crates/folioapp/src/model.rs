//! # Domain Model: Kinds, Resources and Payloads
//!
//! Every document folio knows about is a [`Resource`]: a small common header
//! (`id`, `parentId`, `metaSortKey`, timestamps) plus a kind-specific payload
//! ([`Body`]). The set of kinds is closed; see [`Kind`].
//!
//! ## Persisted Form
//!
//! Resources are stored as YAML documents, one file per resource:
//!
//! ```text
//! _id: fld_3f1c0a9e5b7d4e21a0c3b2d1e4f5a6b7
//! type: RequestGroup
//! parentId: wrk_9a8b7c6d5e4f40312a1b2c3d4e5f6a7b
//! metaSortKey: -1700000000000
//! created: 1700000000000
//! modified: 1700000000000
//! name: Auth
//! description: ''
//! environment: {}
//! environmentPropertyOrder: null
//! ```
//!
//! The `type` tag selects the payload variant. Payload fields are camelCase.
//!
//! ## Property Display Order
//!
//! Environment-like maps (`Environment.data`, `RequestGroup.environment`) are
//! stored as sorted maps. Their display order lives next to them as an
//! explicit list of keys ([`PropertyOrder`]). Older documents store the order
//! as `{"&": [...]}`; both forms are accepted on read, the list form is
//! written back.

use chrono::Utc;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
pub use serde_yaml::Value;
use std::collections::BTreeMap;
use std::str::FromStr;
use uuid::Uuid;

/// The fixed set of resource kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Kind {
    ApiSpec,
    Environment,
    Request,
    RequestGroup,
    Workspace,
}

impl Kind {
    pub const ALL: [Kind; 5] = [
        Kind::ApiSpec,
        Kind::Environment,
        Kind::Request,
        Kind::RequestGroup,
        Kind::Workspace,
    ];

    /// Name of the per-kind subdirectory inside the data directory.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Kind::ApiSpec => "ApiSpec",
            Kind::Environment => "Environment",
            Kind::Request => "Request",
            Kind::RequestGroup => "RequestGroup",
            Kind::Workspace => "Workspace",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Kind::ApiSpec => "API Spec",
            Kind::Environment => "Environment",
            Kind::Request => "Request",
            Kind::RequestGroup => "Folder",
            Kind::Workspace => "Workspace",
        }
    }

    /// Id prefix, without the trailing underscore.
    pub fn prefix(&self) -> &'static str {
        match self {
            Kind::ApiSpec => "spc",
            Kind::Environment => "env",
            Kind::Request => "req",
            Kind::RequestGroup => "fld",
            Kind::Workspace => "wrk",
        }
    }

    /// Workspaces are the only roots of the tree.
    pub fn requires_parent(&self) -> bool {
        !matches!(self, Kind::Workspace)
    }

    pub fn can_duplicate(&self) -> bool {
        !matches!(self, Kind::ApiSpec)
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for Kind {
    type Err = String;

    /// Accepts the directory name, the display name or the id prefix,
    /// case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Kind::ALL
            .into_iter()
            .find(|kind| {
                kind.dir_name().to_lowercase() == needle
                    || kind.display_name().to_lowercase().replace(' ', "") == needle
                    || kind.prefix() == needle
            })
            .ok_or_else(|| format!("Unknown kind: {}", s))
    }
}

/// Generates a fresh id of the form `<prefix>_<32 hex chars>`.
pub fn generate_id(kind: Kind) -> String {
    format!("{}_{}", kind.prefix(), Uuid::new_v4().simple())
}

/// Current time in epoch milliseconds, the unit of `created`/`modified`.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Explicit display order for the keys of an environment-like map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyOrder(pub Vec<String>);

#[derive(Deserialize)]
#[serde(untagged)]
enum PropertyOrderRepr {
    List(Vec<String>),
    Legacy(BTreeMap<String, Vec<String>>),
}

impl<'de> Deserialize<'de> for PropertyOrder {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let repr = Option::<PropertyOrderRepr>::deserialize(deserializer)?;
        Ok(match repr {
            None => PropertyOrder::default(),
            Some(PropertyOrderRepr::List(keys)) => PropertyOrder(keys),
            // Only the top-level ("&") order is kept; nested orders are dropped.
            Some(PropertyOrderRepr::Legacy(mut map)) => {
                PropertyOrder(map.remove("&").unwrap_or_default())
            }
        })
    }
}

impl Serialize for PropertyOrder {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl PropertyOrder {
    /// Orders `map` entries: listed keys first (skipping stale ones), then the
    /// remaining keys in sorted order.
    pub fn apply<'a>(&self, map: &'a BTreeMap<String, Value>) -> Vec<(&'a str, &'a Value)> {
        let mut ordered: Vec<(&str, &Value)> = self
            .0
            .iter()
            .filter_map(|key| map.get_key_value(key.as_str()))
            .map(|(k, v)| (k.as_str(), v))
            .collect();
        for (key, value) in map {
            if !self.0.iter().any(|listed| listed == key) {
                ordered.push((key.as_str(), value));
            }
        }
        ordered
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiSpecBody {
    pub file_name: String,
    pub contents: String,
    pub content_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EnvironmentBody {
    pub name: String,
    pub data: BTreeMap<String, Value>,
    pub data_property_order: PropertyOrder,
    pub color: Option<String>,
    pub is_private: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RequestBody {
    pub name: String,
    pub description: String,
    pub url: String,
    pub method: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FolderBody {
    pub name: String,
    pub description: String,
    pub environment: BTreeMap<String, Value>,
    pub environment_property_order: PropertyOrder,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkspaceBody {
    pub name: String,
    pub description: String,
    pub scope: Option<String>,
}

/// Kind-specific payload, tagged by `type` in the persisted form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Body {
    ApiSpec(ApiSpecBody),
    Environment(EnvironmentBody),
    Request(RequestBody),
    RequestGroup(FolderBody),
    Workspace(WorkspaceBody),
}

impl Body {
    /// Default payload for a freshly created resource of `kind`.
    pub fn init(kind: Kind) -> Self {
        match kind {
            Kind::ApiSpec => Body::ApiSpec(ApiSpecBody {
                file_name: "New Document".to_string(),
                content_type: "yaml".to_string(),
                ..Default::default()
            }),
            Kind::Environment => Body::Environment(EnvironmentBody {
                name: "New Environment".to_string(),
                ..Default::default()
            }),
            Kind::Request => Body::Request(RequestBody {
                name: "New Request".to_string(),
                method: "GET".to_string(),
                ..Default::default()
            }),
            Kind::RequestGroup => Body::RequestGroup(FolderBody {
                name: "New Folder".to_string(),
                ..Default::default()
            }),
            Kind::Workspace => Body::Workspace(WorkspaceBody {
                name: "New Workspace".to_string(),
                ..Default::default()
            }),
        }
    }

    pub fn kind(&self) -> Kind {
        match self {
            Body::ApiSpec(_) => Kind::ApiSpec,
            Body::Environment(_) => Kind::Environment,
            Body::Request(_) => Kind::Request,
            Body::RequestGroup(_) => Kind::RequestGroup,
            Body::Workspace(_) => Kind::Workspace,
        }
    }

    /// Human name. API specs are named by their file name.
    pub fn name(&self) -> &str {
        match self {
            Body::ApiSpec(b) => &b.file_name,
            Body::Environment(b) => &b.name,
            Body::Request(b) => &b.name,
            Body::RequestGroup(b) => &b.name,
            Body::Workspace(b) => &b.name,
        }
    }

    pub fn set_name(&mut self, name: String) {
        match self {
            Body::ApiSpec(b) => b.file_name = name,
            Body::Environment(b) => b.name = name,
            Body::Request(b) => b.name = name,
            Body::RequestGroup(b) => b.name = name,
            Body::Workspace(b) => b.name = name,
        }
    }

    /// Environments and specs carry no description; setting one is a no-op.
    pub fn set_description(&mut self, description: String) {
        match self {
            Body::Request(b) => b.description = description,
            Body::RequestGroup(b) => b.description = description,
            Body::Workspace(b) => b.description = description,
            Body::ApiSpec(_) | Body::Environment(_) => {}
        }
    }

    /// Variables in display order, for kinds that carry an environment.
    pub fn ordered_environment(&self) -> Vec<(&str, &Value)> {
        match self {
            Body::Environment(b) => b.data_property_order.apply(&b.data),
            Body::RequestGroup(b) => b.environment_property_order.apply(&b.environment),
            _ => Vec::new(),
        }
    }
}

/// A typed document: common header plus kind payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "parentId", default)]
    pub parent_id: Option<String>,
    #[serde(rename = "metaSortKey", default)]
    pub sort_key: f64,
    #[serde(default)]
    pub created: i64,
    #[serde(default)]
    pub modified: i64,
    #[serde(flatten)]
    pub body: Body,
}

impl Resource {
    pub fn new(kind: Kind, parent_id: Option<String>, sort_key: f64) -> Self {
        let now = now_millis();
        Self {
            id: generate_id(kind),
            parent_id,
            sort_key,
            created: now,
            modified: now,
            body: Body::init(kind),
        }
    }

    pub fn kind(&self) -> Kind {
        self.body.kind()
    }

    pub fn name(&self) -> &str {
        self.body.name()
    }

    /// Persisted documents currently need no upgrade; this is the seam where
    /// format changes would be applied on load.
    pub fn migrate(self) -> Self {
        self
    }

    /// Label used when offering this resource in an interactive choice:
    /// `"<name> - <first 10 chars of id>"`.
    pub fn choice_label(&self) -> String {
        let short: String = self.id.chars().take(10).collect();
        format!("{} - {}", self.name(), short)
    }
}
