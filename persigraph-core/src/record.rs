//! A ready-made JSON node record.

use serde_json::{Map, Value};

use crate::{Merge, Node, NodeId, NodeKey, NodeType};

/// A node record holding arbitrary JSON fields.
///
/// Serialised as a single JSON object with the reserved `type` and `id`
/// fields next to the others:
///
/// ```
/// use persigraph_core::{NodeKey, Node, Record};
/// use serde_json::json;
///
/// let task: Record = serde_json::from_value(json!({"type": "Task", "id": 3, "title": "Docs"})).unwrap();
/// assert_eq!(task.key(), NodeKey::new("Task", 3));
/// assert_eq!(task.get("title"), Some(&json!("Docs")));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Record {
    #[serde(rename = "type")]
    node_type: NodeType,
    id: NodeId,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl Record {
    /// Create a record without fields.
    pub fn new(node_type: impl Into<NodeType>, id: impl Into<NodeId>) -> Self {
        Self {
            node_type: node_type.into(),
            id: id.into(),
            fields: Map::new(),
        }
    }

    /// Set a field, returning the updated record.
    ///
    /// The reserved names `type` and `id` are ignored; use [`Merge`] to
    /// re-key a record.
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        let field = field.into();
        if !is_reserved(&field) {
            self.fields.insert(field, value.into());
        }
        self
    }

    /// The value of a field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// All fields other than `type` and `id`.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

fn is_reserved(field: &str) -> bool {
    matches!(field, "type" | "id")
}

impl Node for Record {
    fn node_type(&self) -> &NodeType {
        &self.node_type
    }

    fn node_id(&self) -> &NodeId {
        &self.id
    }
}

impl std::fmt::Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", NodeKey::of(self))
    }
}

/// Shallow field merge.
///
/// A `type` entry holding a string, or an `id` entry holding a number or a
/// string, re-keys the record. Other values for these entries are ignored.
impl Merge for Record {
    type Patch = Map<String, Value>;

    fn merge(&self, patch: &Self::Patch) -> Option<Self> {
        let node_type = match patch.get("type") {
            Some(Value::String(t)) if t.as_str() != self.node_type.as_str() => {
                Some(NodeType::from(t.as_str()))
            }
            _ => None,
        };
        let id = patch
            .get("id")
            .and_then(|id| serde_json::from_value::<NodeId>(id.clone()).ok())
            .filter(|id| *id != self.id);
        let fields: Map<String, Value> = patch
            .iter()
            .filter(|(field, _)| !is_reserved(field))
            .map(|(field, value)| (field.clone(), value.clone()))
            .collect();
        let merged_fields = self.fields.merge(&fields);

        if node_type.is_none() && id.is_none() && merged_fields.is_none() {
            return None;
        }
        Some(Self {
            node_type: node_type.unwrap_or_else(|| self.node_type.clone()),
            id: id.unwrap_or_else(|| self.id.clone()),
            fields: merged_fields.unwrap_or_else(|| self.fields.clone()),
        })
    }
}
