//! # Entities and Attributes
//!
//! The values that flow between prototypes and entity stores.
//!
//! Prototypes describe entities as flat [`Attributes`] maps. Stores hand back
//! concrete entity types, which the factory carries around type-erased as
//! [`EntityRef`] and callers downcast back to their own types.
//!
//! ```rust
//! use object_mother::entity::{merge_attributes, Attributes};
//! use serde_json::json;
//!
//! let base: Attributes = json!({"name": "wilma"}).as_object().cloned().unwrap();
//! let overrides: Attributes = json!({"married_to": "fred"}).as_object().cloned().unwrap();
//!
//! let merged = merge_attributes(&base, Some(&overrides));
//! assert_eq!(merged.len(), 2);
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Attribute map handed to entity stores on creation.
pub type Attributes = Map<String, Value>;

/// Type-erased, shareable handle to a produced entity.
pub type EntityRef = Arc<dyn Entity>;

/// Identity (primary key) of a persisted entity.
///
/// Stores choose their own key shape; integers, strings and UUIDs all convert
/// into an `EntityId`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(Value);

impl EntityId {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.0.as_i64()
    }

    pub fn as_str(&self) -> Option<&str> {
        self.0.as_str()
    }

    pub fn as_uuid(&self) -> Option<Uuid> {
        self.0.as_str().and_then(|s| Uuid::parse_str(s).ok())
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::String(s) => write!(f, "{s}"),
            other => write!(f, "{other}"),
        }
    }
}

impl From<i64> for EntityId {
    fn from(id: i64) -> Self {
        Self(Value::from(id))
    }
}

impl From<i32> for EntityId {
    fn from(id: i32) -> Self {
        Self(Value::from(id))
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        Self(Value::from(id))
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self(Value::from(id))
    }
}

impl From<String> for EntityId {
    fn from(id: String) -> Self {
        Self(Value::from(id))
    }
}

impl From<Uuid> for EntityId {
    fn from(id: Uuid) -> Self {
        Self(Value::from(id.to_string()))
    }
}

/// Upcast helper so `dyn Entity` can be downcast to its concrete type.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// An object produced by an entity store.
///
/// Only the identity accessor is required. Entities that report `None` are
/// still returned to callers but never enter the identity cache.
pub trait Entity: AsAny + fmt::Debug + Send + Sync {
    fn id(&self) -> Option<EntityId>;
}

impl dyn Entity {
    /// Borrow the entity as its concrete type.
    pub fn downcast_ref<T: Entity>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn is<T: Entity>(&self) -> bool {
        self.as_any().is::<T>()
    }
}

/// Shallow merge: keys in `overrides` replace keys in `base`.
pub fn merge_attributes(base: &Attributes, overrides: Option<&Attributes>) -> Attributes {
    let mut merged = base.clone();
    if let Some(overrides) = overrides {
        merge_into(&mut merged, overrides);
    }
    merged
}

/// In-place variant of [`merge_attributes`].
pub fn merge_into(target: &mut Attributes, overrides: &Attributes) {
    for (key, value) in overrides {
        target.insert(key.clone(), value.clone());
    }
}

/// Overrides carried by a dynamic call: the first argument, when it is an
/// object. Anything else is not an override and is ignored.
pub fn overrides_from_args(args: &[Value]) -> Option<&Attributes> {
    args.first().and_then(Value::as_object)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug)]
    struct Widget {
        id: i64,
    }

    impl Entity for Widget {
        fn id(&self) -> Option<EntityId> {
            Some(EntityId::from(self.id))
        }
    }

    #[derive(Debug)]
    struct Gadget;

    impl Entity for Gadget {
        fn id(&self) -> Option<EntityId> {
            None
        }
    }

    fn attrs(value: Value) -> Attributes {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_merge_override_wins() {
        let base = attrs(json!({"name": "wilma", "age": 30}));
        let overrides = attrs(json!({"age": 31, "married_to": "fred"}));

        let merged = merge_attributes(&base, Some(&overrides));

        assert_eq!(merged["name"], json!("wilma"));
        assert_eq!(merged["age"], json!(31));
        assert_eq!(merged["married_to"], json!("fred"));
    }

    #[test]
    fn test_merge_without_overrides_is_base() {
        let base = attrs(json!({"name": "wilma"}));
        assert_eq!(merge_attributes(&base, None), base);
    }

    #[test]
    fn test_merge_is_shallow() {
        let base = attrs(json!({"address": {"city": "Bedrock", "zip": "00001"}}));
        let overrides = attrs(json!({"address": {"city": "Rock Vegas"}}));

        let merged = merge_attributes(&base, Some(&overrides));
        assert_eq!(merged["address"], json!({"city": "Rock Vegas"}));
    }

    #[test]
    fn test_overrides_from_args() {
        let args = vec![json!({"pet": true}), json!("ignored")];
        assert_eq!(overrides_from_args(&args), Some(&attrs(json!({"pet": true}))));

        let args = vec![json!("hello")];
        assert!(overrides_from_args(&args).is_none());
        assert!(overrides_from_args(&[]).is_none());
    }

    #[test]
    fn test_entity_downcast() {
        let entity: EntityRef = Arc::new(Widget { id: 7 });

        assert!(entity.is::<Widget>());
        assert!(!entity.is::<Gadget>());
        assert_eq!(entity.downcast_ref::<Widget>().map(|w| w.id), Some(7));
        assert!(entity.downcast_ref::<Gadget>().is_none());
        assert_eq!(entity.id(), Some(EntityId::from(7_i64)));
    }

    #[test]
    fn test_entity_id_conversions() {
        assert_eq!(EntityId::from(123_i64).as_i64(), Some(123));
        assert_eq!(EntityId::from("abc").as_str(), Some("abc"));
        assert_eq!(EntityId::from("abc").to_string(), "abc");
        assert_eq!(EntityId::from(42_i32).to_string(), "42");

        let uuid = Uuid::new_v4();
        assert_eq!(EntityId::from(uuid).as_uuid(), Some(uuid));
    }

    #[test]
    fn test_entity_id_serializes_transparently() {
        let id = EntityId::from(456_i64);
        assert_eq!(serde_json::to_value(&id).unwrap(), json!(456));

        let parsed: EntityId = serde_json::from_value(json!("user-1")).unwrap();
        assert_eq!(parsed, EntityId::from("user-1"));
    }
}
