use proptest::prelude::*;
use serde_json::{Map, Value};

/// Strategy for generating kind identifiers (`user`, `blog_post`)
pub fn kind_identifier_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9]{0,8}(_[a-z][a-z0-9]{0,8}){0,3}"
}

/// Strategy for generating flat attribute values
pub fn attribute_value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[a-zA-Z0-9 ]{0,16}".prop_map(Value::from),
    ]
}

/// Strategy for generating attribute maps over a small key space so that
/// independently generated maps overlap
pub fn attributes_strategy() -> impl Strategy<Value = Map<String, Value>> {
    prop::collection::btree_map("[a-e]", attribute_value_strategy(), 0..5)
        .prop_map(|entries| entries.into_iter().collect())
}
