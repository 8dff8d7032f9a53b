use proptest::prelude::*;
use serde_json::{Number, Value};

/// Strategy for a single statement argument.
///
/// Scalars dominate real argument lists, so nesting is kept shallow.
/// Numbers stay integral to avoid NaN/Inf corner cases in equality.
pub fn json_argument() -> impl Strategy<Value = Value> {
    let scalar = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| Value::Number(Number::from(n))),
        "[a-zA-Z0-9_ ]{0,16}".prop_map(Value::String),
    ];

    scalar.prop_recursive(2, 16, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,8}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

/// Strategy for a whole argument list.
pub fn argument_list() -> impl Strategy<Value = Vec<Value>> {
    prop::collection::vec(json_argument(), 0..5)
}
