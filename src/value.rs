//! Runtime values flowing through operations and graphs.

use indexmap::IndexMap;

/// Runtime value type used for operation inputs and outputs.
pub type Value = serde_json::Value;

/// Named input values for one operation call, in insertion order.
pub type InputValues = IndexMap<String, Value>;

/// The runtime type name of a value, mirroring a dynamic `typeof` check.
///
/// `null`, arrays and objects all report `"object"`.
pub fn type_of(value: &Value) -> &'static str {
    match value {
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Null | Value::Array(_) | Value::Object(_) => "object",
    }
}

/// Like [`type_of`], but reports `"undefined"` for an absent value.
pub fn type_of_optional(value: Option<&Value>) -> &'static str {
    value.map_or("undefined", type_of)
}

/// True when a value is absent or explicitly `null`.
pub fn is_nullish(value: Option<&Value>) -> bool {
    matches!(value, None | Some(Value::Null))
}

/// Builds an [`InputValues`] map from `name => json` pairs.
///
/// Values use [`serde_json::json!`] syntax and may span several tokens.
///
/// ```rust
/// let values = patchbay::inputs! { "a" => -1, "b" => "two", "c" => { "d": null } };
/// assert_eq!(values["a"], -1);
/// assert_eq!(values["b"], "two");
/// ```
#[macro_export]
macro_rules! inputs {
    () => { $crate::InputValues::new() };
    ( $($entries:tt)+ ) => {{
        let mut values = $crate::InputValues::new();
        $crate::__input_entries!(values () $($entries)+);
        values
    }};
}

/// Splits `inputs!` entries on top-level commas.
#[doc(hidden)]
#[macro_export]
macro_rules! __input_entries {
    ($values:ident ()) => {};
    ($values:ident () $next:tt $($rest:tt)*) => {
        $crate::__input_entries!($values ($next) $($rest)*);
    };
    ($values:ident ($name:expr => $($value:tt)+) , $($rest:tt)*) => {
        $values.insert(($name).to_string(), $crate::serde_json::json!($($value)+));
        $crate::__input_entries!($values () $($rest)*);
    };
    ($values:ident ($name:expr => $($value:tt)+)) => {
        $values.insert(($name).to_string(), $crate::serde_json::json!($($value)+));
    };
    ($values:ident ($($entry:tt)*) $next:tt $($rest:tt)*) => {
        $crate::__input_entries!($values ($($entry)* $next) $($rest)*);
    };
}
