use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};

/// A type the LLM is asked to produce as JSON.
///
/// `FIELDS` lists every top-level property with the description sent to the model;
/// prompts and schemas are both derived from it.
pub trait StructuredOutput: Serialize + DeserializeOwned + Send + 'static {
    const NAME: &'static str;
    const FIELDS: &'static [(&'static str, &'static str)];

    /// Schema of a single property.
    fn property_schema(description: &str) -> Value {
        string_schema(description)
    }

    fn json_schema() -> Value {
        object_schema(
            Self::FIELDS
                .iter()
                .map(|(name, description)| (*name, Self::property_schema(description))),
        )
    }
}

pub fn string_schema(description: &str) -> Value {
    json!({ "type": "string", "description": description })
}

/// Object schema with every property required, in declaration order.
pub fn object_schema<'a>(properties: impl IntoIterator<Item = (&'a str, Value)>) -> Value {
    let mut props = Map::new();
    let mut required = Vec::new();
    for (name, schema) in properties {
        required.push(Value::String(name.to_string()));
        props.insert(name.to_string(), schema);
    }

    json!({
        "type": "object",
        "properties": props,
        "required": required,
    })
}
