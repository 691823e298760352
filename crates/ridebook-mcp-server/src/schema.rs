//! Statically typed tool input schemas.
//!
//! The registry's contract is a checked Rust structure rather than a
//! free-form JSON document; [`InputSchema::to_value`] produces the
//! JSON-schema shape the protocol expects.

use serde_json::{json, Map, Value};

#[derive(Debug, Clone)]
pub enum PropertyKind {
    Number,
    Text,
    Object(Vec<Property>),
}

#[derive(Debug, Clone)]
pub struct Property {
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
    pub kind: PropertyKind,
}

impl Property {
    pub fn number(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            description,
            required: true,
            kind: PropertyKind::Number,
        }
    }

    pub fn text(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            description,
            required: true,
            kind: PropertyKind::Text,
        }
    }

    pub fn object(
        name: &'static str,
        description: &'static str,
        properties: Vec<Property>,
    ) -> Self {
        Self {
            name,
            description,
            required: true,
            kind: PropertyKind::Object(properties),
        }
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    fn to_value(&self) -> Value {
        match &self.kind {
            PropertyKind::Number => json!({
                "type": "number",
                "description": self.description,
            }),
            PropertyKind::Text => json!({
                "type": "string",
                "description": self.description,
            }),
            PropertyKind::Object(properties) => {
                let mut value = object_schema(properties);
                value["description"] = Value::String(self.description.to_string());
                value
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct InputSchema {
    pub properties: Vec<Property>,
}

impl InputSchema {
    pub fn new(properties: Vec<Property>) -> Self {
        Self { properties }
    }

    pub fn to_value(&self) -> Value {
        object_schema(&self.properties)
    }
}

fn object_schema(properties: &[Property]) -> Value {
    let mut props = Map::new();
    let mut required = Vec::new();
    for property in properties {
        props.insert(property.name.to_string(), property.to_value());
        if property.required {
            required.push(Value::String(property.name.to_string()));
        }
    }
    json!({
        "type": "object",
        "properties": Value::Object(props),
        "required": required,
    })
}

/// The pickup/dropoff coordinate shape shared by both trip tools.
pub fn coordinates(name: &'static str, description: &'static str) -> Property {
    Property::object(
        name,
        description,
        vec![
            Property::number("latitude", "Latitude coordinate"),
            Property::number("longitude", "Longitude coordinate"),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_schema_collects_required_fields() {
        let schema = InputSchema::new(vec![
            Property::text("product_id", "Product ID"),
            Property::text("fare_id", "Fare ID").optional(),
        ]);
        let v = schema.to_value();
        assert_eq!(v["type"], "object");
        assert_eq!(v["required"], json!(["product_id"]));
        assert_eq!(v["properties"]["fare_id"]["type"], "string");
    }

    #[test]
    fn nested_coordinates_keep_their_own_required_list() {
        let v = InputSchema::new(vec![coordinates("pickup", "Pickup location coordinates")])
            .to_value();
        let pickup = &v["properties"]["pickup"];
        assert_eq!(pickup["type"], "object");
        assert_eq!(pickup["required"], json!(["latitude", "longitude"]));
        assert_eq!(pickup["description"], "Pickup location coordinates");
        assert_eq!(pickup["properties"]["latitude"]["type"], "number");
    }
}
