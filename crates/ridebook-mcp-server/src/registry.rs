//! The fixed catalog of callable tools.
//!
//! Three tools, defined at construction and never extended at runtime.
//! Descriptions double as the behavioral contract consumed by an
//! LLM-driven caller: they ask for estimates to be fetched and shown to
//! the user before any booking call, and state that only immediate
//! pickups are supported. Nothing here enforces that ordering; it is
//! advisory metadata.

use serde_json::{json, Value};

use crate::schema::{coordinates, InputSchema, Property};

pub const GET_RIDE_ESTIMATES: &str = "get_ride_estimates";
pub const CREATE_RIDE_REQUEST: &str = "create_ride_request";
pub const GET_RIDE_DETAILS: &str = "get_ride_details";

#[derive(Debug, Clone)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: String,
    pub input_schema: InputSchema,
}

impl ToolDefinition {
    pub fn to_value(&self) -> Value {
        json!({
            "name": self.name,
            "description": self.description,
            "inputSchema": self.input_schema.to_value(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct ToolCatalog {
    tools: Vec<ToolDefinition>,
}

impl ToolCatalog {
    /// Build the catalog. When a default guest identity is configured
    /// the `guest` argument of `create_ride_request` becomes optional;
    /// otherwise callers must supply one.
    pub fn new(has_default_guest: bool) -> Self {
        Self {
            tools: vec![
                estimates_tool(),
                create_request_tool(has_default_guest),
                ride_details_tool(),
            ],
        }
    }

    pub fn list(&self) -> &[ToolDefinition] {
        &self.tools
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.iter().any(|t| t.name == name)
    }

    pub fn definitions(&self) -> Vec<Value> {
        self.tools.iter().map(ToolDefinition::to_value).collect()
    }
}

fn estimates_tool() -> ToolDefinition {
    ToolDefinition {
        name: GET_RIDE_ESTIMATES,
        description: "Get price and time estimates for available ride products between two \
            locations. Returns a list of ride options with pricing, ETA, and product details. \
            Always call this first and present the options so the rider can choose a product \
            before any ride is booked."
            .to_string(),
        input_schema: InputSchema::new(vec![
            coordinates("pickup", "Pickup location coordinates"),
            coordinates("dropoff", "Dropoff location coordinates"),
        ]),
    }
}

fn create_request_tool(has_default_guest: bool) -> ToolDefinition {
    let guest = Property::object(
        "guest",
        "Guest rider information",
        vec![
            Property::text("first_name", "Guest first name"),
            Property::text("last_name", "Guest last name"),
            Property::text(
                "phone_number",
                "Guest phone number with country code (e.g., +12125551234)",
            ),
            Property::text("email", "Guest email address").optional(),
            Property::text("locale", "Guest locale (default: en)").optional(),
        ],
    );
    let guest = if has_default_guest {
        guest.optional()
    } else {
        guest
    };

    ToolDefinition {
        name: CREATE_RIDE_REQUEST,
        description: "Create a new ride request for a guest with the given pickup and dropoff \
            locations. Returns booking details including request ID, ETA, and status. Only \
            immediate (non-scheduled) pickups are supported. Call get_ride_estimates first and \
            let the rider pick a product; pass that product_id here."
            .to_string(),
        input_schema: InputSchema::new(vec![
            guest,
            coordinates("pickup", "Pickup location coordinates"),
            coordinates("dropoff", "Dropoff location coordinates"),
            Property::text(
                "product_id",
                "Ride product ID chosen from the estimates response",
            ),
            Property::text("fare_id", "Fare ID from the estimates response").optional(),
            Property::text(
                "note_for_driver",
                "Special instructions or notes for the driver",
            )
            .optional(),
            Property::text("expense_memo", "Expense memo for business tracking").optional(),
        ]),
    }
}

fn ride_details_tool() -> ToolDefinition {
    ToolDefinition {
        name: GET_RIDE_DETAILS,
        description: "Get detailed information about an existing ride request: driver info, \
            vehicle details, pickup/dropoff locations, and current status."
            .to_string(),
        input_schema: InputSchema::new(vec![Property::text(
            "request_id",
            "The UUID of the ride request to retrieve",
        )]),
    }
}
