//! Static workflow prompt. No state, no backend calls.

use serde_json::{json, Value};

pub const PROMPT_NAME: &str = "book_a_ride";

const WORKFLOW_TEXT: &str = "\
You are helping a rider book a trip through the guest trips API.\n\
Follow this order:\n\
1. Call get_ride_estimates with the pickup and dropoff coordinates.\n\
2. Present the returned products with fares and ETAs, and let the rider \
choose one. Never pick a product on their behalf.\n\
3. Call create_ride_request with the chosen product_id (and fare_id when \
available). Only immediate pickups are supported; do not offer scheduling.\n\
4. Use get_ride_details with the returned request_id to track the trip \
and report driver, vehicle, and status.";

pub fn list() -> Value {
    json!([
        {
            "name": PROMPT_NAME,
            "description": "Recommended workflow for estimating, booking, and tracking a ride",
            "arguments": [],
        }
    ])
}

pub fn get(name: &str) -> Option<Value> {
    if name != PROMPT_NAME {
        return None;
    }
    Some(json!({
        "description": "Recommended workflow for estimating, booking, and tracking a ride",
        "messages": [
            {
                "role": "user",
                "content": { "type": "text", "text": WORKFLOW_TEXT },
            }
        ],
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_names_the_single_workflow_prompt() {
        let prompts = list();
        assert_eq!(prompts.as_array().unwrap().len(), 1);
        assert_eq!(prompts[0]["name"], PROMPT_NAME);
    }

    #[test]
    fn get_returns_the_workflow_text_only_for_the_known_name() {
        let prompt = get(PROMPT_NAME).unwrap();
        let text = prompt["messages"][0]["content"]["text"].as_str().unwrap();
        assert!(text.contains("get_ride_estimates"));
        assert!(text.contains("create_ride_request"));
        assert!(get("other").is_none());
    }
}
