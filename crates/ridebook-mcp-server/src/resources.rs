//! Static widget resource descriptors.
//!
//! The ride estimate widget ships as a prebuilt bundle
//! (`ride-estimate.js` / `ride-estimate.css`) served from a separate
//! asset host. The resource here is an HTML shell pointing at those
//! assets; protocol clients that render widgets read it by URI.

use serde_json::{json, Value};

pub const WIDGET_URI: &str = "ui://widget/ride-estimate.html";
const WIDGET_MIME: &str = "text/html";

fn widget_html(widget_base_url: &str) -> String {
    let base = widget_base_url.trim_end_matches('/');
    format!(
        "<div id=\"ride-estimate-root\"></div>\n\
         <link rel=\"stylesheet\" href=\"{base}/ride-estimate.css\">\n\
         <script type=\"module\" src=\"{base}/ride-estimate.js\"></script>"
    )
}

pub fn list() -> Value {
    json!([
        {
            "uri": WIDGET_URI,
            "name": "Ride estimate widget",
            "description": "Interactive card rendering ride products, fares, and ETAs",
            "mimeType": WIDGET_MIME,
        }
    ])
}

pub fn templates() -> Value {
    json!([
        {
            "uriTemplate": WIDGET_URI,
            "name": "Ride estimate widget",
            "mimeType": WIDGET_MIME,
        }
    ])
}

pub fn read(uri: &str, widget_base_url: &str) -> Option<Value> {
    if uri != WIDGET_URI {
        return None;
    }
    Some(json!({
        "contents": [
            {
                "uri": WIDGET_URI,
                "mimeType": WIDGET_MIME,
                "text": widget_html(widget_base_url),
            }
        ],
    }))
}
