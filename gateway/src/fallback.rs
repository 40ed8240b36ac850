//! Static fallback payloads, one per endpoint. These are the deploy-time
//! defaults substituted whenever the upstream cannot supply a trustworthy
//! value; listing-style endpoints never show the end user an empty result.

use serde::Serialize;
use serde_json::{Value, json};

pub fn site_config() -> Value {
    json!({ "brand_name": "Site", "favicon_url": null, "updated_at": null })
}

pub fn homepage() -> Value {
    json!({
        "sections": [],
        "videos": [],
        "meta_title": "Home",
        "meta_description": "Welcome",
        "hero_image": null,
        "content": "",
    })
}

pub fn categories() -> Value {
    json!({ "categories": [] })
}

pub fn main_pages() -> Value {
    json!({ "pages": [] })
}

pub fn footer_menu() -> Value {
    json!({ "company": [], "legal": [] })
}

pub fn footer_address() -> Value {
    json!({ "address": "", "source": "fallback" })
}

pub fn pages_with_categories() -> Value {
    json!({ "pages": [] })
}

#[derive(Debug, Clone, Serialize)]
pub struct Company {
    pub id: u64,
    pub name: &'static str,
    pub slug: &'static str,
    pub logo: &'static str,
    pub headline: &'static str,
    pub features: &'static str,
    pub cta_text: &'static str,
    pub rating: f64,
    pub landing_url: &'static str,
}

pub fn companies() -> Vec<Company> {
    vec![
        Company {
            id: 991,
            name: "Progressive",
            slug: "progressive",
            logo: "https://www.progressive.com/content/images/domainprogressive/wh3/base/header/logo_progressive.svg",
            headline: "Drivers save an average of $700",
            features: "Snapshot Program\nBundle & Save\n24/7 Support",
            cta_text: "View Quote",
            rating: 4.8,
            landing_url: "https://www.progressive.com/",
        },
        Company {
            id: 992,
            name: "Geico",
            slug: "geico",
            logo: "https://www.geico.com/public/images/logo/geico-logo.svg",
            headline: "15 minutes could save you 15%",
            features: "Multi-Policy Discount\nAccident Forgiveness\nVehicle Systems",
            cta_text: "View Quote",
            rating: 4.7,
            landing_url: "https://www.geico.com/",
        },
        Company {
            id: 993,
            name: "State Farm",
            slug: "state-farm",
            logo: "https://www.statefarm.com/content/dam/sf-library/en-us/secure/branding/sf-logo-red.svg",
            headline: "Like a good neighbor, State Farm is there",
            features: "Safe Driver Discount\nSteer Clear\nDrive Safe & Save",
            cta_text: "View Quote",
            rating: 4.9,
            landing_url: "https://www.statefarm.com/",
        },
        Company {
            id: 994,
            name: "Allstate",
            slug: "allstate",
            logo: "https://www.allstate.com/resources/allstate/images/tools/nav/allstate-logo-horiz.svg",
            headline: "You're in good hands",
            features: "Drivewise\nMilewise\nNew Car Replacement",
            cta_text: "View Quote",
            rating: 4.6,
            landing_url: "https://www.allstate.com/",
        },
        Company {
            id: 995,
            name: "Liberty Mutual",
            slug: "liberty-mutual",
            logo: "https://www.libertymutual.com/akam/13/pixel_52504b77.png",
            headline: "Only pay for what you need",
            features: "RightTrack\nViolation Free\nMulti-Car",
            cta_text: "View Quote",
            rating: 4.5,
            landing_url: "https://www.libertymutual.com/",
        },
    ]
}

/// The quotes fallback body. `source` records which branch degraded so
/// callers (and tests) can tell fallbacks apart from live data.
pub fn quotes(zip: &str, source: &str, error: Option<&str>) -> Value {
    let mut body = json!({
        "ok": true,
        "companies": companies(),
        "zip": zip,
        "_source": source,
    });
    if let Some(message) = error {
        body["error"] = json!(message);
    }
    body
}
