// src/core/fallback.rs — Contract-shaped substitute response
//
// Built only from the original request plus fixed placeholder copy, so the
// caller receives a structurally complete marketing pack even when the
// downstream generator is unreachable. Never cached: the ledger entry was
// already abandoned, and a later retry goes downstream again.

use crate::api::types::{
    AccessLinks, ActionButton, Actions, DeliveryPackage, Deliverables, EmailContent,
    EmailTemplate, GenerationRequest, GenerationResponse, ImageSpec, LandingPage,
    PropertyStatus, SeoBlock, SocialMediaCaption, SocialMediaContent, Summary, VideoConcept,
    VideoContent,
};

/// Build a full response from request data alone. Every required field is
/// populated even when optional request fields arrive empty.
pub fn synthesize(request: &GenerationRequest) -> GenerationResponse {
    let sold = request.property_data.status == PropertyStatus::RecentlySold;
    let address = or_placeholder(&request.property_data.address, "Beautiful Property");
    let name = or_placeholder(&request.agent_data.name, "Your Real Estate Agent");
    let phone = or_placeholder(&request.agent_data.phone, "555-123-4567");
    let email = or_placeholder(&request.agent_data.email, "agent@example.com");
    let primary = or_placeholder(&request.agent_data.colors.primary, "#2C5282");
    let accent = or_placeholder(&request.agent_data.colors.accent, "#E53E3E");
    let session_id = or_placeholder(&request.session_id, "demo");

    GenerationResponse {
        status: "ready_for_review".into(),
        message: "Your complete listing marketing pack is ready!".into(),
        summary: Summary {
            property: address.to_string(),
            price: "$750,000".into(),
            status: request.property_data.status.label().to_string(),
            deliverables: Deliverables {
                social_media_posts: "5 captions + hashtags".into(),
                email_templates: "1 template + 3 subject lines".into(),
                landing_page: "SEO-optimized + mobile responsive".into(),
                video_content: "1 concept with script".into(),
            },
        },
        access: AccessLinks {
            dashboard: format!("https://dashboard.example.com/campaign/{session_id}"),
            landing_page: format!("https://listings.example.com/{session_id}"),
            download_pack: format!("https://downloads.example.com/{session_id}_pack.zip"),
        },
        actions: Actions {
            approve: ActionButton {
                url: format!("/api/campaigns/{session_id}/approve"),
                label: "Approve & Schedule".into(),
            },
            regenerate: ActionButton {
                url: format!("/api/campaigns/{session_id}/regenerate"),
                label: "Regenerate Content".into(),
            },
            download: ActionButton {
                url: format!("https://downloads.example.com/{session_id}_pack.zip"),
                label: "Download Complete Pack".into(),
            },
        },
        delivery_package: DeliveryPackage {
            social_media: social_media(sold, address, name, phone, email),
            email: email_content(sold, address, name, phone, email, primary, accent),
            landing_page: landing_page(sold, address, name, phone),
            video: video(sold, address, name),
        },
        timestamp: chrono::Utc::now().to_rfc3339(),
        degraded: true,
    }
}

fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.trim().is_empty() {
        placeholder
    } else {
        value
    }
}

fn social_media(
    sold: bool,
    address: &str,
    name: &str,
    phone: &str,
    email: &str,
) -> SocialMediaContent {
    let headline = if sold { "JUST SOLD" } else { "NEW LISTING ALERT" };
    let captions = vec![
        SocialMediaCaption {
            platform: "YouTube".into(),
            kind: "video-description".into(),
            caption: format!(
                "🏠 {headline} | {address}\n\nJoin me for an exclusive walkthrough of this \
                 stunning property.\n\nContact me today: {phone}\n{email}\n\n#RealEstate \
                 #PropertyTour"
            ),
            cta: format!("Contact {name} at {phone}"),
        },
        SocialMediaCaption {
            platform: "Instagram/Facebook".into(),
            kind: "feature-focused".into(),
            caption: format!(
                "✨ {headline}! ✨\n\n📍 {address}\n\n{}\n\nReady to find your perfect home? \
                 Let's talk!",
                if sold {
                    "Another successful closing!"
                } else {
                    "This dream home won't last long!"
                }
            ),
            cta: format!("Call {name} at {phone}"),
        },
        SocialMediaCaption {
            platform: "LinkedIn".into(),
            kind: "professional".into(),
            caption: format!(
                "Professional Update: {}\n\nProperty: {address}\n\n{}\n\nFor real estate \
                 inquiries, feel free to connect with me directly.",
                if sold {
                    "Successfully Closed"
                } else {
                    "New Listing Available"
                },
                if sold {
                    "Proud to have facilitated another smooth transaction for my clients."
                } else {
                    "Exceptional property now available in a desirable location."
                }
            ),
            cta: format!("Connect with {name} for professional real estate services"),
        },
        SocialMediaCaption {
            platform: "X (Twitter)".into(),
            kind: "thread".into(),
            caption: format!(
                "🏠 {}: {address}\n\n{}\n\n#RealEstate #PropertyAlert",
                if sold { "SOLD" } else { "LISTING" },
                if sold {
                    "Another happy client, another successful sale!"
                } else {
                    "Stunning property just hit the market!"
                }
            ),
            cta: format!("DM me or call {phone}"),
        },
        SocialMediaCaption {
            platform: "TikTok".into(),
            kind: "vertical-video".into(),
            caption: format!(
                "{} #RealEstate #PropertyTour #HomeSweetHome #NewListing",
                if sold {
                    "SOLD in record time!"
                } else {
                    "House hunting? This one's special."
                }
            ),
            cta: format!("Contact me for showings! {phone}"),
        },
    ];

    SocialMediaContent {
        captions,
        hashtags: vec![
            "#realestate".into(),
            "#property".into(),
            "#home".into(),
            "#listing".into(),
            "#dreamhome".into(),
            "#yourlocalrealtor".into(),
            "#propertyexpert".into(),
            "#realestateagent".into(),
            if sold { "#sold".into() } else { "#forsale".into() },
            "#newlisting".into(),
            "#homebuying".into(),
            "#realtorlife".into(),
        ],
        image_specs: vec![ImageSpec {
            kind: "hero-image".into(),
            description: "Main exterior shot with status overlay".into(),
            dimensions: "1080x1080 (Instagram Square), 1200x630 (Facebook)".into(),
            overlay: Some(if sold { "SOLD" } else { "FOR SALE" }.into()),
            banner: None,
        }],
    }
}

fn email_content(
    sold: bool,
    address: &str,
    name: &str,
    phone: &str,
    email: &str,
    primary: &str,
    accent: &str,
) -> EmailContent {
    let headline = if sold { "PROPERTY SOLD" } else { "NEW LISTING ALERT" };
    let pitch = if sold {
        "I'm pleased to announce another successful closing!"
    } else {
        "Don't miss out on this exceptional opportunity!"
    };
    let ask = if sold {
        "sell your property"
    } else {
        "schedule a viewing"
    };
    let html = format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>{headline} - {address}</title>
    <style>
        body {{ font-family: Arial, sans-serif; line-height: 1.6; color: #333; }}
        .container {{ max-width: 600px; margin: 0 auto; }}
        .header {{ background: {primary}; color: white; padding: 30px 20px; text-align: center; }}
        .status {{ font-size: 32px; font-weight: bold; color: {accent}; }}
    </style>
</head>
<body>
    <div class="container">
        <div class="header"><h1>{headline}</h1></div>
        <div style="padding: 30px 20px;">
            <div class="status">{address}</div>
            <p>{pitch}</p>
            <div style="margin: 20px 0; padding: 20px; background: #f8f9fa; border-radius: 8px;">
                <h3 style="margin: 0 0 10px 0; color: {primary};">Ready to {ask}?</h3>
                <p>Contact me today!</p>
                <p><strong>{name}</strong><br/>{phone}<br/>{email}</p>
            </div>
        </div>
    </div>
</body>
</html>"#
    );

    EmailContent {
        templates: vec![EmailTemplate {
            name: "Property Update Newsletter".into(),
            kind: "html".into(),
            html,
        }],
        subject_lines: vec![
            format!("{}: {address}", if sold { "SOLD" } else { "NEW LISTING" }),
            format!(
                "{} - {address}",
                if sold { "Another Success Story" } else { "Just Listed" }
            ),
            format!(
                "{name} {}",
                if sold {
                    "Delivers Results"
                } else {
                    "Has Your Next Home"
                }
            ),
        ],
    }
}

fn landing_page(sold: bool, address: &str, name: &str, phone: &str) -> LandingPage {
    let status = if sold { "SOLD" } else { "FOR SALE" };
    LandingPage {
        html: format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{address} | {name}</title>
</head>
<body>
    <h1>{status}: {address}</h1>
    <p>Contact {name} at {phone}</p>
</body>
</html>"#
        ),
        seo: SeoBlock {
            title: format!("{address} | {name}"),
            description: format!(
                "{} - Contact {name} today!",
                if sold {
                    "Successfully sold property"
                } else {
                    "Property for sale"
                }
            ),
        },
    }
}

fn video(sold: bool, address: &str, name: &str) -> VideoContent {
    VideoContent {
        concepts: vec![VideoConcept {
            kind: Some("property-tour".into()),
            title: "Virtual Property Walkthrough".into(),
            description: "Professional video tour highlighting key features".into(),
            duration: None,
            script: Some(format!(
                "Welcome to {address}! I'm {name}, and I'm excited to show you this {}...",
                if sold {
                    "recently sold home"
                } else {
                    "incredible listing"
                }
            )),
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{AgentData, BrandColors, PropertyData};
    use crate::core::testutil::sample_request;
    use serde_json::Value;

    fn empty_fields_request() -> GenerationRequest {
        GenerationRequest {
            session_id: "s-empty".into(),
            property_data: PropertyData {
                address: "".into(),
                status: PropertyStatus::ForSale,
            },
            agent_data: AgentData {
                name: "".into(),
                phone: "".into(),
                email: "".into(),
                headshot: "".into(),
                colors: BrandColors {
                    primary: "".into(),
                    secondary: "".into(),
                    accent: "".into(),
                },
            },
        }
    }

    fn assert_no_empty_strings(value: &Value, path: &str) {
        match value {
            Value::String(s) => assert!(!s.is_empty(), "empty string at {path}"),
            Value::Array(items) => {
                assert!(!items.is_empty(), "empty array at {path}");
                for (i, item) in items.iter().enumerate() {
                    assert_no_empty_strings(item, &format!("{path}[{i}]"));
                }
            }
            Value::Object(map) => {
                for (key, item) in map {
                    assert_no_empty_strings(item, &format!("{path}.{key}"));
                }
            }
            _ => {}
        }
    }

    #[test]
    fn test_summary_reflects_request() {
        let request = sample_request();
        let response = synthesize(&request);
        assert_eq!(response.summary.property, request.property_data.address);
        assert_eq!(response.summary.status, "For Sale");
        assert!(response.degraded);
    }

    #[test]
    fn test_sold_status_copy() {
        let mut request = sample_request();
        request.property_data.status = PropertyStatus::RecentlySold;
        let response = synthesize(&request);
        assert_eq!(response.summary.status, "Recently Sold");
        assert!(response.delivery_package.social_media.captions[0]
            .caption
            .contains("JUST SOLD"));
        assert_eq!(
            response.delivery_package.social_media.image_specs[0].overlay,
            Some("SOLD".into())
        );
        assert!(response
            .delivery_package
            .social_media
            .hashtags
            .contains(&"#sold".to_string()));
    }

    #[test]
    fn test_all_required_fields_non_empty_with_empty_input() {
        let response = synthesize(&empty_fields_request());
        let value = serde_json::to_value(&response).unwrap();
        assert_no_empty_strings(&value, "$");
    }

    #[test]
    fn test_placeholders_substitute_empty_agent_fields() {
        let response = synthesize(&empty_fields_request());
        let email_html = &response.delivery_package.email.templates[0].html;
        assert!(email_html.contains("555-123-4567"));
        assert!(email_html.contains("Your Real Estate Agent"));
        assert!(email_html.contains("#2C5282"));
    }

    #[test]
    fn test_session_id_threaded_through_links() {
        let response = synthesize(&sample_request());
        let session_id = sample_request().session_id;
        assert!(response.access.dashboard.ends_with(&session_id));
        assert!(response.actions.approve.url.contains(&session_id));
        assert!(response.access.download_pack.contains(&session_id));
    }

    #[test]
    fn test_deterministic_apart_from_timestamp() {
        let request = sample_request();
        let mut a = serde_json::to_value(synthesize(&request)).unwrap();
        let mut b = serde_json::to_value(synthesize(&request)).unwrap();
        a["timestamp"] = Value::Null;
        b["timestamp"] = Value::Null;
        assert_eq!(a, b);
    }

    #[test]
    fn test_email_uses_agent_brand_colors() {
        let request = sample_request();
        let response = synthesize(&request);
        let html = &response.delivery_package.email.templates[0].html;
        assert!(html.contains(&request.agent_data.colors.primary));
        assert!(html.contains(&request.agent_data.colors.accent));
    }
}
