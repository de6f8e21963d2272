// src/api/types.rs — Wire types for the generation endpoint
//
// Field names follow the caller's JSON contract: top-level and most nested
// keys are camelCase, but the delivery package keys (social_media, email,
// landing_page, video) are snake_case. Casing must round-trip exactly —
// cached responses are re-served verbatim.

use serde::{Deserialize, Serialize};

/// Inbound generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub session_id: String,
    pub property_data: PropertyData,
    pub agent_data: AgentData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyData {
    pub address: String,
    pub status: PropertyStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropertyStatus {
    ForSale,
    RecentlySold,
}

impl PropertyStatus {
    /// Human-readable form used in generated copy.
    pub fn label(&self) -> &'static str {
        match self {
            PropertyStatus::ForSale => "For Sale",
            PropertyStatus::RecentlySold => "Recently Sold",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentData {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub headshot: String,
    pub colors: BrandColors,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandColors {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
}

/// Full generation result — produced by the downstream service or by the
/// fallback synthesizer, shape-identical either way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResponse {
    pub status: String,
    pub message: String,
    pub summary: Summary,
    pub access: AccessLinks,
    pub actions: Actions,
    pub delivery_package: DeliveryPackage,
    pub timestamp: String,
    /// Set only on synthesized fallback payloads; absent on genuine
    /// downstream responses so their serialized form is unchanged.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub degraded: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub property: String,
    pub price: String,
    pub status: String,
    pub deliverables: Deliverables,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deliverables {
    pub social_media_posts: String,
    pub email_templates: String,
    pub landing_page: String,
    pub video_content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessLinks {
    pub dashboard: String,
    pub landing_page: String,
    pub download_pack: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actions {
    pub approve: ActionButton,
    pub regenerate: ActionButton,
    pub download: ActionButton,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionButton {
    pub url: String,
    pub label: String,
}

/// Delivery package keys are snake_case on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryPackage {
    pub social_media: SocialMediaContent,
    pub email: EmailContent,
    pub landing_page: LandingPage,
    pub video: VideoContent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialMediaContent {
    pub captions: Vec<SocialMediaCaption>,
    pub hashtags: Vec<String>,
    pub image_specs: Vec<ImageSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialMediaCaption {
    pub platform: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub caption: String,
    pub cta: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSpec {
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub dimensions: String,
    pub overlay: Option<String>,
    pub banner: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailContent {
    pub templates: Vec<EmailTemplate>,
    pub subject_lines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailTemplate {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub html: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandingPage {
    pub html: String,
    pub seo: SeoBlock,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeoBlock {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoContent {
    pub concepts: Vec<VideoConcept>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoConcept {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
}

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
