use super::image::{AspectRatio, ImageData};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputVariant {
    Design,
    LinkedIn,
    Twitter,
    Instagram,
}

impl OutputVariant {
    pub fn key(&self) -> &'static str {
        match self {
            OutputVariant::Design => "design",
            OutputVariant::LinkedIn => "linkedin",
            OutputVariant::Twitter => "twitter",
            OutputVariant::Instagram => "instagram",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            OutputVariant::Design => "Design",
            OutputVariant::LinkedIn => "LinkedIn",
            OutputVariant::Twitter => "Twitter/X",
            OutputVariant::Instagram => "Instagram",
        }
    }

    pub fn aspect_ratio(&self) -> AspectRatio {
        match self {
            OutputVariant::Design | OutputVariant::LinkedIn => AspectRatio::Widescreen,
            OutputVariant::Twitter => AspectRatio::Square,
            OutputVariant::Instagram => AspectRatio::PortraitTall,
        }
    }
}

/// Structured text for the social flow, one post per platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformPosts {
    pub linkedin: String,
    pub twitter: String,
    pub instagram: String,
}

impl PlatformPosts {
    /// Response schema sent with the structured-output request.
    pub fn schema() -> Value {
        let field = |description: &str| json!({ "type": "STRING", "description": description });
        json!({
            "type": "OBJECT",
            "properties": {
                "linkedin": field("Professional long-form post for LinkedIn."),
                "twitter": field("Short post for Twitter/X, at most 280 characters."),
                "instagram": field("Visual-first Instagram caption with hashtags."),
            },
            "required": ["linkedin", "twitter", "instagram"],
        })
    }

    pub fn get(&self, variant: OutputVariant) -> Option<&str> {
        match variant {
            OutputVariant::LinkedIn => Some(&self.linkedin),
            OutputVariant::Twitter => Some(&self.twitter),
            OutputVariant::Instagram => Some(&self.instagram),
            OutputVariant::Design => None,
        }
    }

    fn trimmed(self) -> Self {
        Self {
            linkedin: self.linkedin.trim().to_string(),
            twitter: self.twitter.trim().to_string(),
            instagram: self.instagram.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GeneratedText {
    Rationale { text: String },
    PlatformPosts(PlatformPosts),
}

impl GeneratedText {
    pub fn rationale(text: impl Into<String>) -> Self {
        GeneratedText::Rationale {
            text: text.into().trim().to_string(),
        }
    }

    pub fn posts(posts: PlatformPosts) -> Self {
        GeneratedText::PlatformPosts(posts.trimmed())
    }

    /// True when any part the caller would display is empty.
    pub fn is_blank(&self) -> bool {
        match self {
            GeneratedText::Rationale { text } => text.trim().is_empty(),
            GeneratedText::PlatformPosts(posts) => [
                &posts.linkedin,
                &posts.twitter,
                &posts.instagram,
            ]
            .iter()
            .any(|s| s.trim().is_empty()),
        }
    }

    pub fn for_variant(&self, variant: OutputVariant) -> Option<&str> {
        match self {
            GeneratedText::Rationale { text } => Some(text),
            GeneratedText::PlatformPosts(posts) => posts.get(variant),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantSlot {
    pub variant: OutputVariant,
    pub aspect_ratio: AspectRatio,
    pub image: Option<ImageData>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedArtifactSet {
    pub text: GeneratedText,
    pub slots: Vec<VariantSlot>,
}

impl GeneratedArtifactSet {
    pub fn slot(&self, variant: OutputVariant) -> Option<&VariantSlot> {
        self.slots.iter().find(|slot| slot.variant == variant)
    }

    pub fn variant_keys(&self) -> Vec<&'static str> {
        self.slots.iter().map(|slot| slot.variant.key()).collect()
    }

    pub fn failed_variants(&self) -> Vec<OutputVariant> {
        self.slots
            .iter()
            .filter(|slot| slot.image.is_none())
            .map(|slot| slot.variant)
            .collect()
    }

    /// Returns a new set with one slot's image replaced. Unknown variants
    /// leave the set unchanged.
    pub fn with_image(&self, variant: OutputVariant, image: ImageData) -> Self {
        let mut next = self.clone();
        if let Some(slot) = next.slots.iter_mut().find(|slot| slot.variant == variant) {
            slot.image = Some(image);
        }
        next
    }
}
