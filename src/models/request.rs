use super::{artifact::OutputVariant, image::ImageData, image::ImageQuality};
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! labelled_enum {
    ($name:ident { $($variant:ident => $label:expr),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

labelled_enum!(RoomType {
    LivingRoom => "Living Room",
    Bedroom => "Bedroom",
    Kitchen => "Kitchen",
    Office => "Home Office",
    Bathroom => "Bathroom",
});

labelled_enum!(DecorStyle {
    Modern => "Modern",
    Scandinavian => "Scandinavian",
    Bohemian => "Bohemian",
    Industrial => "Industrial",
    Minimalist => "Minimalist",
});

labelled_enum!(Lighting {
    BrightNatural => "Bright Natural Light",
    WarmAmbient => "Warm Ambient Lighting",
    DramaticAccent => "Dramatic Accent Lighting",
});

labelled_enum!(Tone {
    Professional => "Professional",
    Casual => "Casual",
    Witty => "Witty",
    Inspirational => "Inspirational",
    Urgent => "Urgent",
});

labelled_enum!(Audience {
    General => "General Audience",
    Professionals => "Professionals",
    Students => "Students",
    TechEnthusiasts => "Tech Enthusiasts",
    SmallBusiness => "Small Business Owners",
});

impl Lighting {
    pub fn description(&self) -> &'static str {
        match self {
            Lighting::BrightNatural => "Simulates a room filled with abundant daylight, creating a clean, airy, and energizing atmosphere.",
            Lighting::WarmAmbient => "Creates a cozy and inviting mood with soft, warm light from lamps and indirect sources.",
            Lighting::DramaticAccent => "Uses focused spotlights and shadows to highlight specific architectural features or decor pieces.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Flow {
    Design,
    Social,
}

impl Flow {
    /// Variants in display order. Assembly always follows this order.
    pub fn variants(&self) -> &'static [OutputVariant] {
        match self {
            Flow::Design => &[OutputVariant::Design],
            Flow::Social => &[
                OutputVariant::LinkedIn,
                OutputVariant::Twitter,
                OutputVariant::Instagram,
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "flow", rename_all = "snake_case")]
pub enum RequestOptions {
    Design {
        room_type: RoomType,
        style: DecorStyle,
        lighting: Lighting,
    },
    Social {
        tone: Tone,
        audience: Audience,
    },
}

impl RequestOptions {
    pub fn flow(&self) -> Flow {
        match self {
            RequestOptions::Design { .. } => Flow::Design,
            RequestOptions::Social { .. } => Flow::Social,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub subject: String,
    pub options: RequestOptions,
    #[serde(default)]
    pub quality: ImageQuality,
    #[serde(default)]
    pub reference_images: Vec<ImageData>,
    #[serde(default)]
    pub use_grounding: bool,
    #[serde(default)]
    pub use_advanced_refinement: bool,
}

impl GenerationRequest {
    pub fn new(subject: impl Into<String>, options: RequestOptions) -> Self {
        Self {
            subject: subject.into(),
            options,
            quality: ImageQuality::default(),
            reference_images: Vec::new(),
            use_grounding: false,
            use_advanced_refinement: false,
        }
    }

    pub fn design(
        subject: impl Into<String>,
        room_type: RoomType,
        style: DecorStyle,
        lighting: Lighting,
    ) -> Self {
        Self::new(
            subject,
            RequestOptions::Design {
                room_type,
                style,
                lighting,
            },
        )
    }

    pub fn social(subject: impl Into<String>, tone: Tone, audience: Audience) -> Self {
        Self::new(subject, RequestOptions::Social { tone, audience })
    }

    pub fn with_quality(mut self, quality: ImageQuality) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_reference_images(mut self, images: Vec<ImageData>) -> Self {
        self.reference_images = images;
        self
    }

    pub fn with_grounding(mut self, enabled: bool) -> Self {
        self.use_grounding = enabled;
        self
    }

    pub fn with_advanced_refinement(mut self, enabled: bool) -> Self {
        self.use_advanced_refinement = enabled;
        self
    }

    pub fn flow(&self) -> Flow {
        self.options.flow()
    }

    pub fn trimmed_subject(&self) -> &str {
        self.subject.trim()
    }
}
