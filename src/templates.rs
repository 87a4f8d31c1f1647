use crate::models::{DecorStyle, GenerationRequest, Lighting, RoomType};

/// A ready-made design brief offered as a starting point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InspirationTemplate {
    pub name: &'static str,
    pub description: &'static str,
    pub room_type: RoomType,
    pub style: DecorStyle,
    pub lighting: Lighting,
}

impl InspirationTemplate {
    pub fn to_request(&self) -> GenerationRequest {
        GenerationRequest::design(self.description, self.room_type, self.style, self.lighting)
    }

    pub fn find(name: &str) -> Option<&'static InspirationTemplate> {
        INSPIRATION_TEMPLATES
            .iter()
            .find(|template| template.name.eq_ignore_ascii_case(name.trim()))
    }
}

pub const INSPIRATION_TEMPLATES: [InspirationTemplate; 4] = [
    InspirationTemplate {
        name: "Cozy Reading Nook",
        description: "A cozy reading nook in the corner of a living room, with a plush armchair, a soft wool throw, a small side table and a floor lamp next to a tall bookshelf.",
        room_type: RoomType::LivingRoom,
        style: DecorStyle::Scandinavian,
        lighting: Lighting::WarmAmbient,
    },
    InspirationTemplate {
        name: "Sleek & Productive Office",
        description: "A sleek home office with a large desk facing a window, an ergonomic chair, built-in shelving and a few green plants for focus.",
        room_type: RoomType::Office,
        style: DecorStyle::Minimalist,
        lighting: Lighting::BrightNatural,
    },
    InspirationTemplate {
        name: "Bohemian Dream Bedroom",
        description: "A relaxed bedroom with a low platform bed, layered patterned textiles, macrame wall hangings, rattan furniture and lots of trailing plants.",
        room_type: RoomType::Bedroom,
        style: DecorStyle::Bohemian,
        lighting: Lighting::BrightNatural,
    },
    InspirationTemplate {
        name: "Industrial-Style Kitchen",
        description: "An open kitchen with exposed brick, matte black fixtures, concrete countertops, open steel shelving and pendant lights over a large island.",
        room_type: RoomType::Kitchen,
        style: DecorStyle::Industrial,
        lighting: Lighting::DramaticAccent,
    },
];
