use super::image::ImageData;
use serde::{Deserialize, Serialize};

/// A pin dropped on the image. Positions are percentages of width/height.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub x: f32,
    pub y: f32,
    pub text: String,
}

impl Comment {
    pub fn new(x: f32, y: f32, text: impl Into<String>) -> Self {
        Self {
            x,
            y,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EditInstruction {
    Plain {
        prompt: String,
    },
    /// Freehand overlay layer plus ordered, point-anchored comments.
    Annotated {
        overlay: ImageData,
        #[serde(default)]
        comments: Vec<Comment>,
    },
}

impl EditInstruction {
    pub fn plain(prompt: impl Into<String>) -> Self {
        EditInstruction::Plain {
            prompt: prompt.into(),
        }
    }

    pub fn annotated(overlay: ImageData, comments: Vec<Comment>) -> Self {
        EditInstruction::Annotated { overlay, comments }
    }

    /// The drawn layer, if it has any bytes.
    pub fn overlay(&self) -> Option<&ImageData> {
        match self {
            EditInstruction::Plain { .. } => None,
            EditInstruction::Annotated { overlay, .. } => {
                Some(overlay).filter(|overlay| !overlay.is_empty())
            }
        }
    }

    /// Nothing for the editor to act on.
    pub fn is_empty(&self) -> bool {
        match self {
            EditInstruction::Plain { prompt } => prompt.trim().is_empty(),
            EditInstruction::Annotated { overlay, comments } => {
                overlay.is_empty() && comments.iter().all(|c| c.text.trim().is_empty())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_overlay_is_absent() {
        let comments_only = EditInstruction::annotated(
            ImageData::png(Vec::new()),
            vec![Comment::new(5.0, 5.0, "Add a rug")],
        );
        assert!(comments_only.overlay().is_none());
        assert!(!comments_only.is_empty());

        let drawn = EditInstruction::annotated(ImageData::png(vec![1]), Vec::new());
        assert!(drawn.overlay().is_some());
        assert!(EditInstruction::plain("x").overlay().is_none());
    }
}
