use super::{ContentBoundary, TEXT_BOUNDARY};
use crate::models::{Audience, OutputVariant, Tone};

pub const SOCIAL_IMAGE_BOUNDARY: ContentBoundary = ContentBoundary {
    scope: "You create brand-safe visuals for social media posts about the user's idea.",
    prohibited: &[
        "Identifiable people, faces or human figures.",
        "Logos, brands, or copyrighted characters.",
        "Text, captions, lettering or watermarks inside the image.",
        "Subject matter unrelated to the user's idea.",
    ],
};

pub fn posts_prompt(idea: &str, tone: Tone, audience: Audience, grounded: bool) -> String {
    let research = if grounded {
        "Use the search tool to check recent facts, dates and figures related to the idea before writing. Prefer up-to-date information over assumptions."
    } else {
        "Rely only on the idea as given; do not invent statistics, dates or quotes."
    };

    format!(
        r#"You are an expert social media strategist and copywriter. Turn one content idea into three platform-tailored posts.

**Content Idea:** "{idea}"
**Tone:** {tone}
**Target Audience:** {audience}

**Research:** {research}

**Platform requirements:**
*   **linkedin:** professional and insightful, 3-5 short paragraphs, ends with a question that invites discussion, 3-5 relevant hashtags.
*   **twitter:** punchy and concise, at most 280 characters including 1-2 hashtags.
*   **instagram:** engaging and visual-first caption, line breaks for readability, emojis where natural, 5-10 hashtags at the end.

{boundary}

Return a JSON object with exactly the keys "linkedin", "twitter" and "instagram", each holding the post text."#,
        boundary = TEXT_BOUNDARY.clause(Some(idea)),
    )
}

fn platform_direction(variant: OutputVariant) -> &'static str {
    match variant {
        OutputVariant::LinkedIn => "polished, professional, editorial composition that reads well in a feed",
        OutputVariant::Twitter => "bold, high-contrast, instantly readable at small sizes",
        OutputVariant::Instagram => "vibrant, aesthetic, scroll-stopping, lifestyle-magazine quality",
        OutputVariant::Design => "clean, balanced composition",
    }
}

/// Image prompt for one social platform. A reference style digest overrides
/// the tone-derived look.
pub fn social_image_prompt(
    idea: &str,
    variant: OutputVariant,
    tone: Tone,
    reference_style: Option<&str>,
) -> String {
    let style_rule = match reference_style {
        Some(digest) => format!(
            "**CRITICAL STYLE MANDATE:** The following style guide, derived from reference images, is the most \
important instruction. It OVERRIDES the '{}' tone-based look wherever they conflict. Style Guide: **{}**",
            tone,
            digest.trim()
        ),
        None => format!("**Visual tone:** {}. Let the mood of the image reflect it.", tone),
    };

    format!(
        r#"**Primary Task:** Generate a single, striking image to accompany a {platform} post.

**Post idea:** "{idea}"
**Aspect ratio:** {ratio}
**Platform direction:** {direction}
{style_rule}

The image must be a high-quality photograph or illustration that conveys the idea metaphorically or literally, with a clear focal point and no clutter.

{boundary}"#,
        platform = variant.display_name(),
        ratio = variant.aspect_ratio(),
        direction = platform_direction(variant),
        boundary = SOCIAL_IMAGE_BOUNDARY.clause(Some(idea)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_posts_prompt_names_every_key() {
        let prompt = posts_prompt("we shipped v2", Tone::Witty, Audience::Students, false);
        for key in ["\"linkedin\"", "\"twitter\"", "\"instagram\""] {
            assert!(prompt.contains(key));
        }
        assert!(prompt.contains("**Tone:** Witty"));
        assert!(prompt.contains("do not invent statistics"));
    }

    #[test]
    fn test_grounded_posts_prompt_asks_for_search() {
        let prompt = posts_prompt("this week's rate cut", Tone::Professional, Audience::General, true);
        assert!(prompt.contains("Use the search tool"));
    }

    #[test]
    fn test_social_image_carries_platform_ratio() {
        let prompt = social_image_prompt("launch day", OutputVariant::Instagram, Tone::Casual, None);
        assert!(prompt.contains("Instagram post"));
        assert!(prompt.contains("**Aspect ratio:** 3:4"));
        assert!(prompt.contains("Text, captions, lettering or watermarks"));
    }

    #[test]
    fn test_social_digest_overrides_tone() {
        let prompt = social_image_prompt(
            "launch day",
            OutputVariant::LinkedIn,
            Tone::Urgent,
            Some("muted pastels, grainy film"),
        );
        assert!(prompt.contains("OVERRIDES the 'Urgent' tone-based look"));
        assert!(!prompt.contains("**Visual tone:**"));
    }
}
