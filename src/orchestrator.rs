use crate::{
    client::{generate_structured, GenerationClient},
    error::{Result, StudioError},
    logger,
    models::{
        EditInstruction, GeneratedArtifactSet, GeneratedText, GenerationRequest, ImageData,
        OutputVariant, PlatformPosts, RequestOptions, TextRequest, VariantSlot,
    },
    prompts,
    refine::{Refined, RefinementLoop},
};
use futures::future::join_all;
use std::sync::Arc;

/// Entry point for callers: one generation request, or one edit, at a time.
///
/// Holds no per-request state, so a single `Studio` can serve concurrent
/// requests.
#[derive(Clone)]
pub struct Studio {
    client: Arc<dyn GenerationClient>,
}

impl Studio {
    pub fn new(client: Arc<dyn GenerationClient>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &dyn GenerationClient {
        self.client.as_ref()
    }

    pub async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedArtifactSet> {
        if request.trimmed_subject().is_empty() {
            return Err(StudioError::validation("Please enter a description."));
        }

        let _timer = logger::timer(&format!("generate {:?}", request.flow()));
        let digest = self.reference_digest(request).await?;

        let text = self.generate_text_step(request);
        let images = async {
            Ok::<_, StudioError>(join_all(
                request
                    .flow()
                    .variants()
                    .iter()
                    .map(|variant| self.generate_slot(request, *variant, digest.as_deref())),
            )
            .await)
        };

        // Slots come back in variant order no matter which call finishes first.
        let (text, slots) = futures::try_join!(text, images)?;

        let set = GeneratedArtifactSet { text, slots };
        let failed = set.failed_variants();
        if !failed.is_empty() {
            log::warn!(
                "Generated with {} empty slot(s): {:?}",
                failed.len(),
                failed
            );
        }
        Ok(set)
    }

    pub async fn apply_edit(
        &self,
        base: &ImageData,
        instruction: &EditInstruction,
    ) -> Result<ImageData> {
        if base.is_empty() {
            return Err(StudioError::validation("There is no image to edit."));
        }
        if instruction.is_empty() {
            return Err(StudioError::validation(
                "Please describe the edit or draw on the image.",
            ));
        }

        let _timer = logger::timer("apply_edit");
        self.client.edit_image(base, instruction).await
    }

    pub async fn edit_text(&self, original: &str, instruction: &str) -> Result<String> {
        if instruction.trim().is_empty() {
            return Err(StudioError::validation("Please describe how to change the text."));
        }
        if original.trim().is_empty() {
            return Err(StudioError::validation("There is no text to edit."));
        }

        let prompt = prompts::text_edit_prompt(original, instruction);
        let rewritten = self.client.generate_text(TextRequest::new(prompt)).await?;
        non_blank(rewritten, "text edit")
    }

    pub async fn analyze_image(&self, image: &ImageData, question: &str) -> Result<String> {
        if question.trim().is_empty() {
            return Err(StudioError::validation("Please enter a question about the image."));
        }
        if image.is_empty() {
            return Err(StudioError::validation("There is no image to analyze."));
        }

        let answer = self.client.analyze_image(image, question.trim()).await?;
        non_blank(answer, "image analysis")
    }

    async fn reference_digest(&self, request: &GenerationRequest) -> Result<Option<String>> {
        if request.reference_images.is_empty() {
            return Ok(None);
        }

        let digest_request = TextRequest::new(prompts::reference_style_prompt(request.flow()))
            .with_images(request.reference_images.clone());
        let digest = self.client.generate_text(digest_request).await?;
        let digest = digest.trim();
        if digest.is_empty() {
            log::warn!("Reference style digest came back empty; using the selected style");
            return Ok(None);
        }

        log::debug!("Reference style digest: {}", digest);
        Ok(Some(digest.to_string()))
    }

    async fn generate_text_step(&self, request: &GenerationRequest) -> Result<GeneratedText> {
        let text_request =
            TextRequest::new(prompts::text_prompt(request)).with_grounding(request.use_grounding);

        let text = match request.options {
            RequestOptions::Design { .. } => {
                let rationale = self.client.generate_text(text_request).await?;
                GeneratedText::rationale(rationale)
            }
            RequestOptions::Social { .. } => {
                let posts: PlatformPosts = generate_structured(
                    self.client.as_ref(),
                    text_request,
                    PlatformPosts::schema(),
                )
                .await?;
                GeneratedText::posts(posts)
            }
        };

        if text.is_blank() {
            return Err(StudioError::generation("text step returned empty content"));
        }
        Ok(text)
    }

    async fn generate_slot(
        &self,
        request: &GenerationRequest,
        variant: OutputVariant,
        digest: Option<&str>,
    ) -> VariantSlot {
        let aspect_ratio = variant.aspect_ratio();
        let prompt = prompts::image_prompt(request, variant, digest);

        let result = if request.use_advanced_refinement {
            RefinementLoop::new(self.client.as_ref())
                .run(&prompt, aspect_ratio, request.quality)
                .await
                .map(|refined| {
                    if let Refined::Edited { instruction } = &refined.outcome {
                        log::debug!("{} refined with: {}", variant.display_name(), instruction);
                    }
                    refined.image
                })
        } else {
            self.client
                .generate_image(&prompt, aspect_ratio, request.quality)
                .await
        };

        let image = match result {
            Ok(image) => Some(image),
            Err(e) => {
                log::warn!("{} image failed: {}", variant.display_name(), e);
                None
            }
        };

        VariantSlot {
            variant,
            aspect_ratio,
            image,
        }
    }
}

fn non_blank(text: String, what: &str) -> Result<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(StudioError::generation(format!("{} returned empty text", what)));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::MockGenerationClient;
    use crate::models::{
        AspectRatio, Audience, Comment, DecorStyle, Lighting, RoomType, Tone,
    };

    const POSTS_JSON: &str =
        r#"{"linkedin":"Long read.","twitter":"Short take.","instagram":"Look! #nook"}"#;

    fn studio(client: MockGenerationClient) -> (Studio, Arc<MockGenerationClient>) {
        let client = Arc::new(client);
        (Studio::new(client.clone()), client)
    }

    fn design_request(subject: &str) -> GenerationRequest {
        GenerationRequest::design(
            subject,
            RoomType::LivingRoom,
            DecorStyle::Scandinavian,
            Lighting::WarmAmbient,
        )
    }

    fn social_request(subject: &str) -> GenerationRequest {
        GenerationRequest::social(subject, Tone::Inspirational, Audience::General)
    }

    #[tokio::test]
    async fn test_empty_subject_is_rejected_without_calls() {
        let (studio, client) = studio(MockGenerationClient::new());
        for subject in ["", "   \n\t"] {
            let result = studio.generate(&design_request(subject)).await;
            assert!(matches!(result, Err(StudioError::Validation(_))));
        }
        assert_eq!(client.calls.total(), 0);
    }

    #[tokio::test]
    async fn test_design_flow_returns_rationale_and_one_slot() {
        let (studio, client) = studio(MockGenerationClient::new());
        let set = studio
            .generate(&design_request("a cozy reading nook"))
            .await
            .unwrap();

        assert_eq!(
            set.text,
            GeneratedText::rationale("A calm, light-filled space.")
        );
        assert_eq!(set.variant_keys(), vec!["design"]);
        let slot = set.slot(OutputVariant::Design).unwrap();
        assert_eq!(slot.aspect_ratio, AspectRatio::Widescreen);
        assert_eq!(
            slot.image,
            Some(MockGenerationClient::image_for(AspectRatio::Widescreen))
        );
        assert_eq!(MockGenerationClient::count(&client.calls.text), 1);
        assert_eq!(MockGenerationClient::count(&client.calls.image), 1);
    }

    #[tokio::test]
    async fn test_cozy_reading_nook_across_three_variants() {
        let (studio, client) =
            studio(MockGenerationClient::new().with_text(Some(POSTS_JSON)));
        let set = studio
            .generate(&social_request("a cozy reading nook"))
            .await
            .unwrap();

        assert!(!set.text.is_blank());
        assert_eq!(set.variant_keys(), vec!["linkedin", "twitter", "instagram"]);
        let ratios: Vec<AspectRatio> = set.slots.iter().map(|s| s.aspect_ratio).collect();
        assert_eq!(
            ratios,
            vec![
                AspectRatio::Widescreen,
                AspectRatio::Square,
                AspectRatio::PortraitTall
            ]
        );
        for slot in &set.slots {
            assert_eq!(
                slot.image,
                Some(MockGenerationClient::image_for(slot.aspect_ratio))
            );
        }
        assert_eq!(MockGenerationClient::count(&client.calls.analyze), 0);
        assert_eq!(MockGenerationClient::count(&client.calls.edit), 0);
    }

    #[tokio::test]
    async fn test_one_failed_variant_leaves_one_empty_slot() {
        let (studio, _client) = studio(
            MockGenerationClient::new()
                .with_text(Some(POSTS_JSON))
                .failing_ratio(AspectRatio::Square),
        );
        let set = studio.generate(&social_request("launch day")).await.unwrap();

        let empty: Vec<&VariantSlot> = set.slots.iter().filter(|s| s.image.is_none()).collect();
        assert_eq!(empty.len(), 1);
        assert_eq!(empty[0].aspect_ratio, AspectRatio::Square);
        assert_eq!(set.failed_variants(), vec![OutputVariant::Twitter]);
        assert_eq!(set.text.for_variant(OutputVariant::Twitter), Some("Short take."));
    }

    #[tokio::test]
    async fn test_variant_order_ignores_completion_order() {
        let (slow_first, _) = studio(
            MockGenerationClient::new()
                .with_text(Some(POSTS_JSON))
                .with_delay(AspectRatio::Widescreen, 30)
                .with_delay(AspectRatio::Square, 15),
        );
        let (slow_last, _) = studio(
            MockGenerationClient::new()
                .with_text(Some(POSTS_JSON))
                .with_delay(AspectRatio::PortraitTall, 30)
                .with_delay(AspectRatio::Square, 15),
        );

        let request = social_request("launch day");
        let a = slow_first.generate(&request).await.unwrap();
        let b = slow_last.generate(&request).await.unwrap();
        assert_eq!(a.variant_keys(), b.variant_keys());
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_text_runs_alongside_images() {
        let (studio, client) = studio(
            MockGenerationClient::new()
                .with_text(Some(POSTS_JSON))
                .with_text_delay(50)
                .with_delay(AspectRatio::Widescreen, 50)
                .with_delay(AspectRatio::Square, 50)
                .with_delay(AspectRatio::PortraitTall, 50),
        );
        studio.generate(&social_request("launch day")).await.unwrap();

        let events = client.events();
        let text_end = events.iter().position(|e| e == "text:end").unwrap();
        let image_starts: Vec<usize> = events
            .iter()
            .enumerate()
            .filter(|(_, e)| e.starts_with("image:start:"))
            .map(|(i, _)| i)
            .collect();
        assert_eq!(image_starts.len(), 3);
        assert!(image_starts.iter().all(|&i| i < text_end), "{:?}", events);
    }

    #[tokio::test]
    async fn test_refinement_runs_per_variant() {
        let (studio, client) = studio(
            MockGenerationClient::new()
                .with_text(Some(POSTS_JSON))
                .with_critique(Some("Make the sofa blue.")),
        );
        let set = studio
            .generate(&social_request("launch day").with_advanced_refinement(true))
            .await
            .unwrap();

        assert_eq!(MockGenerationClient::count(&client.calls.analyze), 3);
        assert_eq!(MockGenerationClient::count(&client.calls.edit), 3);
        for slot in &set.slots {
            assert_eq!(slot.image, Some(MockGenerationClient::edited_image()));
        }
    }

    #[tokio::test]
    async fn test_perfect_critique_keeps_base_bytes() {
        let (studio, client) =
            studio(MockGenerationClient::new().with_critique(Some(" Perfect ")));
        let set = studio
            .generate(&design_request("sunlit loft").with_advanced_refinement(true))
            .await
            .unwrap();

        assert_eq!(
            set.slot(OutputVariant::Design).unwrap().image,
            Some(MockGenerationClient::image_for(AspectRatio::Widescreen))
        );
        assert_eq!(MockGenerationClient::count(&client.calls.edit), 0);
    }

    #[tokio::test]
    async fn test_failed_refinement_edit_empties_only_that_slot() {
        let (studio, _client) = studio(
            MockGenerationClient::new()
                .with_critique(Some("Make the sofa blue."))
                .failing_edits(),
        );
        let set = studio
            .generate(&design_request("sunlit loft").with_advanced_refinement(true))
            .await
            .unwrap();

        assert!(set.slot(OutputVariant::Design).unwrap().image.is_none());
        assert!(!set.text.is_blank());
    }

    #[tokio::test]
    async fn test_text_failure_aborts_request() {
        let (studio, _client) = studio(MockGenerationClient::new().with_text(None));
        let result = studio.generate(&design_request("sunlit loft")).await;
        assert!(matches!(result, Err(StudioError::Generation(_))));
    }

    #[tokio::test]
    async fn test_blank_text_is_generation_failure() {
        let (studio, _client) = studio(MockGenerationClient::new().with_text(Some("  \n")));
        let result = studio.generate(&design_request("sunlit loft")).await;
        assert!(matches!(result, Err(StudioError::Generation(_))));
    }

    #[tokio::test]
    async fn test_unparseable_posts_are_generation_failure() {
        let (studio, _client) = studio(
            MockGenerationClient::new().with_text(Some("Here are three great posts for you!")),
        );
        let result = studio.generate(&social_request("launch day")).await;
        assert!(matches!(result, Err(StudioError::Generation(_))));
    }

    #[tokio::test]
    async fn test_reference_digest_feeds_image_prompts() {
        let (studio, client) = studio(MockGenerationClient::new());
        let request =
            design_request("sunlit loft").with_reference_images(vec![ImageData::png(vec![7])]);
        studio.generate(&request).await.unwrap();

        let requests = client.text_requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].images.len(), 1);
        assert!(requests[1].images.is_empty());
        assert_eq!(MockGenerationClient::count(&client.calls.image), 1);
    }

    #[tokio::test]
    async fn test_digest_failure_aborts_before_images() {
        let (studio, client) = studio(MockGenerationClient::new().with_digest(None));
        let request =
            design_request("sunlit loft").with_reference_images(vec![ImageData::png(vec![7])]);
        let result = studio.generate(&request).await;

        assert!(matches!(result, Err(StudioError::Generation(_))));
        assert_eq!(MockGenerationClient::count(&client.calls.image), 0);
    }

    #[tokio::test]
    async fn test_grounding_flag_reaches_text_call() {
        let (studio, client) = studio(MockGenerationClient::new().with_text(Some(POSTS_JSON)));
        studio
            .generate(&social_request("this week's AI news").with_grounding(true))
            .await
            .unwrap();

        let requests = client.text_requests.lock().unwrap();
        assert!(requests[0].use_search_grounding);
        assert!(requests[0].response_schema.is_some());
    }

    #[tokio::test]
    async fn test_apply_edit_validates_instruction() {
        let (studio, client) = studio(MockGenerationClient::new());
        let base = ImageData::png(vec![1]);

        let blank = studio.apply_edit(&base, &EditInstruction::plain("  ")).await;
        assert!(matches!(blank, Err(StudioError::Validation(_))));

        let empty_annotation = EditInstruction::annotated(
            ImageData::png(Vec::new()),
            vec![Comment::new(10.0, 10.0, " ")],
        );
        let result = studio.apply_edit(&base, &empty_annotation).await;
        assert!(matches!(result, Err(StudioError::Validation(_))));
        assert_eq!(client.calls.total(), 0);

        let edited = studio
            .apply_edit(&base, &EditInstruction::plain("Add a plant."))
            .await
            .unwrap();
        assert_eq!(edited, MockGenerationClient::edited_image());
    }

    #[tokio::test]
    async fn test_edit_text_and_analyze() {
        let (studio, client) = studio(
            MockGenerationClient::new()
                .with_text(Some("  Shorter text. "))
                .with_critique(Some("It is a living room.")),
        );

        assert!(matches!(
            studio.edit_text("Some text", " ").await,
            Err(StudioError::Validation(_))
        ));
        assert_eq!(
            studio.edit_text("Some long text", "shorter").await.unwrap(),
            "Shorter text."
        );

        let image = ImageData::png(vec![1]);
        assert!(matches!(
            studio.analyze_image(&image, "").await,
            Err(StudioError::Validation(_))
        ));
        assert_eq!(
            studio.analyze_image(&image, "What room is this?").await.unwrap(),
            "It is a living room."
        );
        assert_eq!(
            client.analyze_prompts.lock().unwrap().as_slice(),
            &["What room is this?".to_string()]
        );
    }
}
