use super::GenerationClient;
use crate::{
    error::{Result, StudioError},
    models::{AspectRatio, EditInstruction, ImageData, ImageQuality, TextRequest},
};
use async_trait::async_trait;
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
    time::Duration,
};

#[derive(Debug, Default)]
pub struct CallCounts {
    pub text: AtomicUsize,
    pub image: AtomicUsize,
    pub edit: AtomicUsize,
    pub analyze: AtomicUsize,
}

impl CallCounts {
    pub fn total(&self) -> usize {
        self.text.load(Ordering::SeqCst)
            + self.image.load(Ordering::SeqCst)
            + self.edit.load(Ordering::SeqCst)
            + self.analyze.load(Ordering::SeqCst)
    }
}

/// Scripted backend. `None` replies fail with a generation error.
pub struct MockGenerationClient {
    pub text_reply: Option<String>,
    pub digest_reply: Option<String>,
    pub critique_reply: Option<String>,
    pub fail_ratios: Vec<AspectRatio>,
    pub fail_edits: bool,
    pub delays_ms: HashMap<AspectRatio, u64>,
    pub text_delay_ms: Option<u64>,
    pub calls: CallCounts,
    /// Call starts and finishes, in the order they happened.
    pub events: Mutex<Vec<String>>,
    pub text_requests: Mutex<Vec<TextRequest>>,
    pub edits: Mutex<Vec<EditInstruction>>,
    pub analyze_prompts: Mutex<Vec<String>>,
}

impl MockGenerationClient {
    pub fn new() -> Self {
        Self {
            text_reply: Some("A calm, light-filled space.".to_string()),
            digest_reply: Some("sage green, light oak, linen".to_string()),
            critique_reply: Some("PERFECT".to_string()),
            fail_ratios: Vec::new(),
            fail_edits: false,
            delays_ms: HashMap::new(),
            text_delay_ms: None,
            calls: CallCounts::default(),
            events: Mutex::new(Vec::new()),
            text_requests: Mutex::new(Vec::new()),
            edits: Mutex::new(Vec::new()),
            analyze_prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn with_text(mut self, reply: Option<&str>) -> Self {
        self.text_reply = reply.map(String::from);
        self
    }

    pub fn with_digest(mut self, reply: Option<&str>) -> Self {
        self.digest_reply = reply.map(String::from);
        self
    }

    pub fn with_critique(mut self, reply: Option<&str>) -> Self {
        self.critique_reply = reply.map(String::from);
        self
    }

    pub fn failing_ratio(mut self, ratio: AspectRatio) -> Self {
        self.fail_ratios.push(ratio);
        self
    }

    pub fn failing_edits(mut self) -> Self {
        self.fail_edits = true;
        self
    }

    pub fn with_delay(mut self, ratio: AspectRatio, millis: u64) -> Self {
        self.delays_ms.insert(ratio, millis);
        self
    }

    /// Delays the non-digest text call.
    pub fn with_text_delay(mut self, millis: u64) -> Self {
        self.text_delay_ms = Some(millis);
        self
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn record(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }

    /// Bytes the mock returns for a freshly generated image.
    pub fn image_for(ratio: AspectRatio) -> ImageData {
        ImageData::png(format!("base:{}", ratio).into_bytes())
    }

    pub fn edited_image() -> ImageData {
        ImageData::png(b"edited".to_vec())
    }

    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

fn scripted(reply: &Option<String>, what: &str) -> Result<String> {
    reply
        .clone()
        .ok_or_else(|| StudioError::generation(format!("mock {} failure", what)))
}

#[async_trait]
impl GenerationClient for MockGenerationClient {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn generate_text(&self, request: TextRequest) -> Result<String> {
        self.calls.text.fetch_add(1, Ordering::SeqCst);
        let is_digest = !request.images.is_empty();
        self.text_requests.lock().unwrap().push(request);
        if is_digest {
            return scripted(&self.digest_reply, "digest");
        }

        self.record("text:start".to_string());
        if let Some(ms) = self.text_delay_ms {
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }
        self.record("text:end".to_string());
        scripted(&self.text_reply, "text")
    }

    async fn generate_image(
        &self,
        _prompt: &str,
        aspect_ratio: AspectRatio,
        _quality: ImageQuality,
    ) -> Result<ImageData> {
        self.calls.image.fetch_add(1, Ordering::SeqCst);
        self.record(format!("image:start:{}", aspect_ratio));
        if let Some(ms) = self.delays_ms.get(&aspect_ratio) {
            tokio::time::sleep(Duration::from_millis(*ms)).await;
        }
        if self.fail_ratios.contains(&aspect_ratio) {
            return Err(StudioError::generation("No images generated"));
        }
        Ok(Self::image_for(aspect_ratio))
    }

    async fn edit_image(
        &self,
        _base: &ImageData,
        instruction: &EditInstruction,
    ) -> Result<ImageData> {
        self.calls.edit.fetch_add(1, Ordering::SeqCst);
        self.edits.lock().unwrap().push(instruction.clone());
        if self.fail_edits {
            return Err(StudioError::generation("no image part in edit response"));
        }
        Ok(Self::edited_image())
    }

    async fn analyze_image(&self, _image: &ImageData, prompt: &str) -> Result<String> {
        self.calls.analyze.fetch_add(1, Ordering::SeqCst);
        self.analyze_prompts.lock().unwrap().push(prompt.to_string());
        scripted(&self.critique_reply, "analyze")
    }
}
