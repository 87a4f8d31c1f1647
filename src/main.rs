use rgen_studio::{
    logger, ArtifactStoreManager, Audience, DecorStyle, GenerationBackend, GenerationRequest,
    ImageQuality, InspirationTemplate, Lighting, NewArtifact, RoomType, Studio, StudioConfig,
    Tone, INSPIRATION_TEMPLATES,
};
use clap::{Parser, ValueEnum};
use std::env;
use std::path::PathBuf;

/// Turn a short idea or room description into copy and images.
#[derive(Debug, Parser)]
#[command(name = "rgen-studio", version, after_help = quality_help())]
struct Cli {
    /// Write one post per platform instead of a design rationale
    #[arg(long)]
    social: bool,
    /// Critique each image once and apply the suggested edit
    #[arg(long)]
    refine: bool,
    /// Ground the copy in web search results
    #[arg(long)]
    ground: bool,
    /// Serve the HTTP API instead of generating once
    #[arg(long)]
    serve: bool,
    #[arg(long, value_enum, default_value_t = QualityArg::Balanced)]
    quality: QualityArg,
    /// Start from a named inspiration template
    #[arg(long)]
    template: Option<String>,
    /// What to generate
    #[arg(trailing_var_arg = true)]
    subject: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum QualityArg {
    Ultra,
    Balanced,
    Fastest,
}

impl From<QualityArg> for ImageQuality {
    fn from(arg: QualityArg) -> Self {
        match arg {
            QualityArg::Ultra => ImageQuality::Ultra,
            QualityArg::Balanced => ImageQuality::Balanced,
            QualityArg::Fastest => ImageQuality::Fastest,
        }
    }
}

fn quality_help() -> String {
    let mut help = String::from("Image quality:\n");
    for quality in ImageQuality::ALL {
        help.push_str(&format!("  {:<14} {}\n", quality.name(), quality.description()));
    }
    help
}

fn build_request(cli: &Cli) -> Result<GenerationRequest, String> {
    let request = if let Some(name) = &cli.template {
        let template = InspirationTemplate::find(name).ok_or_else(|| {
            let names: Vec<&str> = INSPIRATION_TEMPLATES.iter().map(|t| t.name).collect();
            format!("unknown template '{}'; try one of: {}", name, names.join(", "))
        })?;
        template.to_request()
    } else if cli.social {
        GenerationRequest::social(cli.subject.join(" "), Tone::Professional, Audience::General)
    } else {
        GenerationRequest::design(
            cli.subject.join(" "),
            RoomType::LivingRoom,
            DecorStyle::Modern,
            Lighting::BrightNatural,
        )
    };

    Ok(request
        .with_quality(cli.quality.into())
        .with_grounding(cli.ground)
        .with_advanced_refinement(cli.refine))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();
    logger::init_with_config(logger::LoggerConfig::from_env())?;
    if dotenv_loaded {
        log::info!("✅ .env file loaded successfully");
    } else {
        log::warn!("⚠️  No .env file found, using system environment variables");
    }

    let cli = Cli::parse();
    let config = StudioConfig::from_env();
    logger::log_startup_info(
        "rgen-studio",
        env!("CARGO_PKG_VERSION"),
        cli.serve.then(|| config.port.unwrap_or(8080)),
    );
    logger::log_config_info(&config);

    let client = GenerationBackend::connect(&config).await?;
    let store = ArtifactStoreManager::new(&config.storage).await?;
    let studio = Studio::new(client);

    if cli.serve {
        return serve(studio, store, config.port.unwrap_or(8080)).await;
    }

    let request = build_request(&cli)?;
    let set = match studio.generate(&request).await {
        Ok(set) => set,
        Err(e) => {
            log::error!("❌ {}", e);
            return Err(e.user_message().into());
        }
    };

    match &set.text {
        rgen_studio::GeneratedText::Rationale { text } => println!("\n{}\n", text),
        rgen_studio::GeneratedText::PlatformPosts(posts) => {
            println!("\n[LinkedIn]\n{}\n", posts.linkedin);
            println!("[Twitter/X]\n{}\n", posts.twitter);
            println!("[Instagram]\n{}\n", posts.instagram);
        }
    }

    let output_dir = PathBuf::from(env::var("OUTPUT_DIR").unwrap_or_else(|_| "generated".into()));
    std::fs::create_dir_all(&output_dir)?;
    let stamp = chrono::Utc::now().format("%Y%m%d%H%M%S");
    for slot in &set.slots {
        match &slot.image {
            Some(image) => {
                let path = output_dir.join(format!(
                    "{}_{}.{}",
                    slot.variant.key(),
                    stamp,
                    image.extension()
                ));
                std::fs::write(&path, &image.bytes)?;
                log::info!("💾 {} image saved to: {}", slot.variant.display_name(), path.display());
            }
            None => log::warn!("⚠️  No {} image was generated", slot.variant.display_name()),
        }
    }

    let artifact = NewArtifact::new(request.trimmed_subject(), set)
        .with_reference_images(request.reference_images.clone());
    match store.save(artifact).await {
        Ok(saved) => log::info!("📚 Saved; {} artifact(s) in the gallery", saved.len()),
        Err(e) if e.is_storage_full() => log::warn!("⚠️  {}", e.user_message()),
        Err(e) => log::error!("❌ Could not save artifact: {}", e),
    }

    Ok(())
}

#[cfg(feature = "server")]
async fn serve(
    studio: Studio,
    store: ArtifactStoreManager,
    port: u16,
) -> Result<(), Box<dyn std::error::Error>> {
    rgen_studio::server::run(rgen_studio::server::AppState { studio, store }, port).await?;
    Ok(())
}

#[cfg(not(feature = "server"))]
async fn serve(
    _studio: Studio,
    _store: ArtifactStoreManager,
    _port: u16,
) -> Result<(), Box<dyn std::error::Error>> {
    Err("rgen-studio was built without the `server` feature".into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_and_subject() {
        let cli = Cli::try_parse_from([
            "rgen-studio",
            "--social",
            "--quality",
            "ultra",
            "launch",
            "day",
        ])
        .unwrap();
        assert!(cli.social);
        assert!(!cli.refine);
        assert_eq!(cli.quality, QualityArg::Ultra);

        let request = build_request(&cli).unwrap();
        assert_eq!(request.subject, "launch day");
        assert_eq!(request.quality, ImageQuality::Ultra);
    }

    #[test]
    fn test_unknown_template_is_rejected() {
        let cli = Cli::try_parse_from(["rgen-studio", "--template", "Beach House"]).unwrap();
        assert!(build_request(&cli).unwrap_err().contains("Cozy Reading Nook"));
    }

    #[test]
    fn test_help_lists_qualities() {
        let help = quality_help();
        for quality in ImageQuality::ALL {
            assert!(help.contains(quality.name()));
        }
        assert!(Cli::try_parse_from(["rgen-studio", "--quality", "best"]).is_err());
    }
}
