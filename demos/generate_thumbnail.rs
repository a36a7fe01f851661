//! Walks the form with fixed answers, runs a full generation, then asks for
//! one refinement of the result.
//!
//! Reads `THUMBNAIL_STUDIO_*` settings from the environment or a `.env` file.
//!
//! Usage: `cargo run --example generate_thumbnail -- "my first speedrun" https://ik.imagekit.io/demo/me.png "make the title red"`

use thumbnail_studio::prompt::rewrite_instruction;
use thumbnail_studio::{Conversation, StudioClient, StudioConfig, Wizard, WizardStep};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let client = StudioClient::from_config(StudioConfig::load())?;

    let mut args = std::env::args().skip(1);
    let input = args
        .next()
        .unwrap_or_else(|| "my first speedrun".to_string());
    let source_url = args
        .next()
        .unwrap_or_else(|| "https://ik.imagekit.io/demo/uploads/photo.png".to_string());
    let refinement = args
        .next()
        .unwrap_or_else(|| "make the title text larger".to_string());

    let mut wizard = Wizard::new();
    for (step, value) in [
        (WizardStep::VideoType, "gaming"),
        (WizardStep::Style, "bold"),
        (WizardStep::Mood, "exciting"),
        (WizardStep::PhotoPlacement, "left"),
        (WizardStep::Orientation, "horizontal"),
    ] {
        wizard = wizard.set(step, value).advance();
    }

    let completed = wizard
        .submit()
        .map_err(|w| anyhow::anyhow!("form incomplete at step {}", w.current_step()))?;

    println!(
        "Instruction for the rewrite model:\n{}",
        rewrite_instruction(&input, completed.draft())
    );

    println!("Submitting generation for: \"{input}\"...");
    let mut conversation = Conversation::new();
    match client
        .generate(&mut conversation, &input, &source_url, Some("photo.png"), &completed)
        .await
    {
        Ok(record) => {
            println!("Rewritten prompt: {}", record.rewritten_prompt);
            println!("Reference image: {}", record.transformed_image_url);
            print_image(record.generated_image_url.as_deref());
        }
        Err(e) => {
            eprintln!("Generation failed: {e}");
            return Ok(());
        }
    }

    println!("Refining: \"{refinement}\"...");
    match client.refine(&mut conversation, &refinement).await {
        Ok(thumbnail) => print_image(thumbnail.first_image().map(|image| image.url.as_str())),
        Err(e) => eprintln!("Refinement failed: {e}"),
    }
    println!("Conversation has {} messages", conversation.len());

    Ok(())
}

fn print_image(url: Option<&str>) {
    match url {
        Some(url) if url.starts_with("data:") => println!("-> Generated image (inline data URL)"),
        Some(url) => println!("-> Generated image: {url}"),
        None => println!("-> No image returned"),
    }
}
