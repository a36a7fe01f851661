//! Instruction text for the prompt-rewriting model.
//!
//! The `api/rewrite-prompt` service (see
//! [`StudioClient::rewrite_prompt`](crate::StudioClient::rewrite_prompt))
//! receives only the raw input and form answers. It builds this instruction
//! on its side and hands it to its language model. A service implemented in
//! Rust can call [`rewrite_instruction`] directly; clients can use it to show
//! what the model will be asked.

use crate::aspect::CUSTOM_ORIENTATION;
use crate::wizard::GenerationDraft;
use std::fmt::Write;

/// Renders the instruction the prompt-rewrite service hands to its language
/// model for `input` and `draft`, asking for a thumbnail prompt under 100 words.
///
/// The final pixel size is named when the draft's orientation resolves.
pub fn rewrite_instruction(input: &str, draft: &GenerationDraft) -> String {
    let mut text = String::from(
        "Rewrite the following into a concise, detailed prompt (under 100 words) \
         for generating a professional YouTube thumbnail image:\n\n",
    );
    let _ = writeln!(text, "User input: \"{}\"\n", input.trim());
    text.push_str("Details:\n");
    let _ = writeln!(text, "- Video type: {}", draft.video_type);
    let _ = writeln!(text, "- Style: {}", draft.style);
    let _ = writeln!(text, "- Mood: {}", draft.mood);
    let _ = writeln!(text, "- Photo placement: {}", draft.photo_placement);
    let _ = writeln!(text, "- Orientation: {}", orientation_label(draft));
    text.push_str(
        "- A user photo is provided (remove its background and use it in the design).\n",
    );
    text.push_str("- Match the orientation ratio of the input image.\n");

    match draft.selector().and_then(|selector| selector.resolve()) {
        Ok(dimensions) => {
            let _ = writeln!(
                text,
                "- The final image must be exactly {dimensions} pixels; mention this size explicitly."
            );
        }
        Err(_) => text.push_str(
            "- Explicitly mention the final size in pixels (e.g., 1920x1080 for horizontal, \
             1080x1920 for vertical).\n",
        ),
    }

    text.push_str(
        "\nMake the rewritten prompt clear, visually descriptive, and optimized for thumbnail generation.\n",
    );
    text
}

fn orientation_label(draft: &GenerationDraft) -> String {
    match (draft.orientation.as_str(), draft.custom_aspect_ratio.as_deref()) {
        (CUSTOM_ORIENTATION, Some(ratio)) => format!("custom ({ratio})"),
        (orientation, _) => orientation.to_string(),
    }
}
