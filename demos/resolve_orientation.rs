//! Resolves an orientation and prints the padded ImageKit URL for it.
//!
//! Usage: `cargo run --example resolve_orientation -- 19:6 https://ik.imagekit.io/demo/me.png`

use thumbnail_studio::{imagekit, AspectRatioSelector};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let orientation = args.next().unwrap_or_else(|| "horizontal".to_string());
    let source_url = args
        .next()
        .unwrap_or_else(|| "https://ik.imagekit.io/demo/uploads/photo.png".to_string());

    let selector: AspectRatioSelector = orientation.parse()?;
    let dimensions = selector.resolve()?;
    println!("{orientation} -> {dimensions}");
    println!("{}", imagekit::transform(&source_url, &selector, Some(dimensions)));

    Ok(())
}
