//! Rewrites ImageKit URLs so the CDN pads and resizes the source image to a
//! target size.
//!
//! ImageKit URLs have the shape `https://ik.imagekit.io/<tenant>/<image path>`,
//! optionally with one `tr:` segment after the tenant carrying transformation
//! parameters. A rewrite always replaces that segment; it never stacks a second
//! one.

use crate::aspect::{AspectRatioSelector, Dimensions};
use crate::error::StudioError;
use std::fmt;
use tracing::debug;
use url::Url;

/// Prefix of the path segment that carries transformation parameters.
pub const TRANSFORM_MARKER: &str = "tr:";

const DEFAULT_CDN_HOST: &str = "imagekit.io";
const DEFAULT_FILL_COLOR: &str = "F3F3F3";
const PAD_RESIZE: &str = "pad_resize";

/// Which hosts count as the CDN, and how padding is filled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CdnConfig {
    /// Hosts equal to this domain or ending in `.<domain>` are rewritten.
    pub host: String,
    /// Hex RGB color used for the padded area.
    pub fill_color: String,
}

impl Default for CdnConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_CDN_HOST.to_string(),
            fill_color: DEFAULT_FILL_COLOR.to_string(),
        }
    }
}

impl CdnConfig {
    pub fn is_cdn_host(&self, host: &str) -> bool {
        let host = host.to_ascii_lowercase();
        let domain = self.host.to_ascii_lowercase();
        host == domain
            || host
                .strip_suffix(domain.as_str())
                .is_some_and(|prefix| prefix.ends_with('.'))
    }
}

/// The `tr:` segment for a pad-resize to `dimensions`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformSegment<'a> {
    pub dimensions: Dimensions,
    pub fill_color: &'a str,
}

impl fmt::Display for TransformSegment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}w-{},h-{},cm-{},bg-{}",
            TRANSFORM_MARKER,
            self.dimensions.width,
            self.dimensions.height,
            PAD_RESIZE,
            self.fill_color
        )
    }
}

/// Rewrites `source_url` to pad-resize the image for `selector`, using the
/// default CDN settings.
///
/// Returns `source_url` unchanged when the selector does not resolve, the URL
/// does not parse, or the host is not the CDN.
pub fn transform(
    source_url: &str,
    selector: &AspectRatioSelector,
    dimensions: Option<Dimensions>,
) -> String {
    transform_with(&CdnConfig::default(), source_url, selector, dimensions)
}

/// Like [`transform`], with explicit CDN settings.
pub fn transform_with(
    config: &CdnConfig,
    source_url: &str,
    selector: &AspectRatioSelector,
    dimensions: Option<Dimensions>,
) -> String {
    match rewrite(config, source_url, selector, dimensions) {
        Ok(Some(url)) => url,
        Ok(None) => source_url.to_string(),
        Err(err) => {
            debug!(%source_url, %selector, error = %err, "leaving image URL untransformed");
            source_url.to_string()
        }
    }
}

/// Strict variant of [`transform_with`]: a foreign host, an unparsable URL or
/// an unresolvable selector is reported instead of falling back.
pub fn try_transform(
    config: &CdnConfig,
    source_url: &str,
    selector: &AspectRatioSelector,
    dimensions: Option<Dimensions>,
) -> Result<String, StudioError> {
    Ok(rewrite(config, source_url, selector, dimensions)?.unwrap_or_else(|| source_url.to_string()))
}

// Ok(None) means the URL is on the CDN but has no image path to transform.
fn rewrite(
    config: &CdnConfig,
    source_url: &str,
    selector: &AspectRatioSelector,
    dimensions: Option<Dimensions>,
) -> Result<Option<String>, StudioError> {
    let url = Url::parse(source_url)?;
    let host = url.host_str().unwrap_or_default();
    if !config.is_cdn_host(host) {
        return Err(StudioError::UnrecognizedHost(host.to_string()));
    }

    let dimensions = match dimensions {
        Some(dimensions) => dimensions,
        None => selector.resolve()?,
    };

    let segments: Vec<&str> = url
        .path_segments()
        .map(|segments| segments.filter(|s| !s.is_empty()).collect())
        .unwrap_or_default();

    let (tenant, image_path) =
        match segments.iter().position(|s| s.starts_with(TRANSFORM_MARKER)) {
            Some(index) => (&segments[..index], &segments[index + 1..]),
            None if segments.is_empty() => (&segments[..], &segments[..]),
            None => (&segments[..1], &segments[1..]),
        };

    if image_path.is_empty() {
        debug!(%source_url, "no image path after tenant");
        return Ok(None);
    }

    let segment = TransformSegment {
        dimensions,
        fill_color: &config.fill_color,
    };

    let mut rewritten = format!("{}://{}", url.scheme(), host);
    if let Some(port) = url.port() {
        rewritten.push_str(&format!(":{port}"));
    }
    for part in tenant {
        rewritten.push('/');
        rewritten.push_str(part);
    }
    rewritten.push_str(&format!("/{segment}/{}", image_path.join("/")));
    if let Some(query) = raw_query(&url, source_url) {
        rewritten.push('?');
        rewritten.push_str(query);
    }

    debug!(%source_url, %rewritten, %dimensions, "transformed image URL");
    Ok(Some(rewritten))
}

// The query exactly as the caller wrote it, without the url crate's
// re-encoding. A fragment may itself contain '?', so it is cut off first.
fn raw_query<'a>(url: &Url, source_url: &'a str) -> Option<&'a str> {
    url.query()?;
    let before_fragment = source_url
        .split_once('#')
        .map_or(source_url, |(head, _)| head);
    let (_, query) = before_fragment.split_once('?')?;
    (!query.is_empty()).then_some(query)
}
