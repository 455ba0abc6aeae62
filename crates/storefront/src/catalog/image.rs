//! Image URLs for catalog assets.
//!
//! Transformations are delegated to the content service's image CDN; this
//! module only turns an opaque asset reference into a CDN URL with the
//! requested width, height and quality.

use ninja_cats_core::ImageRef;
use url::Url;

/// Base URL of the content service's image CDN.
const IMAGE_CDN_BASE: &str = "https://cdn.sanity.io/images";

/// Requested rendition of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageTransform {
    pub width: u32,
    pub height: u32,
    pub quality: u8,
}

impl ImageTransform {
    /// Product card rendition (300x300, quality 80).
    pub const CARD: Self = Self {
        width: 300,
        height: 300,
        quality: 80,
    };
}

/// Builds CDN URLs for image references of one project and dataset.
#[derive(Debug, Clone)]
pub struct ImageUrlBuilder {
    project_id: String,
    dataset: String,
}

impl ImageUrlBuilder {
    /// Create a builder for a content project.
    #[must_use]
    pub fn new(project_id: impl Into<String>, dataset: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            dataset: dataset.into(),
        }
    }

    /// Resolve an image reference to a CDN URL.
    ///
    /// Asset references look like `image-<asset id>-<width>x<height>-<format>`.
    /// Returns `None` for references that don't follow that shape.
    #[must_use]
    pub fn url(&self, image: &ImageRef, transform: ImageTransform) -> Option<String> {
        let (asset_id, dimensions, format) = parse_asset_ref(image.asset_ref())?;

        let mut url = Url::parse(&format!(
            "{IMAGE_CDN_BASE}/{}/{}/{asset_id}-{dimensions}.{format}",
            self.project_id, self.dataset
        ))
        .ok()?;
        url.query_pairs_mut()
            .append_pair("w", &transform.width.to_string())
            .append_pair("h", &transform.height.to_string())
            .append_pair("q", &transform.quality.to_string());

        Some(url.into())
    }
}

fn parse_asset_ref(reference: &str) -> Option<(&str, &str, &str)> {
    let rest = reference.strip_prefix("image-")?;
    let (rest, format) = rest.rsplit_once('-')?;
    let (asset_id, dimensions) = rest.rsplit_once('-')?;

    let (width, height) = dimensions.split_once('x')?;
    let is_number = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if asset_id.is_empty() || format.is_empty() || !is_number(width) || !is_number(height) {
        return None;
    }

    Some((asset_id, dimensions, format))
}
