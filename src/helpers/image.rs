//! Image optimization helpers

use serde::{Deserialize, Serialize};

/// Quality assumed by the image service when `q` is omitted
pub const DEFAULT_QUALITY: u8 = 85;

/// Widths used for responsive `srcset` attributes
pub const DEFAULT_SIZES: [u32; 5] = [640, 768, 1024, 1280, 1536];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Webp,
    Avif,
    Png,
    Jpg,
}

impl ImageFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageFormat::Webp => "webp",
            ImageFormat::Avif => "avif",
            ImageFormat::Png => "png",
            ImageFormat::Jpg => "jpg",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ImageOptions {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub quality: Option<u8>,
    pub format: Option<ImageFormat>,
    pub priority: bool,
    pub blur: bool,
}

impl ImageOptions {
    pub fn width(width: u32) -> Self {
        Self {
            width: Some(width),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadingStrategy {
    Lazy,
    Eager,
}

impl LoadingStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoadingStrategy::Lazy => "lazy",
            LoadingStrategy::Eager => "eager",
        }
    }
}

/// Append sizing parameters understood by the image service.
///
/// Data URLs and empty sources are returned unchanged. Quality and format
/// are only emitted when they differ from the service defaults.
pub fn optimized_url(src: &str, opts: &ImageOptions) -> String {
    if src.is_empty() || src.starts_with("data:") {
        return src.to_string();
    }

    let mut params = Vec::new();
    if let Some(w) = opts.width {
        params.push(format!("w={}", w));
    }
    if let Some(h) = opts.height {
        params.push(format!("h={}", h));
    }
    let quality = opts.quality.unwrap_or(DEFAULT_QUALITY);
    if quality != DEFAULT_QUALITY {
        params.push(format!("q={}", quality));
    }
    let format = opts.format.unwrap_or_default();
    if format != ImageFormat::Webp {
        params.push(format!("fm={}", format.as_str()));
    }

    if params.is_empty() {
        return src.to_string();
    }
    let sep = if src.contains('?') { '&' } else { '?' };
    format!("{}{}{}", src, sep, params.join("&"))
}

/// `srcset` value with one candidate per width
pub fn responsive_srcset(src: &str, sizes: &[u32]) -> String {
    sizes
        .iter()
        .map(|&size| format!("{} {}w", optimized_url(src, &ImageOptions::width(size)), size))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn loading_strategy(above_fold: bool, priority: bool) -> LoadingStrategy {
    if above_fold || priority {
        LoadingStrategy::Eager
    } else {
        LoadingStrategy::Lazy
    }
}

/// Tiny low-quality variant shown while the full image loads
pub fn blur_placeholder(src: &str) -> String {
    optimized_url(
        src,
        &ImageOptions {
            width: Some(20),
            height: Some(20),
            quality: Some(10),
            blur: true,
            ..Default::default()
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optimized_url_defaults_are_omitted() {
        assert_eq!(optimized_url("/a.jpg", &ImageOptions::default()), "/a.jpg");
        let opts = ImageOptions {
            width: Some(800),
            quality: Some(85),
            format: Some(ImageFormat::Webp),
            ..Default::default()
        };
        assert_eq!(optimized_url("/a.jpg", &opts), "/a.jpg?w=800");
    }

    #[test]
    fn test_optimized_url_non_defaults() {
        let opts = ImageOptions {
            width: Some(100),
            height: Some(50),
            quality: Some(60),
            format: Some(ImageFormat::Avif),
            ..Default::default()
        };
        assert_eq!(
            optimized_url("https://cdn.x/a.png?v=2", &opts),
            "https://cdn.x/a.png?v=2&w=100&h=50&q=60&fm=avif"
        );
    }

    #[test]
    fn test_data_urls_pass_through() {
        let data = "data:image/png;base64,AAAA";
        assert_eq!(optimized_url(data, &ImageOptions::width(10)), data);
        assert_eq!(optimized_url("", &ImageOptions::width(10)), "");
    }

    #[test]
    fn test_responsive_srcset() {
        assert_eq!(
            responsive_srcset("/a.jpg", &[640, 768]),
            "/a.jpg?w=640 640w, /a.jpg?w=768 768w"
        );
        assert_eq!(responsive_srcset("/a.jpg", &DEFAULT_SIZES).matches(", ").count(), 4);
    }

    #[test]
    fn test_loading_strategy() {
        assert_eq!(loading_strategy(true, false), LoadingStrategy::Eager);
        assert_eq!(loading_strategy(false, true), LoadingStrategy::Eager);
        assert_eq!(loading_strategy(false, false), LoadingStrategy::Lazy);
    }

    #[test]
    fn test_blur_placeholder() {
        assert_eq!(blur_placeholder("/a.jpg"), "/a.jpg?w=20&h=20&q=10");
    }
}
