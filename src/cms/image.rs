//! Image URLs for CMS asset references

use crate::config::CmsConfig;
use crate::content::ImageRef;
use crate::helpers::image::ImageOptions;

const CDN_HOST: &str = "https://cdn.sanity.io";

/// Resolves `ImageRef`s to fetchable URLs
#[derive(Debug, Clone)]
pub struct ImageUrlBuilder {
    project_id: Option<String>,
    dataset: String,
}

impl ImageUrlBuilder {
    pub fn new(config: &CmsConfig) -> Self {
        Self {
            project_id: config.project_id().map(str::to_string),
            dataset: config.dataset.clone(),
        }
    }

    /// Full-size URL for an image
    pub fn url(&self, image: &ImageRef) -> Option<String> {
        self.url_with(image, &ImageOptions::default())
    }

    /// URL with sizing parameters. A literal `url` wins over an asset reference.
    pub fn url_with(&self, image: &ImageRef, opts: &ImageOptions) -> Option<String> {
        if let Some(url) = image.url.as_deref().filter(|u| !u.is_empty()) {
            return Some(crate::helpers::image::optimized_url(url, opts));
        }

        let reference = &image.asset.as_ref()?.reference;
        let project_id = self.project_id.as_deref()?;
        let file = asset_file_name(reference)?;

        let mut url = format!("{}/images/{}/{}/{}", CDN_HOST, project_id, self.dataset, file);
        let mut params = Vec::new();
        if let Some(w) = opts.width {
            params.push(format!("w={}", w));
        }
        if let Some(h) = opts.height {
            params.push(format!("h={}", h));
        }
        if opts.width.is_some() && opts.height.is_some() {
            params.push("fit=crop".to_string());
        }
        if let Some(q) = opts.quality {
            params.push(format!("q={}", q));
        }
        if let Some(format) = opts.format {
            params.push(format!("fm={}", format.as_str()));
        }
        if opts.blur {
            params.push("blur=50".to_string());
        }
        if !params.is_empty() {
            url.push('?');
            url.push_str(&params.join("&"));
        }
        Some(url)
    }
}

/// `image-<id>-<w>x<h>-<ext>` -> `<id>-<w>x<h>.<ext>`
fn asset_file_name(reference: &str) -> Option<String> {
    let rest = reference.strip_prefix("image-")?;
    let (rest, ext) = rest.rsplit_once('-')?;
    let (id, dims) = rest.rsplit_once('-')?;
    let (w, h) = dims.split_once('x')?;

    let numeric = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
    if id.is_empty() || ext.is_empty() || !numeric(w) || !numeric(h) {
        return None;
    }
    Some(format!("{}-{}.{}", id, dims, ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::model::AssetRef;
    use crate::helpers::image::ImageFormat;

    fn builder() -> ImageUrlBuilder {
        ImageUrlBuilder::new(&CmsConfig {
            project_id: Some("proj".to_string()),
            ..Default::default()
        })
    }

    fn asset(reference: &str) -> ImageRef {
        ImageRef {
            asset: Some(AssetRef {
                reference: reference.to_string(),
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_asset_reference_to_cdn_url() {
        let url = builder().url(&asset("image-Tb9Ew8CX-2000x3000-jpg"));
        assert_eq!(
            url.as_deref(),
            Some("https://cdn.sanity.io/images/proj/production/Tb9Ew8CX-2000x3000.jpg")
        );
    }

    #[test]
    fn test_sizing_parameters() {
        let opts = ImageOptions {
            width: Some(400),
            height: Some(300),
            format: Some(ImageFormat::Webp),
            ..Default::default()
        };
        let url = builder().url_with(&asset("image-abc-10x10-png"), &opts).unwrap();
        assert!(url.ends_with("abc-10x10.png?w=400&h=300&fit=crop&fm=webp"));
    }

    #[test]
    fn test_literal_url_wins() {
        let image = ImageRef::from_url("/assets/me.jpg", None);
        assert_eq!(builder().url(&image).as_deref(), Some("/assets/me.jpg"));
    }

    #[test]
    fn test_malformed_or_unconfigured() {
        assert_eq!(builder().url(&asset("file-abc-pdf")), None);
        assert_eq!(builder().url(&asset("image-abc-big-png")), None);
        let offline = ImageUrlBuilder::new(&CmsConfig::default());
        assert_eq!(offline.url(&asset("image-abc-10x10-png")), None);
        assert_eq!(builder().url(&ImageRef::default()), None);
    }
}
