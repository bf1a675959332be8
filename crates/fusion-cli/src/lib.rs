use anyhow::Context;
use fusion_api_client::flow::SelectedImage;
use fusion_api_client::{MediaRecord, UploadFile};
use fusion_core::transform_url::{parse_transformations, video_playback_url, video_thumbnail_url};
use fusion_core::MediaKind;
use serde::Serialize;
use std::path::Path;

/// Where delivery URLs are built: `(delivery_base, cloud_name)`.
pub type Delivery<'a> = (&'a str, &'a str);

/// A listed video plus the figures and URLs shown next to it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSummary {
    #[serde(flatten)]
    pub record: MediaRecord,
    pub duration_label: String,
    pub savings_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub playback_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}

impl VideoSummary {
    /// URLs are only filled in when a cloud name is known.
    pub fn new(record: MediaRecord, delivery: Option<Delivery<'_>>) -> Self {
        let (playback_url, thumbnail_url) = match delivery {
            Some((base, cloud)) => (
                Some(video_playback_url(base, cloud, &record.external_id)),
                Some(video_thumbnail_url(base, cloud, &record.external_id)),
            ),
            None => (None, None),
        };
        Self {
            duration_label: record.formatted_duration(),
            savings_percent: record
                .compression_savings_percent()
                .map(|p| (p * 10.0).round() / 10.0),
            playback_url,
            thumbnail_url,
            record,
        }
    }
}

/// Delivery URL for a raw transformation string such as `c_fill,w_300,h_300`.
pub fn transformed_url(
    delivery: Delivery<'_>,
    kind: MediaKind,
    public_id: &str,
    transformations: &str,
) -> anyhow::Result<String> {
    let builder = parse_transformations(transformations).map_err(anyhow::Error::msg)?;
    let (base, cloud) = delivery;
    Ok(builder.build(base, cloud, kind, public_id))
}

/// Initialize tracing for the CLI. Logs go to stderr so stdout stays valid JSON.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();
}

pub fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

/// Read a local image together with its intrinsic dimensions.
pub fn load_image(path: &Path) -> anyhow::Result<SelectedImage> {
    let (width, height) = image::image_dimensions(path)
        .with_context(|| format!("Failed to read image dimensions of {}", path.display()))?;
    let file = UploadFile::read(path)?;

    Ok(SelectedImage {
        filename: file.filename,
        data: file.data,
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use fusion_core::NewMediaRecord;

    const DELIVERY: Delivery<'static> = ("https://res.cloudinary.com", "demo");

    fn record() -> MediaRecord {
        NewMediaRecord {
            title: Some("Holiday".to_string()),
            description: None,
            external_id: "video-uploads/clip".to_string(),
            original_size_bytes: 1000,
            compressed_size_bytes: 400,
            duration_seconds: 65.4,
        }
        .into_record(Default::default(), Default::default())
    }

    #[test]
    fn video_summary_with_delivery_urls() {
        let summary = VideoSummary::new(record(), Some(DELIVERY));
        assert_eq!(summary.duration_label, "1:05");
        assert_eq!(summary.savings_percent, Some(60.0));
        assert_eq!(
            summary.playback_url.as_deref(),
            Some("https://res.cloudinary.com/demo/video/upload/q_auto,f_mp4/video-uploads/clip")
        );
        assert_eq!(
            summary.thumbnail_url.as_deref(),
            Some("https://res.cloudinary.com/demo/video/upload/so_0,f_jpg/video-uploads/clip")
        );

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["publicId"], "video-uploads/clip");
        assert_eq!(json["durationLabel"], "1:05");
    }

    #[test]
    fn video_summary_without_cloud_name_omits_urls() {
        let json = serde_json::to_value(VideoSummary::new(record(), None)).unwrap();
        assert!(json.get("playbackUrl").is_none());
        assert_eq!(json["savingsPercent"], 60.0);
    }

    #[test]
    fn transformed_url_normalises_component_order() {
        let url = transformed_url(DELIVERY, MediaKind::Image, "image-uploads/cat", "w_300,c_fill,h_200")
            .unwrap();
        assert_eq!(
            url,
            "https://res.cloudinary.com/demo/image/upload/c_fill,w_300,h_200/image-uploads/cat"
        );
    }

    #[test]
    fn transformed_url_rejects_unknown_component() {
        assert!(transformed_url(DELIVERY, MediaKind::Image, "cat", "zz_1").is_err());
    }

    #[test]
    fn load_image_reads_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pixel.png");
        image::RgbImage::new(4, 3).save(&path).unwrap();

        let selected = load_image(&path).unwrap();
        assert_eq!(selected.filename, "pixel.png");
        assert_eq!((selected.width, selected.height), (4, 3));
        assert!(!selected.data.is_empty());
    }

    #[test]
    fn load_image_rejects_non_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.png");
        std::fs::write(&path, b"not an image").unwrap();

        assert!(load_image(&path).is_err());
    }
}
