//! Delivery URL builder and parser for hosted transformations
//!
//! Transformations are expressed as comma-separated components in the delivery
//! URL path, e.g. `https://res.cloudinary.com/demo/image/upload/c_pad,w_800,h_600,b_gen_fill/abc`.
//! The builder always emits components in the same order so equal builders
//! produce equal URLs.

use std::fmt;
use std::str::FromStr;

use crate::validation::MediaKind;

/// Crop mode (`c_` component)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crop {
    Fill,
    Pad,
    Fit,
    Scale,
    Thumb,
}

impl Crop {
    fn as_str(&self) -> &'static str {
        match self {
            Crop::Fill => "fill",
            Crop::Pad => "pad",
            Crop::Fit => "fit",
            Crop::Scale => "scale",
            Crop::Thumb => "thumb",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "fill" => Some(Crop::Fill),
            "pad" => Some(Crop::Pad),
            "fit" => Some(Crop::Fit),
            "scale" => Some(Crop::Scale),
            "thumb" => Some(Crop::Thumb),
            _ => None,
        }
    }
}

/// Gravity (`g_` component)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gravity {
    Auto,
    Center,
    Face,
}

impl Gravity {
    fn as_str(&self) -> &'static str {
        match self {
            Gravity::Auto => "auto",
            Gravity::Center => "center",
            Gravity::Face => "face",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "auto" => Some(Gravity::Auto),
            "center" => Some(Gravity::Center),
            "face" => Some(Gravity::Face),
            _ => None,
        }
    }
}

/// Fluent builder for delivery URLs
///
/// # Example
///
/// ```rust
/// use fusion_core::transform_url::{Crop, DeliveryUrlBuilder};
/// use fusion_core::MediaKind;
///
/// let url = DeliveryUrlBuilder::new()
///     .crop(Crop::Pad)
///     .dimensions(800, 600)
///     .generative_fill()
///     .build("https://res.cloudinary.com", "demo", MediaKind::Image, "image-uploads/cat");
/// assert_eq!(
///     url,
///     "https://res.cloudinary.com/demo/image/upload/c_pad,w_800,h_600,b_gen_fill/image-uploads/cat"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeliveryUrlBuilder {
    crop: Option<Crop>,
    gravity: Option<Gravity>,
    width: Option<u32>,
    height: Option<u32>,
    generative_fill: bool,
    start_offset: Option<u32>,
    quality_auto: bool,
    format: Option<String>,
}

impl DeliveryUrlBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn crop(mut self, crop: Crop) -> Self {
        self.crop = Some(crop);
        self
    }

    pub fn gravity(mut self, gravity: Gravity) -> Self {
        self.gravity = Some(gravity);
        self
    }

    pub fn width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    /// Set both width and height
    pub fn dimensions(self, width: u32, height: u32) -> Self {
        self.width(width).height(height)
    }

    /// Fill new canvas area with generated content (`b_gen_fill`)
    pub fn generative_fill(mut self) -> Self {
        self.generative_fill = true;
        self
    }

    /// Start offset in seconds for video frame extraction (`so_`)
    pub fn start_offset(mut self, seconds: u32) -> Self {
        self.start_offset = Some(seconds);
        self
    }

    pub fn quality_auto(mut self) -> Self {
        self.quality_auto = true;
        self
    }

    pub fn format(mut self, format: &str) -> Self {
        self.format = Some(format.to_string());
        self
    }

    /// The transformation component string, empty when nothing is set.
    pub fn to_transformation(&self) -> String {
        let mut parts = Vec::new();
        if let Some(crop) = self.crop {
            parts.push(format!("c_{}", crop.as_str()));
        }
        if let Some(gravity) = self.gravity {
            parts.push(format!("g_{}", gravity.as_str()));
        }
        if let Some(width) = self.width {
            parts.push(format!("w_{}", width));
        }
        if let Some(height) = self.height {
            parts.push(format!("h_{}", height));
        }
        if self.generative_fill {
            parts.push("b_gen_fill".to_string());
        }
        if let Some(offset) = self.start_offset {
            parts.push(format!("so_{}", offset));
        }
        if self.quality_auto {
            parts.push("q_auto".to_string());
        }
        if let Some(format) = &self.format {
            parts.push(format!("f_{}", format));
        }
        parts.join(",")
    }

    /// Build the full delivery URL for an asset.
    pub fn build(&self, delivery_base: &str, cloud_name: &str, kind: MediaKind, public_id: &str) -> String {
        let base = delivery_base.trim_end_matches('/');
        let transformation = self.to_transformation();
        if transformation.is_empty() {
            format!("{}/{}/{}/upload/{}", base, cloud_name, kind, public_id)
        } else {
            format!(
                "{}/{}/{}/upload/{}/{}",
                base, cloud_name, kind, transformation, public_id
            )
        }
    }
}

/// Parse a transformation component string (e.g. `"q_auto,f_mp4"`) into a builder.
pub fn parse_transformations(input: &str) -> Result<DeliveryUrlBuilder, String> {
    let mut builder = DeliveryUrlBuilder::new();

    for component in input.split(',').map(str::trim).filter(|c| !c.is_empty()) {
        let (prefix, value) = component
            .split_once('_')
            .ok_or_else(|| format!("Invalid transformation component: {}", component))?;

        builder = match prefix {
            "c" => builder.crop(
                Crop::parse(value).ok_or_else(|| format!("Unknown crop mode: {}", value))?,
            ),
            "g" => builder.gravity(
                Gravity::parse(value).ok_or_else(|| format!("Unknown gravity: {}", value))?,
            ),
            "w" => builder.width(parse_number(component, value)?),
            "h" => builder.height(parse_number(component, value)?),
            "so" => builder.start_offset(parse_number(component, value)?),
            "b" if value == "gen_fill" => builder.generative_fill(),
            "q" if value == "auto" => builder.quality_auto(),
            "f" if !value.is_empty() => builder.format(value),
            _ => return Err(format!("Unsupported transformation component: {}", component)),
        };
    }

    Ok(builder)
}

fn parse_number(component: &str, value: &str) -> Result<u32, String> {
    value
        .parse::<u32>()
        .map_err(|_| format!("Invalid number in component: {}", component))
}

/// Extend an image to `width`x`height`, generating the new canvas area.
pub fn generative_fill_url(
    delivery_base: &str,
    cloud_name: &str,
    public_id: &str,
    width: u32,
    height: u32,
) -> String {
    DeliveryUrlBuilder::new()
        .crop(Crop::Pad)
        .dimensions(width, height)
        .generative_fill()
        .build(delivery_base, cloud_name, MediaKind::Image, public_id)
}

/// Crop an image to a social media preset, keeping the most relevant region.
pub fn social_crop_url(
    delivery_base: &str,
    cloud_name: &str,
    public_id: &str,
    format: SocialFormat,
) -> String {
    let (width, height) = format.dimensions();
    DeliveryUrlBuilder::new()
        .crop(Crop::Fill)
        .gravity(Gravity::Auto)
        .dimensions(width, height)
        .build(delivery_base, cloud_name, MediaKind::Image, public_id)
}

/// Compressed MP4 rendition of an uploaded video.
pub fn video_playback_url(delivery_base: &str, cloud_name: &str, public_id: &str) -> String {
    DeliveryUrlBuilder::new()
        .quality_auto()
        .format("mp4")
        .build(delivery_base, cloud_name, MediaKind::Video, public_id)
}

/// First frame of an uploaded video as a JPEG.
pub fn video_thumbnail_url(delivery_base: &str, cloud_name: &str, public_id: &str) -> String {
    DeliveryUrlBuilder::new()
        .start_offset(0)
        .format("jpg")
        .build(delivery_base, cloud_name, MediaKind::Video, public_id)
}

/// Social media crop presets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocialFormat {
    InstagramSquare,
    InstagramPortrait,
    TwitterPost,
    TwitterHeader,
    FacebookCover,
}

impl SocialFormat {
    pub const ALL: [SocialFormat; 5] = [
        SocialFormat::InstagramSquare,
        SocialFormat::InstagramPortrait,
        SocialFormat::TwitterPost,
        SocialFormat::TwitterHeader,
        SocialFormat::FacebookCover,
    ];

    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            SocialFormat::InstagramSquare => (1080, 1080),
            SocialFormat::InstagramPortrait => (1080, 1350),
            SocialFormat::TwitterPost => (1200, 675),
            SocialFormat::TwitterHeader => (1500, 500),
            SocialFormat::FacebookCover => (820, 312),
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            SocialFormat::InstagramSquare => "instagram-square",
            SocialFormat::InstagramPortrait => "instagram-portrait",
            SocialFormat::TwitterPost => "twitter-post",
            SocialFormat::TwitterHeader => "twitter-header",
            SocialFormat::FacebookCover => "facebook-cover",
        }
    }
}

impl fmt::Display for SocialFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SocialFormat::InstagramSquare => "Instagram Square (1:1)",
            SocialFormat::InstagramPortrait => "Instagram Portrait (4:5)",
            SocialFormat::TwitterPost => "Twitter Post (16:9)",
            SocialFormat::TwitterHeader => "Twitter Header (3:1)",
            SocialFormat::FacebookCover => "Facebook Cover (205:78)",
        };
        f.write_str(label)
    }
}

impl FromStr for SocialFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SocialFormat::ALL
            .into_iter()
            .find(|format| format.slug() == s.trim().to_lowercase())
            .ok_or_else(|| {
                let known: Vec<&str> = SocialFormat::ALL.iter().map(|f| f.slug()).collect();
                format!("Unknown format '{}'. Expected one of: {}", s, known.join(", "))
            })
    }
}
