//! Fusion CLI: command-line client for the Fusion API.
//!
//! Set FUSION_API_URL and FUSION_API_TOKEN (a session token). Transformation commands
//! also need CLOUDINARY_CLOUD_NAME.

use anyhow::Context;
use clap::{Parser, Subcommand};
use fusion_api_client::flow::{GenerativeFillFlow, VideoUploadForm};
use fusion_api_client::{ApiClient, UploadFile, DEFAULT_API_URL};
use fusion_cli::{init_tracing, load_image, print_json, transformed_url, VideoSummary};
use fusion_core::config::DEFAULT_CLOUDINARY_DELIVERY_BASE_URL;
use fusion_core::transform_url::social_crop_url;
use fusion_core::{MediaKind, SocialFormat};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fusion", about = "Fusion API CLI")]
struct Cli {
    /// API base URL
    #[arg(long, env = "FUSION_API_URL", default_value = DEFAULT_API_URL, global = true)]
    url: String,
    /// Session token sent as a bearer token
    #[arg(long, env = "FUSION_API_TOKEN", global = true, hide_env_values = true)]
    token: Option<String>,
    /// Media host cloud name, used to build delivery URLs
    #[arg(long, env = "CLOUDINARY_CLOUD_NAME", global = true)]
    cloud_name: Option<String>,
    /// Media host delivery base URL
    #[arg(
        long,
        env = "CLOUDINARY_DELIVERY_BASE_URL",
        default_value = DEFAULT_CLOUDINARY_DELIVERY_BASE_URL,
        global = true
    )]
    delivery_base: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload an image
    UploadImage {
        /// Path to the image
        file: PathBuf,
    },
    /// Upload a video (max 70MB)
    UploadVideo {
        /// Path to the video
        file: PathBuf,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// List uploaded videos, newest first, with playback and thumbnail URLs when the
    /// cloud name is known
    Videos,
    /// Upload an image and extend it to new dimensions with generative fill
    Fill {
        /// Path to the image
        file: PathBuf,
        /// Target width in pixels (defaults to the image's width)
        #[arg(long)]
        width: Option<u32>,
        /// Target height in pixels (defaults to the image's height)
        #[arg(long)]
        height: Option<u32>,
    },
    /// Delivery URL cropping an uploaded image to a social media preset
    Crop {
        /// Public id of the uploaded image
        public_id: String,
        /// instagram-square, instagram-portrait, twitter-post, twitter-header or facebook-cover
        #[arg(long)]
        format: SocialFormat,
    },
    /// Delivery URL for an uploaded asset with a raw transformation string
    Transform {
        /// Public id of the uploaded asset
        public_id: String,
        /// Comma separated components, e.g. c_fill,w_300,h_300
        transformations: String,
        /// The asset is a video
        #[arg(long)]
        video: bool,
    },
    /// Server health
    Health,
}

fn require_cloud_name(cloud_name: Option<String>) -> anyhow::Result<String> {
    cloud_name
        .filter(|name| !name.trim().is_empty())
        .context("Set CLOUDINARY_CLOUD_NAME (or pass --cloud-name) to build delivery URLs")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let client = ApiClient::new(cli.url.clone(), cli.token.clone())
        .context("Failed to create API client")?;

    match cli.command {
        Commands::UploadImage { file } => {
            let file = UploadFile::read(&file)?;
            let response = client.upload_image(file).await?;
            print_json(&response)?;
        }
        Commands::UploadVideo {
            file,
            title,
            description,
        } => {
            let mut form = VideoUploadForm::new();
            form.set_title(title);
            form.set_description(description.unwrap_or_default());
            form.set_file(UploadFile::read(&file)?)?;

            let result = form.submit(&client).await;
            if let Some(notification) = form.take_notification() {
                eprintln!("{}", notification.message);
            }
            print_json(&result?)?;
        }
        Commands::Videos => {
            let videos = client.list_videos().await?;
            let cloud_name = cli.cloud_name.filter(|name| !name.trim().is_empty());
            let delivery = cloud_name
                .as_deref()
                .map(|cloud| (cli.delivery_base.as_str(), cloud));
            let summaries: Vec<VideoSummary> = videos
                .into_iter()
                .map(|record| VideoSummary::new(record, delivery))
                .collect();
            print_json(&summaries)?;
        }
        Commands::Fill {
            file,
            width,
            height,
        } => {
            let cloud_name = require_cloud_name(cli.cloud_name)?;
            let mut flow = GenerativeFillFlow::new(cli.delivery_base, cloud_name);
            flow.select(load_image(&file)?);
            if let Err(e) = flow.upload(&client).await {
                if let Some(notification) = flow.take_notification() {
                    eprintln!("{}", notification.message);
                }
                return Err(e.into());
            }

            if let Some(width) = width {
                flow.set_width(width)?;
            }
            if let Some(height) = height {
                flow.set_height(height)?;
            }
            flow.generate()?;
            flow.complete()?;

            let download = flow.download()?;
            let (width, height) = flow.dimensions();
            print_json(&serde_json::json!({
                "publicId": flow.public_id(),
                "width": width,
                "height": height,
                "url": download.url,
                "filename": download.filename,
            }))?;
        }
        Commands::Crop { public_id, format } => {
            let cloud_name = require_cloud_name(cli.cloud_name)?;
            let (width, height) = format.dimensions();
            let url = social_crop_url(&cli.delivery_base, &cloud_name, &public_id, format);
            print_json(&serde_json::json!({
                "publicId": public_id,
                "format": format.slug(),
                "width": width,
                "height": height,
                "url": url,
            }))?;
        }
        Commands::Transform {
            public_id,
            transformations,
            video,
        } => {
            let cloud_name = require_cloud_name(cli.cloud_name)?;
            let kind = if video { MediaKind::Video } else { MediaKind::Image };
            let url = transformed_url(
                (cli.delivery_base.as_str(), cloud_name.as_str()),
                kind,
                &public_id,
                &transformations,
            )?;
            print_json(&serde_json::json!({ "publicId": public_id, "url": url }))?;
        }
        Commands::Health => {
            let health = client.health().await?;
            print_json(&health)?;
        }
    }

    Ok(())
}
