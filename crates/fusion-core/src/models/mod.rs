mod media_record;
mod upload;

pub use media_record::{MediaRecord, NewMediaRecord};
pub use upload::ImageUploadResponse;
