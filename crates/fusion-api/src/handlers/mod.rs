pub mod image_upload;
pub mod upload_form;
pub mod video_list;
pub mod video_upload;
