use std::env;
use std::sync::OnceLock;

use crate::layout::ImageDataFormat;

static IMAGE_DATA_FORMAT: OnceLock<ImageDataFormat> = OnceLock::new();

pub(crate) fn image_data_format() -> ImageDataFormat {
    *IMAGE_DATA_FORMAT.get_or_init(|| match env::var("LENETRS_IMAGE_DATA_FORMAT") {
        Ok(value) if !value.trim().is_empty() => {
            ImageDataFormat::parse(&value).unwrap_or(ImageDataFormat::ChannelsLast)
        }
        _ => ImageDataFormat::ChannelsLast,
    })
}
