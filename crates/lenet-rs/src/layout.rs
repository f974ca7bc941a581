//! Image tensor layout helpers.
//!
//! Architecture builders and execution backends agree on a small set of
//! canonical axis orderings for image tensors. This module defines the shared
//! convention enum and its ordering helpers without introducing wrapper
//! tensor types.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageDataFormat {
    ChannelsFirst,
    ChannelsLast,
}

impl ImageDataFormat {
    /// Orders the logical `(width, height, depth)` image dimensions the way a
    /// backend with this convention expects them.
    pub const fn input_dims(self, width: usize, height: usize, depth: usize) -> [usize; 3] {
        match self {
            ImageDataFormat::ChannelsFirst => [depth, height, width],
            ImageDataFormat::ChannelsLast => [height, width, depth],
        }
    }

    /// Parses the conventional spellings of a data format name.
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "channels_first" | "nchw" | "chw" => Some(ImageDataFormat::ChannelsFirst),
            "channels_last" | "nhwc" | "hwc" => Some(ImageDataFormat::ChannelsLast),
            _ => None,
        }
    }
}
