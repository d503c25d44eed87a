/// Image decoding
///
/// Downloaded bytes are decoded with the `image` crate on a blocking thread
/// and turned into an iced handle, so the dimensions used for the masonry
/// layout are known before the image is placed.

use iced::widget::image::Handle;
use tokio::task;

use crate::state::controller::Dimensions;

/// A decoded image ready for display
#[derive(Debug, Clone)]
pub struct FetchedImage {
    pub width: u32,
    pub height: u32,
    pub handle: Handle,
}

impl Dimensions for FetchedImage {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Decode encoded image bytes (JPEG, PNG, ...) off the async executor
pub async fn decode_image(bytes: Vec<u8>) -> Result<FetchedImage, String> {
    // Spawn blocking because decoding is CPU-intensive
    task::spawn_blocking(move || decode_image_blocking(&bytes))
        .await
        .map_err(|e| format!("Task join error: {}", e))?
}

fn decode_image_blocking(bytes: &[u8]) -> Result<FetchedImage, String> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|e| format!("Failed to decode image: {}", e))?;

    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();

    Ok(FetchedImage {
        width,
        height,
        handle: Handle::from_rgba(width, height, rgba.into_raw()),
    })
}
