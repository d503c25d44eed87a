/// Network and decode module
///
/// This module handles:
/// - Talking to the gallery server (client.rs)
/// - Running batches and viewer fetches with cancellation (source.rs)
/// - Decoding downloaded images off the UI thread (decode.rs)

pub mod client;
pub mod decode;
pub mod source;
