/// The card compositor.
pub mod card;
pub(crate) mod cpu;
/// Encoded texture payloads.
pub mod texture;
