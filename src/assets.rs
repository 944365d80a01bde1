/// Style colors.
pub mod color;
/// Card icon loading.
pub mod icon;
pub(crate) mod text;
