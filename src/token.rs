/// Display-name token codec.
pub mod codec;
/// Share-link helpers around the codec.
pub mod link;
