//! Avatar image hosting

pub mod cloudinary;

pub use cloudinary::CloudinaryAvatarStorage;
