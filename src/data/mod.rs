pub mod catalog;
pub mod validator;
pub mod wire;

pub use catalog::AssetCatalog;
pub use validator::InputValidator;
pub use wire::{decode_request, encode_message, SearchRequest};
