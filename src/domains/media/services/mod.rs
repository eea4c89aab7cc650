pub mod cache_policy;
pub mod key_store;
pub mod resolver;
pub mod signed_url_service;
pub mod state;
pub mod streamer;
pub mod token_codec;

pub use key_store::SigningKeyStore;
pub use resolver::ResourceResolver;
pub use signed_url_service::SignedUrlService;
pub use state::MediaState;
pub use streamer::MediaStreamer;
