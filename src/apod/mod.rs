/*!
 * Content pipeline: remote endpoint client and store-first repository.
 */

// Re-export main types for easier usage
pub use self::client::{ApodDto, ApodFetch, NasaClient, DEFAULT_BASE_URL};
pub use self::repository::ApodRepository;

// Submodules
pub mod client;
pub mod repository;
