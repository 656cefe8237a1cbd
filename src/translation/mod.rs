/*!
 * Translation pipeline: endpoint client, response parsing, and the
 * cache-then-network repository.
 *
 * - `client`: HTTP client with 429 retry, backoff, and jitter
 * - `parser`: heuristic payload parsing with a fixed fallback chain
 * - `repository`: freshness-windowed cache orchestration
 */

// Re-export main types for easier usage
pub use self::client::{TranslateApi, TranslateClient};
pub use self::parser::{parse_translation, ParseOutcome};
pub use self::repository::{TranslationRepository, CACHE_MAX_AGE_MS};

// Submodules
pub mod client;
pub mod parser;
pub mod repository;
