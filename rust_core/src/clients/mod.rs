pub mod dry_run;
pub mod statsapi;
pub mod twitter;

// Re-export commonly used types
pub use dry_run::DryRunPoster;
pub use statsapi::{StatsApiClient, StatsApiConfig};
pub use twitter::{OAuthCredentials, TwitterClient};
