pub mod fetch;
pub mod handlers;
pub mod rate_limit;
pub mod user_agents;

pub use fetch::{FetchError, GoogleSource, PageSource};
pub use handlers::{ApiError, AppState, parse_word, router};
pub use user_agents::UserAgentPool;
