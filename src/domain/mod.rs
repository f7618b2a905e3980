pub mod routing;
pub mod types;

pub use routing::{ProviderTarget, RoutingStrategy};
pub use types::{ChatMessage, ContentPart, MessageContent, MessageRole};
