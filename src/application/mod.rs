pub mod dispatch;
pub mod transcript;

pub use dispatch::{AttemptError, DispatchError, DispatchOutcome, DispatchResult, Dispatcher};
pub use transcript::Transcript;
