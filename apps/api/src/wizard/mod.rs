// Wizard: the step-by-step form flow as an explicit session object.
// Position, field groups, template choice and profile image all live on the
// session; nothing is process-wide.

pub mod handlers;
pub mod machine;
pub mod session;
pub mod store;

pub use store::SessionStore;
