// Handlers grouped by guard:
// Public (no auth) → Protected (user authentication) → Internal (service trust gate)
pub mod internal;
pub mod protected;
pub mod public;
