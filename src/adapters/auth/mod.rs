//! Authentication adapters.
//!
//! Implementations of the `SessionValidator` port:
//!
//! - `mock` - Test implementation that doesn't require an identity service
//! - `jwt` - Shared-secret JWT validation for production

mod jwt;
mod mock;

pub use jwt::{JwtConfig, JwtSessionValidator};
pub use mock::MockSessionValidator;
