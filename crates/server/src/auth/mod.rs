// Authentication module
// Identity is consumed from bearer tokens or the access_token cookie; nothing here issues sessions.

pub mod config;
pub mod jwt;
pub mod middleware;

pub use config::{AuthConfig, AuthMode, JwtConfig};
pub use jwt::{AccessTokenClaims, JwtService};
pub use middleware::{AdminUser, AuthError, AuthMethod, AuthState, AuthUser, FromRef};
