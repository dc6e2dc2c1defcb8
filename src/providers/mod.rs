// Providers layer - Work performers and business logic
//
// Providers compose store operations into the units the gate, the API and the
// CLI call into. They own the connection handle; stores stay stateless.
pub mod authorization_provider;
pub mod crypto_provider;
pub mod session_provider;
pub mod token_provider;
pub mod user_provider;

pub use authorization_provider::AuthorizationProvider;
pub use crypto_provider::CryptoProvider;
pub use session_provider::SessionProvider;
pub use token_provider::TokenProvider;
pub use user_provider::{RegistrationRequest, UserProvider};
