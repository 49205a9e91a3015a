pub mod claims;
pub mod jwt;
pub mod password;

pub use claims::{AuthContext, Identity};
pub use jwt::{mint_access_token, verify_access_token, Claims};
