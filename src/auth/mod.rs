pub mod capability;
pub mod password;
pub mod token;

pub use capability::{authorize, authorize_owner, Capability};
pub use password::{hash_password, meets_length_requirement, verify_password, MIN_PASSWORD_LEN};
pub use token::{extract_bearer, issue_token, validate_token, Claims, TokenError};
