pub mod alumni;
pub mod employment;
pub mod pagination;
pub mod user;

pub use alumni::{Alumni, CreateAlumniRequest, UpdateAlumniRequest};
pub use employment::{
    CreateEmploymentRequest, EmploymentRecord, EmploymentStatus, UpdateEmploymentRequest,
};
pub use pagination::{ListParams, ListQuery, PageMeta, SortOrder};
pub use user::{LoginRequest, LoginResponse, ProfileResponse, RegisterRequest, Role, User};
