// src/utils/policy.rs

/// Role strings as stored in `users.role` and carried in JWT claims.
pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_STUDENT: &str = "student";

/// Capability check for assessment authoring. Operations consult this one
/// function instead of comparing role strings inline per endpoint.
pub fn can_author_assessments(role: &str) -> bool {
    role == ROLE_ADMIN
}

/// Capability check for catalog writes (course creation).
pub fn can_manage_courses(role: &str) -> bool {
    role == ROLE_ADMIN
}
