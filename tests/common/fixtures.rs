//! Test fixtures - reusable JSON sources for integration tests.

/// English greeting fragment
pub const EN_COMMON: &str = r#"{"hello": "Hello", "nav": {"home": "Home"}}"#;

/// English fragment overlapping `EN_COMMON` under `nav`
pub const EN_NAV_EXTRA: &str = r#"{"nav": {"about": "About"}}"#;

/// French greeting fragment
pub const FR_COMMON: &str = r#"{"hello": "Bonjour", "nav": {"home": "Accueil"}}"#;

/// Fragment with a non-string leaf (breaks key export only)
pub const WITH_COUNT: &str = r#"{"count": 3}"#;

/// Not JSON at all
pub const BROKEN: &str = "{ not json";
