/// Landing page for authenticated users
pub const HOME_PATH: &str = "/";

pub const LOGIN_PATH: &str = "/login";

/// Subtree users with the `brand` role are confined to
pub const BRAND_PORTAL_PATH: &str = "/brand-portal";

/// Element the application mounts into
pub const ROOT_ELEMENT_ID: &str = "app";
