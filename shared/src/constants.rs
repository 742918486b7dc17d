use std::time::Duration;

// Session token
pub const TOKEN_COOKIE_NAME: &str = "token";
pub const TOKEN_EXPIRY: Duration = Duration::from_secs(24 * 60 * 60); // 1 day
pub const MIN_JWT_SECRET_LEN: usize = 32;

// Roles
pub const DEFAULT_ROLE_NAME: &str = "user";

// Money is stored in minor units (cents)
pub const MINOR_UNITS_SCALE: u32 = 2;

// Error messages
pub const ERROR_INVALID_CREDENTIALS: &str = "Invalid email or password";
pub const ERROR_EMAIL_ALREADY_EXISTS: &str = "Email already registered";
pub const ERROR_ITEM_HAS_ORDERS: &str = "Item is referenced by existing orders and cannot be deleted";
pub const ERROR_ORDER_WRITE_FAILED: &str = "Failed to create the order and its details";

// Success messages
pub const SUCCESS_USER_CREATED: &str = "Registration successful";
pub const SUCCESS_LOGIN: &str = "Logged in successfully";
pub const SUCCESS_LOGOUT: &str = "Logged out successfully";
pub const SUCCESS_PASSWORD_CHANGED: &str = "Password updated successfully";
pub const SUCCESS_ITEM_DELETED: &str = "Item deleted successfully";
pub const SUCCESS_ORDER_DELETED: &str = "Order deleted successfully";
pub const SUCCESS_ORDER_STATUS_UPDATED: &str = "Order status updated successfully";
pub const SUCCESS_USER_ROLES_UPDATED: &str = "User roles updated successfully";
