//! Row types and their queries. Every query takes a generic executor so the
//! same call works on the pool or inside a transaction.

pub mod item;
pub mod order;
pub mod role;
pub mod user;

pub use item::Item;
pub use order::{NewOrder, Order, OrderDetail, OrderDetailJoinRow};
pub use role::{Role, UserRole, UserRoleName};
pub use user::{ProfileChanges, User};
