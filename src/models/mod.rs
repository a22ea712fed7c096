// Typed schemas for the remote API. Every record keeps unknown fields in
// `extra` so that editing a record never drops data the client does not model.

pub mod auth;
pub mod brand;
pub mod campaign;
pub mod id;
pub mod list;
pub mod location;
pub mod look;
pub mod pagination;
pub mod user;

pub use auth::{LoginRequest, LoginResponse, Permissions, Role, UserProfile};
pub use brand::{Brand, BrandMember};
pub use campaign::{Advertisement, Campaign};
pub use list::{ListPage, ListQuery};
pub use location::Location;
pub use look::{ChangeCreatorRequest, Look, LookProduct};
pub use pagination::Pagination;
pub use user::User;
