pub mod cart;
pub mod item;
pub mod product;
pub mod user;

pub use cart::*;
pub use item::*;
pub use product::*;
pub use user::*;
