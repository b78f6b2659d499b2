//! The Entity-Component-System (ECS) module.
//!
//! This module contains all the ECS-related logic, including components, systems,
//! and resources.

pub mod collision;
pub mod components;
pub mod dispatch;
pub mod ghost;
pub mod input;
pub mod movement;
pub mod player;
pub mod state;

pub use self::collision::*;
pub use self::components::*;
pub use self::dispatch::*;
pub use self::ghost::*;
pub use self::input::*;
pub use self::player::*;
pub use self::state::*;
