//! Design System Components
//!
//! Shared daisyUI-styled building blocks.

mod button;
mod card;


pub use button::{Button, ButtonVariant};
pub use card::{Card, CardBody};
