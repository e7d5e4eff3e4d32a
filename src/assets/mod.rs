//! Inputs to a render: decoded avatars, fonts, and shaped text.

pub mod decode;
pub mod font;
pub mod text;
