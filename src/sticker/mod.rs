pub mod bulk;
pub mod compositor;
pub mod layout;
pub mod spec;
