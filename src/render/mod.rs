//! Drawing surfaces: the [`surface::Surface`] port, the `vello_cpu` raster implementation,
//! and a display-list recorder.

pub mod cpu;
pub mod record;
pub mod surface;
