//! PNG, data URL, and ZIP export plus file delivery.

pub mod archive;
pub mod deliver;
pub mod png;

pub use archive::{
    BATCH_ARCHIVE_NAME, SINGLE_FILE_NAME, batch_entry_name, export_batch, export_single,
};
pub use deliver::{DirSaver, FileSaver, deliver_with_fallback};
pub use png::{capture_png, encode_png, to_data_url};
