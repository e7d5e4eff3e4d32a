#![forbid(unsafe_code)]

pub mod assets;
pub mod config;
pub mod export;
pub mod foundation;
pub mod gate;
pub mod render;
pub mod session;
pub mod sticker;
pub mod storage;

pub use assets::decode::{PreparedImage, decode_data_url, decode_image, placeholder_avatar};
pub use assets::font::FontFace;
pub use config::StickerConfig;
pub use export::{
    BATCH_ARCHIVE_NAME, DirSaver, FileSaver, SINGLE_FILE_NAME, encode_png, export_batch,
    export_single, to_data_url,
};
pub use foundation::core::{CanvasSize, Point, Rect, Rgba8};
pub use foundation::day::{Clock, FixedClock, SystemClock};
pub use foundation::error::{StickerError, StickerResult};
pub use gate::promo::PromoCadence;
pub use gate::usage::{AuthPrompt, DeclinePrompt, PromptReason, UsageCounter, UsageGate};
pub use render::cpu::CpuSurface;
pub use render::record::{DrawOp, RecordingSurface};
pub use render::surface::{RasterFrame, Surface};
pub use session::{
    AuthCheck, AuthStatus, AuthUser, DownloadOutcome, ExportMode, StaticAuth, StickerSession,
};
pub use sticker::bulk::BulkQueue;
pub use sticker::compositor::{AvatarPass, Compositor, DecodedAvatar};
pub use sticker::layout::{StickerGeometry, header_text, wrap_words};
pub use sticker::spec::{AvatarSource, BulkCommentEntry, CommentRenderSpec, StickerStyle, Theme};
pub use storage::{JsonFileStore, KeyValueStore, MemoryStore, SafeStore};
