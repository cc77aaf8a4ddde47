mod status;
mod sync;

pub use sync::SyncOptions;
