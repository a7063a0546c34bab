/// Platform-specific filesystem primitives — metadata-preserving copy,
/// move with cross-device fallback, and read-only marking.
///
/// These are the only places that write to the destination tree.
pub mod permissions;
pub mod transfer;

pub use permissions::strip_write_permission;
pub use transfer::{copy_with_metadata, is_same_file, move_file, MoveMethod};
