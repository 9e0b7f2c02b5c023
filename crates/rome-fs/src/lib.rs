//! File helpers in the spirit of grunt's `file` API, with the process-wide
//! state removed: every operation receives the paths it works on, and none
//! of them changes the working directory.
pub mod copy;
pub mod delete;
pub mod error;
pub mod path;
pub mod read;
pub mod walk;
pub mod wildcard;
pub mod write;

pub use copy::{CopyOptions, copy};
pub use delete::{DeleteOptions, delete};
pub use error::{FsError, Result};
pub use path::{
  are_paths_equivalent,
  does_path_contain,
  exists,
  is_dir,
  is_file,
  is_link,
  is_path_absolute,
  is_path_cwd,
  is_path_in_cwd,
  normalize,
  resolve,
  unixify,
};
pub use read::{ReadOptions, read, read_bytes, read_json, read_toml};
pub use walk::{WalkedFile, list_files, recurse};
pub use wildcard::{ExpandOptions, Filter, expand, is_match, match_paths};
pub use write::{WriteOptions, mkdir, write, write_bytes};
