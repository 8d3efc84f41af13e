pub mod fs;
pub mod paths;

pub use fs::{
    backup_file, calculate_file_hash, calculate_string_hash, find_files, read_file_to_string,
    write_file_atomic,
};
pub use paths::{expand_tilde, resolve_against};
