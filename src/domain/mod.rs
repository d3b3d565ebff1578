//! Query key handling: validation, TLD qualification and key list files

pub mod validator;

pub use validator::{is_safe_key, parse_key_list, prepare_keys, qualify, read_key_file};
