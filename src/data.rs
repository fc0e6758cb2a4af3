mod filesystem_access;

pub use filesystem_access::config_dir;
