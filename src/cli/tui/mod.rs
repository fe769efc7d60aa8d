mod theme;

pub use theme::{print_banner, print_success, ragsum_theme};
