use console::style;
use inquire::ui::{Attributes, Color, RenderConfig, StyleSheet, Styled};

pub fn ragsum_theme() -> RenderConfig<'static> {
    RenderConfig {
        prompt_prefix: Styled::new("?").with_fg(Color::LightCyan),
        highlighted_option_prefix: Styled::new("❯").with_fg(Color::LightCyan),
        answer: StyleSheet::new().with_fg(Color::LightCyan),
        help_message: StyleSheet::new()
            .with_fg(Color::DarkGrey)
            .with_attr(Attributes::ITALIC),
        ..Default::default()
    }
}

pub fn print_banner(save_name: &str) {
    println!();
    println!(
        "  {}  {}",
        style("📝").cyan(),
        style("ragsum").cyan().bold()
    );
    println!("  {} {}", style("Settings:").dim(), style(save_name).dim());
    println!();
}

pub fn print_success(message: &str) {
    println!("  {} {}", style("✓").green(), message);
}
