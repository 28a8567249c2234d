pub mod button;
pub mod outlined_text;
