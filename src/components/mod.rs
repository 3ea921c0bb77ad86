pub mod image_strip;
pub mod rich_text;
pub mod trusted_html;
pub mod ui;

pub use image_strip::ImageStrip;
pub use rich_text::RichTextEditor;
pub use trusted_html::TrustedHtml;
