//! Document rendering adapters

mod pulldown_renderer;

pub use pulldown_renderer::PulldownMarkdownRenderer;
