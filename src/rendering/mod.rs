mod preview;

pub use preview::PreviewRenderer;
