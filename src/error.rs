use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum RenderError {
    #[error("render target has no drawable area ({width}x{height})")]
    EmptyViewport { width: f32, height: f32 },
}
