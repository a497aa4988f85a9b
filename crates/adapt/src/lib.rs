pub mod dispatch;
pub mod http;

pub use dispatch::{dispatch, dispatch_body, BlockView, RenderDescriptor, Renderer};
