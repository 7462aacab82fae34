//! Feed state: the visible window, the cursor that extends it, and the
//! merge controller that feeds detected items into it

pub mod merge;
pub mod timeline;
pub mod window;
