/// Text and JSON-lines renderers for headless output.
pub mod stream;
