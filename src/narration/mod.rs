pub mod binder;
pub mod edge_tts;
