pub mod ffmpeg;
pub mod request;
