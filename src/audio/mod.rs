pub mod pcm;
pub mod track;
