use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{NewsreelError, NewsreelResult};

/// One rasterized scene: premultiplied RGBA8, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedFrame {
    pub scene_index: usize,
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl RenderedFrame {
    pub fn validate(&self) -> NewsreelResult<()> {
        let expected = (self.width as usize) * (self.height as usize) * 4;
        if self.data.len() != expected {
            return Err(NewsreelError::validation(format!(
                "frame {} has {} bytes, expected {expected} for {}x{}",
                self.scene_index,
                self.data.len(),
                self.width,
                self.height
            )));
        }
        Ok(())
    }

    /// Composite over an opaque background, yielding straight RGBA8 with alpha 255.
    pub fn to_opaque_rgba8(&self, bg: [u8; 3]) -> NewsreelResult<Vec<u8>> {
        self.validate()?;
        let mut out = vec![0u8; self.data.len()];
        flatten_premul_over(&mut out, &self.data, bg);
        Ok(out)
    }

    /// Write the frame as a PNG, flattened over black.
    pub fn save_png(&self, path: &Path) -> NewsreelResult<()> {
        let rgba = self.to_opaque_rgba8([0, 0, 0])?;
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
        image::save_buffer_with_format(
            path,
            &rgba,
            self.width,
            self.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }
}

fn flatten_premul_over(dst: &mut [u8], src: &[u8], bg: [u8; 3]) {
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let a = u16::from(s[3]);
        if a == 255 {
            d.copy_from_slice(s);
            continue;
        }
        let inv = 255 - a;
        for c in 0..3 {
            d[c] = (u16::from(s[c]) + mul_div255(u16::from(bg[c]), inv)).min(255) as u8;
        }
        d[3] = 255;
    }
}

fn mul_div255(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
