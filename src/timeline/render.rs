use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::foundation::error::{NewsreelError, NewsreelResult};
use crate::foundation::pool::build_thread_pool;
use crate::render::compose::FrameComposer;
use crate::render::frame::RenderedFrame;
use crate::render::theme::Theme;
use crate::script::SceneDescriptor;

/// Render every descriptor, returning frames sorted by scene index.
///
/// With `workers > 1` scenes are rendered on a bounded pool with one [`FrameComposer`] per worker
/// thread. Output is identical to the sequential path.
#[instrument(skip_all, fields(scenes = descriptors.len(), workers = workers))]
pub fn render_scenes(
    theme: Arc<Theme>,
    descriptors: &[SceneDescriptor],
    workers: usize,
) -> NewsreelResult<Vec<RenderedFrame>> {
    if workers == 0 {
        return Err(NewsreelError::validation("render workers must be >= 1"));
    }

    let mut frames = if workers == 1 || descriptors.len() <= 1 {
        let mut composer = FrameComposer::new(theme)?;
        descriptors
            .iter()
            .map(|d| composer.render(d))
            .collect::<NewsreelResult<Vec<_>>>()?
    } else {
        theme.validate()?;
        let pool = build_thread_pool(workers)?;
        let rendered = pool.install(|| {
            descriptors
                .par_iter()
                .map_init(
                    || FrameComposer::new(Arc::clone(&theme)),
                    |composer, descriptor| -> NewsreelResult<RenderedFrame> {
                        match composer {
                            Ok(c) => c.render(descriptor),
                            Err(e) => Err(NewsreelError::validation(format!(
                                "failed to build frame composer: {e}"
                            ))),
                        }
                    },
                )
                .collect::<Vec<_>>()
        });
        rendered.into_iter().collect::<NewsreelResult<Vec<_>>>()?
    };

    frames.sort_by_key(|f| f.scene_index);
    debug!(frames = frames.len(), "rendered scene frames");
    Ok(frames)
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/render.rs"]
mod tests;
