use crate::background::{apply_post_effects, paint_background};
use crate::noise;
use crate::renderer::{GlyphRenderer, PageRender};
use crate::surface::Surface;
use penmark_layout::{LaidOutPage, PageGeometry};
use penmark_types::RenderingSettings;

/// How a full page is composed onto a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComposeOptions {
    pub seed_base: u64,
    /// Leave the paper out entirely.
    pub transparent: bool,
    /// Apply preview-only effects such as the vignette.
    pub post_effects: bool,
}

impl ComposeOptions {
    pub fn preview(seed_base: u64) -> Self {
        Self {
            seed_base,
            transparent: false,
            post_effects: true,
        }
    }

    pub fn export(seed_base: u64, transparent: bool) -> Self {
        Self {
            seed_base,
            transparent,
            post_effects: false,
        }
    }
}

/// Clears `surface` and draws paper, glyphs and images, then post effects.
pub fn compose_page(
    surface: &mut Surface,
    page: &LaidOutPage,
    geometry: &PageGeometry,
    settings: &RenderingSettings,
    renderer: &GlyphRenderer<'_>,
    options: ComposeOptions,
) -> PageRender {
    surface.clear();
    if !options.transparent {
        paint_background(
            surface,
            geometry,
            settings.paper.material,
            settings.paper.pattern,
            settings,
            noise::mix(options.seed_base, page.index as u64),
        );
    }
    let render = renderer.render_page(surface, page, settings, options.seed_base);
    if options.post_effects && !options.transparent {
        apply_post_effects(surface, geometry, settings);
    }
    render
}
