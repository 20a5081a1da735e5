use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{CloudError, CloudResult};

/// Straight-alpha RGBA8 image.
#[derive(Clone, Debug)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

/// Parse SVG text, resolving fonts from the system font database.
pub fn parse_svg(svg: &str) -> CloudResult<usvg::Tree> {
    let mut opts = usvg::Options::default();
    opts.fontdb_mut().load_system_fonts();
    let tree = usvg::Tree::from_str(svg, &opts).context("parse svg tree")?;
    Ok(tree)
}

pub fn rasterize_svg(svg: &str) -> CloudResult<RasterImage> {
    let tree = parse_svg(svg)?;
    rasterize_tree(&tree)
}

pub fn rasterize_tree(tree: &usvg::Tree) -> CloudResult<RasterImage> {
    fn to_px(v: f32) -> CloudResult<u32> {
        if !v.is_finite() || v <= 0.0 {
            return Err(CloudError::render("svg has invalid width/height"));
        }
        Ok((v.ceil() as u32).max(1))
    }

    let width = to_px(tree.size().width())?;
    let height = to_px(tree.size().height())?;

    const MAX_DIM: u32 = 16_384;
    if width > MAX_DIM || height > MAX_DIM {
        return Err(CloudError::render(format!(
            "raster size too large: {width}x{height} (max {MAX_DIM}x{MAX_DIM})"
        )));
    }

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| CloudError::render("failed to allocate pixmap"))?;
    resvg::render(
        tree,
        resvg::tiny_skia::Transform::identity(),
        &mut pixmap.as_mut(),
    );

    let mut data = Vec::with_capacity(pixmap.pixels().len() * 4);
    for px in pixmap.pixels() {
        let c = px.demultiply();
        data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }

    Ok(RasterImage {
        width,
        height,
        data,
    })
}

pub fn write_png(image: &RasterImage, path: &Path) -> CloudResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        path,
        &image.data,
        image.width,
        image.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rasterizes_solid_rect() {
        let svg = r##"<svg xmlns="http://www.w3.org/2000/svg" width="4" height="2"><rect width="4" height="2" fill="#FF0000"/></svg>"##;
        let img = rasterize_svg(svg).unwrap();
        assert_eq!((img.width, img.height), (4, 2));
        assert_eq!(img.data.len(), 4 * 2 * 4);
        assert_eq!(&img.data[0..4], &[255, 0, 0, 255]);
    }

    #[test]
    fn invalid_svg_is_an_error() {
        assert!(rasterize_svg("<not-svg").is_err());
    }
}
