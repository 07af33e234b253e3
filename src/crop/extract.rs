use crate::{
    assets::SourceImage,
    crop::{enhance::enhance_in_place, viewport::CropArea},
    foundation::core::Affine,
    foundation::error::{HaloError, HaloResult},
    render::{
        Raster,
        cpu::{CpuSurface, draw_image, image_paint},
    },
};

/// Draw the `area` of `image` stretched over a `width x height` raster.
///
/// `area` may reach past the image bounds; those parts stay transparent, like a canvas
/// `drawImage` with an out-of-range source rectangle.
#[tracing::instrument(skip(image), fields(src_w = image.width, src_h = image.height))]
pub fn render_region(
    image: &SourceImage,
    area: CropArea,
    width: u32,
    height: u32,
    enhanced: bool,
) -> HaloResult<Raster> {
    if !(area.width > 0.0 && area.height > 0.0) {
        return Err(HaloError::crop("crop area is empty"));
    }
    let mut surface = CpuSurface::new(width, height).map_err(|e| HaloError::crop(e.to_string()))?;
    let paint = image_paint(image).map_err(|e| HaloError::crop(e.to_string()))?;

    let transform = Affine::scale_non_uniform(
        f64::from(width) / area.width,
        f64::from(height) / area.height,
    ) * Affine::translate((-area.x, -area.y));
    draw_image(surface.ctx(), paint, image.width, image.height, transform);

    let mut raster = surface
        .finish()
        .map_err(|e| HaloError::crop(e.to_string()))?;
    if enhanced {
        enhance_in_place(&mut raster);
    }
    Ok(raster)
}
