use anyhow::Result;
use winit::dpi::PhysicalSize;

/// Picks the surface format.
///
/// The first reported format is the surface's own preference. With `prefer_srgb`,
/// the first sRGB format in the list wins instead, if there is one.
pub(crate) fn choose_surface_format(
    formats: &[wgpu::TextureFormat],
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    let first = formats.first().copied()?;

    if prefer_srgb {
        if let Some(srgb) = formats.iter().copied().find(|f| f.is_srgb()) {
            return Some(srgb);
        }
    }

    Some(first)
}

pub(crate) fn choose_alpha_mode(
    supported: &[wgpu::CompositeAlphaMode],
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| supported.contains(m))
        .or_else(|| supported.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

/// A surface cannot be configured with a zero extent (minimised windows).
#[inline]
pub(crate) fn is_drawable(size: PhysicalSize<u32>) -> bool {
    size.width > 0 && size.height > 0
}

/// Extent for the first surface configuration; a zero-sized window is an error.
pub(crate) fn initial_extent(size: PhysicalSize<u32>) -> Result<PhysicalSize<u32>> {
    anyhow::ensure!(is_drawable(size), "window has zero size");
    Ok(size)
}
