use winit::dpi::PhysicalSize;

use super::SurfaceErrorAction;

pub(crate) fn choose_surface_format(
    caps: &wgpu::SurfaceCapabilities,
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    choose_format(&caps.formats, prefer_srgb)
}

fn choose_format(formats: &[wgpu::TextureFormat], prefer_srgb: bool) -> Option<wgpu::TextureFormat> {
    let first = *formats.first()?;

    if prefer_srgb {
        let preferred = [
            wgpu::TextureFormat::Bgra8UnormSrgb,
            wgpu::TextureFormat::Rgba8UnormSrgb,
        ];
        if let Some(f) = preferred.into_iter().find(|f| formats.contains(f)) {
            return Some(f);
        }
    }

    Some(first)
}

pub(crate) fn choose_alpha_mode(
    caps: &wgpu::SurfaceCapabilities,
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| caps.alpha_modes.contains(m))
        .or_else(|| caps.alpha_modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

/// Picks the requested sample count if the format supports it, else 1.
pub(crate) fn choose_sample_count(flags: wgpu::TextureFormatFeatureFlags, requested: u32) -> u32 {
    if requested > 1 && flags.sample_count_supported(requested) {
        requested
    } else {
        1
    }
}

pub(crate) fn map_surface_error(err: &wgpu::SurfaceError, size: PhysicalSize<u32>) -> SurfaceErrorAction {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
            if size.width > 0 && size.height > 0 {
                SurfaceErrorAction::Reconfigured
            } else {
                SurfaceErrorAction::SkipFrame
            }
        }
        wgpu::SurfaceError::OutOfMemory => SurfaceErrorAction::Fatal,
        wgpu::SurfaceError::Timeout => SurfaceErrorAction::SkipFrame,
        wgpu::SurfaceError::Other => SurfaceErrorAction::SkipFrame,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use wgpu::TextureFormat as F;

    #[test]
    fn srgb_preferred_when_available() {
        let formats = [F::Bgra8Unorm, F::Bgra8UnormSrgb];
        assert_eq!(choose_format(&formats, true), Some(F::Bgra8UnormSrgb));
    }

    #[test]
    fn first_format_without_srgb_preference() {
        let formats = [F::Bgra8Unorm, F::Bgra8UnormSrgb];
        assert_eq!(choose_format(&formats, false), Some(F::Bgra8Unorm));
    }

    #[test]
    fn no_formats_yields_none() {
        assert_eq!(choose_format(&[], true), None);
    }

    #[test]
    fn unsupported_sample_count_falls_back_to_one() {
        let flags = wgpu::TextureFormatFeatureFlags::MULTISAMPLE_X4;
        assert_eq!(choose_sample_count(flags, 2), 1);
        assert_eq!(choose_sample_count(flags, 4), 4);
    }

    #[test]
    fn outdated_surface_reconfigures_unless_minimized() {
        let err = wgpu::SurfaceError::Outdated;
        assert_eq!(map_surface_error(&err, PhysicalSize::new(512, 512)), SurfaceErrorAction::Reconfigured);
        assert_eq!(map_surface_error(&err, PhysicalSize::new(0, 512)), SurfaceErrorAction::SkipFrame);
    }

    #[test]
    fn out_of_memory_is_fatal() {
        let action = map_surface_error(&wgpu::SurfaceError::OutOfMemory, PhysicalSize::new(1, 1));
        assert_eq!(action, SurfaceErrorAction::Fatal);
    }
}
