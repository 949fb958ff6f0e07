//! Utility functions

use chrono::{DateTime, Local, Utc};

// Sidebar logo: pulse line over a rounded cross
pub const LOGO_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 120 120"><rect x="42" y="8" width="36" height="104" rx="8" fill="#fff"/><rect x="8" y="42" width="104" height="36" rx="8" fill="#fff"/><polyline points="14,60 40,60 50,40 62,82 72,52 80,60 106,60" fill="none" stroke="#2dd4bf" stroke-width="7" stroke-linecap="round" stroke-linejoin="round"/></svg>"##;

/// Rasterize the logo SVG to a square RGBA image. None if the SVG fails to
/// parse or the size is zero.
pub fn rasterize_logo(size: u32) -> Option<(Vec<u8>, u32, u32)> {
    let tree = resvg::usvg::Tree::from_str(LOGO_SVG, &resvg::usvg::Options::default()).ok()?;
    let scale = size as f32 / tree.size().width();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size, size)?;
    resvg::render(
        &tree,
        resvg::usvg::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );
    Some((premul_to_straight(&pixmap), size, size))
}

fn premul_to_straight(pixmap: &resvg::tiny_skia::Pixmap) -> Vec<u8> {
    pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let a = p.alpha();
            if a == 0 {
                [0, 0, 0, 0]
            } else {
                let r = (p.red() as u16 * 255 / a as u16) as u8;
                let g = (p.green() as u16 * 255 / a as u16) as u8;
                let b = (p.blue() as u16 * 255 / a as u16) as u8;
                [r, g, b, a]
            }
        })
        .collect()
}

/// Probability in [0, 1] as a percentage with one decimal
pub fn format_confidence(probability: f64) -> String {
    format!("{:.1}%", probability * 100.0)
}

/// Local date and time for table cells
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_formatting() {
        assert_eq!(format_confidence(0.875), "87.5%");
        assert_eq!(format_confidence(1.0), "100.0%");
        assert_eq!(format_confidence(0.0), "0.0%");
    }

    #[test]
    fn logo_rasterizes_to_requested_size() {
        let (pixels, w, h) = rasterize_logo(32).unwrap();
        assert_eq!((w, h), (32, 32));
        assert_eq!(pixels.len(), 32 * 32 * 4);
        assert!(pixels.chunks(4).any(|p| p[3] > 0));
    }

    #[test]
    fn zero_size_logo_is_none() {
        assert!(rasterize_logo(0).is_none());
    }
}
