//! Orientation resolver and pixel transforms

use image::DynamicImage;

/// EXIF tag number of the orientation field
pub const ORIENTATION_TAG: u16 = 0x0112;

/// Geometric operation that normalises stored pixels for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transform {
    None,
    Rotate90,
    Rotate180,
    Rotate270,
    MirrorHorizontal,
    MirrorVertical,
    MirrorHorizontalAndRotate90,
    MirrorHorizontalAndRotate270,
}

/// Map an EXIF orientation code to the transform that undoes it.
///
/// Total over `u16`: 0 (absent), 1 (normal) and anything outside 2..=8 are a no-op.
pub fn resolve(code: u16) -> Transform {
    match code {
        2 => Transform::MirrorHorizontal,
        3 => Transform::Rotate180,
        4 => Transform::MirrorVertical,
        5 => Transform::MirrorHorizontalAndRotate270,
        6 => Transform::Rotate90,
        7 => Transform::MirrorHorizontalAndRotate90,
        8 => Transform::Rotate270,
        _ => Transform::None,
    }
}

impl Transform {
    /// Mirror and clockwise rotation, as (flip_horizontal, flip_vertical, rotate_angle)
    fn steps(self) -> (bool, bool, Option<u16>) {
        match self {
            Transform::None => (false, false, None),
            Transform::Rotate90 => (false, false, Some(90)),
            Transform::Rotate180 => (false, false, Some(180)),
            Transform::Rotate270 => (false, false, Some(270)),
            Transform::MirrorHorizontal => (true, false, None),
            Transform::MirrorVertical => (false, true, None),
            Transform::MirrorHorizontalAndRotate90 => (true, false, Some(90)),
            Transform::MirrorHorizontalAndRotate270 => (true, false, Some(270)),
        }
    }

    pub fn is_identity(self) -> bool {
        self == Transform::None
    }

    /// Whether width and height trade places
    pub fn swaps_dimensions(self) -> bool {
        matches!(self.steps().2, Some(90) | Some(270))
    }

    /// Apply the transform, mirror first and then rotation.
    ///
    /// The colour type of `img` is kept so the result can go straight back to
    /// a JPEG encoder.
    pub fn apply(self, mut img: DynamicImage) -> DynamicImage {
        let (flip_h, flip_v, rotate) = self.steps();

        tracing::debug!(
            transform = ?self,
            flip_horizontal = flip_h,
            flip_vertical = flip_v,
            rotate = ?rotate,
            "Applying orientation transform"
        );

        if flip_h {
            img = img.fliph();
        }
        if flip_v {
            img = img.flipv();
        }

        match rotate {
            Some(90) => img.rotate90(),
            Some(180) => img.rotate180(),
            Some(270) => img.rotate270(),
            _ => img,
        }
    }
}
