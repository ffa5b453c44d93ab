use std::fmt;

/// An RGB display color handed to the renderer. Channels are in R, G, B
/// order, matching [`Frame`](crate::shared::frame::Frame) pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Dark green.
pub const MASK_COLOR: Rgb = Rgb(0, 102, 0);
/// Red-orange.
pub const NO_MASK_COLOR: Rgb = Rgb(183, 33, 33);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MaskLabel {
    WearingMask,
    NoMask,
}

impl MaskLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaskLabel::WearingMask => "Wearing Mask",
            MaskLabel::NoMask => "No Mask",
        }
    }

    pub fn color(&self) -> Rgb {
        match self {
            MaskLabel::WearingMask => MASK_COLOR,
            MaskLabel::NoMask => NO_MASK_COLOR,
        }
    }
}

impl fmt::Display for MaskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verdict for one face, in the same position as the face it came from.
#[derive(Clone, Debug, PartialEq)]
pub struct ClassificationResult {
    pub label: MaskLabel,
    pub color: Rgb,
    /// `1 - p` where `p` is the model's "no mask" probability.
    pub mask_confidence: f64,
}

impl ClassificationResult {
    /// The threshold is inclusive: a confidence equal to it counts as masked.
    /// Thresholds outside `[0, 1]` are not rejected; they simply make every
    /// face masked or every face unmasked.
    pub fn from_confidence(mask_confidence: f64, mask_probability: f64) -> Self {
        let label = if mask_confidence >= mask_probability {
            MaskLabel::WearingMask
        } else {
            MaskLabel::NoMask
        };
        Self {
            label,
            color: label.color(),
            mask_confidence,
        }
    }

    pub fn is_masked(&self) -> bool {
        self.label == MaskLabel::WearingMask
    }
}
