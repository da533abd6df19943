//! Host-supplied settings consumed by the text engines.

/// Display width of a tab character, between 1 and [`TabSize::MAX`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabSize(usize);

impl TabSize {
    /// Widest tab accepted; larger settings are clamped.
    pub const MAX: usize = 128;

    /// Create a tab size, clamped to `1..=MAX`.
    pub fn new(width: usize) -> Self {
        Self(width.clamp(1, Self::MAX))
    }

    /// Resolve the value reported by the host configuration.
    ///
    /// A missing or non-positive value falls back to 1 and logs a warning.
    /// A value above [`TabSize::MAX`] is clamped, also with a warning.
    pub fn resolve(configured: Option<i64>) -> Self {
        match configured {
            Some(width) if width >= 1 => match usize::try_from(width) {
                Ok(width) if width <= Self::MAX => Self(width),
                _ => {
                    log::warn!("tab size {width} is too large, using {}", Self::MAX);
                    Self(Self::MAX)
                }
            },
            Some(width) => {
                log::warn!("tab size {width} is invalid, using 1");
                Self(1)
            }
            None => {
                log::warn!("tab size is not configured, using 1");
                Self(1)
            }
        }
    }

    pub fn get(self) -> usize {
        self.0
    }
}
