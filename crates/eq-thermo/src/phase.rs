//! Coarse state-of-matter classification.

/// State-of-matter tag attached to each temperature range.
///
/// Controls whether a species participates in an ideal-gas or ideal-liquid
/// mixing entropy term, or behaves as a pure condensed phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    Gas,
    Liquid,
    Solid,
}

impl Phase {
    /// Parse a single-letter phase tag. Unknown tags are treated as solid,
    /// matching the legacy data's uppercase-string convention.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "G" => Phase::Gas,
            "L" => Phase::Liquid,
            "S" => Phase::Solid,
            _ => Phase::Solid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_tags() {
        assert_eq!(Phase::from_tag("G"), Phase::Gas);
        assert_eq!(Phase::from_tag("L"), Phase::Liquid);
        assert_eq!(Phase::from_tag("S"), Phase::Solid);
    }

    #[test]
    fn unknown_tag_is_solid() {
        assert_eq!(Phase::from_tag("?"), Phase::Solid);
        assert_eq!(Phase::from_tag(""), Phase::Solid);
    }
}
