//! Port id conventions shared with the box editor.
//!
//! These strings are the only link between a node's connection graph and the
//! elements that own the ports, so they must match the editor bit for bit:
//!
//! - cable fiber: `<cableId>-fiber-<index>` (0-based)
//! - fusion: `<fusionId>-a` and `<fusionId>-b`

const FIBER_INFIX: &str = "-fiber-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FusionSide {
    A,
    B,
}

impl FusionSide {
    pub fn opposite(self) -> Self {
        match self {
            FusionSide::A => FusionSide::B,
            FusionSide::B => FusionSide::A,
        }
    }

    fn suffix(self) -> &'static str {
        match self {
            FusionSide::A => "-a",
            FusionSide::B => "-b",
        }
    }
}

/// Split a fiber port id into `(cable id, fiber index)`.
pub fn parse_fiber_port(port_id: &str) -> Option<(&str, u32)> {
    let (cable_id, index) = port_id.rsplit_once(FIBER_INFIX)?;
    if cable_id.is_empty() || index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((cable_id, index.parse().ok()?))
}

pub fn fusion_port_id(fusion_id: &str, side: FusionSide) -> String {
    format!("{}{}", fusion_id, side.suffix())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fiber_ids_parse() {
        assert_eq!(parse_fiber_port("cab-1-fiber-11"), Some(("cab-1", 11)));
        assert_eq!(parse_fiber_port("a-fiber-b-fiber-3"), Some(("a-fiber-b", 3)));
        assert_eq!(parse_fiber_port("cab-1-fiber-"), None);
        assert_eq!(parse_fiber_port("-fiber-2"), None);
        assert_eq!(parse_fiber_port("cab-1-fiber-x"), None);
    }

    #[test]
    fn fusion_port_ids() {
        assert_eq!(fusion_port_id("f1", FusionSide::A), "f1-a");
        assert_eq!(fusion_port_id("f1", FusionSide::A.opposite()), "f1-b");
    }
}
