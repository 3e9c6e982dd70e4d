//! Per-kind port declarations.
//!
//! Ports are not stored on nodes; each kind declares a fixed port set here
//! and everything else (rendering, connection validation, handle defaulting)
//! derives from it.

use super::node::NodeKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PortDirection {
    Input,
    Output,
}

/// Declaration of one port on a node kind.
#[derive(Clone, Copy, Debug)]
pub struct PortSpec {
    pub name: &'static str,
    pub display_name: &'static str,
    pub direction: PortDirection,
}

impl PortSpec {
    const fn input(name: &'static str, display_name: &'static str) -> Self {
        Self {
            name,
            display_name,
            direction: PortDirection::Input,
        }
    }

    const fn output(name: &'static str, display_name: &'static str) -> Self {
        Self {
            name,
            display_name,
            direction: PortDirection::Output,
        }
    }
}

const TEXT_INPUT_PORTS: &[PortSpec] = &[PortSpec::output("text", "Text")];
const IMAGE_UPLOAD_PORTS: &[PortSpec] = &[PortSpec::output("image", "Image")];
const VIDEO_UPLOAD_PORTS: &[PortSpec] = &[PortSpec::output("video", "Video")];
const ASSISTANT_PORTS: &[PortSpec] = &[
    PortSpec::input("prompt", "Prompt"),
    PortSpec::output("text", "Text"),
];
const IMAGE_GENERATOR_PORTS: &[PortSpec] = &[
    PortSpec::input("prompt", "Prompt"),
    PortSpec::input("image", "Image"),
    PortSpec::output("result", "Image"),
];
const VIDEO_GENERATOR_PORTS: &[PortSpec] = &[
    PortSpec::input("prompt", "Prompt"),
    PortSpec::input("image", "Image"),
    PortSpec::output("video", "Video"),
];
const PREVIEW_PORTS: &[PortSpec] = &[PortSpec::input("media", "Media")];

/// The declared port set for a node kind. Port names are unique within a
/// kind, so a name resolves to exactly one direction. Unknown kinds have no
/// ports, so nothing can connect to them.
pub fn ports_for(kind: &NodeKind) -> &'static [PortSpec] {
    match kind {
        NodeKind::TextInput => TEXT_INPUT_PORTS,
        NodeKind::ImageUpload => IMAGE_UPLOAD_PORTS,
        NodeKind::VideoUpload => VIDEO_UPLOAD_PORTS,
        NodeKind::Assistant => ASSISTANT_PORTS,
        NodeKind::ImageGenerator => IMAGE_GENERATOR_PORTS,
        NodeKind::VideoGenerator => VIDEO_GENERATOR_PORTS,
        NodeKind::Preview => PREVIEW_PORTS,
        NodeKind::Unknown(_) => &[],
    }
}

/// Look up the direction of a named port on a kind.
pub fn port_direction(kind: &NodeKind, port: &str) -> Option<PortDirection> {
    ports_for(kind)
        .iter()
        .find(|p| p.name == port)
        .map(|p| p.direction)
}

/// The kind's first output port name, used when a document edge omits its
/// source handle.
pub fn default_output(kind: &NodeKind) -> Option<&'static str> {
    ports_for(kind)
        .iter()
        .find(|p| p.direction == PortDirection::Output)
        .map(|p| p.name)
}

/// The kind's first input port name, used when a document edge omits its
/// target handle.
pub fn default_input(kind: &NodeKind) -> Option<&'static str> {
    ports_for(kind)
        .iter()
        .find(|p| p.direction == PortDirection::Input)
        .map(|p| p.name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_catalog_kind_has_at_least_one_port() {
        for kind in NodeKind::palette() {
            assert!(!ports_for(kind).is_empty(), "{kind:?} declares no ports");
        }
    }

    #[test]
    fn port_direction_lookup() {
        assert_eq!(
            port_direction(&NodeKind::Assistant, "prompt"),
            Some(PortDirection::Input)
        );
        assert_eq!(
            port_direction(&NodeKind::Assistant, "text"),
            Some(PortDirection::Output)
        );
        assert_eq!(port_direction(&NodeKind::Assistant, "nope"), None);
    }

    #[test]
    fn port_names_are_unique_within_each_kind() {
        // Directions are resolved by name, so a kind may never declare an
        // input and an output under the same name.
        for kind in NodeKind::palette() {
            let specs = ports_for(kind);
            for (i, a) in specs.iter().enumerate() {
                for b in &specs[i + 1..] {
                    assert_ne!(a.name, b.name, "{kind:?} declares '{}' twice", a.name);
                }
            }
        }
    }

    #[test]
    fn unknown_kind_has_no_ports() {
        let kind = NodeKind::Unknown("mystery".into());
        assert!(ports_for(&kind).is_empty());
        assert_eq!(default_output(&kind), None);
        assert_eq!(default_input(&kind), None);
    }
}
