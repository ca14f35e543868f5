#![allow(dead_code)]

use fibertrace::catalog::{
    AttenuationValue, CableCatalogEntry, Catalogs, FusionCatalogEntry, OltCatalogEntry,
    SplitterCatalogEntry,
};
use fibertrace::geo::EARTH_RADIUS_M;
use fibertrace::model::*;

/// Degrees of longitude along the equator spanning `meters`.
pub fn meters_to_deg(meters: f64) -> f64 {
    meters / (EARTH_RADIUS_M * std::f64::consts::PI / 180.0)
}

pub fn splitter(id: &str, ty: &str, outputs: usize) -> Splitter {
    Splitter {
        id: id.to_string(),
        name: None,
        splitter_type: ty.to_string(),
        catalog_id: None,
        input_port_id: format!("{}-in", id),
        output_port_ids: (0..outputs).map(|i| format!("{}-out-{}", id, i)).collect(),
    }
}

pub fn fusion(id: &str, catalog_id: Option<&str>) -> FusionPoint {
    FusionPoint {
        id: id.to_string(),
        name: None,
        catalog_id: catalog_id.map(str::to_string),
        fusion_type: None,
    }
}

pub fn conn(id: &str, source: &str, target: &str) -> Connection {
    Connection {
        id: id.to_string(),
        source_id: source.to_string(),
        target_id: target.to_string(),
    }
}

/// A straight east-west cable of `meters` along the equator.
pub fn cable(id: &str, from: &str, to: &str, meters: f64, catalog_id: Option<&str>) -> Cable {
    Cable {
        id: id.to_string(),
        name: format!("Cable {}", id),
        fiber_count: 12,
        coordinates: vec![LatLng::new(0.0, 0.0), LatLng::new(0.0, meters_to_deg(meters))],
        from_node_id: Some(from.to_string()),
        to_node_id: Some(to.to_string()),
        catalog_id: catalog_id.map(str::to_string),
    }
}

pub fn olt(id: &str, name: &str, ports: usize, per_slot: Option<u32>) -> Olt {
    Olt {
        id: id.to_string(),
        name: name.to_string(),
        port_ids: (0..ports).map(|i| format!("{}-p{}", id, i)).collect(),
        structure: per_slot.map(|n| OltStructure {
            slots: (ports as u32).div_ceil(n),
            ports_per_slot: n,
        }),
    }
}

pub fn splice_box(
    id: &str,
    splitters: Vec<Splitter>,
    fusions: Vec<FusionPoint>,
    connections: Vec<Connection>,
) -> SpliceBox {
    SpliceBox {
        id: id.to_string(),
        name: format!("Box {}", id),
        splitters,
        fusions,
        connections,
        input_cable_ids: Vec::new(),
    }
}

pub fn pop(id: &str, olts: Vec<Olt>, dios: Vec<Dio>, connections: Vec<Connection>) -> Pop {
    Pop {
        id: id.to_string(),
        name: format!("POP {}", id),
        olts,
        dios,
        connections,
        ..Default::default()
    }
}

pub fn num(v: f64) -> Option<AttenuationValue> {
    Some(AttenuationValue::Number(v))
}

/// Catalog used by most trace tests:
/// splitter 1:8 = 10.5 dB, 1:16 = 13.8 dB, fusion 0.1 dB, cable 0.3 dB/km,
/// OLT "Generic OLT" = 5 dBm.
pub fn catalogs() -> Catalogs {
    Catalogs {
        splitters: vec![
            SplitterCatalogEntry {
                id: "spl-8".into(),
                name: "1:8".into(),
                attenuation: num(10.5),
                outputs: Some(8),
            },
            SplitterCatalogEntry {
                id: "spl-16".into(),
                name: "1:16".into(),
                attenuation: num(13.8),
                outputs: Some(16),
            },
        ],
        cables: vec![CableCatalogEntry {
            id: "cab-as80".into(),
            name: "AS80 12F".into(),
            attenuation: num(0.3),
        }],
        fusions: vec![FusionCatalogEntry {
            id: "fus-std".into(),
            name: "Standard".into(),
            attenuation: num(0.1),
        }],
        olts: vec![OltCatalogEntry {
            id: "olt-generic".into(),
            name: "Generic OLT".into(),
            output_power: num(5.0),
        }],
    }
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}
