mod common;

use common::{assert_close, num};
use fibertrace::catalog::*;
use fibertrace::model::{Cable, FusionPoint};

fn splitter_entry(
    id: &str,
    name: &str,
    att: Option<AttenuationValue>,
    outputs: Option<u32>,
) -> SplitterCatalogEntry {
    SplitterCatalogEntry {
        id: id.into(),
        name: name.into(),
        attenuation: att,
        outputs,
    }
}

#[test]
fn unknown_splitter_resolves_to_zero_loss() {
    let cats = Catalogs {
        splitters: vec![splitter_entry("a", "1:8", num(10.5), Some(8))],
        ..Default::default()
    };
    let s = common::splitter("s1", "Mystery 1x4", 4);
    let entry = cats.find_splitter(&s);
    assert!(entry.is_none());
    assert_eq!(resolve_splitter_loss(&s, entry), 0.0);
}

#[test]
fn splitter_matching_order() {
    let cats = Catalogs {
        splitters: vec![
            splitter_entry("by-count", "PLC balanced", num(1.0), Some(8)),
            splitter_entry("loose", " plc 1:8 ", num(2.0), None),
            splitter_entry("exact", "PLC 1:8", num(3.0), None),
            splitter_entry("direct", "Whatever", num(4.0), None),
        ],
        ..Default::default()
    };

    let mut s = common::splitter("s1", "PLC 1:8", 8);
    s.catalog_id = Some("direct".into());
    assert_eq!(cats.find_splitter(&s).map(|e| e.id.as_str()), Some("direct"));

    s.catalog_id = Some("missing".into());
    assert_eq!(cats.find_splitter(&s).map(|e| e.id.as_str()), Some("exact"));

    s.splitter_type = "PLC 1:8 ".into();
    // Not exact any more; the trimmed, case-insensitive pass takes the first hit.
    assert_eq!(cats.find_splitter(&s).map(|e| e.id.as_str()), Some("loose"));

    s.splitter_type = "Unlisted".into();
    assert_eq!(cats.find_splitter(&s).map(|e| e.id.as_str()), Some("by-count"));
}

#[test]
fn output_count_fallback_reads_ratio_from_name() {
    let cats = Catalogs {
        splitters: vec![splitter_entry("s16", "Splitter 1x16", num(13.8), None)],
        ..Default::default()
    };
    let s = common::splitter("s1", "", 16);
    let entry = cats.find_splitter(&s).expect("matched by ratio");
    assert_close(resolve_splitter_loss(&s, Some(entry)), 13.8);
}

#[test]
fn splitter_loss_representations() {
    let s = common::splitter("s1", "1:8", 8);
    let cases = [
        (Some(AttenuationValue::Number(10.5)), 10.5),
        (Some(AttenuationValue::Raw("10.7".into())), 10.7),
        (Some(AttenuationValue::Raw("ten".into())), 0.0),
        (
            Some(AttenuationValue::Legacy {
                value: Some(11.0),
                x: None,
            }),
            11.0,
        ),
        (
            Some(AttenuationValue::Legacy {
                value: None,
                x: Some(12.0),
            }),
            12.0,
        ),
        (Some(AttenuationValue::Other(serde_json::json!([1, 2]))), 0.0),
        (None, 0.0),
    ];
    for (att, expected) in cases {
        let entry = splitter_entry("e", "1:8", att.clone(), None);
        assert_close(resolve_splitter_loss(&s, Some(&entry)), expected);
    }
}

#[test]
fn cable_loss_uses_catalog_or_default() {
    let cats = common::catalogs();
    let mut c = common::cable("c1", "a", "b", 2500.0, Some("cab-as80"));
    assert_close(resolve_cable_loss(&c, cats.find_cable(&c), 0.3), 0.75);

    c.catalog_id = None;
    assert!(cats.find_cable(&c).is_none());
    assert_close(resolve_cable_loss(&c, None, 0.3), 0.75);

    let custom = CableCatalogEntry {
        id: "x".into(),
        name: "drop".into(),
        attenuation: Some(AttenuationValue::Raw("0.4".into())),
    };
    assert_close(resolve_cable_loss(&c, Some(&custom), 0.3), 1.0);

    let empty = Cable::default();
    assert_eq!(resolve_cable_loss(&empty, None, 0.3), 0.0);
}

#[test]
fn fusion_prefers_catalog_id_over_legacy_type() {
    let cats = Catalogs {
        fusions: vec![
            FusionCatalogEntry {
                id: "f-a".into(),
                name: "Arc".into(),
                attenuation: num(0.05),
            },
            FusionCatalogEntry {
                id: "f-b".into(),
                name: "Mechanical".into(),
                attenuation: num(0.3),
            },
        ],
        ..Default::default()
    };
    let mut f = FusionPoint {
        id: "f1".into(),
        catalog_id: Some("f-a".into()),
        fusion_type: Some("Mechanical".into()),
        ..Default::default()
    };
    assert_close(resolve_fusion_loss(&f, cats.find_fusion(&f)), 0.05);

    f.catalog_id = None;
    f.fusion_type = Some("  mechanical".into());
    assert_close(resolve_fusion_loss(&f, cats.find_fusion(&f)), 0.3);

    f.fusion_type = Some("Laser".into());
    assert!(cats.find_fusion(&f).is_none());
    assert_eq!(resolve_fusion_loss(&f, None), 0.0);
}

#[test]
fn olt_power_uses_longest_prefix() {
    let cats = Catalogs {
        olts: vec![
            OltCatalogEntry {
                id: "zte".into(),
                name: "ZTE".into(),
                output_power: num(2.0),
            },
            OltCatalogEntry {
                id: "c320".into(),
                name: "ZTE C320".into(),
                output_power: num(4.5),
            },
            OltCatalogEntry {
                id: "c600".into(),
                name: "ZTE C600".into(),
                output_power: num(7.0),
            },
        ],
        ..Default::default()
    };
    let hit = cats.find_olt("ZTE C320 - Rack 1").expect("prefix match");
    assert_eq!(hit.id, "c320");
    assert_close(resolve_olt_power("zte c320 - Slot 1", &cats, 3.0), 4.5);
    assert_close(resolve_olt_power("ZTE C300", &cats, 3.0), 2.0);
    assert_close(resolve_olt_power("Huawei MA5800", &cats, 3.0), 3.0);
}

#[test]
fn olt_with_unreadable_power_uses_default() {
    let cats = Catalogs {
        olts: vec![OltCatalogEntry {
            id: "x".into(),
            name: "Nokia".into(),
            output_power: Some(AttenuationValue::Raw("high".into())),
        }],
        ..Default::default()
    };
    assert_close(resolve_olt_power("Nokia ISAM", &cats, 3.0), 3.0);
}

#[test]
fn catalogs_parse_mixed_attenuation_shapes() {
    let json = r#"{
        "splitters": [
            {"id": "a", "name": "1:8", "attenuation": "10.5"},
            {"id": "b", "name": "1:16", "attenuation": {"value": 13.7}},
            {"id": "c", "name": "1:32", "attenuation": {"x": 17.1}},
            {"id": "d", "name": "1:64", "attenuation": false}
        ],
        "olts": [{"id": "o", "name": "Generic", "outputPower": 4}]
    }"#;
    let cats: Catalogs = serde_json::from_str(json).unwrap();
    let losses: Vec<f64> = cats
        .splitters
        .iter()
        .map(|e| normalize_attenuation(e.attenuation.as_ref()))
        .collect();
    assert_eq!(losses, vec![10.5, 13.7, 17.1, 0.0]);
    assert_close(resolve_olt_power("Generic 1", &cats, 3.0), 4.0);
    assert!(cats.cables.is_empty());
}
