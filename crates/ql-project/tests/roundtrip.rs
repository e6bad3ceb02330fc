use proptest::prelude::*;
use ql_project::*;
use std::path::PathBuf;

fn studies_dir() -> PathBuf {
    let mut dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    dir.pop(); // go to crates
    dir.pop(); // go to repo root
    dir.push("studies");
    dir
}

#[test]
fn roundtrip_yaml_default_study() {
    let study = Study::default();
    let path = std::env::temp_dir().join("ql_project_roundtrip_default.yaml");

    save_yaml(&path, &study).unwrap();
    let loaded = load_yaml(&path).unwrap();

    assert_eq!(study, loaded);
}

#[test]
fn roundtrip_json_default_study() {
    let study = Study::default();
    let path = std::env::temp_dir().join("ql_project_roundtrip_default.json");

    save_json(&path, &study).unwrap();
    let loaded = load_study(&path).unwrap();

    assert_eq!(study, loaded);
}

#[test]
fn partial_blocks_take_reference_values() {
    let yaml = r#"
name: partial
analyses:
  - type: two_phase
    channels: 4
  - type: priority
    arrival_regular: 0.3
"#;
    let study = parse_study(yaml, StudyFormat::Yaml).unwrap();
    // A missing version means the current format
    assert_eq!(study.version, STUDY_VERSION);

    match &study.analyses[0] {
        AnalysisDef::TwoPhase(def) => {
            assert_eq!(def.channels, 4);
            assert_eq!(def.arrival, 0.2);
            assert_eq!(def.prep_time, 0.5);
        }
        other => panic!("unexpected analysis {:?}", other),
    }
    match &study.analyses[1] {
        AnalysisDef::Priority(def) => {
            assert_eq!(def.arrival_regular, 0.3);
            assert_eq!(def.service_time_regular, 2.5);
        }
        other => panic!("unexpected analysis {:?}", other),
    }
}

#[test]
fn invalid_study_fails_to_load() {
    let yaml = r#"
name: broken
analyses:
  - type: channels
    max_channels: 0
"#;
    assert!(matches!(
        parse_study(yaml, StudyFormat::Yaml),
        Err(ProjectError::Validation(_))
    ));

    let unknown = "name: x\nanalyses:\n  - type: jackson_network\n";
    assert!(matches!(
        parse_study(unknown, StudyFormat::Yaml),
        Err(ProjectError::Yaml(_))
    ));
}

#[test]
fn bundled_studies_load() {
    let reference = load_study(&studies_dir().join("reference.yaml")).unwrap();
    assert_eq!(reference.analyses.len(), 7);
    assert_eq!(reference.analyses, Study::default().analyses);

    let shop = load_study(&studies_dir().join("barber_shop.json")).unwrap();
    assert_eq!(shop.name, "Barber shop");
    assert_eq!(shop.analyses[0].kind(), "single_server");
}

#[test]
fn format_follows_extension() {
    assert_eq!(
        StudyFormat::from_path(std::path::Path::new("a/b.JSON")),
        StudyFormat::Json
    );
    assert_eq!(
        StudyFormat::from_path(std::path::Path::new("a/b.yml")),
        StudyFormat::Yaml
    );
    assert_eq!(
        StudyFormat::from_path(std::path::Path::new("study")),
        StudyFormat::Yaml
    );
}

proptest! {
    #[test]
    fn non_positive_arrival_never_validates(
        arrival in -100.0_f64..=0.0,
        max_channels in 1_usize..50,
    ) {
        let study = Study {
            version: STUDY_VERSION,
            name: "prop".to_string(),
            analyses: vec![AnalysisDef::Channels(ChannelsDef {
                arrival,
                service: 1.0,
                max_channels,
            })],
        };
        prop_assert!(validate_study(&study).is_err());
    }
}
