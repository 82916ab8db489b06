use urania::aspects::{AspectCalculator, AspectDefinition};
use urania::{compute_aspects, AspectKind, Body, CelestialPosition, OrbConfig};

fn pos(body: Body, lon: f64, speed: f64) -> CelestialPosition {
    CelestialPosition::new(body, lon, 0.0, speed)
}

fn sample_chart() -> Vec<CelestialPosition> {
    vec![
        pos(Body::Sun, 100.0, 0.98),
        pos(Body::Moon, 102.5, 13.2),
        pos(Body::Mercury, 161.0, -0.4),
        pos(Body::Venus, 221.0, 1.2),
        pos(Body::Mars, 278.0, 0.6),
        pos(Body::Jupiter, 11.0, 0.1),
        pos(Body::Saturn, 352.0, -0.05),
        CelestialPosition::fixed(Body::Ascendant, 190.5),
    ]
}

#[test]
fn three_trines_at_120_degree_spacing() {
    let positions = [
        pos(Body::Sun, 10.0, 1.0),
        pos(Body::Moon, 130.0, 13.0),
        pos(Body::Mars, 250.0, 0.5),
    ];
    let aspects = compute_aspects(&positions, None, &OrbConfig::default());
    assert_eq!(aspects.len(), 3);
    assert!(aspects.iter().all(|a| a.kind == AspectKind::Trine));
    assert!(aspects.iter().all(|a| a.orb < 1e-9));
}

#[test]
fn two_set_mode_is_symmetric() {
    let a = sample_chart();
    let b = vec![
        pos(Body::Sun, 130.0, 1.0),
        pos(Body::Mars, 10.0, 0.7),
        pos(Body::Pluto, 280.0, -0.02),
    ];
    let orbs = OrbConfig::default();
    let ab = compute_aspects(&a, Some(b.as_slice()), &orbs);
    let ba = compute_aspects(&b, Some(a.as_slice()), &orbs);
    assert_eq!(ab.len(), ba.len());
    for x in &ab {
        let y = ba
            .iter()
            .find(|y| y.body_a == x.body_b && y.body_b == x.body_a)
            .expect("mirrored aspect");
        assert_eq!(x.kind, y.kind);
        assert_eq!(x.orb, y.orb);
        assert_eq!(x.distance, y.distance);
        assert_eq!(x.applying, y.applying);
    }
}

#[test]
fn one_set_mode_is_order_stable() {
    let chart = sample_chart();
    let first = compute_aspects(&chart, None, &OrbConfig::default());
    let second = compute_aspects(&chart, None, &OrbConfig::default());
    assert_eq!(first, second);
    assert!(!first.is_empty());
    // Pairs follow roster order
    assert_eq!(first[0].body_a, Body::Sun);
    assert_eq!(first[0].body_b, Body::Moon);
    assert_eq!(first[0].kind, AspectKind::Conjunction);
}

#[test]
fn no_aspect_outside_every_orb() {
    let positions = [pos(Body::Sun, 0.0, 1.0), pos(Body::Moon, 45.0, 13.0)];
    assert!(compute_aspects(&positions, None, &OrbConfig::default()).is_empty());
}

#[test]
fn multiplier_widens_every_orb() {
    let positions = [pos(Body::Sun, 0.0, 1.0), pos(Body::Venus, 100.0, 1.2)];
    let default = compute_aspects(&positions, None, &OrbConfig::default());
    assert!(default.is_empty());
    let wide = OrbConfig::default().with_multiplier(2.0).unwrap();
    let aspects = compute_aspects(&positions, None, &wide);
    assert_eq!(aspects.len(), 1);
    assert_eq!(aspects[0].kind, AspectKind::Square);
    assert!((aspects[0].orb - 10.0).abs() < 1e-9);
}

#[test]
fn caller_order_of_definitions_does_not_matter() {
    // Overlapping windows at 30°: a 35° conjunction orb and an exact semisextile
    let defs = vec![
        AspectDefinition::new(AspectKind::Semisextile, 30.0, 2.0),
        AspectDefinition::new(AspectKind::Conjunction, 0.0, 35.0),
    ];
    let forward = OrbConfig::new(defs.clone(), 1.0).unwrap();
    let reversed = OrbConfig::new(defs.into_iter().rev().collect(), 1.0).unwrap();
    for orbs in [forward, reversed] {
        let calc = AspectCalculator::new(orbs);
        assert_eq!(calc.classify(30.0).unwrap().kind, AspectKind::Conjunction);
    }
}

#[test]
fn retrograde_body_applies_from_the_other_side() {
    let calc = AspectCalculator::default();
    // Mercury retrograde, moving back toward the Sun's trine point
    let aspect = calc
        .aspect_between(&pos(Body::Mercury, 222.0, -0.5), &pos(Body::Sun, 100.0, 1.0))
        .unwrap();
    assert_eq!(aspect.kind, AspectKind::Trine);
    assert_eq!(aspect.applying, Some(true));
}

#[test]
fn deserialized_orbs_classify_by_priority() {
    let json = r#"{
        "definitions": [
            {"kind": "semisextile", "angle": 30.0, "orb": 8.0},
            {"kind": "conjunction", "angle": 0.0, "orb": 30.0}
        ],
        "multiplier": 1.0
    }"#;
    let orbs: OrbConfig = serde_json::from_str(json).unwrap();
    let calc = AspectCalculator::new(orbs);
    assert_eq!(calc.classify(25.0).unwrap().kind, AspectKind::Conjunction);
    assert!(serde_json::from_str::<OrbConfig>(r#"{"definitions": [], "multiplier": -1.0}"#).is_err());
}
