//! End-to-end tests for the affinity diana: scoring, ranking order,
//! ring radii, seeded angular placement, and the empty-input statuses.

use sociometria::diana::{DianaMarker, DianaOptions};
use sociometria::{
    ComputationStatus, Engine, Gender, GroupRef, Member, MemoryStore, NominationRecord, Polarity,
    QuestionDefinition,
};

const EPS: f64 = 1e-9;

// ============================================================================
// Helper: same classroom as the sociogram tests.
// ============================================================================

fn classroom() -> (Engine<MemoryStore>, GroupRef) {
    let group = GroupRef::new("Colegio Cervantes", "4to Grado A");
    let store = MemoryStore::new();
    store.add_group(&group);

    let roster = [
        ("Ana", "Zapata", Gender::Female),
        ("José", "Pérez", Gender::Male),
        ("María", "López", Gender::Female),
        ("Luis", "Gil", Gender::Male),
        ("Ángela", "Aguilar", Gender::Female),
        ("Bruno", "Díaz", Gender::Male),
        ("Eva", "Soto", Gender::Female),
    ];
    for (given, family, gender) in roster {
        store.add_member(&group, Member::new(given, family, gender)).unwrap();
    }

    for def in [
        QuestionDefinition::new("q_play_pos", "Play", Polarity::Positive)
            .with_order(1)
            .with_max_selections(3),
        QuestionDefinition::new("q_work_pos", "Group Work", Polarity::Positive)
            .with_order(2)
            .with_max_selections(2),
    ] {
        store.define_question(&group, def).unwrap();
    }

    for (nominator, key, nominees) in [
        ("Ana Zapata", "q_play_pos", vec!["José Pérez", "María López"]),
        ("José Pérez", "q_play_pos", vec!["Ana Zapata"]),
        ("María López", "q_work_pos", vec!["ana zapata"]),
        ("Luis Gil", "q_play_pos", vec!["José Pérez"]),
        ("Ángela Aguilar", "q_work_pos", vec!["jose perez"]),
    ] {
        store
            .record_nominations(&group, NominationRecord::new(nominator, key, nominees))
            .unwrap();
    }

    (Engine::new(store), group)
}

fn keys() -> Vec<String> {
    vec!["q_play_pos".to_string(), "q_work_pos".to_string()]
}

// ============================================================================
// 1. Scores count received nominations over the selection
// ============================================================================

#[test]
fn test_scores_and_ranking_order() {
    let (engine, group) = classroom();
    let layout = engine
        .rank_affinity(&group, &keys(), &DianaOptions::default())
        .unwrap();

    assert_eq!(layout.status, ComputationStatus::Complete);
    assert_eq!(layout.placements.len(), 7);

    // best first: José (3), Ana (2), María (1), then the zeros by name
    let order: Vec<&str> = layout.placements.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(&order[..3], &["José Pérez", "Ana Zapata", "María López"]);
    let scores: Vec<u32> = layout.placements.iter().map(|p| p.score).collect();
    assert_eq!(scores, vec![3, 2, 1, 0, 0, 0, 0]);
}

// ============================================================================
// 2. Radius: best score innermost, zero outermost, monotonic between
// ============================================================================

#[test]
fn test_radius_monotonic_with_score() {
    let (engine, group) = classroom();
    let layout = engine
        .rank_affinity(&group, &keys(), &DianaOptions::default())
        .unwrap();

    let radius_of = |name: &str| {
        layout
            .placements
            .iter()
            .find(|p| p.name == name)
            .unwrap()
            .radius
    };
    let jose = radius_of("José Pérez");
    let ana = radius_of("Ana Zapata");
    let maria = radius_of("María López");
    let eva = radius_of("Eva Soto");

    assert!((jose - 0.15).abs() < EPS);
    assert!((eva - 0.98).abs() < EPS);
    assert!(jose < ana && ana < maria && maria < eva);

    // one ring per distinct score, descending
    let ring_scores: Vec<u32> = layout.rings.iter().map(|r| r.score).collect();
    assert_eq!(ring_scores, vec![3, 2, 1, 0]);
}

#[test]
fn test_single_distinct_score_uses_outer_ring() {
    let group = GroupRef::new("Colegio Cervantes", "2do C");
    let store = MemoryStore::new();
    store.add_group(&group);
    store.add_member(&group, Member::new("Ana", "Zapata", Gender::Female)).unwrap();
    store.add_member(&group, Member::new("Luis", "Gil", Gender::Male)).unwrap();
    store
        .define_question(&group, QuestionDefinition::new("q1", "Play", Polarity::Positive))
        .unwrap();

    let engine = Engine::new(store);
    let layout = engine
        .rank_affinity(&group, &["q1".to_string()], &DianaOptions::default())
        .unwrap();

    // nobody nominated anyone: one shared ring at the outer radius
    assert_eq!(layout.rings.len(), 1);
    assert!((layout.rings[0].radius - 0.98).abs() < EPS);
    assert!(layout.placements.iter().all(|p| (p.radius - 0.98).abs() < EPS));
}

// ============================================================================
// 3. Members sharing a score are spaced evenly around their ring
// ============================================================================

#[test]
fn test_shared_ring_even_spacing() {
    let (engine, group) = classroom();
    let layout = engine
        .rank_affinity(&group, &keys(), &DianaOptions::default())
        .unwrap();

    let zeros: Vec<_> = layout.placements.iter().filter(|p| p.score == 0).collect();
    assert_eq!(zeros.len(), 4);
    let step = std::f64::consts::TAU / 4.0;
    for pair in zeros.windows(2) {
        assert!((pair[1].angle - pair[0].angle - step).abs() < EPS);
    }

    // cartesian coordinates match the polar placement
    for p in &layout.placements {
        assert!((p.x - p.radius * p.angle.cos()).abs() < EPS);
        assert!((p.y - p.radius * p.angle.sin()).abs() < EPS);
    }
}

// ============================================================================
// 4. Seed: equal seeds reproduce the layout exactly
// ============================================================================

#[test]
fn test_same_seed_same_layout() {
    let (engine, group) = classroom();
    let options = DianaOptions {
        seed: 42,
        ..DianaOptions::default()
    };

    let first = engine.rank_affinity(&group, &keys(), &options).unwrap();
    let second = engine.rank_affinity(&group, &keys(), &options).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_seed_only_affects_angles() {
    let (engine, group) = classroom();
    let a = engine
        .rank_affinity(&group, &keys(), &DianaOptions { seed: 1, ..DianaOptions::default() })
        .unwrap();
    let b = engine
        .rank_affinity(&group, &keys(), &DianaOptions { seed: 2, ..DianaOptions::default() })
        .unwrap();

    assert_eq!(a.rings, b.rings);
    for (pa, pb) in a.placements.iter().zip(&b.placements) {
        assert_eq!(pa.name, pb.name);
        assert_eq!(pa.score, pb.score);
        assert!((pa.radius - pb.radius).abs() < EPS);
    }
}

// ============================================================================
// 5. Markers and connectors
// ============================================================================

#[test]
fn test_gender_markers_and_legend() {
    let (engine, group) = classroom();
    let layout = engine
        .rank_affinity(&group, &keys(), &DianaOptions::default())
        .unwrap();

    let jose = layout.placements.iter().find(|p| p.name == "José Pérez").unwrap();
    assert_eq!(jose.marker, DianaMarker::Circle);
    let ana = layout.placements.iter().find(|p| p.name == "Ana Zapata").unwrap();
    assert_eq!(ana.marker, DianaMarker::Triangle);

    assert_eq!(layout.legend.len(), 3);
    assert!(layout
        .legend
        .iter()
        .any(|e| e.marker == DianaMarker::Triangle && e.color == "#FFC0CB"));
}

#[test]
fn test_connectors_follow_show_lines() {
    let (engine, group) = classroom();

    let with_lines = engine
        .rank_affinity(&group, &keys(), &DianaOptions::default())
        .unwrap();
    assert_eq!(with_lines.connectors.len(), 6);
    assert!(with_lines
        .connectors
        .iter()
        .any(|c| c.nominator == "Ángela Aguilar" && c.nominee == "José Pérez"));

    let without = engine
        .rank_affinity(
            &group,
            &keys(),
            &DianaOptions {
                show_lines: false,
                ..DianaOptions::default()
            },
        )
        .unwrap();
    assert!(without.connectors.is_empty());
}

// ============================================================================
// 6. Ties break on the per-rank breakdown before the name
// ============================================================================

#[test]
fn test_rank_breakdown_breaks_ties() {
    let group = GroupRef::new("Colegio Cervantes", "3ro A");
    let store = MemoryStore::new();
    store.add_group(&group);
    for (given, family, gender) in [
        ("Ana", "Zapata", Gender::Female),
        ("Bea", "Ruiz", Gender::Female),
        ("Carla", "Mora", Gender::Female),
        ("Dora", "Vega", Gender::Female),
    ] {
        store.add_member(&group, Member::new(given, family, gender)).unwrap();
    }
    store
        .define_question(
            &group,
            QuestionDefinition::new("q1", "Play", Polarity::Positive).with_max_selections(2),
        )
        .unwrap();
    // Carla and Bea both end up with two nominations; Carla takes two
    // first choices while Bea takes one first and one second.
    store
        .record_nominations(&group, NominationRecord::new("Carla Mora", "q1", vec!["Bea Ruiz"]))
        .unwrap();
    store
        .record_nominations(
            &group,
            NominationRecord::new("Dora Vega", "q1", vec!["Carla Mora", "Bea Ruiz"]),
        )
        .unwrap();
    store
        .record_nominations(&group, NominationRecord::new("Bea Ruiz", "q1", vec!["Carla Mora", "Ana Zapata"]))
        .unwrap();

    let engine = Engine::new(store);
    let layout = engine
        .rank_affinity(&group, &["q1".to_string()], &DianaOptions::default())
        .unwrap();

    let order: Vec<&str> = layout.placements.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(order, vec!["Carla Mora", "Bea Ruiz", "Ana Zapata", "Dora Vega"]);
}

// ============================================================================
// 7. Empty inputs
// ============================================================================

#[test]
fn test_empty_roster_status() {
    let group = GroupRef::new("Colegio Cervantes", "Aula Vacía");
    let store = MemoryStore::new();
    store.add_group(&group);
    let engine = Engine::new(store);

    let layout = engine
        .rank_affinity(&group, &["q1".to_string()], &DianaOptions::default())
        .unwrap();
    assert_eq!(layout.status, ComputationStatus::EmptyRoster);
    assert!(layout.placements.is_empty());
}

#[test]
fn test_empty_selection_status() {
    let (engine, group) = classroom();
    let layout = engine
        .rank_affinity(&group, &[], &DianaOptions::default())
        .unwrap();
    assert_eq!(layout.status, ComputationStatus::EmptySelection);
    assert!(layout.placements.is_empty());
    assert!(layout.rings.is_empty());
}
