use gather_solver::engine::Game;
use gather_solver::error::{LevelError, ParseError};
use gather_solver::sweep::{sweep, SweepConfig};
use gather_solver::utils::{extract_levels, parse_level_specs};

const DOCUMENT: &str = r#"
    levels[0] = "1-2\n" +
                "0,5\n" +
                "1\n" +
                "4\n" +
                "";
    levels[1] = "1-2,1-3,1-4,1-6,2-3,3-4,3-5,4-5,4-6\n" +
                "5,7,6,0,5,7\n" +
                "2\n" +
                "15\n" +
                "";
    levels[2] = "1-2,2-3\n" +
                "0,4,0\n" +
                "1\n" +
                "8\n" +
                "";
    levels[3] = "1-2,2->3,3-1|>6\n" +
                "0,4,9\n" +
                "1\n" +
                "10\n" +
                "";
"#;

#[test]
fn test_document_levels_solve_and_replay() {
    let raw_levels = extract_levels(DOCUMENT);
    assert_eq!(raw_levels.len(), 4);

    let mut solved = 0;
    for raw in &raw_levels {
        let level = match raw.to_level() {
            Ok(level) => level,
            Err(e) => {
                assert_eq!(raw.index, 2, "only the two-home level is malformed");
                assert_eq!(
                    e,
                    ParseError::Level(LevelError::MultipleHomes { homes: vec![0, 2] })
                );
                continue;
            }
        };

        let outcome = sweep(&level, &SweepConfig::default()).unwrap();
        assert_eq!(outcome.best.plan.len(), level.moves());
        let game = Game::replay(&level, &outcome.best.plan).unwrap();
        assert_eq!(game.score(), outcome.best.score, "level {}", raw.index);
        solved += 1;
    }
    assert_eq!(solved, 3);
}

#[test]
fn test_two_node_level_golden() {
    let raw_levels = extract_levels(DOCUMENT);
    let level = raw_levels[0].to_level().unwrap();
    let outcome = sweep(&level, &SweepConfig::default()).unwrap();
    assert_eq!(outcome.best.score, 7);
    assert_eq!(outcome.best.display_plan(), vec![2, 1, 2, 1]);
}

#[test]
fn test_sweep_is_deterministic() {
    let level = extract_levels(DOCUMENT)[1].to_level().unwrap();
    let a = sweep(&level, &SweepConfig::default()).unwrap();
    let b = sweep(&level, &SweepConfig::default()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_outcome_serializes_to_json() {
    let level = extract_levels(DOCUMENT)[0].to_level().unwrap();
    let outcome = sweep(&level, &SweepConfig::default()).unwrap();
    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["best"]["score"], 7);
    assert_eq!(json["best"]["plan"], serde_json::json!([1, 0, 1, 0]));
    assert_eq!(json["trials"].as_array().map(|t| t.len()), Some(9));
}

#[test]
fn test_json_level_specs_solve_like_the_document() {
    let json = r#"[
        {"node_count": 2, "edges": [{"from": 0, "to": 1}],
         "max_values": [0, 5], "carry_limit": 1, "moves": 4},
        {"node_count": 3,
         "edges": [{"from": 0, "to": 1}, {"from": 1, "to": 2, "directed": true},
                   {"from": 2, "to": 0, "conditional": {"kind": "greater_than", "threshold": 6}}],
         "max_values": [0, 4, 9], "carry_limit": 1, "moves": 10}
    ]"#;
    let from_json: Vec<_> = parse_level_specs(json)
        .unwrap()
        .into_iter()
        .map(|level| level.unwrap())
        .collect();
    let raw_levels = extract_levels(DOCUMENT);
    assert_eq!(from_json[0], raw_levels[0].to_level().unwrap());
    assert_eq!(from_json[1], raw_levels[3].to_level().unwrap());

    let outcome = sweep(&from_json[0], &SweepConfig::default()).unwrap();
    assert_eq!(outcome.best.score, 7);
    assert_eq!(outcome.best.display_plan(), vec![2, 1, 2, 1]);
}
